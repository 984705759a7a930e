use ddlgraph_core::{
    Catalog, DependencyGraph, Edge, Error, GraphBuilder, IdentityRestart, ObjectId, RenderOptions,
    Result, Script, Serializer,
};

use crate::codes::object_kind_from_code;
use crate::loader::CatalogLoader;
use crate::options::ExtractOptions;
use crate::provider::CatalogProvider;
use crate::rows::EdgeRow;

/// Result of one extraction run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub source: String,
    pub catalog: Catalog,
    pub graph: DependencyGraph,
    pub script: Script,
}

/// Load, order and render one database. Any provider failure aborts the run.
pub async fn extract(
    provider: &dyn CatalogProvider,
    opts: &ExtractOptions,
    render: &RenderOptions,
) -> Result<Extraction> {
    let source = provider.source().to_string();
    tracing::info!(event = "extract_start", source = %source);

    let catalog = load_catalog(provider, opts).await?;
    let graph = build_graph(provider, &catalog).await?;
    tracing::info!(
        event = "graph_built",
        source = %source,
        nodes = graph.node_count(),
        edges = graph.edge_count()
    );

    let serializer = Serializer::new(&catalog, &graph, render.clone());
    let mut script = serializer.render()?;

    if opts.resync_identities {
        let mut restarts = Vec::new();
        for target in serializer.identity_targets(&script) {
            let max = provider.identity_max(&target.table, &target.column).await?;
            restarts.push(IdentityRestart::from_max(target, max));
        }
        tracing::info!(event = "identity_resync", source = %source, tables = restarts.len());
        script.append_restarts(&restarts);
    }

    tracing::info!(
        event = "extract_done",
        source = %source,
        blocks = script.blocks().len()
    );
    Ok(Extraction {
        source,
        catalog,
        graph,
        script,
    })
}

/// Build the catalog from every provider row stream, parents first.
pub async fn load_catalog(
    provider: &dyn CatalogProvider,
    opts: &ExtractOptions,
) -> Result<Catalog> {
    let mut loader = CatalogLoader::new(opts);

    loader.load_tables(provider.tables().await?)?;
    if opts.include_views {
        loader.load_views(provider.views().await?)?;
    }
    loader.load_columns(provider.columns().await?)?;
    loader.load_indexes(provider.indexes().await?)?;
    loader.load_index_columns(provider.index_columns().await?)?;
    loader.load_candidate_keys(provider.candidate_keys().await?)?;
    loader.load_checks(provider.checks().await?)?;
    loader.load_foreign_keys(provider.foreign_keys().await?)?;
    if opts.include_triggers {
        loader.load_triggers(provider.triggers().await?)?;
    }
    if opts.include_routines {
        loader.load_routines(provider.routines().await?)?;
        loader.load_routine_parameters(provider.routine_parameters().await?)?;
    }

    let catalog = loader.finish()?;
    tracing::info!(
        event = "catalog_loaded",
        source = %provider.source(),
        objects = catalog.len()
    );
    Ok(catalog)
}

/// Merge the catalog's intrinsic edges with the provider's edge rows.
/// Rows naming object kinds that are not modelled are skipped.
pub async fn build_graph(
    provider: &dyn CatalogProvider,
    catalog: &Catalog,
) -> Result<DependencyGraph> {
    let mut edges = Vec::new();
    for row in provider.edges().await? {
        match edge_from_row(&row) {
            Ok(edge) => edges.push(edge),
            Err(Error::Unsupported(reason)) => {
                tracing::warn!(event = "edge_skipped", reason = %reason);
            }
            Err(err) => return Err(err),
        }
    }

    let mut builder = GraphBuilder::new(catalog);
    builder.ingest(edges);
    Ok(builder.build())
}

/// Convert a provider edge row; a row without a dependency kind is a root.
pub fn edge_from_row(row: &EdgeRow) -> Result<Edge> {
    let dependent = ObjectId::new(
        object_kind_from_code(&row.dependent_kind)?,
        &row.dependent_schema,
        &row.dependent_name,
        row.dependent_qualifier.as_deref(),
    );

    let Some(kind) = row
        .dependency_kind
        .as_deref()
        .filter(|kind| !kind.trim().is_empty())
    else {
        return Ok(Edge::root(dependent));
    };

    let (Some(schema), Some(name)) = (&row.dependency_schema, &row.dependency_name) else {
        return Err(Error::InvalidCatalog(format!(
            "edge from {dependent} names a dependency kind without schema and name"
        )));
    };

    let dependency = ObjectId::new(
        object_kind_from_code(kind)?,
        schema,
        name,
        row.dependency_qualifier.as_deref(),
    );
    Ok(Edge::new(dependent, dependency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlgraph_core::ObjectKind;

    #[test]
    fn constraint_edge_uses_owning_table_as_qualifier() {
        let row = EdgeRow {
            dependent_kind: "C".to_string(),
            dependent_qualifier: Some("ORDERS  ".to_string()),
            dependent_schema: "APP     ".to_string(),
            dependent_name: "FK_CUSTOMER".to_string(),
            dependency_kind: Some("T".to_string()),
            dependency_schema: Some("APP".to_string()),
            dependency_name: Some("CUSTOMER".to_string()),
            ..EdgeRow::default()
        };
        let edge = edge_from_row(&row).unwrap();
        assert_eq!(
            edge,
            Edge::new(
                ObjectId::constraint("APP", "ORDERS", "FK_CUSTOMER"),
                ObjectId::table("APP", "CUSTOMER"),
            )
        );
    }

    #[test]
    fn missing_dependency_is_root() {
        let row = EdgeRow {
            dependent_kind: "F".to_string(),
            dependent_qualifier: Some("SQL0001".to_string()),
            dependent_schema: "APP".to_string(),
            dependent_name: "F".to_string(),
            dependency_kind: Some(" ".to_string()),
            ..EdgeRow::default()
        };
        let edge = edge_from_row(&row).unwrap();
        assert_eq!(edge.dependent.kind, ObjectKind::Routine);
        assert!(edge.dependency.is_none());
    }

    #[tokio::test]
    async fn unmodelled_dependency_kinds_are_skipped() {
        use crate::rows::{CatalogSnapshot, TableRow};
        use crate::snapshot::SnapshotProvider;

        let snapshot = CatalogSnapshot {
            tables: vec![TableRow {
                schema: "APP".to_string(),
                name: "T".to_string(),
                ..TableRow::default()
            }],
            edges: vec![EdgeRow {
                dependent_kind: "T".to_string(),
                dependent_schema: "APP".to_string(),
                dependent_name: "T".to_string(),
                dependency_kind: Some("Q".to_string()),
                dependency_schema: Some("APP".to_string()),
                dependency_name: Some("SEQ_T".to_string()),
                ..EdgeRow::default()
            }],
            ..CatalogSnapshot::default()
        };
        let provider = SnapshotProvider::new("unit", snapshot);
        let catalog = load_catalog(&provider, &ExtractOptions::default())
            .await
            .unwrap();
        let graph = build_graph(&provider, &catalog).await.unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn dependency_kind_without_name_is_invalid() {
        let row = EdgeRow {
            dependent_kind: "T".to_string(),
            dependent_schema: "APP".to_string(),
            dependent_name: "T".to_string(),
            dependency_kind: Some("T".to_string()),
            ..EdgeRow::default()
        };
        assert!(matches!(
            edge_from_row(&row),
            Err(Error::InvalidCatalog(_))
        ));
    }
}
