use anyhow::{Context, Result};
use async_trait::async_trait;
use ddlgraph_catalog::rows::{
    CatalogSnapshot, CheckRow, ColumnRow, EdgeRow, ForeignKeyRow, IndexColumnRow, IndexRow,
    KeyRow, RoutineParameterRow, RoutineRow, TableRow, TriggerRow, ViewRow,
};
use ddlgraph_catalog::{CatalogProvider, ExtractOptions, SnapshotProvider, extract};
use ddlgraph_core::{Error, ObjectId, RenderOptions};

const SHOP: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/shop.json");

fn shop() -> Result<SnapshotProvider> {
    SnapshotProvider::from_path(SHOP).context("loading shop snapshot")
}

#[tokio::test]
async fn orders_shop_objects_after_their_dependencies() -> Result<()> {
    let provider = shop()?;
    let opts = ExtractOptions {
        schemas: Some(vec!["APP".to_string()]),
        ..ExtractOptions::default()
    };
    let extraction = extract(&provider, &opts, &RenderOptions::default()).await?;
    assert_eq!(extraction.source, "shop");

    let order: Vec<ObjectId> = extraction
        .script
        .blocks()
        .iter()
        .map(|block| block.object.clone())
        .collect();
    assert_eq!(
        order,
        vec![
            ObjectId::table("APP", "CUSTOMER"),
            ObjectId::table("APP", "ORDERS"),
            ObjectId::view("APP", "V_ORDER_TOTALS"),
            ObjectId::index("APP", "IX_ORDERS_CUSTOMER"),
            ObjectId::constraint("APP", "ORDERS", "CK_ORDERS_QTY"),
            ObjectId::constraint("APP", "CUSTOMER", "PK_CUSTOMER"),
            ObjectId::constraint("APP", "ORDERS", "FK_ORDERS_CUSTOMER"),
            ObjectId::constraint("APP", "ORDERS", "PK_ORDERS"),
            ObjectId::routine("APP", "LOG_ORDER", "LOG_ORDER_P"),
            ObjectId::trigger("APP", "TRG_ORDERS_AUDIT"),
            ObjectId::table("APP", "CUSTOMER"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn renders_tables_with_remarks_and_identity_restart() -> Result<()> {
    let provider = shop()?;
    let opts = ExtractOptions {
        schemas: Some(vec!["APP".to_string()]),
        ..ExtractOptions::default()
    };
    let extraction = extract(&provider, &opts, &RenderOptions::default()).await?;
    let files = extraction.script.files();

    let customer = files.get("APP.CUSTOMER").context("customer file")?;
    assert!(customer.starts_with(
        "--#SET TERMINATOR @\n\n\
         CREATE TABLE APP.CUSTOMER\n\
         ( ID INTEGER NOT NULL GENERATED BY DEFAULT AS IDENTITY\n\
         , NAME VARCHAR(40) NOT NULL\n\
         ) IN TS_DATA INDEX IN TS_IDX\n\
         ORGANIZE BY ROW @\n\n\
         COMMENT ON TABLE APP.CUSTOMER IS 'Registered customers' @\n\n\
         COMMENT ON COLUMN APP.CUSTOMER.NAME IS 'Display name' @\n\n"
    ));
    assert!(customer.contains("ALTER TABLE APP.CUSTOMER ADD CONSTRAINT PK_CUSTOMER\n"));
    assert!(customer.ends_with("ALTER TABLE APP.CUSTOMER ALTER COLUMN ID RESTART WITH 6 @\n\n"));

    let orders = files.get("APP.ORDERS").context("orders file")?;
    assert!(orders.contains("COMPRESS YES ADAPTIVE\n"));
    assert!(orders.contains(", QTY DECIMAL(9, 2) NOT NULL WITH DEFAULT 0\n"));
    assert!(orders.contains("ADD CONSTRAINT FK_ORDERS_CUSTOMER\n"));
    assert!(!orders.contains("RESTART WITH"));

    let index = files.get("APP.IX_ORDERS_CUSTOMER").context("index file")?;
    assert!(index.contains(" (CUSTOMER_ID)\nINCLUDE (QTY)\nPCTFREE 10\n"));

    let routine = files.get("APP.LOG_ORDER").context("routine file")?;
    assert!(routine.contains("(IN ORDER_ID BIGINT)\nSPECIFIC LOG_ORDER_P\n"));
    Ok(())
}

#[tokio::test]
async fn schema_filter_keeps_only_listed_schema() -> Result<()> {
    let provider = shop()?;
    let opts = ExtractOptions {
        schemas: Some(vec!["SALES".to_string()]),
        ..ExtractOptions::default()
    };
    let extraction = extract(&provider, &opts, &RenderOptions::default()).await?;

    let stems: Vec<String> = extraction.script.files().into_keys().collect();
    assert_eq!(stems, vec!["SALES.REGION".to_string()]);
    let text = extraction.script.to_text();
    assert!(text.contains("( CODE CHARACTER(4) FOR BIT DATA NOT NULL\n"));
    assert!(text.contains("ORGANIZE BY COLUMN @\n\nALTER TABLE SALES.REGION VOLATILE CARDINALITY @\n\n"));
    Ok(())
}

#[tokio::test]
async fn disabled_kinds_are_not_loaded() -> Result<()> {
    let provider = shop()?;
    let opts = ExtractOptions {
        include_views: false,
        include_routines: false,
        include_triggers: false,
        resync_identities: false,
        ..ExtractOptions::default()
    };
    let extraction = extract(&provider, &opts, &RenderOptions::default()).await?;
    let text = extraction.script.to_text();
    assert!(!text.contains("CREATE VIEW"));
    assert!(!text.contains("CREATE TRIGGER"));
    assert!(!text.contains("CREATE PROCEDURE"));
    assert!(!text.contains("RESTART WITH"));
    assert!(text.contains("CREATE TABLE SALES.REGION"));
    Ok(())
}

#[tokio::test]
async fn repeated_extractions_are_identical() -> Result<()> {
    let provider = shop()?;
    let opts = ExtractOptions::default();
    let render = RenderOptions::default();
    let first = extract(&provider, &opts, &render).await?;
    let second = extract(&provider, &opts, &render).await?;
    assert_eq!(first.script.to_text(), second.script.to_text());
    assert_eq!(first.graph, second.graph);
    Ok(())
}

fn table_row(schema: &str, name: &str) -> TableRow {
    TableRow {
        schema: schema.to_string(),
        name: name.to_string(),
        organization: "R".to_string(),
        ..TableRow::default()
    }
}

fn column_row(schema: &str, table: &str) -> ColumnRow {
    ColumnRow {
        table_schema: schema.to_string(),
        table_name: table.to_string(),
        name: "ID".to_string(),
        type_name: "INTEGER".to_string(),
        nulls: "N".to_string(),
        ..ColumnRow::default()
    }
}

fn table_edge(dependent: (&str, &str), dependency: (&str, &str)) -> EdgeRow {
    EdgeRow {
        dependent_kind: "T".to_string(),
        dependent_schema: dependent.0.to_string(),
        dependent_name: dependent.1.to_string(),
        dependency_kind: Some("T".to_string()),
        dependency_schema: Some(dependency.0.to_string()),
        dependency_name: Some(dependency.1.to_string()),
        ..EdgeRow::default()
    }
}

#[tokio::test]
async fn cycles_outside_the_schema_filter_are_ignored() -> Result<()> {
    let snapshot = CatalogSnapshot {
        source: Some("filtered".to_string()),
        tables: vec![
            table_row("APP", "T"),
            table_row("OTHER", "A"),
            table_row("OTHER", "B"),
        ],
        columns: vec![
            column_row("APP", "T"),
            column_row("OTHER", "A"),
            column_row("OTHER", "B"),
        ],
        edges: vec![
            table_edge(("OTHER", "A"), ("OTHER", "B")),
            table_edge(("OTHER", "B"), ("OTHER", "A")),
        ],
        ..CatalogSnapshot::default()
    };
    let provider = SnapshotProvider::new("filtered", snapshot);
    let opts = ExtractOptions {
        schemas: Some(vec!["APP".to_string()]),
        ..ExtractOptions::default()
    };

    let extraction = extract(&provider, &opts, &RenderOptions::default()).await?;
    let order: Vec<ObjectId> = extraction.script.order().cloned().collect();
    assert_eq!(order, vec![ObjectId::table("APP", "T")]);
    assert!(!extraction.graph.contains(&ObjectId::table("OTHER", "A")));

    let unfiltered = extract(&provider, &ExtractOptions::default(), &RenderOptions::default()).await;
    assert!(matches!(unfiltered, Err(Error::Cycle { .. })));
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FailAt {
    Edges,
    IdentityMax,
}

/// Serves the shop snapshot but fails one call.
struct FailingProvider {
    inner: SnapshotProvider,
    fail_at: FailAt,
}

impl FailingProvider {
    fn failure(&self, at: FailAt) -> ddlgraph_core::Result<()> {
        if self.fail_at == at {
            return Err(Error::Provider("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for FailingProvider {
    fn source(&self) -> &str {
        self.inner.source()
    }

    async fn tables(&self) -> ddlgraph_core::Result<Vec<TableRow>> {
        self.inner.tables().await
    }

    async fn views(&self) -> ddlgraph_core::Result<Vec<ViewRow>> {
        self.inner.views().await
    }

    async fn columns(&self) -> ddlgraph_core::Result<Vec<ColumnRow>> {
        self.inner.columns().await
    }

    async fn indexes(&self) -> ddlgraph_core::Result<Vec<IndexRow>> {
        self.inner.indexes().await
    }

    async fn index_columns(&self) -> ddlgraph_core::Result<Vec<IndexColumnRow>> {
        self.inner.index_columns().await
    }

    async fn checks(&self) -> ddlgraph_core::Result<Vec<CheckRow>> {
        self.inner.checks().await
    }

    async fn candidate_keys(&self) -> ddlgraph_core::Result<Vec<KeyRow>> {
        self.inner.candidate_keys().await
    }

    async fn foreign_keys(&self) -> ddlgraph_core::Result<Vec<ForeignKeyRow>> {
        self.inner.foreign_keys().await
    }

    async fn triggers(&self) -> ddlgraph_core::Result<Vec<TriggerRow>> {
        self.inner.triggers().await
    }

    async fn routines(&self) -> ddlgraph_core::Result<Vec<RoutineRow>> {
        self.inner.routines().await
    }

    async fn routine_parameters(&self) -> ddlgraph_core::Result<Vec<RoutineParameterRow>> {
        self.inner.routine_parameters().await
    }

    async fn edges(&self) -> ddlgraph_core::Result<Vec<EdgeRow>> {
        self.failure(FailAt::Edges)?;
        self.inner.edges().await
    }

    async fn identity_max(
        &self,
        table: &ObjectId,
        column: &str,
    ) -> ddlgraph_core::Result<Option<i64>> {
        self.failure(FailAt::IdentityMax)?;
        self.inner.identity_max(table, column).await
    }
}

#[tokio::test]
async fn provider_failure_aborts_the_run() -> Result<()> {
    for fail_at in [FailAt::Edges, FailAt::IdentityMax] {
        let provider = FailingProvider {
            inner: shop()?,
            fail_at,
        };
        let result = extract(&provider, &ExtractOptions::default(), &RenderOptions::default()).await;
        match result {
            Err(Error::Provider(message)) => assert_eq!(message, "connection reset"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(extraction) => panic!("no script expected, got {} blocks", extraction.script.blocks().len()),
        }
    }
    Ok(())
}
