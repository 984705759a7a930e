use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::identity::{ObjectId, ObjectKind};
use crate::render::RenderOptions;

/// Rendered text of one ordered object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBlock {
    pub object: ObjectId,
    /// Stem of the file the block lands in when writing one file per object.
    pub file_stem: String,
    pub text: String,
}

/// Ordered DDL script.
#[derive(Debug, Clone)]
pub struct Script {
    blocks: Vec<ScriptBlock>,
    options: RenderOptions,
}

impl Script {
    pub fn blocks(&self) -> &[ScriptBlock] {
        &self.blocks
    }

    /// Objects in emission order; restart blocks repeat their table.
    pub fn order(&self) -> impl Iterator<Item = &ObjectId> {
        self.blocks.iter().map(|block| &block.object)
    }

    /// Append identity restarts after the structural statements.
    pub fn append_restarts(&mut self, restarts: &[IdentityRestart]) {
        for restart in restarts {
            self.blocks.push(ScriptBlock {
                object: restart.target.table.clone(),
                file_stem: restart.target.table.file_stem(),
                text: restart.render(&self.options),
            });
        }
    }

    /// The whole script as one text.
    pub fn to_text(&self) -> String {
        let mut out = self.options.directive().unwrap_or_default();
        for block in &self.blocks {
            out.push_str(&block.text);
        }
        out
    }

    /// Script split by file stem; each file keeps script order.
    pub fn files(&self) -> BTreeMap<String, String> {
        let mut files: BTreeMap<String, String> = BTreeMap::new();
        for block in &self.blocks {
            files
                .entry(block.file_stem.clone())
                .or_insert_with(|| self.options.directive().unwrap_or_default())
                .push_str(&block.text);
        }
        files
    }
}

/// Identity column whose sequence must be restarted after a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityTarget {
    pub table: ObjectId,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRestart {
    pub target: IdentityTarget,
    pub restart_with: i64,
}

impl IdentityRestart {
    /// Restart one past the current maximum, or at 1 for an empty table.
    pub fn from_max(target: IdentityTarget, max: Option<i64>) -> Self {
        let restart_with = max.map_or(1, |value| value.saturating_add(1));
        Self {
            target,
            restart_with,
        }
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        opts.statement(&format!(
            "ALTER TABLE {}.{} ALTER COLUMN {} RESTART WITH {}",
            self.target.table.schema, self.target.table.name, self.target.column, self.restart_with
        ))
    }
}

/// Renders a catalog in dependency order.
pub struct Serializer<'a> {
    catalog: &'a Catalog,
    graph: &'a DependencyGraph,
    options: RenderOptions,
}

impl<'a> Serializer<'a> {
    pub fn new(catalog: &'a Catalog, graph: &'a DependencyGraph, options: RenderOptions) -> Self {
        Self {
            catalog,
            graph,
            options,
        }
    }

    /// Render every defined node after its dependencies.
    ///
    /// Nodes only known from edges are external and skipped. A defined node
    /// missing from the catalog is an `UnresolvedReference`.
    pub fn render(&self) -> Result<Script> {
        let order = self.graph.topological_order().map_err(|err| match err {
            Error::Cycle { nodes, .. } => {
                let foreign_keys = self.catalog.foreign_keys_between(&nodes);
                Error::Cycle {
                    nodes,
                    foreign_keys,
                }
            }
            other => other,
        })?;
        let mut blocks = Vec::with_capacity(order.len());

        for id in order {
            let Some(object) = self.catalog.get(&id) else {
                if self.graph.is_defined(&id) {
                    return Err(Error::UnresolvedReference(id));
                }
                tracing::debug!(event = "external_dependency_skipped", object = %id);
                continue;
            };

            let mut text = object.render(&self.options);
            text.push_str(&object.render_remarks(&self.options));
            blocks.push(ScriptBlock {
                file_stem: id.file_stem(),
                object: id,
                text,
            });
        }

        Ok(Script {
            blocks,
            options: self.options.clone(),
        })
    }

    /// Tables of `script`, in script order, whose identity column accepts
    /// caller-supplied values.
    pub fn identity_targets(&self, script: &Script) -> Vec<IdentityTarget> {
        script
            .blocks
            .iter()
            .filter(|block| block.object.kind == ObjectKind::Table)
            .filter_map(|block| {
                let table = self.catalog.get(&block.object)?.as_table()?;
                let column = table.resync_column()?;
                Some(IdentityTarget {
                    table: block.object.clone(),
                    column: column.name.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, GraphBuilder};
    use crate::schema::Table;

    #[test]
    fn external_leaf_is_skipped() {
        let mut catalog = Catalog::new();
        catalog.insert(Table::new("APP", "T")).unwrap();
        let mut builder = GraphBuilder::new(&catalog);
        builder.ingest([Edge::new(
            ObjectId::table("APP", "T"),
            ObjectId::table("OTHER", "PARENT"),
        )]);
        let graph = builder.build();

        let script = Serializer::new(&catalog, &graph, RenderOptions::default())
            .render()
            .unwrap();
        assert_eq!(
            script.order().cloned().collect::<Vec<_>>(),
            vec![ObjectId::table("APP", "T")]
        );
    }

    #[test]
    fn defined_node_missing_from_catalog_is_fatal() {
        let catalog = Catalog::new();
        let mut graph = DependencyGraph::new();
        graph.define(ObjectId::table("APP", "GONE"));

        let err = Serializer::new(&catalog, &graph, RenderOptions::default())
            .render()
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(id) if id.name == "GONE"));
    }

    #[test]
    fn restart_from_empty_table_is_one() {
        let target = IdentityTarget {
            table: ObjectId::table("APP", "T"),
            column: "ID".to_string(),
        };
        assert_eq!(IdentityRestart::from_max(target.clone(), None).restart_with, 1);
        assert_eq!(IdentityRestart::from_max(target, Some(41)).restart_with, 42);
    }

    #[test]
    fn files_group_by_stem_with_directive() {
        let mut catalog = Catalog::new();
        catalog.insert(Table::new("APP", "A")).unwrap();
        catalog.insert(Table::new("APP", "B")).unwrap();
        let graph = GraphBuilder::new(&catalog).build();
        let script = Serializer::new(&catalog, &graph, RenderOptions::default())
            .render()
            .unwrap();

        let files = script.files();
        assert_eq!(files.keys().cloned().collect::<Vec<_>>(), vec!["APP.A", "APP.B"]);
        assert!(files["APP.A"].starts_with("--#SET TERMINATOR @\n\nCREATE TABLE APP.A\n"));
        assert!(script.to_text().starts_with("--#SET TERMINATOR @\n\n"));
    }
}
