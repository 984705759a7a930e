use std::path::Path;

use async_trait::async_trait;

use ddlgraph_core::{Error, ObjectId, Result};

use crate::provider::CatalogProvider;
use crate::rows::{
    CatalogSnapshot, CheckRow, ColumnRow, EdgeRow, ForeignKeyRow, IndexColumnRow, IndexRow,
    KeyRow, RoutineParameterRow, RoutineRow, TableRow, TriggerRow, ViewRow,
};

/// Provider backed by a captured [`CatalogSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    source: String,
    snapshot: CatalogSnapshot,
}

impl SnapshotProvider {
    pub fn new(source: impl Into<String>, snapshot: CatalogSnapshot) -> Self {
        Self {
            source: source.into(),
            snapshot,
        }
    }

    /// Read a snapshot JSON file; the snapshot's own `source` label wins
    /// over the file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::Provider(format!("read {}: {err}", path.display())))?;
        let snapshot: CatalogSnapshot = serde_json::from_str(&content)
            .map_err(|err| Error::Provider(format!("parse {}: {err}", path.display())))?;
        let source = snapshot
            .source
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(source, snapshot))
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }
}

#[async_trait]
impl CatalogProvider for SnapshotProvider {
    fn source(&self) -> &str {
        &self.source
    }

    async fn tables(&self) -> Result<Vec<TableRow>> {
        Ok(self.snapshot.tables.clone())
    }

    async fn views(&self) -> Result<Vec<ViewRow>> {
        Ok(self.snapshot.views.clone())
    }

    async fn columns(&self) -> Result<Vec<ColumnRow>> {
        Ok(self.snapshot.columns.clone())
    }

    async fn indexes(&self) -> Result<Vec<IndexRow>> {
        Ok(self.snapshot.indexes.clone())
    }

    async fn index_columns(&self) -> Result<Vec<IndexColumnRow>> {
        Ok(self.snapshot.index_columns.clone())
    }

    async fn checks(&self) -> Result<Vec<CheckRow>> {
        Ok(self.snapshot.checks.clone())
    }

    async fn candidate_keys(&self) -> Result<Vec<KeyRow>> {
        Ok(self.snapshot.keys.clone())
    }

    async fn foreign_keys(&self) -> Result<Vec<ForeignKeyRow>> {
        Ok(self.snapshot.foreign_keys.clone())
    }

    async fn triggers(&self) -> Result<Vec<TriggerRow>> {
        Ok(self.snapshot.triggers.clone())
    }

    async fn routines(&self) -> Result<Vec<RoutineRow>> {
        Ok(self.snapshot.routines.clone())
    }

    async fn routine_parameters(&self) -> Result<Vec<RoutineParameterRow>> {
        Ok(self.snapshot.routine_parameters.clone())
    }

    async fn edges(&self) -> Result<Vec<EdgeRow>> {
        Ok(self.snapshot.edges.clone())
    }

    /// A table without a captured value is treated as empty.
    async fn identity_max(&self, table: &ObjectId, column: &str) -> Result<Option<i64>> {
        let captured = self.snapshot.identity_values.iter().find(|row| {
            row.schema.trim() == table.schema
                && row.table.trim() == table.name
                && row.column.trim() == column.trim()
        });
        match captured {
            Some(row) => Ok(row.max),
            None => {
                tracing::warn!(
                    event = "identity_value_missing",
                    table = %table,
                    column,
                    "no captured identity value, restarting at 1"
                );
                Ok(None)
            }
        }
    }
}
