use async_trait::async_trait;

use ddlgraph_core::{ObjectId, Result};

use crate::rows::{
    CheckRow, ColumnRow, EdgeRow, ForeignKeyRow, IndexColumnRow, IndexRow, KeyRow,
    RoutineParameterRow, RoutineRow, TableRow, TriggerRow, ViewRow,
};

/// Source of catalog metadata for one database.
///
/// Every call is a complete row stream; failures are reported as
/// [`ddlgraph_core::Error::Provider`] and abort the extraction.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Human readable label of the database, used in logs and diff headers.
    fn source(&self) -> &str;

    async fn tables(&self) -> Result<Vec<TableRow>>;

    async fn views(&self) -> Result<Vec<ViewRow>>;

    /// Columns of every table; order within a table does not matter.
    async fn columns(&self) -> Result<Vec<ColumnRow>>;

    async fn indexes(&self) -> Result<Vec<IndexRow>>;

    async fn index_columns(&self) -> Result<Vec<IndexColumnRow>>;

    async fn checks(&self) -> Result<Vec<CheckRow>>;

    async fn candidate_keys(&self) -> Result<Vec<KeyRow>>;

    async fn foreign_keys(&self) -> Result<Vec<ForeignKeyRow>>;

    async fn triggers(&self) -> Result<Vec<TriggerRow>>;

    async fn routines(&self) -> Result<Vec<RoutineRow>>;

    async fn routine_parameters(&self) -> Result<Vec<RoutineParameterRow>>;

    async fn edges(&self) -> Result<Vec<EdgeRow>>;

    /// Current `max(column)` of a table, `None` when the table is empty.
    ///
    /// This is the only call that reads table contents instead of metadata.
    async fn identity_max(&self, table: &ObjectId, column: &str) -> Result<Option<i64>>;
}
