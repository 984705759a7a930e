//! Rows yielded by a catalog provider.
//!
//! Fields carry the catalog's own codes (`"Y"`/`"N"` flags, single-letter
//! rule codes); [`crate::codes`] maps them onto the object model. Identity
//! components may arrive blank-padded and are trimmed on load.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TableRow {
    pub schema: String,
    pub name: String,
    pub tablespace: Option<String>,
    pub index_tablespace: Option<String>,
    pub long_tablespace: Option<String>,
    /// `S` static, `A` adaptive, blank for none.
    pub row_compression: String,
    /// `R` row, `C` column.
    pub organization: String,
    /// `C` for volatile cardinality.
    pub volatile: String,
    pub append_mode: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewRow {
    pub schema: String,
    pub name: String,
    /// `V` view, `S` materialized query table.
    pub view_type: String,
    pub optimization: String,
    pub text: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ColumnRow {
    pub table_schema: String,
    pub table_name: String,
    pub name: String,
    pub ordinal: i32,
    pub type_name: String,
    pub length: Option<i32>,
    pub scale: Option<i32>,
    /// Code page 0 marks `FOR BIT DATA` character columns.
    pub codepage: Option<i32>,
    pub nulls: String,
    pub default: Option<String>,
    pub identity: String,
    /// `A` always, `D` by default, blank when not generated.
    pub generated: String,
    pub generation_text: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct XmlPatternRow {
    pub pattern: String,
    pub type_name: String,
    pub length: Option<i32>,
    pub scale: Option<i32>,
    /// `R` rejects invalid values, anything else ignores them.
    pub type_model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IndexRow {
    pub schema: String,
    pub name: String,
    pub table_schema: String,
    pub table_name: String,
    /// `D` duplicates allowed, `U` unique, `P` primary.
    pub unique_rule: String,
    /// `REG`, `CLUS` or `XVIL`.
    pub index_type: String,
    pub pctfree: Option<i32>,
    pub reverse_scans: String,
    pub compression: String,
    /// `N` excludes null keys.
    pub null_keys: String,
    pub xml_pattern: Option<XmlPatternRow>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IndexColumnRow {
    pub index_schema: String,
    pub index_name: String,
    pub column_name: String,
    pub sequence: i32,
    /// `A` ascending, `D` descending, `I` include column.
    pub order: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConstraintFlags {
    pub enforced: String,
    pub trusted: String,
    pub optimization: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CheckRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub text: String,
    #[serde(flatten)]
    pub flags: ConstraintFlags,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct KeyRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    /// `P` primary key, `U` unique.
    pub key_type: String,
    /// Key columns in key order.
    pub columns: Vec<String>,
    #[serde(flatten)]
    pub flags: ConstraintFlags,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForeignKeyRow {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_key: Option<String>,
    pub referenced_columns: Vec<String>,
    /// `A` no action, `R` restrict.
    pub update_rule: String,
    /// `A` no action, `C` cascade, `N` set null, `R` restrict.
    pub delete_rule: String,
    #[serde(flatten)]
    pub flags: ConstraintFlags,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TriggerRow {
    pub schema: String,
    pub name: String,
    pub table_schema: String,
    pub table_name: String,
    pub text: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TypeRow {
    pub type_name: String,
    pub length: Option<i32>,
    pub scale: Option<i32>,
    pub codepage: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RoutineRow {
    pub schema: String,
    pub name: String,
    pub specific_name: String,
    /// `F` function, `P` procedure.
    pub routine_type: String,
    /// `SQL` routines are rendered from `text`; every other language is external.
    pub language: String,
    pub text: Option<String>,
    pub external_name: Option<String>,
    pub parameter_style: Option<String>,
    pub returns: Option<TypeRow>,
    pub deterministic: String,
    pub external_action: String,
    pub fenced: String,
    pub threadsafe: String,
    /// `N` no SQL, `C` contains, `R` reads, `M` modifies.
    pub sql_data_access: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RoutineParameterRow {
    pub routine_schema: String,
    pub specific_name: String,
    pub ordinal: i32,
    pub name: Option<String>,
    #[serde(flatten)]
    pub data_type: TypeRow,
}

/// Dependency row. Kind codes: `T` table, `V`/`S` view, `I` index,
/// `C` constraint (qualifier = owning table), `X` trigger,
/// `F` routine (qualifier = specific name). A row without a dependency only
/// registers the dependent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EdgeRow {
    pub dependent_kind: String,
    pub dependent_qualifier: Option<String>,
    pub dependent_schema: String,
    pub dependent_name: String,
    pub dependency_kind: Option<String>,
    pub dependency_qualifier: Option<String>,
    pub dependency_schema: Option<String>,
    pub dependency_name: Option<String>,
}

/// Captured `max(column)` of an identity column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IdentityValueRow {
    pub schema: String,
    pub table: String,
    pub column: String,
    /// `None` for an empty table.
    pub max: Option<i64>,
}

/// Every provider row stream of one database, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogSnapshot {
    /// Free-form label of the captured database.
    pub source: Option<String>,
    pub tables: Vec<TableRow>,
    pub views: Vec<ViewRow>,
    pub columns: Vec<ColumnRow>,
    pub indexes: Vec<IndexRow>,
    pub index_columns: Vec<IndexColumnRow>,
    pub checks: Vec<CheckRow>,
    pub keys: Vec<KeyRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
    pub triggers: Vec<TriggerRow>,
    pub routines: Vec<RoutineRow>,
    pub routine_parameters: Vec<RoutineParameterRow>,
    pub edges: Vec<EdgeRow>,
    pub identity_values: Vec<IdentityValueRow>,
}
