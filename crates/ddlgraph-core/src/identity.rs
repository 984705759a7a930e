use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of a creatable schema object.
///
/// Declaration order is part of the identity ordering and therefore of the
/// tie-break used by the serializer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Table,
    View,
    Index,
    Constraint,
    Trigger,
    Routine,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
            ObjectKind::Index => "index",
            ObjectKind::Constraint => "constraint",
            ObjectKind::Trigger => "trigger",
            ObjectKind::Routine => "routine",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a schema object: `(kind, schema, name, qualifier)`.
///
/// The qualifier is the routine's specific name for routines and the owning
/// table for constraints; other kinds leave it empty. All components are
/// trimmed on construction and an empty qualifier is stored as `None`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct ObjectId {
    pub kind: ObjectKind,
    pub schema: String,
    pub name: String,
    pub qualifier: Option<String>,
}

impl ObjectId {
    pub fn new(
        kind: ObjectKind,
        schema: impl AsRef<str>,
        name: impl AsRef<str>,
        qualifier: Option<&str>,
    ) -> Self {
        let qualifier = qualifier
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Self {
            kind,
            schema: schema.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
            qualifier,
        }
    }

    pub fn table(schema: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self::new(ObjectKind::Table, schema, name, None)
    }

    pub fn view(schema: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self::new(ObjectKind::View, schema, name, None)
    }

    pub fn index(schema: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self::new(ObjectKind::Index, schema, name, None)
    }

    pub fn trigger(schema: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self::new(ObjectKind::Trigger, schema, name, None)
    }

    /// Constraint identity; constraint names are only unique per table.
    pub fn constraint(schema: impl AsRef<str>, table: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self::new(ObjectKind::Constraint, schema, name, Some(table.as_ref()))
    }

    pub fn routine(
        schema: impl AsRef<str>,
        name: impl AsRef<str>,
        specific_name: impl AsRef<str>,
    ) -> Self {
        Self::new(ObjectKind::Routine, schema, name, Some(specific_name.as_ref()))
    }

    /// Stem of the per-object output file.
    ///
    /// Constraints share the stem of their owning table so they land in the
    /// table's file.
    pub fn file_stem(&self) -> String {
        match (self.kind, &self.qualifier) {
            (ObjectKind::Constraint, Some(table)) => format!("{}.{}", self.schema, table),
            _ => format!("{}.{}", self.schema, self.name),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.qualifier) {
            (ObjectKind::Constraint, Some(table)) => {
                write!(f, "constraint {}.{}.{}", self.schema, table, self.name)
            }
            (kind, Some(qualifier)) => {
                write!(f, "{kind} {}.{} ({qualifier})", self.schema, self.name)
            }
            (kind, None) => write!(f, "{kind} {}.{}", self.schema, self.name),
        }
    }
}
