use serde::{Deserialize, Serialize};

use crate::constraints::Constraint;
use crate::identity::{ObjectId, ObjectKind};
use crate::index::Index;
use crate::render::RenderOptions;
use crate::routine::Routine;
use crate::schema::{Table, View};
use crate::trigger::Trigger;

/// Closed set of creatable schema objects; each variant renders itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum SchemaObject {
    Table(Table),
    View(View),
    Index(Index),
    Constraint(Constraint),
    Trigger(Trigger),
    Routine(Routine),
}

impl SchemaObject {
    pub fn id(&self) -> ObjectId {
        match self {
            SchemaObject::Table(table) => table.id(),
            SchemaObject::View(view) => view.id(),
            SchemaObject::Index(index) => index.id(),
            SchemaObject::Constraint(constraint) => constraint.id(),
            SchemaObject::Trigger(trigger) => trigger.id(),
            SchemaObject::Routine(routine) => routine.id(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            SchemaObject::Table(_) => ObjectKind::Table,
            SchemaObject::View(_) => ObjectKind::View,
            SchemaObject::Index(_) => ObjectKind::Index,
            SchemaObject::Constraint(_) => ObjectKind::Constraint,
            SchemaObject::Trigger(_) => ObjectKind::Trigger,
            SchemaObject::Routine(_) => ObjectKind::Routine,
        }
    }

    /// Creation statement(s), terminated.
    pub fn render(&self, opts: &RenderOptions) -> String {
        match self {
            SchemaObject::Table(table) => table.render(opts),
            SchemaObject::View(view) => view.render(opts),
            SchemaObject::Index(index) => index.render(opts),
            SchemaObject::Constraint(constraint) => constraint.render(opts),
            SchemaObject::Trigger(trigger) => trigger.render(opts),
            SchemaObject::Routine(routine) => routine.render(opts),
        }
    }

    /// Trailing `COMMENT ON` statements; empty when remarks are disabled or absent.
    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        match self {
            SchemaObject::Table(table) => table.render_remarks(opts),
            SchemaObject::View(view) => view.render_remarks(opts),
            SchemaObject::Index(index) => index.render_remarks(opts),
            SchemaObject::Constraint(constraint) => constraint.render_remarks(opts),
            SchemaObject::Trigger(trigger) => trigger.render_remarks(opts),
            SchemaObject::Routine(routine) => routine.render_remarks(opts),
        }
    }

    /// Dependencies implied by the object's own definition.
    pub fn intrinsic_dependencies(&self) -> Vec<ObjectId> {
        match self {
            SchemaObject::Table(_) | SchemaObject::View(_) | SchemaObject::Routine(_) => {
                Vec::new()
            }
            SchemaObject::Index(index) => vec![index.table_id()],
            SchemaObject::Trigger(trigger) => vec![trigger.table_id()],
            SchemaObject::Constraint(constraint) => {
                let mut deps = vec![constraint.table_id()];
                deps.extend(constraint.referenced_key_id());
                deps
            }
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            SchemaObject::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl From<Table> for SchemaObject {
    fn from(value: Table) -> Self {
        SchemaObject::Table(value)
    }
}

impl From<View> for SchemaObject {
    fn from(value: View) -> Self {
        SchemaObject::View(value)
    }
}

impl From<Index> for SchemaObject {
    fn from(value: Index) -> Self {
        SchemaObject::Index(value)
    }
}

impl From<Constraint> for SchemaObject {
    fn from(value: Constraint) -> Self {
        SchemaObject::Constraint(value)
    }
}

impl From<Trigger> for SchemaObject {
    fn from(value: Trigger) -> Self {
        SchemaObject::Trigger(value)
    }
}

impl From<Routine> for SchemaObject {
    fn from(value: Routine) -> Self {
        SchemaObject::Routine(value)
    }
}
