use serde::{Deserialize, Serialize};

use crate::identity::ObjectId;
use crate::remarks::render_comment;
use crate::render::{RenderOptions, normalize_text};

/// Trigger defined by its stored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub schema: String,
    pub name: String,
    pub table_schema: String,
    pub table_name: String,
    pub text: String,
    pub remarks: Option<String>,
}

impl Trigger {
    pub fn id(&self) -> ObjectId {
        ObjectId::trigger(&self.schema, &self.name)
    }

    pub fn table_id(&self) -> ObjectId {
        ObjectId::table(&self.table_schema, &self.table_name)
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        opts.statement(&normalize_text(&self.text))
    }

    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        render_comment(
            &format!("TRIGGER {}.{}", self.schema, self.name),
            self.remarks.as_deref(),
            opts,
        )
    }
}
