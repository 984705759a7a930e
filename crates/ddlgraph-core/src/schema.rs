use serde::{Deserialize, Serialize};

use crate::identity::ObjectId;
use crate::remarks::render_comment;
use crate::render::{RenderOptions, normalize_text};
use crate::types::{DataType, Generated, GenerationMode};

/// Column of a table; owned by exactly one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub ordinal: i32,
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<String>,
    pub generated: Option<Generated>,
    pub remarks: Option<String>,
}

impl Column {
    /// Identity generation mode when this is an identity column.
    pub fn identity_mode(&self) -> Option<GenerationMode> {
        match &self.generated {
            Some(Generated::Identity { mode }) => Some(*mode),
            _ => None,
        }
    }

    /// Column clause as it appears inside `CREATE TABLE`.
    pub fn render(&self) -> String {
        let mut out = format!("{} {}", self.name, self.data_type.render());
        if !self.nullable {
            out.push_str(" NOT NULL");
        }
        match (&self.generated, &self.default) {
            (Some(generated), _) => {
                out.push(' ');
                out.push_str(&generated.render());
            }
            (None, Some(default)) if !default.trim().is_empty() => {
                out.push_str(" WITH DEFAULT ");
                out.push_str(default.trim());
            }
            _ => {}
        }
        out
    }
}

/// Row compression setting of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    No,
    Static,
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organization {
    Row,
    Column,
}

/// Base table with its columns in ordinal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub tablespace: Option<String>,
    pub index_tablespace: Option<String>,
    pub long_tablespace: Option<String>,
    pub compression: Compression,
    pub organization: Organization,
    pub volatile: bool,
    pub append_mode: bool,
    pub remarks: Option<String>,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            tablespace: None,
            index_tablespace: None,
            long_tablespace: None,
            compression: Compression::No,
            organization: Organization::Row,
            volatile: false,
            append_mode: false,
            remarks: None,
            columns: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        ObjectId::table(&self.schema, &self.name)
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Insert a column keeping ordinal order; equal ordinals keep arrival order.
    pub fn add_column(&mut self, column: Column) {
        let position = self
            .columns
            .partition_point(|existing| existing.ordinal <= column.ordinal);
        self.columns.insert(position, column);
    }

    pub fn identity_column(&self) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.identity_mode().is_some())
    }

    /// Identity column whose values may be supplied by callers and therefore
    /// needs its sequence restarted after a reload.
    pub fn resync_column(&self) -> Option<&Column> {
        self.identity_column()
            .filter(|column| column.identity_mode() == Some(GenerationMode::ByDefault))
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        let name = self.qualified_name();
        let mut body = format!("CREATE TABLE {name}\n");

        for (position, column) in self.columns.iter().enumerate() {
            let lead = if position == 0 { "( " } else { ", " };
            body.push_str(lead);
            body.push_str(&column.render());
            body.push('\n');
        }
        if self.columns.is_empty() {
            body.push_str("(\n");
        }

        body.push(')');
        if let Some(tablespace) = non_blank(&self.tablespace) {
            body.push_str(&format!(" IN {tablespace}"));
            if let Some(index) = non_blank(&self.index_tablespace) {
                body.push_str(&format!(" INDEX IN {index}"));
            }
            if let Some(long) = non_blank(&self.long_tablespace) {
                body.push_str(&format!(" LONG IN {long}"));
            }
        }
        body.push('\n');

        match self.compression {
            Compression::No => {}
            Compression::Static => body.push_str("COMPRESS YES STATIC\n"),
            Compression::Adaptive => body.push_str("COMPRESS YES ADAPTIVE\n"),
        }
        body.push_str(match self.organization {
            Organization::Row => "ORGANIZE BY ROW",
            Organization::Column => "ORGANIZE BY COLUMN",
        });

        let mut out = opts.statement(&body);
        if self.volatile {
            out.push_str(&opts.statement(&format!("ALTER TABLE {name} VOLATILE CARDINALITY")));
        }
        if self.append_mode {
            out.push_str(&opts.statement(&format!("ALTER TABLE {name} APPEND ON")));
        }
        out
    }

    /// Table remark followed by every column remark in ordinal order.
    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        let name = self.qualified_name();
        let mut out = render_comment(&format!("TABLE {name}"), self.remarks.as_deref(), opts);
        for column in &self.columns {
            out.push_str(&render_comment(
                &format!("COLUMN {name}.{}", column.name),
                column.remarks.as_deref(),
                opts,
            ));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    View,
    MaterializedQueryTable,
}

/// View or materialized query table defined by its stored text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub schema: String,
    pub name: String,
    pub kind: ViewKind,
    pub query_optimization: bool,
    pub text: String,
    pub remarks: Option<String>,
}

impl View {
    pub fn id(&self) -> ObjectId {
        ObjectId::view(&self.schema, &self.name)
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        let name = format!("{}.{}", self.schema, self.name);
        let mut out = opts.statement(&normalize_text(&self.text));
        match self.kind {
            ViewKind::View if self.query_optimization => {
                out.push_str(&opts.statement(&format!(
                    "ALTER VIEW {name} ENABLE QUERY OPTIMIZATION"
                )));
            }
            ViewKind::View => {}
            ViewKind::MaterializedQueryTable => {
                out.push_str(&opts.statement(&format!("REFRESH TABLE {name}")));
            }
        }
        out
    }

    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        render_comment(
            &format!("TABLE {}.{}", self.schema, self.name),
            self.remarks.as_deref(),
            opts,
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|item| !item.is_empty())
}
