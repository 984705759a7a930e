use serde::{Deserialize, Serialize};

use crate::identity::ObjectId;
use crate::remarks::render_comment;
use crate::render::RenderOptions;
use crate::types::{DataType, TypeFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Key column of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub order: SortOrder,
}

impl IndexColumn {
    fn render(&self) -> String {
        match self.order {
            SortOrder::Ascending => self.name.clone(),
            SortOrder::Descending => format!("{} DESC", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueRule {
    Duplicates,
    Unique,
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    Regular,
    Clustered,
    XmlPattern,
}

/// Key generation of an XML pattern index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlPattern {
    pub pattern: String,
    pub data_type: DataType,
    pub reject_invalid_values: bool,
}

impl XmlPattern {
    fn render(&self) -> String {
        let mut out = format!(
            "GENERATE KEY USING XMLPATTERN '{}'\n  AS SQL {}",
            self.pattern, self.data_type.name
        );
        match (self.data_type.family(), self.data_type.length) {
            (TypeFamily::Decimal, Some(length)) => {
                out.push_str(&format!("({length}, {})", self.data_type.scale.unwrap_or(0)));
            }
            (TypeFamily::Character, Some(length)) => {
                out.push_str(&format!("({length} OCTETS)"));
            }
            _ => {}
        }
        out.push_str(if self.reject_invalid_values {
            " REJECT INVALID VALUES\n"
        } else {
            " IGNORE INVALID VALUES\n"
        });
        out
    }
}

/// Index over one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub schema: String,
    pub name: String,
    pub table_schema: String,
    pub table_name: String,
    pub unique_rule: UniqueRule,
    pub index_type: IndexType,
    /// Ordered key columns.
    pub columns: Vec<IndexColumn>,
    /// Included, non-key columns.
    pub include: Vec<String>,
    pub pctfree: Option<i32>,
    pub reverse_scans: bool,
    pub compression: bool,
    pub exclude_null_keys: bool,
    pub xml_pattern: Option<XmlPattern>,
    pub remarks: Option<String>,
}

impl Index {
    pub fn id(&self) -> ObjectId {
        ObjectId::index(&self.schema, &self.name)
    }

    pub fn table_id(&self) -> ObjectId {
        ObjectId::table(&self.table_schema, &self.table_name)
    }

    pub fn push_key(&mut self, name: impl Into<String>, order: SortOrder) {
        self.columns.push(IndexColumn {
            name: name.into(),
            order,
        });
    }

    pub fn push_include(&mut self, name: impl Into<String>) {
        self.include.push(name.into());
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        let mut body = String::from("CREATE ");
        if matches!(self.unique_rule, UniqueRule::Unique | UniqueRule::Primary) {
            body.push_str("UNIQUE ");
        }
        body.push_str(&format!(
            "INDEX {}.{} ON {}.{}\n",
            self.schema, self.name, self.table_schema, self.table_name
        ));

        let keys: Vec<String> = self.columns.iter().map(IndexColumn::render).collect();
        body.push_str(&format!(" ({})\n", keys.join(", ")));
        if !self.include.is_empty() {
            body.push_str(&format!("INCLUDE ({})\n", self.include.join(", ")));
        }
        if let Some(pattern) = &self.xml_pattern {
            body.push_str(&pattern.render());
        }
        if let Some(pctfree) = self.pctfree.filter(|value| *value >= 0) {
            body.push_str(&format!("PCTFREE {pctfree}\n"));
        }
        if self.compression {
            body.push_str("COMPRESS YES\n");
        }
        if self.index_type == IndexType::Clustered {
            body.push_str("CLUSTER\n");
        }
        if self.exclude_null_keys {
            body.push_str("EXCLUDE NULL KEYS\n");
        }
        body.push_str(if self.reverse_scans {
            "ALLOW REVERSE SCANS\n"
        } else {
            "DISALLOW REVERSE SCANS\n"
        });
        body.push_str("COLLECT SAMPLED DETAILED STATISTICS");
        opts.statement(&body)
    }

    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        render_comment(
            &format!("INDEX {}.{}", self.schema, self.name),
            self.remarks.as_deref(),
            opts,
        )
    }
}
