use serde::{Deserialize, Serialize};

use crate::identity::ObjectId;
use crate::remarks::render_comment;
use crate::render::{RenderOptions, normalize_text};

/// Enforcement and optimizer flags shared by every constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintState {
    pub enforced: bool,
    /// Only meaningful for informational (not enforced) constraints.
    pub trusted: bool,
    pub query_optimization: bool,
}

impl Default for ConstraintState {
    fn default() -> Self {
        Self {
            enforced: true,
            trusted: true,
            query_optimization: true,
        }
    }
}

impl ConstraintState {
    fn render(&self) -> String {
        let mut out = String::new();
        if self.enforced {
            out.push_str("ENFORCED\n");
        } else if self.trusted {
            out.push_str("NOT ENFORCED\nTRUSTED\n");
        } else {
            out.push_str("NOT ENFORCED\nNOT TRUSTED\n");
        }
        out.push_str(if self.query_optimization {
            "ENABLE QUERY OPTIMIZATION"
        } else {
            "DISABLE QUERY OPTIMIZATION"
        });
        out
    }
}

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FkAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
}

impl FkAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FkAction::NoAction => "NO ACTION",
            FkAction::Restrict => "RESTRICT",
            FkAction::Cascade => "CASCADE",
            FkAction::SetNull => "SET NULL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Primary,
    Unique,
}

/// Check constraint definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub expression: String,
}

/// Primary key or unique constraint preserving column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateKey {
    pub kind: KeyKind,
    pub columns: Vec<String>,
}

/// Foreign key definition preserving column ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub referenced_schema: String,
    pub referenced_table: String,
    /// Name of the referenced primary key or unique constraint.
    pub referenced_key: Option<String>,
    pub referenced_columns: Vec<String>,
    pub on_update: FkAction,
    pub on_delete: FkAction,
}

/// Table-level constraint definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintBody {
    Check(CheckConstraint),
    CandidateKey(CandidateKey),
    ForeignKey(ForeignKey),
}

/// Constraint owned by exactly one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub state: ConstraintState,
    pub body: ConstraintBody,
    pub remarks: Option<String>,
}

impl Constraint {
    pub fn id(&self) -> ObjectId {
        ObjectId::constraint(&self.schema, &self.table, &self.name)
    }

    pub fn table_id(&self) -> ObjectId {
        ObjectId::table(&self.schema, &self.table)
    }

    /// Table a foreign key points at.
    pub fn referenced_table_id(&self) -> Option<ObjectId> {
        match &self.body {
            ConstraintBody::ForeignKey(fk) => Some(ObjectId::table(
                &fk.referenced_schema,
                &fk.referenced_table,
            )),
            _ => None,
        }
    }

    /// Candidate key a foreign key points at, when its name is known.
    pub fn referenced_key_id(&self) -> Option<ObjectId> {
        match &self.body {
            ConstraintBody::ForeignKey(fk) => fk.referenced_key.as_ref().map(|key| {
                ObjectId::constraint(&fk.referenced_schema, &fk.referenced_table, key)
            }),
            _ => None,
        }
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        let mut body = format!(
            "ALTER TABLE {}.{} ADD CONSTRAINT {}\n",
            self.schema, self.table, self.name
        );
        match &self.body {
            ConstraintBody::Check(check) => {
                body.push_str(&format!(
                    "  CHECK ( {} )\n",
                    normalize_text(&check.expression).trim()
                ));
            }
            ConstraintBody::CandidateKey(key) => {
                let keyword = match key.kind {
                    KeyKind::Primary => "PRIMARY KEY",
                    KeyKind::Unique => "UNIQUE",
                };
                body.push_str(&format!("  {keyword} ( {} )\n", key.columns.join(", ")));
            }
            ConstraintBody::ForeignKey(fk) => {
                body.push_str(&format!("  FOREIGN KEY ({})\n", fk.columns.join(", ")));
                body.push_str(&format!(
                    "  REFERENCES {}.{}\n",
                    fk.referenced_schema, fk.referenced_table
                ));
                body.push_str(&format!("              ({})\n", fk.referenced_columns.join(", ")));
                body.push_str(&format!("    ON UPDATE {}\n", fk.on_update.as_sql()));
                body.push_str(&format!("    ON DELETE {}\n", fk.on_delete.as_sql()));
            }
        }
        body.push_str(&self.state.render());
        opts.statement(&body)
    }

    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        render_comment(
            &format!("CONSTRAINT {}.{}.{}", self.schema, self.table, self.name),
            self.remarks.as_deref(),
            opts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foreign_key() -> Constraint {
        Constraint {
            schema: "APP".to_string(),
            table: "ORDERS".to_string(),
            name: "FK_ORDERS_CUSTOMER".to_string(),
            state: ConstraintState::default(),
            body: ConstraintBody::ForeignKey(ForeignKey {
                columns: vec!["CUSTOMER_ID".to_string()],
                referenced_schema: "APP".to_string(),
                referenced_table: "CUSTOMER".to_string(),
                referenced_key: Some("PK_CUSTOMER".to_string()),
                referenced_columns: vec!["ID".to_string()],
                on_update: FkAction::NoAction,
                on_delete: FkAction::Cascade,
            }),
            remarks: None,
        }
    }

    #[test]
    fn renders_foreign_key() {
        assert_eq!(
            foreign_key().render(&RenderOptions::default()),
            "ALTER TABLE APP.ORDERS ADD CONSTRAINT FK_ORDERS_CUSTOMER\n\
             \x20 FOREIGN KEY (CUSTOMER_ID)\n\
             \x20 REFERENCES APP.CUSTOMER\n\
             \x20             (ID)\n\
             \x20   ON UPDATE NO ACTION\n\
             \x20   ON DELETE CASCADE\n\
             ENFORCED\n\
             ENABLE QUERY OPTIMIZATION @\n\n"
        );
    }

    #[test]
    fn foreign_key_exposes_references() {
        let fk = foreign_key();
        assert_eq!(fk.referenced_table_id(), Some(ObjectId::table("APP", "CUSTOMER")));
        assert_eq!(
            fk.referenced_key_id(),
            Some(ObjectId::constraint("APP", "CUSTOMER", "PK_CUSTOMER"))
        );
    }

    #[test]
    fn informational_check_renders_trust() {
        let check = Constraint {
            schema: "APP".to_string(),
            table: "ORDERS".to_string(),
            name: "CK_QTY".to_string(),
            state: ConstraintState {
                enforced: false,
                trusted: false,
                query_optimization: false,
            },
            body: ConstraintBody::Check(CheckConstraint {
                expression: "QTY > 0\n".to_string(),
            }),
            remarks: Some("positive".to_string()),
        };
        let opts = RenderOptions::default();
        assert_eq!(
            check.render(&opts),
            "ALTER TABLE APP.ORDERS ADD CONSTRAINT CK_QTY\n\
             \x20 CHECK ( QTY > 0 )\n\
             NOT ENFORCED\n\
             NOT TRUSTED\n\
             DISABLE QUERY OPTIMIZATION @\n\n"
        );
        assert_eq!(
            check.render_remarks(&opts),
            "COMMENT ON CONSTRAINT APP.ORDERS.CK_QTY IS 'positive' @\n\n"
        );
    }
}
