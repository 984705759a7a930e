use serde::{Deserialize, Serialize};

use crate::identity::ObjectId;
use crate::remarks::render_comment;
use crate::render::{RenderOptions, normalize_text};
use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineType {
    Function,
    Procedure,
}

impl RoutineType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            RoutineType::Function => "FUNCTION",
            RoutineType::Procedure => "PROCEDURE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlDataAccess {
    NoSql,
    ContainsSql,
    ReadsSqlData,
    ModifiesSqlData,
}

impl SqlDataAccess {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlDataAccess::NoSql => "NO SQL",
            SqlDataAccess::ContainsSql => "CONTAINS SQL",
            SqlDataAccess::ReadsSqlData => "READS SQL DATA",
            SqlDataAccess::ModifiesSqlData => "MODIFIES SQL DATA",
        }
    }
}

/// Parameter of an external routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub ordinal: i32,
    pub name: Option<String>,
    pub data_type: DataType,
}

impl Parameter {
    fn render(&self) -> String {
        match self.name.as_deref().filter(|name| !name.is_empty()) {
            Some(name) => format!("{name} {}", self.data_type.render()),
            None => self.data_type.render(),
        }
    }
}

/// Routine implemented outside the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRoutine {
    pub returns: Option<DataType>,
    pub language: String,
    pub parameter_style: String,
    pub deterministic: bool,
    pub external_action: bool,
    pub fenced: bool,
    pub threadsafe: bool,
    /// `EXTERNAL NAME` value.
    pub implementation: String,
    pub sql_data_access: SqlDataAccess,
    /// Parameters in ordinal order.
    pub parameters: Vec<Parameter>,
}

impl ExternalRoutine {
    pub fn add_parameter(&mut self, parameter: Parameter) {
        let position = self
            .parameters
            .partition_point(|existing| existing.ordinal <= parameter.ordinal);
        self.parameters.insert(position, parameter);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoutineBody {
    /// SQL-bodied routine defined by its stored text.
    Sql { text: String },
    External(ExternalRoutine),
}

/// Function or procedure; overloads are told apart by their specific name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub schema: String,
    pub name: String,
    pub specific_name: String,
    pub routine_type: RoutineType,
    pub body: RoutineBody,
    pub remarks: Option<String>,
}

impl Routine {
    pub fn id(&self) -> ObjectId {
        ObjectId::routine(&self.schema, &self.name, &self.specific_name)
    }

    pub fn render(&self, opts: &RenderOptions) -> String {
        match &self.body {
            RoutineBody::Sql { text } => {
                opts.statement(&normalize_text(&with_specific(text, &self.specific_name)))
            }
            RoutineBody::External(external) => opts.statement(&self.render_external(external)),
        }
    }

    fn render_external(&self, external: &ExternalRoutine) -> String {
        let mut out = format!(
            "CREATE OR REPLACE {} {}.{} (",
            self.routine_type.as_sql(),
            self.schema,
            self.name
        );
        let params: Vec<String> = external
            .parameters
            .iter()
            .map(|param| format!("\n  {}", param.render()))
            .collect();
        out.push_str(&params.join(","));
        out.push_str(if params.is_empty() { ")\n" } else { "\n)\n" });

        if let Some(returns) = &external.returns {
            out.push_str(&format!("RETURNS {}\n", returns.render()));
        }
        out.push_str(&format!("SPECIFIC {}\n", self.specific_name));
        out.push_str(&format!("EXTERNAL NAME '{}'\n", external.implementation));
        out.push_str(&format!("LANGUAGE {}\n", external.language));
        out.push_str(&format!("PARAMETER STYLE {}\n", external.parameter_style));
        out.push_str(if external.fenced { "FENCED " } else { "NOT FENCED " });
        out.push_str(if external.threadsafe {
            "THREADSAFE\n"
        } else {
            "NOT THREADSAFE\n"
        });
        out.push_str(if external.deterministic {
            "DETERMINISTIC\n"
        } else {
            "NOT DETERMINISTIC\n"
        });
        out.push_str(external.sql_data_access.as_sql());
        out.push('\n');
        out.push_str(if external.external_action {
            "EXTERNAL ACTION"
        } else {
            "NO EXTERNAL ACTION"
        });
        out
    }

    pub fn render_remarks(&self, opts: &RenderOptions) -> String {
        render_comment(
            &format!(
                "SPECIFIC {} {}.{}",
                self.routine_type.as_sql(),
                self.schema,
                self.specific_name
            ),
            self.remarks.as_deref(),
            opts,
        )
    }
}

/// Insert a `SPECIFIC` clause after the first balanced parameter list unless
/// the routine header already names one.
fn with_specific(text: &str, specific_name: &str) -> String {
    if header_names_specific(text) {
        return text.to_string();
    }

    let mut depth = 0usize;
    let mut opened = false;
    for (offset, ch) in text.char_indices() {
        match ch {
            '(' => {
                opened = true;
                depth += 1;
            }
            ')' if opened => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let split = offset + ch.len_utf8();
                    return format!(
                        "{}\nSPECIFIC {specific_name}\n{}",
                        &text[..split],
                        &text[split..]
                    );
                }
            }
            _ => {}
        }
    }

    text.to_string()
}

/// Whether `SPECIFIC` appears as a word before the body starts at the first
/// `BEGIN` or `RETURN`. Line comments are ignored.
fn header_names_specific(text: &str) -> bool {
    for line in text.lines() {
        let code = line.split("--").next().unwrap_or_default();
        let words = code
            .split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
            .filter(|word| !word.is_empty());
        for word in words {
            if word.eq_ignore_ascii_case("SPECIFIC") {
                return true;
            }
            if word.eq_ignore_ascii_case("BEGIN") || word.eq_ignore_ascii_case("RETURN") {
                return false;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_routine(text: &str) -> Routine {
        Routine {
            schema: "APP".to_string(),
            name: "ADD_TAX".to_string(),
            specific_name: "ADD_TAX_DEC".to_string(),
            routine_type: RoutineType::Function,
            body: RoutineBody::Sql {
                text: text.to_string(),
            },
            remarks: None,
        }
    }

    #[test]
    fn inserts_specific_after_parameter_list() {
        let routine = sql_routine(
            "CREATE FUNCTION APP.ADD_TAX (AMOUNT DECIMAL(10, 2))\nRETURNS DECIMAL(10, 2)\nRETURN AMOUNT * 1.25",
        );
        assert_eq!(
            routine.render(&RenderOptions::default()),
            "CREATE FUNCTION APP.ADD_TAX (AMOUNT DECIMAL(10, 2))\n\
             SPECIFIC ADD_TAX_DEC\n\
             RETURNS DECIMAL(10, 2)\n\
             RETURN AMOUNT * 1.25 @\n\n"
        );
    }

    #[test]
    fn keeps_text_that_names_specific() {
        let text = "CREATE FUNCTION APP.ADD_TAX (A INT) specific ADD_TAX_DEC RETURNS INT RETURN A";
        let routine = sql_routine(text);
        assert_eq!(
            routine.render(&RenderOptions::default()),
            format!("{text} @\n\n")
        );
    }

    #[test]
    fn specific_inside_identifiers_or_body_does_not_count() {
        let routine = sql_routine(
            "CREATE PROCEDURE APP.ADD_TAX (IN SPECIFIC_ID INT)\n-- not SPECIFIC here\nBEGIN\n  -- SPECIFIC\n  CALL APP.LOG(SPECIFIC_ID);\nEND",
        );
        let rendered = routine.render(&RenderOptions::default());
        assert!(rendered.starts_with(
            "CREATE PROCEDURE APP.ADD_TAX (IN SPECIFIC_ID INT)\nSPECIFIC ADD_TAX_DEC\n"
        ));

        assert!(header_names_specific("CREATE FUNCTION F (A INT)\nSPECIFIC F_INT\nRETURNS INT\nRETURN A"));
        assert!(!header_names_specific("CREATE FUNCTION F (A INT) RETURNS INT RETURN SPECIFIC"));
    }

    #[test]
    fn renders_external_function() {
        let mut external = ExternalRoutine {
            returns: Some(DataType::new("VARCHAR").with_length(100)),
            language: "JAVA".to_string(),
            parameter_style: "JAVA".to_string(),
            deterministic: true,
            external_action: false,
            fenced: true,
            threadsafe: true,
            implementation: "tools.jar:com.example.Text!normalize".to_string(),
            sql_data_access: SqlDataAccess::NoSql,
            parameters: Vec::new(),
        };
        external.add_parameter(Parameter {
            ordinal: 2,
            name: Some("LOCALE".to_string()),
            data_type: DataType::new("CHARACTER").with_length(5),
        });
        external.add_parameter(Parameter {
            ordinal: 1,
            name: Some("INPUT".to_string()),
            data_type: DataType::new("VARCHAR").with_length(100),
        });

        let routine = Routine {
            schema: "APP".to_string(),
            name: "NORMALIZE".to_string(),
            specific_name: "NORMALIZE_JAVA".to_string(),
            routine_type: RoutineType::Function,
            body: RoutineBody::External(external),
            remarks: Some("text helper".to_string()),
        };
        let opts = RenderOptions::default();
        assert_eq!(
            routine.render(&opts),
            "CREATE OR REPLACE FUNCTION APP.NORMALIZE (\n\
             \x20 INPUT VARCHAR(100),\n\
             \x20 LOCALE CHARACTER(5)\n\
             )\n\
             RETURNS VARCHAR(100)\n\
             SPECIFIC NORMALIZE_JAVA\n\
             EXTERNAL NAME 'tools.jar:com.example.Text!normalize'\n\
             LANGUAGE JAVA\n\
             PARAMETER STYLE JAVA\n\
             FENCED THREADSAFE\n\
             DETERMINISTIC\n\
             NO SQL\n\
             NO EXTERNAL ACTION @\n\n"
        );
        assert_eq!(
            routine.render_remarks(&opts),
            "COMMENT ON SPECIFIC FUNCTION APP.NORMALIZE_JAVA IS 'text helper' @\n\n"
        );
    }
}
