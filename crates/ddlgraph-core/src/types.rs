use serde::{Deserialize, Serialize};

/// Length convention of a catalog type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    /// Renders `(length, scale)`.
    Decimal,
    /// Character, binary and LOB strings; renders `(length)`.
    Character,
    /// Everything else renders the bare type name.
    Plain,
}

impl TypeFamily {
    pub fn of(type_name: &str) -> Self {
        match type_name.trim().to_ascii_uppercase().as_str() {
            "DECIMAL" | "NUMERIC" | "DEC" => TypeFamily::Decimal,
            "CHARACTER" | "CHAR" | "VARCHAR" | "GRAPHIC" | "VARGRAPHIC" | "BINARY"
            | "VARBINARY" | "CLOB" | "BLOB" | "DBCLOB" => TypeFamily::Character,
            _ => TypeFamily::Plain,
        }
    }
}

/// Catalog data type with its length convention applied at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    pub name: String,
    pub length: Option<i32>,
    pub scale: Option<i32>,
    /// Character data stored without code page conversion (code page 0).
    pub for_bit_data: bool,
}

impl DataType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            scale: None,
            for_bit_data: false,
        }
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn family(&self) -> TypeFamily {
        TypeFamily::of(&self.name)
    }

    /// Render the type clause, e.g. `DECIMAL(12, 2)` or `VARCHAR(40) FOR BIT DATA`.
    pub fn render(&self) -> String {
        let mut out = self.name.clone();
        match (self.family(), self.length) {
            (TypeFamily::Decimal, Some(length)) => {
                out.push_str(&format!("({length}, {})", self.scale.unwrap_or(0)));
            }
            (TypeFamily::Character, Some(length)) => {
                out.push_str(&format!("({length})"));
                if self.for_bit_data && is_character_string(&self.name) {
                    out.push_str(" FOR BIT DATA");
                }
            }
            _ => {}
        }
        out
    }
}

fn is_character_string(type_name: &str) -> bool {
    matches!(
        type_name.trim().to_ascii_uppercase().as_str(),
        "CHARACTER" | "CHAR" | "VARCHAR"
    )
}

/// `ALWAYS` or `BY DEFAULT` generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Always,
    ByDefault,
}

impl GenerationMode {
    pub fn as_sql(&self) -> &'static str {
        match self {
            GenerationMode::Always => "GENERATED ALWAYS",
            GenerationMode::ByDefault => "GENERATED BY DEFAULT",
        }
    }
}

/// How a column's value is produced by the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Generated {
    /// Sequence-backed identity column.
    Identity { mode: GenerationMode },
    /// Expression column; `text` is the stored generation clause, e.g. `AS (UPPER(EMAIL))`.
    Expression { mode: GenerationMode, text: String },
}

impl Generated {
    pub fn render(&self) -> String {
        match self {
            Generated::Identity { mode } => format!("{} AS IDENTITY", mode.as_sql()),
            Generated::Expression { mode, text } => format!("{} {}", mode.as_sql(), text.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_renders_length_and_scale() {
        let ty = DataType::new("DECIMAL").with_length(12).with_scale(2);
        assert_eq!(ty.render(), "DECIMAL(12, 2)");
    }

    #[test]
    fn character_renders_length_only() {
        let ty = DataType::new("VARCHAR").with_length(40).with_scale(0);
        assert_eq!(ty.render(), "VARCHAR(40)");
    }

    #[test]
    fn plain_types_ignore_length() {
        let ty = DataType::new("INTEGER").with_length(4);
        assert_eq!(ty.render(), "INTEGER");
    }

    #[test]
    fn bit_data_only_applies_to_character_strings() {
        let mut ty = DataType::new("CHARACTER").with_length(16);
        ty.for_bit_data = true;
        assert_eq!(ty.render(), "CHARACTER(16) FOR BIT DATA");

        let mut blob = DataType::new("BLOB").with_length(1048576);
        blob.for_bit_data = true;
        assert_eq!(blob.render(), "BLOB(1048576)");
    }

    #[test]
    fn expression_generation_keeps_text_verbatim() {
        let generated = Generated::Expression {
            mode: GenerationMode::Always,
            text: "AS (UPPER(EMAIL))".to_string(),
        };
        assert_eq!(generated.render(), "GENERATED ALWAYS AS (UPPER(EMAIL))");
    }
}
