use ddlgraph_core::{
    Compression, ConstraintState, DataType, Error, FkAction, Generated, GenerationMode, IndexType,
    KeyKind, ObjectKind, Organization, Result, RoutineType, SortOrder, SqlDataAccess, UniqueRule,
    ViewKind,
};

use crate::rows::{ConstraintFlags, TypeRow};

/// `Y` flag.
pub fn flag(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case("Y")
}

fn code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Convert a dependency kind code to an object kind.
pub fn object_kind_from_code(value: &str) -> Result<ObjectKind> {
    match code(value).as_str() {
        "T" => Ok(ObjectKind::Table),
        "V" | "S" => Ok(ObjectKind::View),
        "I" => Ok(ObjectKind::Index),
        "C" => Ok(ObjectKind::Constraint),
        "X" => Ok(ObjectKind::Trigger),
        "F" => Ok(ObjectKind::Routine),
        // aliases, nicknames, sequences, packages, user-defined types
        "A" | "N" | "Q" | "K" | "R" => Err(Error::Unsupported(format!(
            "dependency kind code `{}`",
            code(value)
        ))),
        other => Err(Error::InvalidCatalog(format!(
            "unknown dependency kind code `{other}`"
        ))),
    }
}

pub fn compression_from_code(value: &str) -> Compression {
    match code(value).as_str() {
        "S" => Compression::Static,
        "A" => Compression::Adaptive,
        _ => Compression::No,
    }
}

pub fn organization_from_code(value: &str) -> Organization {
    match code(value).as_str() {
        "C" => Organization::Column,
        _ => Organization::Row,
    }
}

pub fn view_kind_from_code(value: &str) -> ViewKind {
    match code(value).as_str() {
        "S" => ViewKind::MaterializedQueryTable,
        _ => ViewKind::View,
    }
}

/// Identity flag, generation code and stored expression to a generation clause.
pub fn generated_from_codes(
    identity: &str,
    generated: &str,
    text: Option<&str>,
) -> Option<Generated> {
    let mode = match code(generated).as_str() {
        "A" => GenerationMode::Always,
        "D" => GenerationMode::ByDefault,
        _ => return None,
    };
    if flag(identity) {
        return Some(Generated::Identity { mode });
    }
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Generated::Expression {
            mode,
            text: text.to_string(),
        })
}

pub fn unique_rule_from_code(value: &str) -> UniqueRule {
    match code(value).as_str() {
        "P" => UniqueRule::Primary,
        "U" => UniqueRule::Unique,
        _ => UniqueRule::Duplicates,
    }
}

pub fn index_type_from_code(value: &str) -> IndexType {
    match code(value).as_str() {
        "CLUS" => IndexType::Clustered,
        "XVIL" | "XPTH" => IndexType::XmlPattern,
        _ => IndexType::Regular,
    }
}

/// Role of an index column: key with a sort order, or include column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexColumnRole {
    Key(SortOrder),
    Include,
}

pub fn index_column_role_from_code(value: &str) -> IndexColumnRole {
    match code(value).as_str() {
        "D" => IndexColumnRole::Key(SortOrder::Descending),
        "I" => IndexColumnRole::Include,
        _ => IndexColumnRole::Key(SortOrder::Ascending),
    }
}

pub fn key_kind_from_code(value: &str) -> Result<KeyKind> {
    match code(value).as_str() {
        "P" => Ok(KeyKind::Primary),
        "U" => Ok(KeyKind::Unique),
        other => Err(Error::InvalidCatalog(format!(
            "unknown candidate key type `{other}`"
        ))),
    }
}

/// Update rules only know `NO ACTION` and `RESTRICT`.
pub fn fk_update_from_code(value: &str) -> FkAction {
    match code(value).as_str() {
        "A" => FkAction::NoAction,
        _ => FkAction::Restrict,
    }
}

pub fn fk_delete_from_code(value: &str) -> FkAction {
    match code(value).as_str() {
        "A" => FkAction::NoAction,
        "C" => FkAction::Cascade,
        "N" => FkAction::SetNull,
        _ => FkAction::Restrict,
    }
}

pub fn constraint_state(flags: &ConstraintFlags) -> ConstraintState {
    ConstraintState {
        enforced: code(&flags.enforced) != "N",
        trusted: code(&flags.trusted) != "N",
        query_optimization: flag(&flags.optimization),
    }
}

pub fn routine_type_from_code(value: &str) -> Result<RoutineType> {
    match code(value).as_str() {
        "F" => Ok(RoutineType::Function),
        "P" => Ok(RoutineType::Procedure),
        other => Err(Error::InvalidCatalog(format!(
            "unknown routine type `{other}`"
        ))),
    }
}

pub fn sql_data_access_from_code(value: &str) -> SqlDataAccess {
    match code(value).as_str() {
        "N" => SqlDataAccess::NoSql,
        "R" => SqlDataAccess::ReadsSqlData,
        "M" => SqlDataAccess::ModifiesSqlData,
        _ => SqlDataAccess::ContainsSql,
    }
}

pub fn data_type_from_row(row: &TypeRow) -> DataType {
    DataType {
        name: row.type_name.trim().to_string(),
        length: row.length,
        scale: row.scale,
        for_bit_data: row.codepage == Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_requires_generation_mode() {
        assert_eq!(
            generated_from_codes("Y", "D", None),
            Some(Generated::Identity {
                mode: GenerationMode::ByDefault
            })
        );
        assert_eq!(generated_from_codes("N", " ", Some("AS (A + 1)")), None);
        assert_eq!(
            generated_from_codes("N", "A", Some(" AS (A + 1) ")),
            Some(Generated::Expression {
                mode: GenerationMode::Always,
                text: "AS (A + 1)".to_string()
            })
        );
    }

    #[test]
    fn unknown_dependency_kind_is_rejected() {
        assert_eq!(object_kind_from_code(" s ").ok(), Some(ObjectKind::View));
        assert!(matches!(
            object_kind_from_code("Q"),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            object_kind_from_code("?"),
            Err(Error::InvalidCatalog(_))
        ));
    }

    #[test]
    fn informational_constraint_flags() {
        let state = constraint_state(&ConstraintFlags {
            enforced: "N".to_string(),
            trusted: "Y".to_string(),
            optimization: "Y".to_string(),
        });
        assert!(!state.enforced);
        assert!(state.trusted);
        assert!(state.query_optimization);
    }
}
