use thiserror::Error;

use crate::identity::ObjectId;

/// Core error type shared across ddlgraph crates.
#[derive(Debug, Error)]
pub enum Error {
    /// An object the ordered graph promised is missing from the catalog.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(ObjectId),
    /// The dependency graph cannot be ordered. `foreign_keys` lists the
    /// foreign keys that link tables of the cycle to each other.
    #[error(
        "dependency cycle detected between: {}{}",
        join_ids(.nodes),
        foreign_key_note(.foreign_keys)
    )]
    Cycle {
        nodes: Vec<ObjectId>,
        foreign_keys: Vec<ObjectId>,
    },
    /// The metadata provider failed; the extraction is aborted.
    #[error("provider error: {0}")]
    Provider(String),
    /// The catalog rows violate structural invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// A requested feature is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Convenience alias for results returned by ddlgraph crates.
pub type Result<T> = std::result::Result<T, Error>;

fn join_ids(ids: &[ObjectId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn foreign_key_note(foreign_keys: &[ObjectId]) -> String {
    if foreign_keys.is_empty() {
        String::new()
    } else {
        format!(" (through foreign keys {})", join_ids(foreign_keys))
    }
}
