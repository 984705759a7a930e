use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing or comparing rendered trees.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A tree path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl DiffError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DiffError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;
