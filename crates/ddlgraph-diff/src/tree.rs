use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ddlgraph_core::Script;

use crate::error::{DiffError, Result};

const EXTENSION: &str = "sql";

/// Write one file per stem of `script` into `dir`, creating it if needed.
///
/// `.sql` files left in `dir` by an earlier run are removed first, so the
/// tree holds exactly the objects of `script`. Returns the written paths in
/// stem order.
pub fn write_tree(dir: &Path, script: &Script) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|err| DiffError::io(dir, err))?;
    let removed = clear_tree(dir)?;
    if removed > 0 {
        tracing::debug!(event = "stale_files_removed", dir = %dir.display(), files = removed);
    }

    let mut written = Vec::new();
    for (stem, text) in script.files() {
        let path = dir.join(format!("{stem}.{EXTENSION}"));
        fs::write(&path, text).map_err(|err| DiffError::io(&path, err))?;
        written.push(path);
    }
    tracing::debug!(event = "tree_written", dir = %dir.display(), files = written.len());
    Ok(written)
}

fn clear_tree(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|err| DiffError::io(dir, err))? {
        let path = entry.map_err(|err| DiffError::io(dir, err))?.path();
        if is_sql_file(&path) {
            fs::remove_file(&path).map_err(|err| DiffError::io(&path, err))?;
            removed += 1;
        }
    }
    Ok(removed)
}

fn is_sql_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION)
}

/// Read every `.sql` file directly under `dir`, keyed by file name.
pub fn read_tree(dir: &Path) -> Result<BTreeMap<String, String>> {
    if !dir.is_dir() {
        return Err(DiffError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = BTreeMap::new();
    for entry in fs::read_dir(dir).map_err(|err| DiffError::io(dir, err))? {
        let path = entry.map_err(|err| DiffError::io(dir, err))?.path();
        if !is_sql_file(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(&path).map_err(|err| DiffError::io(&path, err))?;
        files.insert(name.to_string(), text);
    }
    Ok(files)
}
