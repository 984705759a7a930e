use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::tree::read_tree;
use crate::unified::{DEFAULT_CONTEXT, unified_diff};

/// Changed file with its unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub name: String,
    pub diff: String,
}

/// Three-way classification of two rendered trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeComparison {
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
    pub changed: Vec<FileDiff>,
}

impl TreeComparison {
    pub fn is_identical(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty() && self.changed.is_empty()
    }

    /// Human readable report: name lists followed by every diff.
    pub fn render(&self, left_label: &str, right_label: &str) -> String {
        let mut out = String::new();
        for (label, names) in [(left_label, &self.left_only), (right_label, &self.right_only)] {
            if names.is_empty() {
                continue;
            }
            out.push_str(&format!("Only in {label}:\n"));
            for name in names {
                out.push_str(&format!("  {name}\n"));
            }
        }
        for file in &self.changed {
            out.push_str(&file.diff);
        }
        out
    }
}

/// Compare two trees keyed by file name. Labels prefix the diff headers.
pub fn compare_trees(
    left_label: &str,
    left: &BTreeMap<String, String>,
    right_label: &str,
    right: &BTreeMap<String, String>,
) -> TreeComparison {
    let mut comparison = TreeComparison::default();

    for (name, left_text) in left {
        match right.get(name) {
            None => comparison.left_only.push(name.clone()),
            Some(right_text) if right_text == left_text => {}
            Some(right_text) => {
                let diff = unified_diff(
                    &format!("{left_label}/{name}"),
                    &format!("{right_label}/{name}"),
                    left_text,
                    right_text,
                    DEFAULT_CONTEXT,
                );
                comparison.changed.push(FileDiff {
                    name: name.clone(),
                    diff,
                });
            }
        }
    }
    comparison.right_only = right
        .keys()
        .filter(|name| !left.contains_key(*name))
        .cloned()
        .collect();

    tracing::debug!(
        event = "trees_compared",
        left_only = comparison.left_only.len(),
        right_only = comparison.right_only.len(),
        changed = comparison.changed.len()
    );
    comparison
}

/// Read and compare two directories.
pub fn compare_dirs(left: &Path, right: &Path) -> Result<TreeComparison> {
    let left_tree = read_tree(left)?;
    let right_tree = read_tree(right)?;
    Ok(compare_trees(
        &left.display().to_string(),
        &left_tree,
        &right.display().to_string(),
        &right_tree,
    ))
}
