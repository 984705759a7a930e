//! Rendered schema trees and their comparison.
//!
//! A tree is a directory holding one `<schema>.<name>.sql` file per object
//! stem. Two trees compare into left-only names, right-only names and
//! changed files with a unified diff.

pub mod compare;
pub mod error;
pub mod tree;
pub mod unified;

pub use compare::{FileDiff, TreeComparison, compare_dirs, compare_trees};
pub use error::{DiffError, Result};
pub use tree::{read_tree, write_tree};
pub use unified::{DEFAULT_CONTEXT, unified_diff};
