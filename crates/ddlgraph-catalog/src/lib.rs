//! Catalog metadata providers and the extraction pipeline.

pub mod codes;
pub mod extract;
pub mod loader;
pub mod options;
pub mod provider;
pub mod rows;
pub mod snapshot;

pub use extract::{Extraction, build_graph, edge_from_row, extract, load_catalog};
pub use loader::CatalogLoader;
pub use options::ExtractOptions;
pub use provider::CatalogProvider;
pub use rows::CatalogSnapshot;
pub use snapshot::SnapshotProvider;

pub use ddlgraph_core::Catalog;
