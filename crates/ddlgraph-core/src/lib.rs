//! Object model, dependency graph and deterministic DDL serializer for
//! ddlgraph.
//!
//! This crate performs no I/O: catalogs are loaded elsewhere and handed in as
//! a [`Catalog`], ordered through a [`DependencyGraph`] and rendered by the
//! [`Serializer`] into a [`Script`].

pub mod catalog;
pub mod constraints;
pub mod error;
pub mod graph;
pub mod identity;
pub mod index;
pub mod object;
pub mod remarks;
pub mod render;
pub mod routine;
pub mod schema;
pub mod script;
pub mod trigger;
pub mod types;

pub use catalog::Catalog;
pub use constraints::{
    CandidateKey, CheckConstraint, Constraint, ConstraintBody, ConstraintState, FkAction,
    ForeignKey, KeyKind,
};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, Edge, GraphBuilder, GraphReport, GraphSummary};
pub use identity::{ObjectId, ObjectKind};
pub use index::{Index, IndexColumn, IndexType, SortOrder, UniqueRule, XmlPattern};
pub use object::SchemaObject;
pub use render::{REMARK_SCRIPT_THRESHOLD, RenderOptions};
pub use routine::{
    ExternalRoutine, Parameter, Routine, RoutineBody, RoutineType, SqlDataAccess,
};
pub use schema::{Column, Compression, Organization, Table, View, ViewKind};
pub use script::{IdentityRestart, IdentityTarget, Script, ScriptBlock, Serializer};
pub use trigger::Trigger;
pub use types::{DataType, Generated, GenerationMode, TypeFamily};
