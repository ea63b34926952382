//! Strangler Structural Model
//!
//! Immutable facts about the monolith under analysis:
//! - [`ClassFact`]: one class declaration (methods, fields, annotations,
//!   supertypes, typed fields)
//! - [`DependencyEdge`]: structural inter-class references with a derived
//!   [`DependencyKind`]
//! - [`PackageInfo`]: packages discovered incidentally from declarations
//! - [`StructuralModel`]: the assembled, read-only model with lookup maps
//!
//! Parsing itself is an external collaborator behind [`SourceParser`]; this
//! crate walks the tree, folds per-file facts, and derives edges. Files that
//! fail to parse are skipped with a recorded [`ParseWarning`] and the run
//! continues with partial results.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod builder;
mod error;
mod facts;
mod id;
mod model;
mod parser;

pub use builder::ModelBuilder;
pub use error::{ModelError, ParseWarning};
pub use facts::{
    qualify, ClassFact, DependencyEdge, DependencyKind, DependencyTarget, FieldType, PackageInfo,
};
pub use id::ClassId;
pub use model::StructuralModel;
pub use parser::{FileFacts, ParseFailure, RawClass, SourceParser};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
