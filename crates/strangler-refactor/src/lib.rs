//! Strangler Refactor Orchestrator
//!
//! Given one microservice candidate, locates its source files in the
//! monolith, obtains a per-file transformation plan from the oracle, applies
//! it in order, and propagates reference updates across the moved files.
//!
//! # Invariants
//!
//! - A file is either fully moved (complete content at the target, rollback
//!   = delete target + keep original) or not moved at all; writes go through
//!   a temp file renamed into place.
//! - Per-file failures never abort siblings: the orchestrator finishes the
//!   whole set and returns the complete moved/failed partition.
//! - The propagation pass runs strictly after the move pass and reads only
//!   fully-moved content.
//! - Retries are idempotent at file-target granularity: re-running a move
//!   overwrites rather than duplicates.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod locate;
mod moves;
mod options;
mod orchestrator;
mod propagate;

pub use error::{FileFailure, FileFailureReason, PartialRefactorFailure, RefactorError};
pub use options::RefactorOptions;
pub use orchestrator::{RefactorOrchestrator, RefactorOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
