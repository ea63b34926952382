//! Error types for the decomposition and planning pipeline
//!
//! Per-context failures in candidate synthesis are isolated and aggregated
//! (the stage completes with whatever succeeded plus a failure manifest);
//! planning invariant violations are fatal to the planning stage, since an
//! invalid plan must never reach execution.

use crate::types::{DomainRole, MicroserviceCandidate};
use std::fmt::{self, Display, Formatter};
use strangler_model::ModelError;
use strangler_oracle::OracleError;

/// Main pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Structural model assembly failed
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Oracle transport or schema failure during a non-isolated stage
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Internal serialization of a judgment payload failed
    #[error("payload serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// A class was assigned to two role sets of one context
    #[error("class {class} already classified as {existing} in context {context}")]
    RoleConflict {
        /// Context being built
        context: String,
        /// The doubly-assigned class
        class: String,
        /// Role the class already holds
        existing: DomainRole,
        /// Role that was rejected
        requested: DomainRole,
    },

    /// Candidate synthesis completed for some contexts and failed for others
    ///
    /// Carries the complete partition: nothing is silently dropped, and
    /// completed siblings are never discarded.
    #[error("candidate synthesis failed for {} context(s), {} succeeded", .failed.len(), .succeeded.len())]
    PartialSynthesis {
        /// Candidates that were produced
        succeeded: Vec<MicroserviceCandidate>,
        /// Contexts that failed, with reasons
        failed: Vec<ContextFailure>,
    },

    /// Planning invariant violated
    #[error("planning failed: {0}")]
    Plan(#[from] PlanError),
}

/// One context's isolated synthesis failure
#[derive(Debug)]
pub struct ContextFailure {
    /// Name of the context that failed
    pub context: String,
    /// Why it failed
    pub error: OracleError,
}

impl ContextFailure {
    pub(crate) fn new(context: impl Into<String>, error: OracleError) -> Self {
        Self {
            context: context.into(),
            error,
        }
    }
}

impl Display for ContextFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "context {}: {}", self.context, self.error)
    }
}

/// Planning errors, all fatal before any step is emitted for execution
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A phase requires a candidate first completed in a later phase
    #[error(
        "phase {phase} candidate {service} requires {required}, first completed in phase {satisfied_in}"
    )]
    UnsatisfiedDependencyOrder {
        /// Requiring candidate
        service: String,
        /// Required candidate
        required: String,
        /// Phase of the requiring candidate
        phase: usize,
        /// Phase where the requirement first completes
        satisfied_in: usize,
    },

    /// A candidate requires a service no phase provides
    #[error("candidate {service} requires unknown service {required}")]
    UnknownRequiredService {
        /// Requiring candidate
        service: String,
        /// The unresolvable name
        required: String,
    },

    /// Candidates within one phase depend on each other cyclically
    #[error("cyclic dependency among phase {phase} candidates involving {service}")]
    CyclicPhase {
        /// Offending phase number
        phase: usize,
        /// One candidate on the cycle
        service: String,
    },

    /// Two candidates share a name within one planning run
    #[error("duplicate candidate name in planning run: {name}")]
    DuplicateCandidate {
        /// The colliding name
        name: String,
    },

    /// Route weights for one path exceed full traffic
    #[error("route weights for {path} sum to {total}, exceeding 100")]
    RouteOverspill {
        /// The oversubscribed path
        path: String,
        /// Sum of weights across routes for the path
        total: u32,
    },
}
