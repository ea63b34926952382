//! Strangler Oracle Boundary
//!
//! The trusted boundary between the pipeline and the external Semantic
//! Oracle (a text-completion judgment service).
//!
//! # Core Operations
//!
//! - **Render**: turn a [`OracleRequest`] (template id + named variables)
//!   into prompt text via the embedded [`PromptPack`]
//! - **Judge**: submit the prompt through the [`Oracle`] trait and receive
//!   opaque response text
//! - **Validate**: parse the text against one of the four documented
//!   per-template schemas in [`judgment`]
//!
//! Transport failures (network, timeout, non-2xx) and schema failures are
//! distinct: [`OracleError::is_transport`] classifies, and schema failures
//! always carry the raw response text. The oracle is advisory; callers
//! validate everything it says against the structural model.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod client;
mod error;
pub mod judgment;
mod prompt;
mod request;

pub use client::{HttpOracle, HttpOracleConfig, Oracle, API_KEY_ENV, ENDPOINT_ENV};
pub use error::OracleError;
pub use judgment::{
    ApiJudgment, CandidateJudgment, ContextJudgment, ContextsJudgment, DependencyUpdateJudgment,
    EditJudgment, EventJudgment, InteractionJudgment, MicroserviceJudgment, RefactorJudgment,
    RefactorPlanJudgment, UpdateJudgment,
};
pub use prompt::{PromptPack, PromptTemplate};
pub use request::{OracleRequest, TemplateId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
