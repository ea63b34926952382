//! Strangler Core - decomposition and planning pipeline
//!
//! The central stages that turn a structural model of a monolith into an
//! ordered, reversible migration plan:
//! - Groups classes into bounded contexts ([`ContextSynthesizer`])
//! - Designs one microservice candidate per context ([`CandidateSynthesizer`])
//! - Orders candidates into phases with rollback-capable steps, gateway
//!   routing, and a data-migration strategy ([`MigrationPlanner`])
//!
//! # Example
//!
//! ```rust,ignore
//! use strangler_core::{ModernizationPipeline, PipelineConfig};
//!
//! # async fn example(parser: &dyn strangler_model::SourceParser) -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = std::sync::Arc::new(strangler_oracle::HttpOracle::from_env()?);
//! let pipeline = ModernizationPipeline::new(PipelineConfig::new(), oracle);
//!
//! let report = pipeline.run("legacy/monolith".as_ref(), parser).await?;
//! println!("planned {} phases", report.plan.phases.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod candidate;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod planner;
pub mod types;

// Re-exports for convenience
pub use candidate::CandidateSynthesizer;
pub use context::ContextSynthesizer;
pub use error::{ContextFailure, CoreError, PlanError};
pub use pipeline::{ModernizationPipeline, PipelineReport};
pub use plan::{
    DataMigrationStrategy, DatabaseConfig, GatewayConfig, MigrationPhase, MigrationPlan,
    MigrationStep, RouteConfig, StepType, ValidationStrategy,
};
pub use planner::MigrationPlanner;
pub use types::{
    BoundedContext, DomainEvent, DomainRole, MicroserviceCandidate, PipelineConfig, PlannerConfig,
    RunId,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the pipeline
    pub use crate::{
        BoundedContext, CandidateSynthesizer, ContextSynthesizer, CoreError, MicroserviceCandidate,
        MigrationPlan, MigrationPlanner, ModernizationPipeline, PipelineConfig, PlannerConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
