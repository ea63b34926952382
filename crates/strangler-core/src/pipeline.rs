//! Pipeline façade
//!
//! Drives model → contexts → candidates → plan, logging stage boundaries.
//! Candidate-stage failures are isolated per context and reported in the
//! final report; planning invariant violations abort the run, since an
//! invalid plan must never reach execution. The refactor orchestrator is
//! invoked per candidate by the operator, not from here.

use crate::candidate::CandidateSynthesizer;
use crate::context::ContextSynthesizer;
use crate::error::{ContextFailure, CoreError};
use crate::plan::MigrationPlan;
use crate::planner::MigrationPlanner;
use crate::types::{MicroserviceCandidate, PipelineConfig};
use std::path::Path;
use std::sync::Arc;
use strangler_model::{ModelBuilder, ParseWarning, SourceParser};
use strangler_oracle::Oracle;

/// What one pipeline run produced
#[derive(Debug)]
pub struct PipelineReport {
    /// Classes the structural model holds
    pub classes: usize,
    /// Packages discovered from declarations
    pub packages: usize,
    /// Files skipped during model assembly
    pub skipped_files: Vec<ParseWarning>,
    /// Contexts whose candidate synthesis failed, with reasons
    pub failed_contexts: Vec<ContextFailure>,
    /// The migration plan over the candidates that succeeded
    pub plan: MigrationPlan,
}

/// End-to-end decomposition and planning pipeline
#[derive(Debug)]
pub struct ModernizationPipeline {
    config: PipelineConfig,
    oracle: Option<Arc<dyn Oracle>>,
}

impl ModernizationPipeline {
    /// Create an oracle-driven pipeline
    #[inline]
    #[must_use]
    pub fn new(config: PipelineConfig, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            config,
            oracle: Some(oracle),
        }
    }

    /// Create a pipeline that runs entirely offline
    ///
    /// Context synthesis degrades to one context per package and candidates
    /// are derived structurally.
    #[inline]
    #[must_use]
    pub fn offline(config: PipelineConfig) -> Self {
        Self {
            config,
            oracle: None,
        }
    }

    /// Run the full pipeline over the tree rooted at `root`
    ///
    /// # Errors
    /// Model assembly failures, context-stage oracle failures, and planning
    /// invariant violations abort the run. Per-context candidate failures do
    /// not: planning proceeds over the candidates that succeeded and the
    /// failures are listed in the report.
    pub async fn run(
        &self,
        root: &Path,
        parser: &dyn SourceParser,
    ) -> Result<PipelineReport, CoreError> {
        tracing::info!(root = %root.display(), "starting modernization pipeline");

        let model = ModelBuilder::new().build(root, parser)?;

        let contexts = match &self.oracle {
            Some(oracle) => ContextSynthesizer::new(Arc::clone(oracle)).identify(&model).await?,
            None => ContextSynthesizer::offline().identify(&model).await?,
        };
        tracing::info!(contexts = contexts.len(), "context synthesis complete");

        let (candidates, failed_contexts) = self.synthesize_candidates(contexts).await?;

        let planner = MigrationPlanner::new(self.config.planner.clone());
        let plan = planner.plan(&candidates)?;
        tracing::info!(run = %plan.run, phases = plan.phases.len(), "pipeline complete");

        Ok(PipelineReport {
            classes: model.len(),
            packages: model.packages().len(),
            skipped_files: model.warnings().to_vec(),
            failed_contexts,
            plan,
        })
    }

    async fn synthesize_candidates(
        &self,
        contexts: Vec<crate::types::BoundedContext>,
    ) -> Result<(Vec<MicroserviceCandidate>, Vec<ContextFailure>), CoreError> {
        let Some(oracle) = &self.oracle else {
            return Ok((CandidateSynthesizer::derive_offline(contexts), Vec::new()));
        };

        let synthesizer = CandidateSynthesizer::new(Arc::clone(oracle))
            .with_max_concurrent(self.config.max_concurrent_judgments);
        match synthesizer.generate(contexts).await {
            Ok(candidates) => Ok((candidates, Vec::new())),
            Err(CoreError::PartialSynthesis { succeeded, failed }) => {
                for failure in &failed {
                    tracing::warn!(%failure, "candidate synthesis failure");
                }
                Ok((succeeded, failed))
            }
            Err(other) => Err(other),
        }
    }
}
