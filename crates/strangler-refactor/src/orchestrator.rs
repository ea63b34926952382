//! Refactor orchestration
//!
//! Locate → move → propagate for one candidate. Moves fan out concurrently
//! per file; the propagation pass starts only after every move has settled,
//! reading only fully-moved content. Failures are isolated per file and the
//! complete moved/failed partition is always returned.

use crate::error::{FileFailure, PartialRefactorFailure, RefactorError};
use crate::locate::locate_sources;
use crate::moves::{move_one, MovedFile};
use crate::options::RefactorOptions;
use crate::propagate::propagate_one;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strangler_core::MicroserviceCandidate;
use strangler_oracle::Oracle;

/// What one refactor invocation produced
#[derive(Debug)]
pub struct RefactorOutcome {
    /// Target paths of the files that were rewritten, sorted
    pub moved: Vec<PathBuf>,
    /// Original path → target path for every moved file
    pub old_to_new: DashMap<PathBuf, PathBuf>,
}

/// Moves one candidate's sources out of the monolith
#[derive(Debug)]
pub struct RefactorOrchestrator {
    oracle: Arc<dyn Oracle>,
    options: RefactorOptions,
    max_concurrent: usize,
}

impl RefactorOrchestrator {
    /// Create an orchestrator with default options
    #[inline]
    #[must_use]
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            options: RefactorOptions::default(),
            max_concurrent: 8,
        }
    }

    /// With explicit options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: RefactorOptions) -> Self {
        self.options = options;
        self
    }

    /// With a per-file concurrency width
    #[inline]
    #[must_use]
    pub fn with_max_concurrent(mut self, width: usize) -> Self {
        self.max_concurrent = width.max(1);
        self
    }

    /// Move the candidate's source files from `monolith_root` to
    /// `target_root`
    ///
    /// # Errors
    /// Returns [`RefactorError::Partial`] when some files failed while
    /// others moved; the error carries both manifests, and every file on
    /// disk at its target path is complete. Fails outright only when the
    /// monolith root cannot be walked or the candidate cannot be serialized
    /// for judgment payloads.
    pub async fn refactor(
        &self,
        monolith_root: &Path,
        candidate: &MicroserviceCandidate,
        target_root: &Path,
    ) -> Result<RefactorOutcome, RefactorError> {
        let candidate_json = serde_json::to_string(candidate)?;
        let sources = locate_sources(monolith_root, candidate, &self.options)?;
        tracing::info!(
            candidate = %candidate.name(),
            files = sources.len(),
            "starting refactor"
        );

        let registry: DashMap<PathBuf, PathBuf> = DashMap::new();
        let outcomes: Vec<Result<MovedFile, FileFailure>> = stream::iter(
            sources
                .into_iter()
                .map(|source| self.move_and_register(&candidate_json, source, target_root, &registry)),
        )
        .buffered(self.max_concurrent)
        .collect()
        .await;

        let mut moved = Vec::new();
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(file) => moved.push(file),
                Err(failure) => failed.push(failure),
            }
        }

        // Propagation strictly follows the move pass: every future above has
        // settled, so only fully-moved content is read from here on.
        if self.options.update_references {
            let propagation: Vec<Result<(), FileFailure>> = stream::iter(
                moved
                    .iter()
                    .map(|file| propagate_one(self.oracle.as_ref(), &candidate_json, file)),
            )
            .buffered(self.max_concurrent)
            .collect()
            .await;
            failed.extend(propagation.into_iter().filter_map(Result::err));
        }

        if !self.options.preserve_original {
            for file in &moved {
                if let Err(err) = std::fs::remove_file(&file.source) {
                    tracing::warn!(source = %file.source.display(), %err,
                        "could not remove original after move");
                }
            }
        }

        let mut targets: Vec<PathBuf> = moved.into_iter().map(|f| f.target).collect();
        targets.sort();

        tracing::info!(
            candidate = %candidate.name(),
            moved = targets.len(),
            failed = failed.len(),
            "refactor complete"
        );
        if failed.is_empty() {
            Ok(RefactorOutcome {
                moved: targets,
                old_to_new: registry,
            })
        } else {
            Err(RefactorError::Partial(PartialRefactorFailure {
                moved: targets,
                failed,
            }))
        }
    }

    async fn move_and_register(
        &self,
        candidate_json: &str,
        source: PathBuf,
        target_root: &Path,
        registry: &DashMap<PathBuf, PathBuf>,
    ) -> Result<MovedFile, FileFailure> {
        let file = move_one(self.oracle.as_ref(), candidate_json, source, target_root).await?;
        registry.insert(file.source.clone(), file.target.clone());
        Ok(file)
    }
}
