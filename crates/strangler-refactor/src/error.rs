//! Error types for the refactor orchestrator
//!
//! Per-file failures are isolated and aggregated: the orchestrator finishes
//! the whole file set and reports the complete moved/failed partition, so a
//! caller can retry exactly the units that failed.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use strangler_oracle::OracleError;

/// Why one file failed to move or propagate
#[derive(Debug)]
pub enum FileFailureReason {
    /// Oracle transport or schema failure for this file
    Oracle(OracleError),
    /// Reading or writing the file failed
    Io(std::io::Error),
    /// The judged target location escapes the service root
    InvalidTarget {
        /// Location as spelled in the judgment
        location: String,
    },
}

impl Display for FileFailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oracle(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "io: {err}"),
            Self::InvalidTarget { location } => {
                write!(f, "target location escapes service root: {location}")
            }
        }
    }
}

/// One file's isolated failure
#[derive(Debug)]
pub struct FileFailure {
    /// Source file the failure belongs to
    pub path: PathBuf,
    /// Why it failed
    pub reason: FileFailureReason,
}

impl FileFailure {
    pub(crate) fn oracle(path: PathBuf, error: OracleError) -> Self {
        Self {
            path,
            reason: FileFailureReason::Oracle(error),
        }
    }

    pub(crate) fn io(path: PathBuf, error: std::io::Error) -> Self {
        Self {
            path,
            reason: FileFailureReason::Io(error),
        }
    }
}

impl Display for FileFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Some files moved, some did not
///
/// Carries both manifests so nothing is silently dropped and each failed
/// file can be retried individually (re-running a move overwrites the same
/// target).
#[derive(Debug)]
pub struct PartialRefactorFailure {
    /// Target paths of the files that fully moved
    pub moved: Vec<PathBuf>,
    /// Files that failed, with reasons
    pub failed: Vec<FileFailure>,
}

impl Display for PartialRefactorFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "refactor partially failed: {} file(s) moved, {} failed",
            self.moved.len(),
            self.failed.len()
        )
    }
}

/// Errors from one refactor invocation
#[derive(Debug, thiserror::Error)]
pub enum RefactorError {
    /// The monolith root itself could not be walked
    #[error("cannot walk monolith root {path}: {source}")]
    MonolithRoot {
        /// Root that failed to open
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },

    /// Serializing the candidate for judgment payloads failed
    #[error("payload serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more files failed while others moved
    #[error("{0}")]
    Partial(PartialRefactorFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display_counts_both_sides() {
        let failure = PartialRefactorFailure {
            moved: vec![PathBuf::from("a.java"), PathBuf::from("c.java")],
            failed: vec![FileFailure::oracle(
                PathBuf::from("b.java"),
                OracleError::malformed("bad shape", "{}"),
            )],
        };
        let text = failure.to_string();
        assert!(text.contains("2 file(s) moved"));
        assert!(text.contains("1 failed"));
    }
}
