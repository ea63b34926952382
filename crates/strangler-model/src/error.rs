//! Error and warning types for structural model assembly

use std::path::PathBuf;

/// Errors from structural model assembly
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Two class declarations share one qualified name in a single run
    #[error("duplicate class in analysis run: {qualified_name}")]
    DuplicateClass {
        /// The colliding qualified name
        qualified_name: String,
    },

    /// The source root itself could not be walked
    #[error("cannot read source root {path}: {source}")]
    SourceRoot {
        /// Root that failed to open
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },
}

/// A file skipped during model assembly, recorded while the run continues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// File that was skipped
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

impl ParseWarning {
    pub(crate) fn new(path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            path,
            reason: reason.into(),
        }
    }
}
