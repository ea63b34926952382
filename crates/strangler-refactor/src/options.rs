//! Refactor options

use std::path::Path;

/// Options governing one refactor invocation
#[derive(Debug, Clone)]
pub struct RefactorOptions {
    /// Keep original files in the monolith (rollback = delete target only)
    pub preserve_original: bool,
    /// Run the reference-propagation pass after the move pass
    pub update_references: bool,
    /// Path substrings that exclude a located file
    pub exclude_patterns: Vec<String>,
}

impl RefactorOptions {
    /// Create the default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete originals after a successful move
    #[inline]
    #[must_use]
    pub fn with_remove_original(mut self) -> Self {
        self.preserve_original = false;
        self
    }

    /// Skip the reference-propagation pass
    #[inline]
    #[must_use]
    pub fn without_reference_updates(mut self) -> Self {
        self.update_references = false;
        self
    }

    /// Exclude located files whose path contains the pattern
    #[inline]
    #[must_use]
    pub fn with_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    pub(crate) fn is_excluded(&self, path: &Path) -> bool {
        let Some(text) = path.to_str() else {
            return false;
        };
        self.exclude_patterns.iter().any(|p| text.contains(p))
    }
}

impl Default for RefactorOptions {
    fn default() -> Self {
        Self {
            preserve_original: true,
            update_references: true,
            exclude_patterns: Vec::new(),
        }
    }
}
