//! Source parser boundary
//!
//! Parsing is performed by an external, language-specific collaborator. The
//! model only consumes its per-file output; [`SourceParser`] is the seam.
//! Each file parses to an independent [`FileFacts`] value that the builder
//! folds into the model, so parsers never share mutable state.

use crate::facts::FieldType;
use std::path::Path;

/// Raw facts for one class declaration, as reported by the external parser
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawClass {
    /// Simple class name
    pub name: String,
    /// Owning package ("" for the default package)
    pub package: String,
    /// Declared method names
    pub methods: Vec<String>,
    /// Declared field names
    pub fields: Vec<String>,
    /// Declared annotations
    pub annotations: Vec<String>,
    /// Extended/implemented type names
    pub supertypes: Vec<String>,
    /// (field type, finality) pairs
    pub field_types: Vec<FieldType>,
}

/// Per-file parser output
///
/// An immutable value per file; the builder merges these. A file may declare
/// any number of classes, including zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileFacts {
    /// Classes declared in the file
    pub classes: Vec<RawClass>,
}

/// Failure reported by a parser for a single file
///
/// Never fatal to the run: the builder records it as a warning and moves on.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    /// Human-readable reason
    pub message: String,
}

impl ParseFailure {
    /// Create a failure with the given reason
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External parser boundary
///
/// Implementations turn one file's source text into raw class facts. The
/// builder calls `handles` first so a parser only sees files it understands.
pub trait SourceParser: Send + Sync {
    /// Whether this parser understands the file at `path`
    fn handles(&self, path: &Path) -> bool;

    /// Parse one file's source text into raw class facts
    ///
    /// # Errors
    /// Returns [`ParseFailure`] when the file cannot be parsed; the run
    /// continues without it.
    fn parse(&self, path: &Path, source: &str) -> Result<FileFacts, ParseFailure>;
}
