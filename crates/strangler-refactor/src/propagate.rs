//! The reference-propagation pass
//!
//! Runs strictly after the move pass, reading only fully-moved content. For
//! every moved file the oracle proposes `old ->> new` reference
//! substitutions, which are applied verbatim and written back atomically.

use crate::error::FileFailure;
use crate::moves::{write_atomic, MovedFile};
use once_cell::sync::Lazy;
use regex::Regex;
use strangler_oracle::judgment;
use strangler_oracle::{Oracle, OracleRequest, TemplateId};

static IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*import\s+.+;").expect("import regex is valid"));

/// Separator between the old and new reference in a substitution entry
const SUBSTITUTION_SEPARATOR: &str = "->>";

/// Rewrite one moved file's references to point at the new locations
pub(crate) async fn propagate_one(
    oracle: &dyn Oracle,
    candidate_json: &str,
    moved: &MovedFile,
) -> Result<(), FileFailure> {
    let request = OracleRequest::new(TemplateId::DependencyUpdate)
        .with_var("originalDependencies", extract_imports(&moved.content))
        .with_var("refactoredClass", moved.content.clone())
        .with_var("serviceContext", candidate_json);

    let raw = oracle
        .judge(request)
        .await
        .map_err(|err| FileFailure::oracle(moved.source.clone(), err))?;
    let updates = judgment::parse_dependency_update(&raw)
        .map_err(|err| FileFailure::oracle(moved.source.clone(), err))?;

    let mut content = moved.content.clone();
    for change in updates.updates.iter().flat_map(|u| u.code_changes.iter()) {
        match change.split_once(SUBSTITUTION_SEPARATOR) {
            Some((old, new)) => content = content.replace(old.trim(), new.trim()),
            None => {
                tracing::warn!(target_file = %moved.target.display(), %change,
                    "substitution entry without separator, skipping");
            }
        }
    }

    if content != moved.content {
        write_atomic(&moved.target, &content)
            .map_err(|err| FileFailure::io(moved.source.clone(), err))?;
        tracing::debug!(target_file = %moved.target.display(), "references updated");
    }
    Ok(())
}

/// The file's import statements, one per line
pub(crate) fn extract_imports(content: &str) -> String {
    IMPORT_LINE
        .find_iter(content)
        .map(|m| m.as_str().trim())
        .collect::<Vec<_>>()
        .join("\n")
}
