//! The move pass
//!
//! One file at a time: read the source, obtain the oracle's move-and-edit
//! plan, apply the edits in the order given, and write the result to the
//! computed target path. Writes go through a temporary file renamed into
//! place, so from the caller's point of view a target either holds the
//! complete moved content or does not exist; there are no partial writes to
//! roll back. Re-running a move overwrites the same target.

use crate::error::{FileFailure, FileFailureReason};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use strangler_oracle::judgment;
use strangler_oracle::{Oracle, OracleRequest, TemplateId};

/// A fully moved file
#[derive(Debug, Clone)]
pub(crate) struct MovedFile {
    /// Original location in the monolith
    pub(crate) source: PathBuf,
    /// Where the moved content lives now
    pub(crate) target: PathBuf,
    /// The content that was written
    pub(crate) content: String,
}

/// Move one source file into the service tree
pub(crate) async fn move_one(
    oracle: &dyn Oracle,
    candidate_json: &str,
    source: PathBuf,
    target_root: &Path,
) -> Result<MovedFile, FileFailure> {
    let source_code = std::fs::read_to_string(&source)
        .map_err(|err| FileFailure::io(source.clone(), err))?;

    let request = OracleRequest::new(TemplateId::RefactorClass)
        .with_var("sourceCode", source_code.clone())
        .with_var("targetContext", candidate_json);
    let raw = oracle
        .judge(request)
        .await
        .map_err(|err| FileFailure::oracle(source.clone(), err))?;
    let plan = judgment::parse_refactor(&raw)
        .map_err(|err| FileFailure::oracle(source.clone(), err))?;

    let relative = PathBuf::from(&plan.refactoring.new_location);
    if !is_contained(&relative) {
        return Err(FileFailure {
            path: source,
            reason: FileFailureReason::InvalidTarget {
                location: plan.refactoring.new_location,
            },
        });
    }
    let target = target_root.join(relative);

    let mut content = source_code;
    for edit in &plan.refactoring.steps {
        content = content.replace(&edit.old_code, &edit.new_code);
    }

    write_atomic(&target, &content).map_err(|err| FileFailure::io(source.clone(), err))?;
    tracing::debug!(source = %source.display(), target = %target.display(), "file moved");

    Ok(MovedFile {
        source,
        target,
        content,
    })
}

/// Whether a judged location stays inside the service root
fn is_contained(relative: &Path) -> bool {
    !relative.is_absolute()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Write content through a temp file renamed into place
pub(crate) fn write_atomic(target: &Path, content: &str) -> std::io::Result<()> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}
