//! Locating a candidate's source files in the monolith
//!
//! A file belongs to a candidate when its file name is `<ClassName>.java`
//! for any class in the candidate's bounded-context role sets.

use crate::error::RefactorError;
use crate::options::RefactorOptions;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use strangler_core::MicroserviceCandidate;

/// Find every source file that belongs to the candidate, sorted by path
pub(crate) fn locate_sources(
    root: &Path,
    candidate: &MicroserviceCandidate,
    options: &RefactorOptions,
) -> Result<Vec<PathBuf>, RefactorError> {
    let wanted: BTreeSet<String> = candidate
        .context()
        .members()
        .map(|class| format!("{class}.java"))
        .collect();

    let mut files = Vec::new();
    walk(root, &mut files).map_err(|source| RefactorError::MonolithRoot {
        path: root.to_path_buf(),
        source,
    })?;
    files.sort();

    let located: Vec<PathBuf> = files
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| wanted.contains(name))
        })
        .filter(|path| !options.is_excluded(path))
        .collect();

    tracing::debug!(
        candidate = %candidate.name(),
        located = located.len(),
        "located candidate sources"
    );
    Ok(located)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
