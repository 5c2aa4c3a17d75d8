//! Locate the trajectory file that belongs to a run identifier.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, info, warn};

use crate::error::{LocateError, Result};
use crate::run_id::RunId;

/// Extensions a trajectory file may carry (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["traj", "json", "jsonl", "ndjson"];

/// Whether a path has one of the accepted trajectory extensions.
pub fn has_trajectory_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ACCEPTED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Recursively list every trajectory file under `root` whose file name
/// contains `slug`. Results are sorted by path.
pub fn candidates(root: &Path, slug: &str) -> Vec<PathBuf> {
    // Trajectory dumps are data: don't let .gitignore or dotfile rules hide them.
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut found: Vec<PathBuf> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .filter(|path| has_trajectory_extension(path))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.contains(slug))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    found
}

/// Resolve exactly one trajectory file for `id`.
///
/// Zero matches is `NotFound`; more than one is `AmbiguousMatch`. There is
/// no tie-breaking: a guess could attribute one run's steps to another.
pub fn resolve(root: &Path, id: &RunId) -> Result<PathBuf> {
    let slug = id.slug();
    let mut found = candidates(root, slug);
    debug!(slug, root = %root.display(), count = found.len(), "trajectory candidates");

    match found.len() {
        0 => Err(LocateError::NotFound {
            slug: slug.to_string(),
            root: root.to_path_buf(),
        }),
        1 => {
            let path = found.remove(0);
            info!(
                id = %id,
                agent = id.agent_tag(),
                path = %path.display(),
                "resolved trajectory"
            );
            Ok(path)
        }
        _ => Err(LocateError::AmbiguousMatch {
            slug: slug.to_string(),
            candidates: found,
        }),
    }
}
