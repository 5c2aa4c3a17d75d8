//! Error types for trajectory lookup and analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while processing a single run identifier.
///
/// Every variant is recoverable at the batch level: the batch records the
/// failure and moves on to the next identifier.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The identifier has no `@` or an empty slug.
    #[error("invalid run identifier '{0}': expected <agent-tag>@<slug>")]
    InvalidIdentifier(String),

    /// No trajectory file under the search root contains the slug.
    #[error("no trajectory file matching '{slug}' under {}", root.display())]
    NotFound { slug: String, root: PathBuf },

    /// More than one trajectory file contains the slug.
    #[error("{} trajectory files match '{slug}': {}", candidates.len(), join_paths(candidates))]
    AmbiguousMatch {
        slug: String,
        candidates: Vec<PathBuf>,
    },

    /// The file parsed, but no schema adapter recognises its step layout.
    #[error("{}: no known trajectory schema matches this file", path.display())]
    UnrecognizedSchema { path: PathBuf },

    /// The file is not valid JSON / JSON-lines for its extension.
    #[error("{}{}: {source}", path.display(), line.map(|l| format!(":{l}")).unwrap_or_default())]
    MalformedFile {
        path: PathBuf,
        line: Option<usize>,
        #[source]
        source: serde_json::Error,
    },

    /// The policy table contains a pattern that does not compile.
    #[error("invalid policy pattern '{pattern}': {source}")]
    InvalidPolicy {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LocateError {
    /// Stable name used in the batch summary.
    pub fn kind(&self) -> &'static str {
        match self {
            LocateError::InvalidIdentifier(_) => "InvalidIdentifierError",
            LocateError::NotFound { .. } => "NotFoundError",
            LocateError::AmbiguousMatch { .. } => "AmbiguousMatchError",
            LocateError::UnrecognizedSchema { .. } => "UnrecognizedSchemaError",
            LocateError::MalformedFile { .. } => "MalformedFileError",
            LocateError::InvalidPolicy { .. } => "InvalidPolicyError",
            LocateError::Io { .. } => "IoError",
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, LocateError>;
