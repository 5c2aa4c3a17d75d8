use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{LocateError, Result};

/// How a trajectory file is laid out on disk, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// `.traj` / `.json`: one JSON document.
    Json,
    /// `.jsonl` / `.ndjson`: one JSON value per non-blank line.
    JsonLines,
}

impl Container {
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "traj" | "json" => Some(Container::Json),
            "jsonl" | "ndjson" => Some(Container::JsonLines),
            _ => None,
        }
    }
}

/// A parsed trajectory file before any schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Single(Value),
    Lines(Vec<Value>),
}

impl Document {
    pub fn is_empty(&self) -> bool {
        match self {
            Document::Single(v) => v.is_null(),
            Document::Lines(lines) => lines.is_empty(),
        }
    }
}

/// Read and parse a trajectory file according to its extension.
/// Unknown extensions are read as a single JSON document.
pub fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).map_err(|source| LocateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let container = Container::for_path(path).unwrap_or(Container::Json);
    parse_document(path, &text, container)
}

pub fn parse_document(path: &Path, text: &str, container: Container) -> Result<Document> {
    match container {
        Container::Json => {
            if text.trim().is_empty() {
                return Ok(Document::Single(Value::Null));
            }
            serde_json::from_str(text)
                .map(Document::Single)
                .map_err(|source| LocateError::MalformedFile {
                    path: path.to_path_buf(),
                    line: None,
                    source,
                })
        }
        Container::JsonLines => {
            let mut values = Vec::new();
            for (i, line) in text.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let value = serde_json::from_str(line).map_err(|source| {
                    LocateError::MalformedFile {
                        path: path.to_path_buf(),
                        line: Some(i + 1),
                        source,
                    }
                })?;
                values.push(value);
            }
            Ok(Document::Lines(values))
        }
    }
}
