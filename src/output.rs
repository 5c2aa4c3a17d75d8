//! Log entry formatting and the sinks entries are written to.
//!
//! An entry is a separator line, an `ID:` line and the payload:
//!
//! ```text
//!
//! ------------------------------------------------------------------------
//! ID: 20240620_sweagent@django__django-11099
//! [3, 7]
//! ```

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyze::{AnalysisResult, Command};
use crate::error::{LocateError, Result};

const SEPARATOR_WIDTH: usize = 72;

/// Render an analysis result the way it appears after the `ID:` line.
pub fn render_payload(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Steps(steps) => {
            let items: Vec<String> = steps.iter().map(|i| i.to_string()).collect();
            format!("[{}]", items.join(", "))
        }
        // A string-keyed map always serialises.
        AnalysisResult::ToolCounts(counts) => {
            serde_json::to_string_pretty(counts).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Render a complete log entry, including its leading newline.
pub fn render_entry(id: &str, result: &AnalysisResult) -> String {
    format!(
        "\n{}\nID: {}\n{}\n",
        "-".repeat(SEPARATOR_WIDTH),
        id,
        render_payload(result)
    )
}

/// Destination for rendered entries.
/// Implement this to send entries somewhere other than the log files.
pub trait LogSink {
    fn append(&mut self, command: Command, entry: &str) -> Result<()>;
}

/// Appends to `<dir>/<command>.log`, creating the file on first use.
#[derive(Debug, Clone)]
pub struct LogFiles {
    dir: PathBuf,
}

impl LogFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, command: Command) -> PathBuf {
        self.dir.join(command.log_file_name())
    }
}

impl LogSink for LogFiles {
    fn append(&mut self, command: Command, entry: &str) -> Result<()> {
        let path = self.path_for(command);
        let io_err = |source| LocateError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        file.write_all(entry.as_bytes()).map_err(io_err)?;
        info!(log = %path.display(), "appended entry");
        Ok(())
    }
}

/// Writes entries to a stream instead of the log files (print-only mode).
pub struct PrintSink<W: Write> {
    out: W,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl PrintSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LogSink for PrintSink<W> {
    fn append(&mut self, _command: Command, entry: &str) -> Result<()> {
        self.out
            .write_all(entry.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|source| LocateError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })
    }
}

/// Keeps entries in memory, keyed by command.
#[derive(Debug, Default)]
pub struct MemorySink {
    logs: HashMap<Command, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self, command: Command) -> &str {
        self.logs.get(&command).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.logs.values().all(String::is_empty)
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, command: Command, entry: &str) -> Result<()> {
        self.logs.entry(command).or_default().push_str(entry);
        Ok(())
    }
}
