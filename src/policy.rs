//! Keyword and pattern tables that decide which steps count as reproduction
//! code or search. The defaults are the documented policy; a JSON file can
//! override any field (`--policy`), and `trajlens policy` prints the table in
//! effect.

use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Actions that create or modify a file.
    pub write_actions: Vec<String>,
    /// Actions that execute something. Steps carrying a shell command are
    /// execute-style regardless of their action name.
    pub execute_actions: Vec<String>,
    /// Matched against the target path of write-style steps.
    pub repro_file_pattern: String,
    /// A test-like python file written by the run.
    pub test_file_pattern: String,
    /// Matched against the agent's thought.
    pub repro_thought_pattern: String,
    /// Matched against the command line of execute-style steps.
    pub repro_run_pattern: String,
    /// Dedicated search/navigation tools.
    pub search_actions: Vec<String>,
    /// Shell programs that search or navigate. `git grep` is `git-grep`.
    pub search_commands: Vec<String>,
    /// Actions that count as search only right after a search step.
    pub follow_up_actions: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            write_actions: strings(&[
                "create",
                "insert",
                "str_replace",
                "write_file",
                "apply_patch",
                "edit",
                "write",
                "multiedit",
            ]),
            execute_actions: strings(&[
                "bash", "shell", "terminal", "exec", "execute", "run", "python", "python3",
            ]),
            repro_file_pattern: r"reproduce|repro|debug|test".to_string(),
            test_file_pattern: r"test.*\.py$".to_string(),
            repro_thought_pattern: concat!(
                r"(create|write|add|build).*(repro(duce)?|debug)",
                r"|minimal.*repro|reproduction.*test|failing.*test|unit\s*test"
            )
            .to_string(),
            repro_run_pattern: r"\b(repro|reproduce|debug)\w*\.py\b".to_string(),
            search_actions: strings(&[
                "find_file",
                "search_file",
                "search_dir",
                "ripgrep",
                "rg",
                "grep",
                "glob",
                "list_dir",
                "find",
                "ls",
                "search",
            ]),
            search_commands: strings(&[
                "find", "grep", "rg", "ag", "fd", "ls", "cd", "cat", "tree", "git-grep",
            ]),
            follow_up_actions: strings(&["view", "open", "read"]),
        }
    }
}

impl Policy {
    /// Load a policy file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LocateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LocateError::MalformedFile {
            path: path.to_path_buf(),
            line: None,
            source,
        })
    }

    pub fn compile(&self) -> Result<Matchers> {
        Ok(Matchers {
            write_actions: lowercase(&self.write_actions),
            execute_actions: lowercase(&self.execute_actions),
            repro_file: compile(&self.repro_file_pattern)?,
            test_file: compile(&self.test_file_pattern)?,
            repro_thought: compile(&self.repro_thought_pattern)?,
            repro_run: compile(&self.repro_run_pattern)?,
            search_actions: lowercase(&self.search_actions),
            search_commands: lowercase(&self.search_commands),
            follow_up_actions: lowercase(&self.follow_up_actions),
        })
    }
}

fn lowercase(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_ascii_lowercase()).collect()
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| LocateError::InvalidPolicy {
            pattern: pattern.to_string(),
            source,
        })
}

/// A compiled [`Policy`]. Action and command lists are lowercased.
#[derive(Debug, Clone)]
pub struct Matchers {
    pub write_actions: Vec<String>,
    pub execute_actions: Vec<String>,
    pub repro_file: Regex,
    pub test_file: Regex,
    pub repro_thought: Regex,
    pub repro_run: Regex,
    pub search_actions: Vec<String>,
    pub search_commands: Vec<String>,
    pub follow_up_actions: Vec<String>,
}

impl Matchers {
    pub fn is_write(&self, action: &str) -> bool {
        self.write_actions.iter().any(|a| a == action)
    }

    pub fn is_execute(&self, action: &str) -> bool {
        self.execute_actions.iter().any(|a| a == action)
    }

    pub fn is_search_action(&self, action: &str) -> bool {
        self.search_actions.iter().any(|a| a == action)
    }

    pub fn is_search_command(&self, program: &str) -> bool {
        self.search_commands.iter().any(|c| c == program)
    }

    pub fn is_follow_up(&self, action: &str) -> bool {
        self.follow_up_actions.iter().any(|a| a == action)
    }
}
