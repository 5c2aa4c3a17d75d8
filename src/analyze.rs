//! The three analyses run over a trajectory's steps.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::ingest::StepRecord;
use crate::policy::Matchers;

/// Key used for steps whose action name is empty.
pub const UNKNOWN_TOOL: &str = "unknown";

/// Which analysis to run. Each one appends to its own log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    LocateReproductionCode,
    LocateSearch,
    LocateToolUse,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::LocateReproductionCode,
        Command::LocateSearch,
        Command::LocateToolUse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::LocateReproductionCode => "locate_reproduction_code",
            Command::LocateSearch => "locate_search",
            Command::LocateToolUse => "locate_tool_use",
        }
    }

    pub fn log_file_name(&self) -> String {
        format!("{}.log", self.name())
    }

    pub fn run(&self, steps: &[StepRecord], matchers: &Matchers) -> AnalysisResult {
        match self {
            Command::LocateReproductionCode => {
                AnalysisResult::Steps(locate_reproduction_code(steps, matchers))
            }
            Command::LocateSearch => AnalysisResult::Steps(locate_search(steps, matchers)),
            Command::LocateToolUse => AnalysisResult::ToolCounts(locate_tool_use(steps)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResult {
    /// Ascending indices of the matching steps.
    Steps(Vec<usize>),
    /// Invocation count per tool name, sorted by name.
    ToolCounts(BTreeMap<String, usize>),
}

impl AnalysisResult {
    /// One-line description for the batch summary.
    pub fn summary(&self) -> String {
        match self {
            AnalysisResult::Steps(steps) if steps.is_empty() => "no matching steps".to_string(),
            AnalysisResult::Steps(steps) => format!("{} matching steps", steps.len()),
            AnalysisResult::ToolCounts(counts) => format!(
                "{} tools, {} calls",
                counts.len(),
                counts.values().sum::<usize>()
            ),
        }
    }
}

/// Steps where the run writes or runs code meant to reproduce the issue.
pub fn locate_reproduction_code(steps: &[StepRecord], m: &Matchers) -> Vec<usize> {
    steps
        .iter()
        .filter(|step| is_reproduction_step(step, m))
        .map(|step| step.index)
        .collect()
}

fn is_reproduction_step(step: &StepRecord, m: &Matchers) -> bool {
    let action = step.action_key();
    let path = step.path.as_deref().unwrap_or("");
    let repro_thought = !step.thought.is_empty() && m.repro_thought.is_match(&step.thought);

    if m.is_write(&action) {
        let repro_path = !path.is_empty()
            && (m.repro_file.is_match(path) || m.test_file.is_match(path));
        if repro_path || repro_thought {
            debug!(step = step.index, action = %step.action, path, "reproduction write");
            return true;
        }
    }

    if action.contains("create") && repro_thought {
        debug!(step = step.index, action = %step.action, "reproduction create");
        return true;
    }

    if m.is_execute(&action) || step.command.is_some() {
        let line = step.command.as_deref().unwrap_or(&step.content);
        if m.repro_run.is_match(line) {
            debug!(step = step.index, command = line, "reproduction run");
            return true;
        }
    }

    false
}

/// Steps where the run searches or navigates the repository. A follow-up
/// action such as `view` counts only directly after a search step.
pub fn locate_search(steps: &[StepRecord], m: &Matchers) -> Vec<usize> {
    let mut hits = Vec::new();
    let mut prev_was_search = false;

    for step in steps {
        let action = step.action_key();
        let is_search = m.is_search_action(&action)
            || step
                .command
                .as_deref()
                .map(|cmd| command_programs(cmd).iter().any(|p| m.is_search_command(p)))
                .unwrap_or(false)
            || (prev_was_search && m.is_follow_up(&action));

        if is_search {
            debug!(step = step.index, action = %step.action, "search step");
            hits.push(step.index);
        }
        prev_was_search = is_search;
    }
    hits
}

/// Number of steps per action name. Every step counts exactly once.
pub fn locate_tool_use(steps: &[StepRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for step in steps {
        let name = match step.action.trim() {
            "" => UNKNOWN_TOOL,
            name => name,
        };
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Program names at the head of each segment of a shell command line,
/// lowercased. `git grep` is reported as `git-grep`.
pub fn command_programs(command: &str) -> Vec<String> {
    command
        .split(|c| matches!(c, ';' | '|' | '&' | '\n'))
        .filter_map(|segment| {
            let mut words = segment.split_whitespace();
            let head = words.next()?.to_ascii_lowercase();
            if head == "git" && words.next() == Some("grep") {
                return Some("git-grep".to_string());
            }
            Some(head)
        })
        .collect()
}
