//! SWE-agent `.traj` files: a JSON object whose `trajectory` array holds one
//! entry per turn, each with the raw `action` command line the agent issued.

use serde_json::Value;

use super::document::Document;
use super::fields::head_word;
use super::{SchemaAdapter, StepRecord};

/// Commands provided by the SWE-agent interface itself. Anything else in an
/// `action` string was run in the shell.
pub const SWE_AGENT_COMMANDS: &[&str] = &[
    "open",
    "goto",
    "scroll_up",
    "scroll_down",
    "create",
    "edit",
    "insert",
    "append",
    "find_file",
    "search_file",
    "search_dir",
    "filemap",
    "submit",
    "str_replace_editor",
];

/// Commands whose first argument is the file they act on.
const PATH_ARG_COMMANDS: &[&str] = &["open", "create", "find_file", "filemap"];

/// Commands that modify the currently open file without naming it.
const EDITS_OPEN_FILE: &[&str] = &["edit", "insert", "append"];

pub struct SweAgentAdapter;

impl SchemaAdapter for SweAgentAdapter {
    fn name(&self) -> &'static str {
        "swe-agent"
    }

    fn probe(&self, doc: &Document) -> bool {
        match trajectory(doc) {
            // Format-error turns can carry a null action; one string action is enough.
            Some(entries) => entries
                .iter()
                .any(|e| e.get("action").map(Value::is_string).unwrap_or(false)),
            None => false,
        }
    }

    fn steps(&self, doc: &Document) -> Vec<StepRecord> {
        let mut open_file: Option<String> = None;
        trajectory(doc)
            .unwrap_or(&[])
            .iter()
            .map(|entry| {
                let step = parse_entry(entry, open_file.as_deref());
                if matches!(step.action.as_str(), "open" | "create") && step.path.is_some() {
                    open_file = step.path.clone();
                }
                step
            })
            .collect()
    }
}

fn trajectory(doc: &Document) -> Option<&[Value]> {
    match doc {
        Document::Single(v) => v.get("trajectory")?.as_array().map(Vec::as_slice),
        Document::Lines(_) => None,
    }
}

fn parse_entry(entry: &Value, open_file: Option<&str>) -> StepRecord {
    let action = entry.get("action").and_then(Value::as_str).unwrap_or("").trim();
    let thought = ["thought", "response"]
        .iter()
        .filter_map(|k| entry.get(*k).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .unwrap_or("");

    let mut step = parse_action(action);
    if step.path.is_none() && EDITS_OPEN_FILE.contains(&step.action.as_str()) {
        step.path = open_file
            .map(String::from)
            .or_else(|| state_open_file(entry));
    }
    step.thought = thought.to_string();
    step.content = action.to_string();
    step
}

/// Split an action command line into tool name, target path and shell command.
pub fn parse_action(action: &str) -> StepRecord {
    let first_line = action.lines().next().unwrap_or("");
    let words: Vec<&str> = first_line.split_whitespace().collect();
    let head = head_word(first_line);

    if head == "str_replace_editor" {
        let mut step = StepRecord::new(words.get(1).copied().unwrap_or(head));
        step.path = words.get(2).map(|p| unquote(p));
        return step;
    }

    let mut step = StepRecord::new(head);
    if SWE_AGENT_COMMANDS.contains(&head) {
        if PATH_ARG_COMMANDS.contains(&head) {
            step.path = words.get(1).map(|p| unquote(p));
        }
    } else if !action.is_empty() {
        step.command = Some(action.to_string());
    }
    step
}

/// SWE-agent records environment state as a JSON string on each entry.
fn state_open_file(entry: &Value) -> Option<String> {
    let state = entry.get("state")?;
    let parsed;
    let state = match state {
        Value::String(s) => {
            parsed = serde_json::from_str::<Value>(s).ok()?;
            &parsed
        }
        other => other,
    };
    state
        .get("open_file")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty() && *s != "n/a")
        .map(String::from)
}

fn unquote(s: &str) -> String {
    s.trim_matches(|c| c == '"' || c == '\'').to_string()
}
