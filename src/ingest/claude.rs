//! Claude Code session logs: one JSON record per line, where assistant
//! records carry `tool_use` blocks in `message.content`.

use serde_json::Value;

use super::document::Document;
use super::fields::{first_str, render, target_path};
use super::{SchemaAdapter, StepRecord};

pub struct ClaudeSessionAdapter;

impl SchemaAdapter for ClaudeSessionAdapter {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn probe(&self, doc: &Document) -> bool {
        match doc {
            // A session with only chat turns is still a session; it has no steps.
            Document::Lines(lines) => {
                lines.iter().all(Value::is_object) && lines.iter().any(is_session_record)
            }
            Document::Single(_) => false,
        }
    }

    fn steps(&self, doc: &Document) -> Vec<StepRecord> {
        match doc {
            Document::Lines(lines) => lines.iter().flat_map(parse_record).collect(),
            Document::Single(_) => Vec::new(),
        }
    }
}

fn content_blocks(record: &Value) -> Option<&Vec<Value>> {
    if record.get("type").and_then(Value::as_str) != Some("assistant") {
        return None;
    }
    record.pointer("/message/content")?.as_array()
}

const SESSION_RECORD_TYPES: &[&str] = &["user", "assistant", "system", "summary"];

/// A session log record: a `message` turn, or a `summary` line.
pub(super) fn is_session_record(record: &Value) -> bool {
    match record.get("type").and_then(Value::as_str) {
        Some("summary") => record.get("summary").is_some(),
        Some(kind) => SESSION_RECORD_TYPES.contains(&kind) && record.get("message").is_some(),
        None => false,
    }
}

/// Every tool_use block in an assistant record becomes one step. Text and
/// thinking blocks earlier in the same message are the step's thought.
pub fn parse_record(record: &Value) -> Vec<StepRecord> {
    let mut steps = Vec::new();
    let blocks = match content_blocks(record) {
        Some(b) => b,
        None => return steps,
    };

    let mut thought = String::new();
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") | Some("thinking") => {
                if let Some(text) = first_str(block, &["text", "thinking"]) {
                    if !thought.is_empty() {
                        thought.push('\n');
                    }
                    thought.push_str(text);
                }
            }
            Some("tool_use") => {
                let name = block.get("name").and_then(Value::as_str).unwrap_or("");
                let input = block.get("input").unwrap_or(&Value::Null);

                let mut step = StepRecord::new(name);
                step.path = target_path(input);
                step.command = input
                    .get("command")
                    .and_then(Value::as_str)
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty());
                step.thought = thought.clone();
                step.content = render(input);
                steps.push(step);
            }
            _ => {}
        }
    }
    steps
}
