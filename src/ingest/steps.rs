//! Generic step lists: a bare array of step objects, an object wrapping one
//! under `trajectory`/`steps`/`history`, or one step object per JSONL line.

use serde_json::Value;

use super::claude::is_session_record;
use super::document::Document;
use super::fields::{first_str, head_word, render, target_path, COMMAND_KEYS, THOUGHT_KEYS};
use super::{SchemaAdapter, StepRecord};

const WRAPPER_KEYS: &[&str] = &["trajectory", "steps", "history"];
const ACTION_KEYS: &[&str] = &["action", "tool", "command", "name", "tool_name", "type"];
const ACTION_OBJECT_KEYS: &[&str] = &["action", "tool", "command"];
const ARGS_KEYS: &[&str] = &["args", "arguments", "params", "parameters"];

pub struct StructuredStepsAdapter;

impl SchemaAdapter for StructuredStepsAdapter {
    fn name(&self) -> &'static str {
        "steps"
    }

    fn probe(&self, doc: &Document) -> bool {
        match candidates(doc) {
            Some(items) => {
                items.iter().all(|v| v.is_object() && !is_session_record(v))
                    && items.iter().any(|s| !action_name(s).0.is_empty())
            }
            None => false,
        }
    }

    fn steps(&self, doc: &Document) -> Vec<StepRecord> {
        candidates(doc)
            .unwrap_or_default()
            .into_iter()
            .map(parse_step)
            .collect()
    }
}

fn candidates(doc: &Document) -> Option<Vec<&Value>> {
    match doc {
        Document::Lines(lines) => Some(lines.iter().collect()),
        Document::Single(Value::Array(items)) => Some(items.iter().collect()),
        Document::Single(obj @ Value::Object(map)) => {
            let wrapped = WRAPPER_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_array));
            match wrapped {
                Some(items) => Some(items.iter().collect()),
                // A lone object is a one-step trajectory.
                None => Some(vec![obj]),
            }
        }
        Document::Single(_) => None,
    }
}

/// Tool name for a step, and whether it came from a bare `command` string
/// (in which case the string is a shell command line, not a tool name).
fn action_name(step: &Value) -> (String, bool) {
    for key in ACTION_KEYS {
        match step.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => {
                if *key == "command" {
                    return (head_word(s).to_string(), true);
                }
                return (s.trim().to_string(), false);
            }
            Some(obj @ Value::Object(_)) => {
                if let Some(name) = first_str(obj, &["name", "tool", "type"]) {
                    return (name.to_string(), false);
                }
            }
            _ => {}
        }
    }
    (String::new(), false)
}

fn action_object(step: &Value) -> Option<&Value> {
    ACTION_OBJECT_KEYS
        .iter()
        .filter_map(|k| step.get(*k))
        .find(|v| v.is_object())
}

fn arguments<'a>(step: &'a Value, action: Option<&'a Value>) -> Option<&'a Value> {
    let source = action.unwrap_or(step);
    ARGS_KEYS
        .iter()
        .filter_map(|k| source.get(*k))
        .find(|v| v.is_object())
}

fn parse_step(step: &Value) -> StepRecord {
    let (name, from_command) = action_name(step);
    let action = action_object(step);
    let args = arguments(step, action);

    let mut record = StepRecord::new(name);

    record.path = args
        .and_then(target_path)
        .or_else(|| first_str(step, &["filename", "path"]).map(String::from));

    record.command = if from_command {
        first_str(step, &["command"]).map(String::from)
    } else {
        [args, action, Some(step)]
            .into_iter()
            .flatten()
            .find_map(|v| first_str(v, COMMAND_KEYS))
            .map(String::from)
    };

    record.thought = first_str(step, THOUGHT_KEYS).unwrap_or("").to_string();
    record.content = match (args, action) {
        (Some(a), _) => render(a),
        (None, Some(a)) => render(a),
        (None, None) => record.command.clone().unwrap_or_default(),
    };
    record
}
