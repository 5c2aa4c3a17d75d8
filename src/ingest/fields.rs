//! Field lookups shared by the schema adapters. Agent tooling disagrees on
//! where it puts the tool name, arguments and target file, so each lookup
//! tries a fixed list of keys in order.

use serde_json::Value;

pub const PATH_KEYS: &[&str] = &[
    "filename",
    "path",
    "filepath",
    "file_path",
    "notebook_path",
    "relative_path",
    "target",
    "dst",
    "dst_path",
];

pub const COMMAND_KEYS: &[&str] = &["cmd", "command", "shell", "bash", "run", "input"];

pub const THOUGHT_KEYS: &[&str] = &[
    "thought",
    "thoughts",
    "reasoning",
    "rationale",
    "plan",
    "analysis",
];

/// First non-empty string value among `keys`.
pub fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Target file named by an argument object, including a nested `file` object.
pub fn target_path(args: &Value) -> Option<String> {
    first_str(args, PATH_KEYS)
        .or_else(|| args.get("file").and_then(|f| first_str(f, &["name", "path"])))
        .map(String::from)
}

/// Compact single-line rendering of a value for keyword matching.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First whitespace-separated word of a command line.
pub fn head_word(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or("")
}
