pub mod claude;
pub mod document;
pub mod fields;
pub mod steps;
pub mod swe_agent;

use std::path::Path;

use tracing::debug;

use crate::error::{LocateError, Result};

use self::document::Document;

/// One action taken during a run, normalised across trajectory schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepRecord {
    /// 0-based position in execution order.
    pub index: usize,
    /// Tool or action name as recorded (trimmed). May be empty.
    pub action: String,
    /// File the step targeted, if any.
    pub path: Option<String>,
    /// Shell command line, if the step ran one.
    pub command: Option<String>,
    /// The agent's stated reasoning for the step.
    pub thought: String,
    /// Free-form rendering of the step's arguments.
    pub content: String,
}

impl StepRecord {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into().trim().to_string(),
            ..Self::default()
        }
    }

    /// Lowercased action name for policy lookups.
    pub fn action_key(&self) -> String {
        self.action.to_ascii_lowercase()
    }
}

/// Trait for trajectory schemas.
/// Implement this to support a different agent framework's output.
pub trait SchemaAdapter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the parsed document has this schema's shape.
    fn probe(&self, doc: &Document) -> bool;

    /// Convert the document into steps in file order. Only called after a
    /// successful probe.
    fn steps(&self, doc: &Document) -> Vec<StepRecord>;
}

/// Ordered set of schema adapters; the first whose probe accepts wins.
pub struct SchemaRegistry {
    adapters: Vec<Box<dyn SchemaAdapter>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            adapters: Vec::new(),
        };
        registry.register(Box::new(swe_agent::SweAgentAdapter));
        // Claude session lines also carry a `type` string, so they must be
        // claimed before the generic step adapter sees them.
        registry.register(Box::new(claude::ClaudeSessionAdapter));
        registry.register(Box::new(steps::StructuredStepsAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Box<dyn SchemaAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn adapter_for(&self, doc: &Document) -> Option<&dyn SchemaAdapter> {
        if doc.is_empty() {
            return None;
        }
        self.adapters
            .iter()
            .find(|a| a.probe(doc))
            .map(|a| a.as_ref())
    }

    /// Normalise an already-parsed document. `path` is only used for errors.
    pub fn extract_document(&self, path: &Path, doc: &Document) -> Result<Vec<StepRecord>> {
        let adapter = self
            .adapter_for(doc)
            .ok_or_else(|| LocateError::UnrecognizedSchema {
                path: path.to_path_buf(),
            })?;

        let mut steps = adapter.steps(doc);
        for (i, step) in steps.iter_mut().enumerate() {
            step.index = i;
        }
        debug!(
            path = %path.display(),
            schema = adapter.name(),
            steps = steps.len(),
            "extracted steps"
        );
        Ok(steps)
    }

    /// Read, parse and normalise a trajectory file.
    pub fn extract(&self, path: &Path) -> Result<Vec<StepRecord>> {
        let doc = document::read_document(path)?;
        self.extract_document(path, &doc)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_indices_are_contiguous_from_zero() {
        let doc = Document::Single(json!([
            {"action": "view", "path": "a.py"},
            {"action": "bash", "command": "ls"},
            {"action": "submit"}
        ]));
        let steps = SchemaRegistry::new()
            .extract_document(Path::new("x.json"), &doc)
            .unwrap();
        let indices: Vec<usize> = steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_unrecognized_schema() {
        let registry = SchemaRegistry::new();
        for doc in [
            Document::Single(json!(42)),
            Document::Single(json!(["a", "b"])),
            Document::Single(json!({"info": {"exit_status": "submitted"}})),
            Document::Single(serde_json::Value::Null),
            Document::Lines(vec![]),
        ] {
            let err = registry
                .extract_document(Path::new("x.json"), &doc)
                .unwrap_err();
            assert_eq!(err.kind(), "UnrecognizedSchemaError", "doc: {doc:?}");
        }
    }

    #[test]
    fn test_empty_containers_are_unrecognized() {
        let registry = SchemaRegistry::new();
        for doc in [
            Document::Single(json!({"trajectory": []})),
            Document::Single(json!({"steps": []})),
            Document::Single(json!([])),
        ] {
            let err = registry
                .extract_document(Path::new("x.traj"), &doc)
                .unwrap_err();
            assert_eq!(err.kind(), "UnrecognizedSchemaError", "doc: {doc:?}");
        }
    }

    #[test]
    fn test_chat_only_session_has_no_steps() {
        let registry = SchemaRegistry::new();
        let doc = Document::Lines(vec![
            json!({"type": "user", "message": {"role": "user", "content": "fix the bug"}}),
            json!({
                "type": "assistant",
                "message": {"role": "assistant", "content": [{"type": "text", "text": "Looking."}]}
            }),
        ]);
        assert_eq!(registry.adapter_for(&doc).unwrap().name(), "claude");
        let steps = registry
            .extract_document(Path::new("s.jsonl"), &doc)
            .unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn test_probe_order() {
        let registry = SchemaRegistry::new();
        let swe = Document::Single(json!({"trajectory": [{"action": "ls", "thought": ""}]}));
        assert_eq!(registry.adapter_for(&swe).unwrap().name(), "swe-agent");

        let claude = Document::Lines(vec![json!({
            "type": "assistant",
            "message": {"content": [{"type": "tool_use", "name": "Bash", "input": {"command": "ls"}}]}
        })]);
        assert_eq!(registry.adapter_for(&claude).unwrap().name(), "claude");

        let generic = Document::Single(json!({"steps": [{"tool": {"name": "view"}}]}));
        assert_eq!(registry.adapter_for(&generic).unwrap().name(), "steps");
    }
}
