#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use trajlens::config::Config;

/// Build one SWE-agent trajectory entry.
pub fn swe_entry(action: &str, thought: &str) -> String {
    serde_json::json!({
        "action": action,
        "thought": thought,
        "observation": "",
        "response": thought,
        "state": "{\"open_file\": \"n/a\", \"working_dir\": \"/testbed\"}"
    })
    .to_string()
}

/// Wrap entries into a `.traj` document.
pub fn swe_traj(entries: &[String]) -> String {
    format!(
        r#"{{"environment": "swe_main", "trajectory": [{}], "info": {{"exit_status": "submitted"}}}}"#,
        entries.join(",")
    )
}

/// A ten-step SWE-agent run. Step 3 creates the reproduction script.
pub fn ten_step_traj() -> String {
    swe_traj(&[
        swe_entry("ls -la", "Let's look at the repository structure."),
        swe_entry("find_file \"models.py\"", "Find the models module."),
        swe_entry("search_dir \"save_base\"", "Where is save_base defined?"),
        swe_entry(
            "create reproduce_bug.py\n",
            "Let's create a script to reproduce the bug.",
        ),
        swe_entry("open src/models.py", "Now the model code."),
        swe_entry("goto 120", "Jump to the save method."),
        swe_entry("scroll_down", "Keep reading."),
        swe_entry(
            "edit 130:131\n        self._state.adding = False\nend_of_edit\n",
            "Fix the state flag.",
        ),
        swe_entry("python -m pytest tests/test_models.py", "Run the suite."),
        swe_entry("submit\n", "Done."),
    ])
}

/// Build a Claude session JSONL assistant record with one tool_use block.
pub fn jsonl_tool_use(tool_name: &str, input_json: &str) -> String {
    format!(
        r#"{{"type":"assistant","sessionId":"test-session","timestamp":"2025-01-01T00:00:00Z","message":{{"role":"assistant","content":[{{"type":"tool_use","name":"{tool_name}","input":{input_json}}}]}}}}"#
    )
}

/// Build a JSONL user message (ignored by the extractor).
pub fn jsonl_user_msg() -> String {
    r#"{"type":"user","message":{"role":"user","content":"hello"}}"#.to_string()
}

/// Write `contents` to `<dir>/<name>`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// A config rooted in a temp workspace: trajectories under `traj/`, logs under `logs/`.
pub fn workspace_config(root: &Path) -> Config {
    Config {
        traj_dir: root.join("traj"),
        log_dir: root.join("logs"),
        ..Config::default()
    }
}
