//! Runs one analysis over a list of run identifiers.
//!
//! Each identifier goes through resolve → extract → analyze → write on its
//! own. A failure is recorded against that identifier and the batch moves
//! on; only successful identifiers produce log entries.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::analyze::{AnalysisResult, Command};
use crate::config::Config;
use crate::error::{LocateError, Result};
use crate::ingest::{SchemaRegistry, StepRecord};
use crate::output::{render_entry, LogSink};
use crate::policy::Matchers;
use crate::resolve::resolve;
use crate::run_id::RunId;

/// What happened to one identifier.
#[derive(Debug)]
pub struct Outcome {
    pub id: String,
    pub result: std::result::Result<AnalysisResult, LocateError>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub command: Command,
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// One line per identifier, then the totals.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(result) => {
                    out.push_str(&format!("ok    {}  {}\n", outcome.id, result.summary()))
                }
                Err(e) => out.push_str(&format!("FAIL  {}  {}: {}\n", outcome.id, e.kind(), e)),
            }
        }
        out.push_str(&format!(
            "{} succeeded, {} failed\n",
            self.succeeded(),
            self.failed()
        ));
        out
    }
}

/// Resolver, extractor and compiled policy, shared across a batch.
pub struct Pipeline {
    traj_dir: PathBuf,
    registry: SchemaRegistry,
    matchers: Matchers,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            traj_dir: config.traj_dir.clone(),
            registry: SchemaRegistry::new(),
            matchers: config.policy.compile()?,
        })
    }

    /// Locate and normalise the steps for one identifier.
    pub fn load_steps(&self, id: &RunId) -> Result<Vec<StepRecord>> {
        let path = resolve(&self.traj_dir, id)?;
        self.registry.extract(&path)
    }

    /// Run `command` for one identifier without writing anything.
    pub fn analyze(&self, command: Command, raw_id: &str) -> Result<(RunId, AnalysisResult)> {
        let id = RunId::parse(raw_id)?;
        let steps = self.load_steps(&id)?;
        let result = command.run(&steps, &self.matchers);
        Ok((id, result))
    }

    fn process(&self, command: Command, raw_id: &str, sink: &mut dyn LogSink) -> Result<AnalysisResult> {
        let (id, result) = self.analyze(command, raw_id)?;
        sink.append(command, &render_entry(id.as_str(), &result))?;
        Ok(result)
    }

    /// Process every identifier in order and report each outcome.
    pub fn run_batch(&self, command: Command, ids: &[String], sink: &mut dyn LogSink) -> BatchReport {
        let outcomes = ids
            .iter()
            .map(|raw| {
                let result = self.process(command, raw, sink);
                match &result {
                    Ok(r) => info!(id = %raw, command = %command, result = %r.summary(), "processed"),
                    Err(e) => warn!(id = %raw, kind = e.kind(), error = %e, "failed"),
                }
                Outcome {
                    id: raw.trim().to_string(),
                    result,
                }
            })
            .collect();

        BatchReport { command, outcomes }
    }
}
