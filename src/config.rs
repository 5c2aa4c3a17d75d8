use std::path::PathBuf;

use crate::output::{LogFiles, LogSink, PrintSink};
use crate::policy::Policy;

/// Environment variable naming the trajectory search root.
pub const TRAJ_DIR_ENV: &str = "SWE_TRAJ_DIR";

pub const DEFAULT_TRAJ_DIR: &str = "./trajectories";

pub const DEFAULT_LOG_DIR: &str = ".";

/// Everything the pipeline needs, resolved up front by the binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root searched recursively for trajectory files.
    pub traj_dir: PathBuf,
    /// Directory holding the per-command log files.
    pub log_dir: PathBuf,
    /// Print entries to stdout instead of appending to the logs.
    pub print_only: bool,
    pub policy: Policy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            traj_dir: PathBuf::from(DEFAULT_TRAJ_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            print_only: false,
            policy: Policy::default(),
        }
    }
}

impl Config {
    /// The sink entries go to for this configuration.
    pub fn sink(&self) -> Box<dyn LogSink> {
        if self.print_only {
            Box::new(PrintSink::stdout())
        } else {
            Box::new(LogFiles::new(&self.log_dir))
        }
    }
}
