use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, Result, WrapErr};
use tracing::Level;

use trajlens::analyze::Command;
use trajlens::batch::Pipeline;
use trajlens::config::{Config, DEFAULT_LOG_DIR, DEFAULT_TRAJ_DIR, TRAJ_DIR_ENV};
use trajlens::policy::Policy;
use trajlens::run_id::parse_id_list;
use trajlens::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "trajlens",
    version,
    about = "Locate reproduction code, search steps and tool use in agent trajectories"
)]
struct Cli {
    /// Root directory searched recursively for trajectory files.
    #[arg(long, global = true, env = TRAJ_DIR_ENV, default_value = DEFAULT_TRAJ_DIR)]
    traj_dir: PathBuf,

    /// Directory holding the per-command log files.
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// JSON file overriding fields of the matching policy.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Log debug diagnostics to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find steps where the run writes or runs reproduction code.
    #[command(name = "locate_reproduction_code")]
    LocateReproductionCode(Targets),

    /// Find steps where the run searches or navigates the repository.
    #[command(name = "locate_search")]
    LocateSearch(Targets),

    /// Count how often each tool is invoked.
    #[command(name = "locate_tool_use")]
    LocateToolUse(Targets),

    /// Print the matching policy in effect as JSON.
    Policy,
}

#[derive(Args, Debug)]
struct Targets {
    /// Run identifier, e.g. 20240620_sweagent_claude3.5sonnet@django__django-11099.
    run_id: Option<String>,

    /// File with one run identifier per line.
    #[arg(long)]
    ids_file: Option<PathBuf>,

    /// Print entries instead of appending them to the log files.
    #[arg(long)]
    print_only: bool,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    telemetry::init_tracing(if cli.verbose { Level::DEBUG } else { Level::WARN });

    let policy = match &cli.policy {
        Some(path) => Policy::from_file(path)
            .wrap_err_with(|| format!("Failed to load policy {}", path.display()))?,
        None => Policy::default(),
    };

    let (command, targets) = match cli.command {
        Commands::LocateReproductionCode(t) => (Command::LocateReproductionCode, t),
        Commands::LocateSearch(t) => (Command::LocateSearch, t),
        Commands::LocateToolUse(t) => (Command::LocateToolUse, t),
        Commands::Policy => {
            println!("{}", serde_json::to_string_pretty(&policy)?);
            return Ok(ExitCode::SUCCESS);
        }
    };

    let ids = collect_ids(&targets)?;
    if ids.is_empty() {
        eprintln!("error: provide a run identifier or --ids-file");
        return Ok(ExitCode::from(2));
    }

    let config = Config {
        traj_dir: cli.traj_dir,
        log_dir: cli.log_dir,
        print_only: targets.print_only,
        policy,
    };

    let pipeline = Pipeline::new(&config).wrap_err("Invalid matching policy")?;
    let mut sink = config.sink();
    let report = pipeline.run_batch(command, &ids, sink.as_mut());

    print!("{}", report.render_summary());

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// The literal identifier first, then the ids file in order.
fn collect_ids(targets: &Targets) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    if let Some(id) = &targets.run_id {
        ids.push(id.clone());
    }
    if let Some(path) = &targets.ids_file {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read ids file {}", path.display()))?;
        let listed = parse_id_list(&text);
        if listed.is_empty() && targets.run_id.is_none() {
            bail!("ids file {} lists no run identifiers", path.display());
        }
        ids.extend(listed);
    }
    Ok(ids)
}
