use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use uischema_adjudicate::{adjudicate, ViolationDetail};
use uischema_runner::{Config, FolderOutcome, Runner};

#[derive(Parser)]
#[command(name = "uischema", version, about = "Validate component interfaces against conversation schemas")]
struct Cli {
    /// Log filter, e.g. `debug` or `uischema_runner=info`. Defaults to RUST_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    /// Config file. Defaults to ./uischema.toml; missing means defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default uischema.toml in the current directory
    Init,

    /// Validate one data point folder
    Validate {
        dir: PathBuf,
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate every subfolder of ROOT and write report.json / report.md
    Batch {
        root: PathBuf,
        /// Output directory (default: report.output_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Ask the configured model to adjudicate prop-provenance violations
    Adjudicate {
        dir: PathBuf,
        /// JSON array of {message_index, component, prop, value}
        #[arg(long)]
        violations: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = match &cli.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cwd = std::env::current_dir()?;
    let runner = match &cli.config {
        Some(path) => Runner::new(Config::load_from(path)?),
        None => Runner::open(&cwd)?,
    };

    match cli.cmd {
        Command::Init => {
            let path = Runner::init(&cwd)?;
            println!("Wrote {}", path.display());
        }
        Command::Validate { dir, json } => {
            let outcome = runner.validate_folder(&dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome);
            }
            if !outcome.report.all_passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Batch { root, out } => {
            let batch = runner.run_batch(&root)?;
            let out = match out {
                Some(dir) => dir,
                None => runner.cfg.report_dir()?,
            };
            let (json, md) = batch.write_to(&out)?;
            for (tier, n) in batch.tier_counts() {
                println!("{:<9} {n}", tier.label());
            }
            if !batch.load_errors.is_empty() {
                println!("{:<9} {}", "load err", batch.load_errors.len());
            }
            println!("Wrote {} and {}", json.display(), md.display());
        }
        Command::Adjudicate { dir, violations } => {
            let violations = read_violations(&violations)?;
            let Some(api_key) = runner.cfg.llm.api_key() else {
                warn!(
                    env = %runner.cfg.llm.api_key_env,
                    "no API key set; skipping adjudication"
                );
                return Ok(ExitCode::SUCCESS);
            };
            let loaded = runner.load(&dir)?;
            let summary = adjudicate(
                &runner.cfg.llm,
                api_key,
                &loaded.data_point.document.conversation,
                &violations,
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_outcome(outcome: &FolderOutcome) {
    println!(
        "{} ({} component(s)) tier={}",
        outcome.id,
        outcome.components.len(),
        outcome.tier.label()
    );
    for r in &outcome.report.results {
        let mark = if r.passed { "PASS" } else { "FAIL" };
        println!("  {mark} {}: {}", r.check_name, r.message);
        for d in &r.details {
            println!("       - {d}");
        }
    }
}

fn read_violations(path: &Path) -> Result<Vec<ViolationDetail>> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse violations {}", path.display()))
}
