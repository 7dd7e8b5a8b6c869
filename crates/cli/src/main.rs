mod args;
mod commands;

use anyhow::Context;
use args::{Cli, Command};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "chipputt=info,chipputt_core=info,chipputt_data=info,chipputt_cui=info,warn";
const LOG_FILE_NAME: &str = "chipputt.log";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let rules = commands::resolve_rules(cli.rules.as_deref())?;

    match cli.command {
        Command::Play {
            seed,
            save,
            resume,
            log_file,
        } => {
            let log_path = log_file.unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME));
            init_file_logging(cli.debug, &log_path)?;
            tracing::info!(log = %log_path.display(), "starting scorekeeper");
            chipputt_cui::run(chipputt_cui::LaunchOptions {
                rules,
                seed,
                save_path: save,
                resume,
            })
        }
        Command::Replay { script, out } => {
            init_stderr_logging(cli.debug);
            let outcome = commands::replay(&script, rules)?;
            for line in &outcome.log {
                println!("{line}");
            }
            for line in commands::standings(&outcome.state) {
                println!("{line}");
            }
            if let Some(out) = out {
                let record = commands::record_of(&outcome.state)?;
                commands::write_export(&[record], &out)?;
            }
            Ok(())
        }
        Command::Export { save, records, out } => {
            init_stderr_logging(cli.debug);
            let records = commands::collect_records(save, &records)?;
            commands::write_export(&records, &out)?;
            println!("wrote {} match(es) to {}", records.len(), out.display());
            Ok(())
        }
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    let fallback = if debug { "debug" } else { DEFAULT_LOG_FILTER };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn init_stderr_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();
}

/// The terminal UI owns stdout, so logs go to a file while it runs.
fn init_file_logging(debug: bool, path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(debug)
        .init();
    Ok(())
}
