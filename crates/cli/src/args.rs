use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scorekeeper for chip-and-putt golf matches.
#[derive(Debug, Parser)]
#[command(name = "chipputt", version, about)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Rules file; defaults to assets/rules.json when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Keep score interactively in the terminal.
    Play {
        /// Seed for generated ids; defaults to the clock.
        #[arg(long)]
        seed: Option<u64>,

        /// Autosave file, also the default for save/load prompts.
        #[arg(long, env = "CHIPPUTT_SAVE", value_name = "PATH")]
        save: Option<PathBuf>,

        /// Load the save file on startup.
        #[arg(long)]
        resume: bool,

        /// Where logs go while the terminal UI is up.
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,
    },
    /// Run a scripted match headless and print the result.
    Replay {
        /// JSON script: `{seed?, rules?, actions}` or a bare action array.
        script: PathBuf,

        /// Also write the finished match here (.csv or .json).
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Export a saved or previously exported match.
    Export {
        /// Snapshot written by `play`; used when no --record is given.
        #[arg(long, env = "CHIPPUTT_SAVE", value_name = "PATH")]
        save: Option<PathBuf>,

        /// Exported match JSON to validate and convert. Repeatable.
        #[arg(long = "record", value_name = "PATH")]
        records: Vec<PathBuf>,

        /// Output file; format follows the extension (.csv or .json).
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_replay_with_global_flags() {
        let cli = Cli::parse_from(["chipputt", "replay", "game.json", "--debug", "--out", "m.csv"]);
        assert!(cli.debug);
        match cli.command {
            Command::Replay { script, out } => {
                assert_eq!(script, PathBuf::from("game.json"));
                assert_eq!(out, Some(PathBuf::from("m.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn export_collects_records() {
        let cli = Cli::parse_from([
            "chipputt", "export", "--record", "a.json", "--record", "b.json", "--out", "all.csv",
        ]);
        match cli.command {
            Command::Export { records, out, .. } => {
                assert_eq!(records.len(), 2);
                assert_eq!(out, PathBuf::from("all.csv"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
