//! Jitterscope CLI — inspect jitter suppression logs and tune thresholds.
//!
//! Usage:
//!   jitterscope summary [LOG]    Per-animation, per-bone and group summaries
//!   jitterscope score [LOG]      Hit/drift counts and the tuning score
//!   jitterscope tune             Grid-search thresholds against the engine

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use jitterscope_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "jitterscope",
    about = "Jitter suppression log analysis and threshold tuning",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/jitterscope/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which summary views to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Grouped view, group rollup, then flat view
    All,
    /// Per animation, with the group rollup
    Grouped,
    /// Per bone across all animations
    Flat,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize jitter suppression events in a log
    Summary {
        /// Log file (defaults to the configured engine log)
        log: Option<PathBuf>,

        /// Views to print
        #[arg(long, value_enum, default_value = "all")]
        view: View,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Skip jitter lines with unparseable frame numbers instead of failing
        #[arg(long)]
        skip_bad_frames: bool,
    },

    /// Count suppression hits and drift warnings and compute the score
    Score {
        /// Log file (defaults to the configured engine log)
        log: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search the threshold grid by repeatedly running the engine
    Tune {
        /// Engine executable
        #[arg(long)]
        engine: Option<PathBuf>,

        /// Animation to tune (repeatable; replaces the configured list)
        #[arg(short, long = "animation")]
        animations: Vec<String>,

        /// Kill the engine after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Log failed trials and keep searching instead of stopping
        #[arg(long)]
        keep_going: bool,

        /// Emit the final report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    jitterscope_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Summary {
            log,
            view,
            json,
            skip_bad_frames,
        } => commands::summary::run(
            log.unwrap_or_else(|| config.paths.log_file.clone()),
            view,
            json,
            skip_bad_frames,
        ),
        Commands::Score { log, json } => {
            commands::score::run(log.unwrap_or_else(|| config.paths.log_file.clone()), json)
        }
        Commands::Tune {
            engine,
            animations,
            timeout_secs,
            keep_going,
            json,
        } => {
            if let Some(engine) = engine {
                config.paths.engine = engine;
            }
            if !animations.is_empty() {
                config.tuning.animations = animations;
            }
            if timeout_secs.is_some() {
                config.tuning.engine_timeout_secs = timeout_secs;
            }
            if keep_going {
                config.tuning.failure_policy = jitterscope_common::config::FailurePolicy::Continue;
            }
            commands::tune::run(&config, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn tune_accepts_repeated_animations() {
        let cli = Cli::try_parse_from([
            "jitterscope",
            "tune",
            "-a",
            "Walk",
            "--animation",
            "Run",
            "--keep-going",
        ])
        .unwrap();
        match cli.command {
            Commands::Tune {
                animations,
                keep_going,
                ..
            } => {
                assert_eq!(animations, vec!["Walk", "Run"]);
                assert!(keep_going);
            }
            _ => panic!("expected tune"),
        }
    }

    #[test]
    fn summary_defaults_to_all_views() {
        let cli = Cli::try_parse_from(["jitterscope", "summary", "output.txt"]).unwrap();
        match cli.command {
            Commands::Summary { log, view, .. } => {
                assert_eq!(log, Some(PathBuf::from("output.txt")));
                assert_eq!(view, View::All);
            }
            _ => panic!("expected summary"),
        }
    }
}
