//! Score a log the same way the tuner scores a trial.

use std::path::PathBuf;

use anyhow::Context;
use jitterscope_processing_core::report::render_score;
use jitterscope_processing_core::ScoreComponents;
use serde::Serialize;

#[derive(Serialize)]
struct ScoreOutput {
    #[serde(flatten)]
    components: ScoreComponents,
    score: u64,
}

pub fn run(log: PathBuf, json: bool) -> anyhow::Result<()> {
    let components = ScoreComponents::from_log_file(&log)
        .with_context(|| format!("Failed to score {}", log.display()))?;

    if json {
        let output = ScoreOutput {
            components,
            score: components.score(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Log: {}", log.display());
        print!("{}", render_score(&components));
    }

    Ok(())
}
