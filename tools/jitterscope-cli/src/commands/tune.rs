//! Grid-search suppression thresholds against the engine.

use anyhow::Context;
use jitterscope_common::config::AppConfig;
use jitterscope_tuning::{ProcessEngine, ProcessEngineConfig, Tuner};

pub fn run(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let tuner = Tuner::from_settings(&config.tuning).context("Invalid tuning settings")?;
    let engine_config = ProcessEngineConfig::from_paths(&config.paths)
        .timeout_secs(config.tuning.engine_timeout_secs)
        .capture_stderr(true);

    if !json {
        println!(
            "Tuning {} animation(s) over {} parameter combinations",
            tuner.animations().len(),
            tuner.grid().len()
        );
        println!("  Engine: {}", engine_config.engine.display());
        println!("  Config: {}", engine_config.resolved_config_path().display());
        println!("  Log:    {}", engine_config.resolved_log_path().display());
    }

    let mut engine = ProcessEngine::new(engine_config);
    let report = tuner
        .run_with(&mut engine, |animation, best| {
            if !json {
                let params = &best.config.default;
                println!(
                    "NEW BEST {animation} t={} rDeg={} window={} score {} (hits {}, drift {})",
                    params.t,
                    params.r_deg,
                    params.window,
                    best.score,
                    best.components.hit_count,
                    best.components.drift_count
                );
            }
        })
        .context("Tuning sweep failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== Final ===");
    for result in &report.results {
        match &result.best {
            Some(best) => println!(
                "{}: score {} with {}",
                result.animation,
                best.score,
                serde_json::to_string(&best.config)?
            ),
            None => println!("{}: no successful trials", result.animation),
        }
        if result.trials_failed > 0 {
            println!(
                "  {} of {} trials failed",
                result.trials_failed, result.trials_run
            );
        }
    }

    let elapsed = report.finished_at - report.started_at;
    println!("\nCompleted in {}s.", elapsed.num_seconds());

    Ok(())
}
