//! Summarize jitter suppression events in a log.

use std::path::PathBuf;

use anyhow::Context;
use jitterscope_log_model::ParsePolicy;
use jitterscope_processing_core::report::{render_flat, render_group_rollup, render_grouped};
use jitterscope_processing_core::{AggregationTable, LogSummary};

use crate::View;

pub fn run(log: PathBuf, view: View, json: bool, skip_bad_frames: bool) -> anyhow::Result<()> {
    let policy = if skip_bad_frames {
        ParsePolicy::Skip
    } else {
        ParsePolicy::FailFast
    };

    let (table, stats) = AggregationTable::from_log_file(&log, policy)
        .with_context(|| format!("Failed to summarize {}", log.display()))?;
    tracing::info!(
        lines = stats.lines_scanned,
        events = stats.jitter_events,
        animations = table.animation_count(),
        skipped = stats.skipped_lines,
        "scanned {}",
        log.display()
    );

    let summary = LogSummary::from_table(&table);

    if json {
        let value = match view {
            View::All => serde_json::to_value(&summary)?,
            View::Grouped => serde_json::json!({
                "grouped": summary.grouped,
                "groups": summary.groups,
            }),
            View::Flat => serde_json::json!({ "flat": summary.flat }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if matches!(view, View::All | View::Grouped) {
        print!("{}", render_grouped(&summary.grouped));
        print!("{}", render_group_rollup(&summary.groups));
    }
    if view == View::All {
        println!();
    }
    if matches!(view, View::All | View::Flat) {
        print!("{}", render_flat(&summary.flat));
    }

    Ok(())
}
