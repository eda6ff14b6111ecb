//! Plain-text rendering of summary views.

use std::fmt::Write;

use crate::score::ScoreComponents;
use crate::views::{AnimationSummary, BoneHits, GroupTotal, Summary};

pub const NO_MATCHING_ENTRIES: &str = "(No matching jitter suppression entries found.)";

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn join_frames(frames: &[u64]) -> String {
    frames
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_grouped(view: &Summary<AnimationSummary>) -> String {
    let mut out = String::new();
    match view {
        Summary::NoMatchingEntries => {
            let _ = writeln!(out, "{NO_MATCHING_ENTRIES}");
        }
        Summary::Entries(animations) => {
            for animation in animations {
                let _ = writeln!(out, "\n=== Animation: {} ===", animation.animation);
                for bone in &animation.bones {
                    let _ = writeln!(
                        out,
                        "{}: {} -> {}",
                        bone.bone,
                        plural(bone.unique_frame_count, "frame"),
                        join_frames(&bone.frames)
                    );
                }
            }
        }
    }
    out
}

pub fn render_flat(view: &Summary<BoneHits>) -> String {
    let mut out = String::from("=== Jitter Suppression Summary ===\n");
    match view {
        Summary::NoMatchingEntries => {
            let _ = writeln!(out, "{NO_MATCHING_ENTRIES}");
        }
        Summary::Entries(bones) => {
            for bone in bones {
                let _ = writeln!(
                    out,
                    "{}: {} -> {}",
                    bone.bone,
                    plural(bone.hits, "hit"),
                    join_frames(&bone.frames)
                );
            }
        }
    }
    out
}

pub fn render_group_rollup(view: &Summary<GroupTotal>) -> String {
    let mut out = String::from("\n=== Group Summary ===\n");
    match view {
        Summary::NoMatchingEntries => {
            let _ = writeln!(out, "{NO_MATCHING_ENTRIES}");
        }
        Summary::Entries(groups) => {
            for total in groups {
                let _ = writeln!(
                    out,
                    "{}: {} total suppressed {}",
                    total.group,
                    total.suppressed_frames,
                    if total.suppressed_frames == 1 {
                        "frame"
                    } else {
                        "frames"
                    }
                );
            }
        }
    }
    out
}

pub fn render_score(components: &ScoreComponents) -> String {
    format!(
        "hits: {}\ndrift: {}\nscore: {}\n",
        components.hit_count,
        components.drift_count,
        components.score()
    )
}
