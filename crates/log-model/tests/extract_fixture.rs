use std::path::PathBuf;

use jitterscope_log_model::{
    scan_bytes, scan_file, JitterEvent, ParsePolicy, SuppressionTag, UNKNOWN_ANIMATION,
};
use proptest::prelude::*;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("logs")
        .join("session.txt")
}

#[test]
fn fixture_scan_counts_every_line_kind() {
    let (events, stats) = scan_file(&fixture_path(), ParsePolicy::FailFast).unwrap();

    assert_eq!(stats.lines_scanned, 20);
    assert_eq!(stats.jitter_events, 11);
    assert_eq!(events.len(), 11);
    assert_eq!(stats.animation_changes, 2);
    assert_eq!(stats.drift_lines, 2);
    assert_eq!(stats.skipped_lines, 0);
    assert_eq!(stats.final_animation, "Idle.");
}

#[test]
fn fixture_attribution_follows_context() {
    let (events, _) = scan_file(&fixture_path(), ParsePolicy::FailFast).unwrap();

    assert_eq!(events[0].animation, UNKNOWN_ANIMATION);
    assert!(events[1..7].iter().all(|e| e.animation == "Walk"));
    assert_eq!(events[7].animation, "Run");
    assert!(events[8..].iter().all(|e| e.animation == "Idle."));
}

#[test]
fn context_carries_forward_to_every_following_line() {
    let mut log = String::from("INFO: Set current animation to Jump\n");
    for frame in 0..25 {
        log.push_str(&format!("[JITTER-SMOOTH] Bone=DEF-foot.L Frame={frame}\n"));
    }

    let (events, _) = scan_bytes(log.as_bytes(), ParsePolicy::FailFast).unwrap();
    assert_eq!(events.len(), 25);
    assert!(events.iter().all(|e| e.animation == "Jump"));
}

fn tag_strategy() -> impl Strategy<Value = SuppressionTag> {
    prop::sample::select(SuppressionTag::ALL.to_vec())
}

proptest! {
    #[test]
    fn tag_spelling_does_not_change_extracted_fields(
        tag_a in tag_strategy(),
        tag_b in tag_strategy(),
        bone in "[A-Za-z][A-Za-z0-9_.\\-]{0,15}",
        frame in 0u64..1_000_000,
    ) {
        let line_a = format!("{} Bone={bone} Frame={frame}", tag_a.marker());
        let line_b = format!("{} Bone={bone} Frame={frame}", tag_b.marker());

        let (a, _) = scan_bytes(line_a.as_bytes(), ParsePolicy::FailFast).unwrap();
        let (b, _) = scan_bytes(line_b.as_bytes(), ParsePolicy::FailFast).unwrap();

        let strip = |events: Vec<JitterEvent>| {
            events
                .into_iter()
                .map(|e| (e.animation, e.bone, e.frame))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(strip(a), strip(b));
    }
}
