//! Line classification and single-pass log scanning.
//!
//! A log is read top to bottom exactly once. Animation-change lines update
//! the [`AnimationContext`]; jitter lines without an explicit `Anim=` field
//! are attributed to whatever the context holds at that point.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use jitterscope_common::error::{JitterError, JitterResult};
use regex::Regex;
use serde::Serialize;

use crate::event::{AnimationContext, JitterEvent, LogEvent, SuppressionTag, DRIFT_TAG};

const ANIMATION_CHANGE_PATTERN: &str = r"(?i)Set current animation to (\S+)";

const JITTER_FIELDS_PATTERN: &str = r"(?: Anim=(?P<anim>\S+))? Bone=(?P<bone>\S+) Frame=(?P<frame>\d+)";

static ANIMATION_CHANGE_REGEX: OnceLock<Regex> = OnceLock::new();
static JITTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn animation_change_regex() -> &'static Regex {
    ANIMATION_CHANGE_REGEX
        .get_or_init(|| Regex::new(ANIMATION_CHANGE_PATTERN).expect("invalid regex pattern"))
}

/// The tag alternation is built from [`SuppressionTag::ALL`], so every
/// `tag` capture maps back through [`SuppressionTag::from_label`].
fn jitter_regex() -> &'static Regex {
    JITTER_REGEX.get_or_init(|| {
        let labels: Vec<String> = SuppressionTag::ALL
            .iter()
            .map(|tag| regex::escape(tag.label()))
            .collect();
        let pattern = format!(r"\[(?P<tag>{})\]{JITTER_FIELDS_PATTERN}", labels.join("|"));
        Regex::new(&pattern).expect("invalid regex pattern")
    })
}

/// What to do with a jitter line whose frame number does not parse.
///
/// The line pattern only admits digits, so this covers two cases: a frame
/// too large for `u64`, and non-ASCII Unicode digits that `\d` accepts but
/// integer parsing does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Abort the scan with [`JitterError::FrameParse`].
    #[default]
    FailFast,
    /// Log a warning and ignore the line.
    Skip,
}

/// Classify one log line.
///
/// Animation changes take priority: a line that declares a new animation is
/// consumed for context only, even if it also carries a suppression tag.
/// Lines matching nothing yield `Ok(None)`.
///
/// `line_number` is 1-based and only used for error reporting.
pub fn classify(
    line: &str,
    line_number: usize,
    context: &AnimationContext,
) -> JitterResult<Option<LogEvent>> {
    if let Some(caps) = animation_change_regex().captures(line) {
        return Ok(Some(LogEvent::AnimationChange {
            name: caps[1].to_string(),
        }));
    }

    if let Some(caps) = jitter_regex().captures(line) {
        let raw_frame = &caps["frame"];
        let frame = raw_frame
            .parse::<u64>()
            .map_err(|source| JitterError::FrameParse {
                line_number,
                value: raw_frame.to_string(),
                source,
            })?;
        let Some(tag) = SuppressionTag::from_label(&caps["tag"]) else {
            tracing::warn!(line = line_number, label = &caps["tag"], "unrecognized suppression tag");
            return Ok(None);
        };
        let animation = caps
            .name("anim")
            .map(|m| m.as_str())
            .unwrap_or_else(|| context.current());

        return Ok(Some(LogEvent::Jitter(JitterEvent::new(
            animation,
            &caps["bone"],
            frame,
            tag,
        ))));
    }

    if line.contains(DRIFT_TAG) {
        return Ok(Some(LogEvent::Drift));
    }

    Ok(None)
}

/// Counters for one completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines_scanned: usize,
    pub jitter_events: usize,
    pub animation_changes: usize,
    pub drift_lines: usize,
    /// Jitter lines dropped under [`ParsePolicy::Skip`].
    pub skipped_lines: usize,
    /// Animation context when the scan finished.
    pub final_animation: String,
}

/// Stateful single-pass scanner.
///
/// Owns the animation context for the duration of one log. Feed lines in
/// order, then call [`LogScanner::finish`].
#[derive(Debug)]
pub struct LogScanner {
    context: AnimationContext,
    policy: ParsePolicy,
    stats: ScanStats,
}

impl LogScanner {
    pub fn new(policy: ParsePolicy) -> Self {
        Self {
            context: AnimationContext::new(),
            policy,
            stats: ScanStats::default(),
        }
    }

    /// Classify the next line, update context, and return any jitter event.
    pub fn feed(&mut self, line: &str) -> JitterResult<Option<JitterEvent>> {
        self.stats.lines_scanned += 1;
        let line_number = self.stats.lines_scanned;

        let event = match classify(line, line_number, &self.context) {
            Ok(event) => event,
            Err(err @ JitterError::FrameParse { .. }) if self.policy == ParsePolicy::Skip => {
                tracing::warn!("Skipping malformed jitter line: {err}");
                self.stats.skipped_lines += 1;
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        match event {
            Some(LogEvent::AnimationChange { name }) => {
                tracing::debug!(line = line_number, animation = %name, "animation change");
                self.context.set(name);
                self.stats.animation_changes += 1;
                Ok(None)
            }
            Some(LogEvent::Jitter(jitter)) => {
                self.stats.jitter_events += 1;
                Ok(Some(jitter))
            }
            Some(LogEvent::Drift) => {
                self.stats.drift_lines += 1;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn finish(mut self) -> ScanStats {
        self.stats.final_animation = self.context.current().to_string();
        self.stats
    }
}

/// Scan a reader line by line, handing each jitter event to `sink` as soon
/// as it is recognized.
///
/// Lines end at `\n`, `\r\n` or a bare `\r`. Bytes that are not valid UTF-8
/// are replaced rather than rejected.
pub fn scan_with<R, F>(reader: R, policy: ParsePolicy, mut sink: F) -> JitterResult<ScanStats>
where
    R: BufRead,
    F: FnMut(JitterEvent),
{
    let mut scanner = LogScanner::new(policy);

    for chunk in reader.split(b'\n') {
        let mut bytes = chunk?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        for piece in bytes.split(|&b| b == b'\r') {
            let line = String::from_utf8_lossy(piece);
            if let Some(event) = scanner.feed(&line)? {
                sink(event);
            }
        }
    }

    let stats = scanner.finish();
    tracing::debug!(
        lines = stats.lines_scanned,
        jitter = stats.jitter_events,
        drift = stats.drift_lines,
        "log scan complete"
    );
    Ok(stats)
}

/// Scan an in-memory log and collect its jitter events.
pub fn scan_bytes(
    bytes: &[u8],
    policy: ParsePolicy,
) -> JitterResult<(Vec<JitterEvent>, ScanStats)> {
    let mut events = Vec::new();
    let stats = scan_with(bytes, policy, |event| events.push(event))?;
    Ok((events, stats))
}

/// Scan a log file from disk, handing jitter events to `sink`.
///
/// A missing file is reported as [`JitterError::LogNotFound`]; any other
/// read failure as [`JitterError::ReadLog`].
pub fn scan_file_with<F>(path: &Path, policy: ParsePolicy, sink: F) -> JitterResult<ScanStats>
where
    F: FnMut(JitterEvent),
{
    let file = open_log(path)?;
    scan_with(BufReader::new(file), policy, sink).map_err(|err| match err {
        JitterError::Io(source) => JitterError::ReadLog {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Scan a log file from disk and collect its jitter events.
pub fn scan_file(path: &Path, policy: ParsePolicy) -> JitterResult<(Vec<JitterEvent>, ScanStats)> {
    let mut events = Vec::new();
    let stats = scan_file_with(path, policy, |event| events.push(event))?;
    Ok((events, stats))
}

/// Read a whole log file as text, decoding invalid UTF-8 lossily.
pub fn read_log_lossy(path: &Path) -> JitterResult<String> {
    let bytes = std::fs::read(path).map_err(|source| read_error(path, source))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn open_log(path: &Path) -> JitterResult<File> {
    File::open(path).map_err(|source| read_error(path, source))
}

fn read_error(path: &Path, source: std::io::Error) -> JitterError {
    if source.kind() == std::io::ErrorKind::NotFound {
        JitterError::LogNotFound {
            path: path.to_path_buf(),
        }
    } else {
        JitterError::ReadLog {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UNKNOWN_ANIMATION;

    fn classify_fresh(line: &str) -> Option<LogEvent> {
        classify(line, 1, &AnimationContext::new()).unwrap()
    }

    #[test]
    fn animation_change_is_case_insensitive() {
        assert_eq!(
            classify_fresh("INFO: set CURRENT animation TO Run_Fast"),
            Some(LogEvent::AnimationChange {
                name: "Run_Fast".to_string()
            })
        );
    }

    #[test]
    fn animation_token_is_taken_verbatim() {
        assert_eq!(
            classify_fresh("INFO: Set current animation to Idle."),
            Some(LogEvent::AnimationChange {
                name: "Idle.".to_string()
            })
        );
    }

    #[test]
    fn animation_change_short_circuits_jitter_match() {
        let event = classify_fresh("Set current animation to Walk [JITTER-SMOOTH] Bone=root Frame=1");
        assert!(matches!(event, Some(LogEvent::AnimationChange { .. })));
    }

    #[test]
    fn jitter_line_uses_context_when_anim_absent() {
        let mut ctx = AnimationContext::new();
        ctx.set("Walk");
        let event = classify("[PRE-BAKE-CLAMP] Bone=DEF-toe.L Frame=7", 3, &ctx).unwrap();
        assert_eq!(
            event,
            Some(LogEvent::Jitter(JitterEvent::new(
                "Walk",
                "DEF-toe.L",
                7,
                SuppressionTag::PreBakeClamp
            )))
        );
    }

    #[test]
    fn explicit_anim_field_wins_over_context() {
        let mut ctx = AnimationContext::new();
        ctx.set("Walk");
        let event = classify("[FIXED - SRT+ROT] Anim=Run Bone=root Frame=0", 1, &ctx).unwrap();
        match event {
            Some(LogEvent::Jitter(jitter)) => {
                assert_eq!(jitter.animation, "Run");
                assert_eq!(jitter.tag, SuppressionTag::FixedSrtRot);
            }
            other => panic!("expected jitter event, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_and_incomplete_lines_are_ignored() {
        assert_eq!(classify_fresh("INFO: Loading model"), None);
        assert_eq!(classify_fresh("[JITTER-SMOOTH] Bone=root"), None);
        assert_eq!(classify_fresh("[JITTER] Bone=root Frame=3"), None);
        assert_eq!(classify_fresh(""), None);
    }

    #[test]
    fn drift_lines_are_classified() {
        assert_eq!(
            classify_fresh("WARNING: [DRIFT] Bone=root dev=0.4"),
            Some(LogEvent::Drift)
        );
    }

    #[test]
    fn non_ascii_digits_fail_fast_with_line_number() {
        // U+0663 ARABIC-INDIC DIGIT THREE matches \d but is not a u64 digit.
        let err = classify("[JITTER-SMOOTH] Bone=root Frame=\u{0663}", 9, &AnimationContext::new())
            .unwrap_err();
        match err {
            JitterError::FrameParse { line_number, .. } => assert_eq!(line_number, 9),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn skip_policy_drops_malformed_line_and_continues() {
        let log = "[JITTER-SMOOTH] Bone=root Frame=\u{0663}\n[JITTER-SMOOTH] Bone=root Frame=4\n";
        let (events, stats) = scan_bytes(log.as_bytes(), ParsePolicy::Skip).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].frame, 4);
        assert_eq!(stats.skipped_lines, 1);

        assert!(scan_bytes(log.as_bytes(), ParsePolicy::FailFast).is_err());
    }

    #[test]
    fn jitter_before_any_animation_uses_sentinel() {
        let log = b"[JITTER-SMOOTH] Bone=root Frame=1\nSet current animation to Walk\n";
        let (events, stats) = scan_bytes(log, ParsePolicy::FailFast).unwrap();
        assert_eq!(events[0].animation, UNKNOWN_ANIMATION);
        assert_eq!(stats.final_animation, "Walk");
        assert_eq!(stats.animation_changes, 1);
    }

    #[test]
    fn invalid_utf8_does_not_abort_scan() {
        let mut log = Vec::new();
        log.extend_from_slice(b"Set current animation to Walk\r\n");
        log.extend_from_slice(b"\xff\xfe garbage \xc3\x28\n");
        log.extend_from_slice(b"[JITTER-SMOOTH] Bone=root Frame=5\r\n");
        let (events, stats) = scan_bytes(&log, ParsePolicy::FailFast).unwrap();
        assert_eq!(stats.lines_scanned, 3);
        assert_eq!(events, vec![JitterEvent::new("Walk", "root", 5, SuppressionTag::JitterSmooth)]);
    }

    #[test]
    fn bare_carriage_returns_end_lines() {
        let log = b"Set current animation to Walk\r[JITTER-SMOOTH] Bone=root Frame=1\r";
        let (events, stats) = scan_bytes(log, ParsePolicy::FailFast).unwrap();
        assert_eq!(stats.lines_scanned, 2);
        assert_eq!(stats.animation_changes, 1);
        assert_eq!(events, vec![JitterEvent::new("Walk", "root", 1, SuppressionTag::JitterSmooth)]);
    }

    #[test]
    fn mixed_line_endings_scan_like_plain_newlines() {
        let mixed = b"Set current animation to Walk\r\n[PRE-BAKE-CLAMP] Bone=root Frame=2\r\
Set current animation to Run\n[JITTER-SMOOTH] Bone=DEF-toe.L Frame=3";
        let plain = b"Set current animation to Walk\n[PRE-BAKE-CLAMP] Bone=root Frame=2\n\
Set current animation to Run\n[JITTER-SMOOTH] Bone=DEF-toe.L Frame=3";
        let (mixed_events, mixed_stats) = scan_bytes(mixed, ParsePolicy::FailFast).unwrap();
        let (plain_events, plain_stats) = scan_bytes(plain, ParsePolicy::FailFast).unwrap();
        assert_eq!(mixed_events, plain_events);
        assert_eq!(mixed_stats, plain_stats);
        assert_eq!(mixed_events[1].animation, "Run");
    }

    #[test]
    fn frame_overflowing_u64_follows_parse_policy() {
        let line = "[JITTER-SMOOTH] Bone=root Frame=18446744073709551616";
        let err = classify(line, 2, &AnimationContext::new()).unwrap_err();
        assert!(matches!(err, JitterError::FrameParse { line_number: 2, .. }));

        let log = format!("{line}\n[JITTER-SMOOTH] Bone=root Frame=18446744073709551615\n");
        let (events, stats) = scan_bytes(log.as_bytes(), ParsePolicy::Skip).unwrap();
        assert_eq!(stats.skipped_lines, 1);
        assert_eq!(events[0].frame, u64::MAX);
    }

    #[test]
    fn every_tag_spelling_is_recognized_with_its_own_tag() {
        for tag in SuppressionTag::ALL {
            let line = format!("{} Bone=root Frame=1", tag.marker());
            match classify_fresh(&line) {
                Some(LogEvent::Jitter(jitter)) => assert_eq!(jitter.tag, tag),
                other => panic!("{line}: expected jitter event, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_file(&dir.path().join("output.txt"), ParsePolicy::FailFast).unwrap_err();
        assert!(matches!(err, JitterError::LogNotFound { .. }));

        let err = read_log_lossy(&dir.path().join("output.txt")).unwrap_err();
        assert!(matches!(err, JitterError::LogNotFound { .. }));
    }
}
