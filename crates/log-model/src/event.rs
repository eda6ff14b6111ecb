//! Event types recovered from an engine log.
//!
//! The engine tags corrected bones with one of four bracketed markers. Two
//! of them come from an older instrumentation scheme; all four describe the
//! same kind of event and carry the same fields.

use serde::Serialize;

/// Animation name used for jitter lines seen before any animation change.
pub const UNKNOWN_ANIMATION: &str = "UnknownAnimation";

/// Marker the engine writes when smoothing visibly drifted from the source.
pub const DRIFT_TAG: &str = "[DRIFT]";

/// The bracketed markers that identify a jitter suppression line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionTag {
    /// `[JITTER-SMOOTH]`
    JitterSmooth,
    /// `[PRE-BAKE-CLAMP]`
    PreBakeClamp,
    /// `[FIXED - SRT+ROT]` (older scheme)
    FixedSrtRot,
    /// `[FIXED - ROT SPIKE]` (older scheme)
    FixedRotSpike,
}

impl SuppressionTag {
    pub const ALL: [SuppressionTag; 4] = [
        SuppressionTag::JitterSmooth,
        SuppressionTag::PreBakeClamp,
        SuppressionTag::FixedSrtRot,
        SuppressionTag::FixedRotSpike,
    ];

    /// The tag exactly as it appears in the log, brackets included.
    pub fn marker(&self) -> &'static str {
        match self {
            SuppressionTag::JitterSmooth => "[JITTER-SMOOTH]",
            SuppressionTag::PreBakeClamp => "[PRE-BAKE-CLAMP]",
            SuppressionTag::FixedSrtRot => "[FIXED - SRT+ROT]",
            SuppressionTag::FixedRotSpike => "[FIXED - ROT SPIKE]",
        }
    }

    /// The text between the brackets.
    pub fn label(&self) -> &'static str {
        let marker = self.marker();
        &marker[1..marker.len() - 1]
    }

    /// Inverse of [`SuppressionTag::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.label() == label)
    }
}

/// A bone that was corrected on a specific frame of a specific animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JitterEvent {
    pub animation: String,
    pub bone: String,
    pub frame: u64,
    /// Which marker produced the event. Not part of the event's identity
    /// for aggregation purposes.
    pub tag: SuppressionTag,
}

impl JitterEvent {
    pub fn new(
        animation: impl Into<String>,
        bone: impl Into<String>,
        frame: u64,
        tag: SuppressionTag,
    ) -> Self {
        Self {
            animation: animation.into(),
            bone: bone.into(),
            frame,
            tag,
        }
    }
}

/// Everything a single log line can mean to us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    /// `Set current animation to <name>`.
    AnimationChange { name: String },
    /// A suppression-tagged line.
    Jitter(JitterEvent),
    /// A `[DRIFT]` warning. Counted, never aggregated.
    Drift,
}

/// The animation currently playing, as inferred from the log so far.
///
/// Lives for exactly one pass over one log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationContext {
    current: String,
}

impl AnimationContext {
    pub fn new() -> Self {
        Self {
            current: UNKNOWN_ANIMATION.to_string(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn set(&mut self, name: impl Into<String>) {
        self.current = name.into();
    }
}

impl Default for AnimationContext {
    fn default() -> Self {
        Self::new()
    }
}
