//! Per-animation, per-bone jitter table.
//!
//! Animations and bones keep the order in which they were first seen so
//! reports are stable across runs of the same log. Frames are stored as a
//! set; the raw number of suppression hits is tracked alongside because the
//! two diverge whenever a frame is corrected more than once.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use jitterscope_common::error::JitterResult;
use jitterscope_log_model::{scan_file_with, JitterEvent, ParsePolicy, ScanStats};

/// Frames and hit count for one bone within one animation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoneRecord {
    frames: BTreeSet<u64>,
    hits: usize,
}

impl BoneRecord {
    /// Unique frames, ascending.
    pub fn frames(&self) -> &BTreeSet<u64> {
        &self.frames
    }

    pub fn unique_frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of suppression events, duplicates included.
    pub fn hits(&self) -> usize {
        self.hits
    }

    fn record(&mut self, frame: u64) {
        self.frames.insert(frame);
        self.hits += 1;
    }
}

/// All bones seen for one animation, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationEntry {
    name: String,
    bones: Vec<(String, BoneRecord)>,
    index: HashMap<String, usize>,
}

impl AnimationEntry {
    fn new(name: String) -> Self {
        Self {
            name,
            bones: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bones(&self) -> impl Iterator<Item = (&str, &BoneRecord)> {
        self.bones.iter().map(|(bone, record)| (bone.as_str(), record))
    }

    pub fn bone(&self, bone: &str) -> Option<&BoneRecord> {
        self.index.get(bone).map(|&i| &self.bones[i].1)
    }

    fn record_mut(&mut self, bone: &str) -> &mut BoneRecord {
        let i = match self.index.get(bone) {
            Some(&i) => i,
            None => {
                self.bones.push((bone.to_string(), BoneRecord::default()));
                self.index.insert(bone.to_string(), self.bones.len() - 1);
                self.bones.len() - 1
            }
        };
        &mut self.bones[i].1
    }
}

/// Animation name -> bone name -> frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationTable {
    animations: Vec<AnimationEntry>,
    index: HashMap<String, usize>,
    total_hits: usize,
}

impl AggregationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a JitterEvent>) -> Self {
        let mut table = Self::new();
        for event in events {
            table.ingest(event);
        }
        table
    }

    /// Scan a log file and fold its jitter events straight into a table.
    pub fn from_log_file(path: &Path, policy: ParsePolicy) -> JitterResult<(Self, ScanStats)> {
        let mut table = Self::new();
        let stats = scan_file_with(path, policy, |event| table.ingest(&event))?;
        tracing::debug!(
            animations = table.animation_count(),
            hits = table.total_hits(),
            "aggregated {}",
            path.display()
        );
        Ok((table, stats))
    }

    /// Record one event. Re-recording a frame leaves the frame set unchanged
    /// but still counts as a hit.
    pub fn ingest(&mut self, event: &JitterEvent) {
        self.ingest_parts(&event.animation, &event.bone, event.frame);
    }

    pub fn ingest_parts(&mut self, animation: &str, bone: &str, frame: u64) {
        let i = match self.index.get(animation) {
            Some(&i) => i,
            None => {
                self.animations
                    .push(AnimationEntry::new(animation.to_string()));
                self.index
                    .insert(animation.to_string(), self.animations.len() - 1);
                self.animations.len() - 1
            }
        };
        self.animations[i].record_mut(bone).record(frame);
        self.total_hits += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Total events ingested, duplicates included.
    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// Animations in first-seen order.
    pub fn animations(&self) -> impl Iterator<Item = &AnimationEntry> {
        self.animations.iter()
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationEntry> {
        self.index.get(name).map(|&i| &self.animations[i])
    }

    pub fn unique_frames(&self, animation: &str, bone: &str) -> Option<&BTreeSet<u64>> {
        self.animation(animation)?.bone(bone).map(BoneRecord::frames)
    }
}
