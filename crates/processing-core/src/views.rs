//! Summary views over an [`AggregationTable`].
//!
//! Every view distinguishes "nothing was found" from a list of entries, so
//! callers never have to guess what an empty table means.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::bone_group::BoneGroup;
use crate::heatmap::AggregationTable;

/// Result of a summary view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "entries", rename_all = "snake_case")]
pub enum Summary<T> {
    NoMatchingEntries,
    Entries(Vec<T>),
}

impl<T> Summary<T> {
    fn from_entries(entries: Vec<T>) -> Self {
        if entries.is_empty() {
            Summary::NoMatchingEntries
        } else {
            Summary::Entries(entries)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Summary::NoMatchingEntries)
    }

    pub fn entries(&self) -> &[T] {
        match self {
            Summary::NoMatchingEntries => &[],
            Summary::Entries(entries) => entries,
        }
    }
}

/// Unique frames for one bone inside one animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoneFrames {
    pub bone: String,
    pub unique_frame_count: usize,
    /// Ascending.
    pub frames: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationSummary {
    pub animation: String,
    /// Most affected bone first.
    pub bones: Vec<BoneFrames>,
}

/// One bone across every animation in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoneHits {
    pub bone: String,
    /// Raw suppression events, duplicates included.
    pub hits: usize,
    /// Ascending union of unique frames across animations.
    pub frames: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub group: BoneGroup,
    pub suppressed_frames: usize,
}

/// Per-animation view. Animations appear in first-seen order; bones are
/// sorted by unique frame count descending, then by name.
pub fn grouped_view(table: &AggregationTable) -> Summary<AnimationSummary> {
    let entries = table
        .animations()
        .map(|animation| {
            let mut bones: Vec<BoneFrames> = animation
                .bones()
                .map(|(bone, record)| BoneFrames {
                    bone: bone.to_string(),
                    unique_frame_count: record.unique_frame_count(),
                    frames: record.frames().iter().copied().collect(),
                })
                .collect();
            bones.sort_by(|a, b| {
                b.unique_frame_count
                    .cmp(&a.unique_frame_count)
                    .then_with(|| a.bone.cmp(&b.bone))
            });
            AnimationSummary {
                animation: animation.name().to_string(),
                bones,
            }
        })
        .collect();

    Summary::from_entries(entries)
}

/// Bone-only view ignoring animation boundaries, sorted by raw hit count
/// descending, then by name.
pub fn flat_view(table: &AggregationTable) -> Summary<BoneHits> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (usize, BTreeSet<u64>)> = HashMap::new();

    for animation in table.animations() {
        for (bone, record) in animation.bones() {
            let entry = totals.entry(bone.to_string()).or_insert_with(|| {
                order.push(bone.to_string());
                (0, BTreeSet::new())
            });
            entry.0 += record.hits();
            entry.1.extend(record.frames().iter().copied());
        }
    }

    let mut entries: Vec<BoneHits> = order
        .into_iter()
        .filter_map(|bone| {
            let (hits, frames) = totals.remove(&bone)?;
            Some(BoneHits {
                bone,
                hits,
                frames: frames.into_iter().collect(),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.bone.cmp(&b.bone)));

    Summary::from_entries(entries)
}

/// Unique frame counts summed per anatomical group.
///
/// Totals are not deduplicated across bones: a frame corrected on two legs
/// bones counts twice. Groups appear in the order they are first reached
/// while walking the grouped view.
pub fn group_rollup(table: &AggregationTable) -> Summary<GroupTotal> {
    let mut entries: Vec<GroupTotal> = Vec::new();

    for animation in grouped_view(table).entries() {
        for bone in &animation.bones {
            let group = BoneGroup::classify(&bone.bone);
            match entries.iter_mut().find(|total| total.group == group) {
                Some(total) => total.suppressed_frames += bone.unique_frame_count,
                None => entries.push(GroupTotal {
                    group,
                    suppressed_frames: bone.unique_frame_count,
                }),
            }
        }
    }

    Summary::from_entries(entries)
}

/// All three views of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    pub grouped: Summary<AnimationSummary>,
    pub flat: Summary<BoneHits>,
    pub groups: Summary<GroupTotal>,
}

impl LogSummary {
    pub fn from_table(table: &AggregationTable) -> Self {
        Self {
            grouped: grouped_view(table),
            flat: flat_view(table),
            groups: group_rollup(table),
        }
    }
}
