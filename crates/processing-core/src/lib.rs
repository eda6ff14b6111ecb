//! Jitterscope Processing Core
//!
//! Reduces extracted jitter events to something a person can act on:
//! - **Aggregation:** animation -> bone -> unique frames, with raw hit counts
//! - **Views:** per-animation, flat per-bone, and anatomical group rollup
//! - **Scoring:** suppression hits plus weighted drift warnings for tuning
//!
//! Apart from the file convenience constructors, this crate is pure
//! computation over data handed to it.

pub mod bone_group;
pub mod heatmap;
pub mod report;
pub mod score;
pub mod views;

pub use bone_group::BoneGroup;
pub use heatmap::{AggregationTable, AnimationEntry, BoneRecord};
pub use score::{ScoreComponents, DRIFT_PENALTY};
pub use views::{
    flat_view, group_rollup, grouped_view, AnimationSummary, BoneFrames, BoneHits, GroupTotal,
    LogSummary, Summary,
};
