//! Jitterscope Tuning Harness
//!
//! Searches a small hand-picked grid of suppression thresholds for the
//! setting that minimizes jitter without causing drift. Each trial writes a
//! config file, runs the engine to completion, and scores the log it leaves
//! behind. Trials never overlap: the engine's config and log files are
//! shared state.

pub mod engine;
pub mod grid;
pub mod handoff;
pub mod search;

pub use engine::{Engine, ProcessEngine, ProcessEngineConfig, ANIMATION_ENV_VAR};
pub use grid::ParameterGrid;
pub use handoff::JitterConfig;
pub use jitterscope_common::config::{FailurePolicy, ThresholdParams};
pub use search::{AnimationResult, BestTrial, TrialOutcome, Tuner, TuningReport};
