//! Sequential grid search over engine trials.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use jitterscope_common::config::{FailurePolicy, ThresholdParams, TuningSettings};
use jitterscope_common::error::{JitterError, JitterResult};
use jitterscope_processing_core::ScoreComponents;
use serde::Serialize;

use crate::engine::Engine;
use crate::grid::ParameterGrid;
use crate::handoff::JitterConfig;

/// The lowest-scoring trial seen so far for one animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestTrial {
    /// Zero-based position of the trial in grid order.
    pub trial_index: usize,
    pub config: JitterConfig,
    pub components: ScoreComponents,
    pub score: u64,
}

/// What happened to a single trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    Scored {
        components: ScoreComponents,
        improved: bool,
    },
    /// Only produced under [`FailurePolicy::Continue`].
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationResult {
    pub animation: String,
    /// `None` when every trial failed.
    pub best: Option<BestTrial>,
    pub trials_run: usize,
    pub trials_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<AnimationResult>,
}

/// Replace `best` when `score` is strictly lower. An empty slot counts as
/// an infinitely bad score, so the first candidate always wins.
fn offer(best: &mut Option<BestTrial>, candidate: BestTrial) -> bool {
    let improves = best
        .as_ref()
        .map_or(true, |current| candidate.score < current.score);
    if improves {
        *best = Some(candidate);
    }
    improves
}

/// Drives the engine through every grid point for every animation.
#[derive(Debug, Clone)]
pub struct Tuner {
    grid: ParameterGrid,
    animations: Vec<String>,
    overrides: BTreeMap<String, ThresholdParams>,
    failure_policy: FailurePolicy,
}

impl Tuner {
    pub fn new(grid: ParameterGrid, animations: Vec<String>) -> Self {
        Self {
            grid,
            animations,
            overrides: BTreeMap::new(),
            failure_policy: FailurePolicy::Abort,
        }
    }

    pub fn from_settings(settings: &TuningSettings) -> JitterResult<Self> {
        Ok(Self::new(
            ParameterGrid::from_settings(settings)?,
            settings.animations.clone(),
        )
        .with_overrides(settings.overrides.clone())
        .with_failure_policy(settings.failure_policy))
    }

    pub fn with_overrides(mut self, overrides: BTreeMap<String, ThresholdParams>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn grid(&self) -> &ParameterGrid {
        &self.grid
    }

    pub fn animations(&self) -> &[String] {
        &self.animations
    }

    /// Config for one grid point, with the pinned overrides attached.
    pub fn build_config(&self, params: ThresholdParams) -> JitterConfig {
        JitterConfig::new(params).with_overrides(self.overrides.clone())
    }

    pub fn run<E: Engine>(&self, engine: &mut E) -> JitterResult<TuningReport> {
        self.run_with(engine, |_, _| {})
    }

    /// Run the full search. `on_improvement` is called with the animation
    /// name each time that animation gets a new best trial.
    pub fn run_with<E, F>(&self, engine: &mut E, mut on_improvement: F) -> JitterResult<TuningReport>
    where
        E: Engine,
        F: FnMut(&str, &BestTrial),
    {
        if self.animations.is_empty() {
            return Err(JitterError::config("no animations configured for tuning"));
        }

        let started_at = Utc::now();
        let mut results = Vec::with_capacity(self.animations.len());

        for animation in &self.animations {
            tracing::info!(animation = %animation, trials = self.grid.len(), "tuning animation");
            let mut result = AnimationResult {
                animation: animation.clone(),
                best: None,
                trials_run: 0,
                trials_failed: 0,
            };

            for (trial_index, params) in self.grid.iter().enumerate() {
                let outcome = self.run_trial(engine, animation, trial_index, params, &mut result)?;
                if let TrialOutcome::Scored { improved: true, .. } = outcome {
                    if let Some(best) = &result.best {
                        tracing::info!(
                            animation = %animation,
                            score = best.score,
                            t = params.t,
                            r_deg = params.r_deg,
                            window = params.window,
                            "new best"
                        );
                        on_improvement(animation.as_str(), best);
                    }
                }
            }

            results.push(result);
        }

        Ok(TuningReport {
            started_at,
            finished_at: Utc::now(),
            results,
        })
    }

    fn run_trial<E: Engine>(
        &self,
        engine: &mut E,
        animation: &str,
        trial_index: usize,
        params: ThresholdParams,
        result: &mut AnimationResult,
    ) -> JitterResult<TrialOutcome> {
        let config = self.build_config(params);
        result.trials_run += 1;

        let log = match engine.run_trial(animation, &config) {
            Ok(log) => log,
            Err(err)
                if self.failure_policy == FailurePolicy::Continue && err.is_trial_failure() =>
            {
                tracing::warn!(animation, trial = trial_index, "trial failed: {err}");
                result.trials_failed += 1;
                return Ok(TrialOutcome::Failed {
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };

        let components = ScoreComponents::from_log_text(&log);
        tracing::debug!(
            animation,
            trial = trial_index,
            hits = components.hit_count,
            drift = components.drift_count,
            score = components.score(),
            "trial scored"
        );

        let improved = offer(
            &mut result.best,
            BestTrial {
                trial_index,
                config,
                components,
                score: components.score(),
            },
        );
        Ok(TrialOutcome::Scored {
            components,
            improved,
        })
    }
}
