//! Finite parameter grid.

use jitterscope_common::config::{ThresholdParams, TuningSettings};
use jitterscope_common::error::{JitterError, JitterResult};

/// Cartesian product of candidate thresholds, rotation tolerances and
/// smoothing windows.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    thresholds: Vec<f64>,
    rotation_degrees: Vec<f64>,
    windows: Vec<u32>,
}

impl ParameterGrid {
    /// Every axis needs at least one candidate.
    pub fn new(
        thresholds: Vec<f64>,
        rotation_degrees: Vec<f64>,
        windows: Vec<u32>,
    ) -> JitterResult<Self> {
        if thresholds.is_empty() || rotation_degrees.is_empty() || windows.is_empty() {
            return Err(JitterError::config(
                "parameter grid needs at least one threshold, rotation and window",
            ));
        }
        if let Some(bad) = thresholds
            .iter()
            .chain(&rotation_degrees)
            .find(|v| !v.is_finite())
        {
            return Err(JitterError::config(format!(
                "parameter grid contains non-finite value {bad}"
            )));
        }
        Ok(Self {
            thresholds,
            rotation_degrees,
            windows,
        })
    }

    pub fn from_settings(settings: &TuningSettings) -> JitterResult<Self> {
        Self::new(
            settings.thresholds.clone(),
            settings.rotation_degrees.clone(),
            settings.windows.clone(),
        )
    }

    pub fn len(&self) -> usize {
        self.thresholds.len() * self.rotation_degrees.len() * self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Threshold varies slowest, window fastest.
    pub fn iter(&self) -> impl Iterator<Item = ThresholdParams> + '_ {
        self.thresholds.iter().flat_map(move |&t| {
            self.rotation_degrees.iter().flat_map(move |&r_deg| {
                self.windows
                    .iter()
                    .map(move |&window| ThresholdParams { t, r_deg, window })
            })
        })
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        let settings = TuningSettings::default();
        Self {
            thresholds: settings.thresholds,
            rotation_degrees: settings.rotation_degrees,
            windows: settings.windows,
        }
    }
}
