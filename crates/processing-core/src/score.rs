//! Trial scoring: how much suppression and drift a log contains.

use std::path::Path;
use std::sync::OnceLock;

use jitterscope_common::error::JitterResult;
use jitterscope_log_model::{read_log_lossy, SuppressionTag, DRIFT_TAG};
use regex::Regex;
use serde::Serialize;

/// Weight of one drift warning relative to one suppression hit.
pub const DRIFT_PENALTY: u64 = 3;

static SUPPRESSION_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn suppression_tag_regex() -> &'static Regex {
    SUPPRESSION_TAG_REGEX.get_or_init(|| {
        let alternatives = SuppressionTag::ALL
            .iter()
            .map(|tag| regex::escape(tag.marker()))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternatives).expect("invalid regex pattern")
    })
}

/// Raw counts behind a trial score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreComponents {
    /// Occurrences of any suppression tag.
    pub hit_count: u64,
    /// Occurrences of the drift tag.
    pub drift_count: u64,
}

impl ScoreComponents {
    pub fn new(hit_count: u64, drift_count: u64) -> Self {
        Self {
            hit_count,
            drift_count,
        }
    }

    /// Count every tag occurrence in the text, not just one per line.
    pub fn from_log_text(text: &str) -> Self {
        Self {
            hit_count: suppression_tag_regex().find_iter(text).count() as u64,
            drift_count: text.matches(DRIFT_TAG).count() as u64,
        }
    }

    pub fn from_log_file(path: &Path) -> JitterResult<Self> {
        Ok(Self::from_log_text(&read_log_lossy(path)?))
    }

    /// `hit_count + 3 * drift_count`. Lower is better.
    pub fn score(&self) -> u64 {
        self.hit_count
            .saturating_add(self.drift_count.saturating_mul(DRIFT_PENALTY))
    }
}
