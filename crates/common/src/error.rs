//! Error types shared across Jitterscope crates.

use std::path::PathBuf;

/// Top-level error type for Jitterscope operations.
#[derive(Debug, thiserror::Error)]
pub enum JitterError {
    #[error("Log file not found: {path}")]
    LogNotFound { path: PathBuf },

    #[error("Failed to read log {path}: {source}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A suppression tag matched but its frame number did not parse.
    #[error("Line {line_number}: invalid frame number '{value}': {source}")]
    FrameParse {
        line_number: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to write engine config {path}: {source}")]
    WriteConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine executable not found: {name}")]
    EngineNotFound { name: String },

    #[error("Failed to spawn engine {path}: {source}")]
    EngineSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine exited with status {exit_code}: {stderr}")]
    EngineFailed { exit_code: i32, stderr: String },

    #[error("Engine timed out after {timeout_secs} seconds")]
    EngineTimeout { timeout_secs: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using JitterError.
pub type JitterResult<T> = Result<T, JitterError>;

impl JitterError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn engine_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::EngineFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Whether this error came from a single engine trial rather than
    /// from the harness itself.
    pub fn is_trial_failure(&self) -> bool {
        matches!(
            self,
            Self::EngineFailed { .. }
                | Self::EngineTimeout { .. }
                | Self::EngineSpawn { .. }
                | Self::LogNotFound { .. }
                | Self::ReadLog { .. }
        )
    }
}
