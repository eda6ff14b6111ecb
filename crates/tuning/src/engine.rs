//! The external engine, seen as a black box.
//!
//! One trial is: write the config file, run the engine with no arguments
//! until it exits, read the log file it produced.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use jitterscope_common::config::PathsConfig;
use jitterscope_common::error::{JitterError, JitterResult};
use jitterscope_log_model::read_log_lossy;

use crate::handoff::JitterConfig;

/// Environment variable telling the engine which animation is being tuned.
pub const ANIMATION_ENV_VAR: &str = "JITTERSCOPE_ANIMATION";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that can run one trial and hand back the resulting log text.
pub trait Engine {
    fn run_trial(&mut self, animation: &str, config: &JitterConfig) -> JitterResult<String>;
}

/// Settings for [`ProcessEngine`].
#[derive(Debug, Clone)]
pub struct ProcessEngineConfig {
    /// Executable: a path, or a bare name looked up on PATH.
    pub engine: PathBuf,
    /// Where the config is written. Relative paths resolve against
    /// `working_dir` when one is set.
    pub config_path: PathBuf,
    /// Where the engine writes its log. Resolved like `config_path`.
    pub log_path: PathBuf,
    pub working_dir: Option<PathBuf>,
    /// Kill the engine after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Capture stderr for error reports instead of passing it through.
    pub capture_stderr: bool,
}

impl ProcessEngineConfig {
    pub fn from_paths(paths: &PathsConfig) -> Self {
        Self {
            engine: paths.engine.clone(),
            config_path: paths.config_file.clone(),
            log_path: paths.log_file.clone(),
            working_dir: paths.working_dir.clone(),
            timeout: None,
            capture_stderr: false,
        }
    }

    pub fn timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout = secs.map(Duration::from_secs);
        self
    }

    pub fn capture_stderr(mut self, capture: bool) -> Self {
        self.capture_stderr = capture;
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn resolved_config_path(&self) -> PathBuf {
        self.resolve(&self.config_path)
    }

    pub fn resolved_log_path(&self) -> PathBuf {
        self.resolve(&self.log_path)
    }
}

/// Runs the engine as a blocking subprocess.
pub struct ProcessEngine {
    config: ProcessEngineConfig,
}

impl ProcessEngine {
    pub fn new(config: ProcessEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessEngineConfig {
        &self.config
    }

    /// Literal path first (also relative to the working directory), then PATH.
    fn find_engine(&self) -> JitterResult<PathBuf> {
        // Absolute, so a relative path cannot be reinterpreted against the
        // child's working directory.
        let engine = &self.config.engine;
        for candidate in [engine.clone(), self.config.resolve(engine)] {
            if candidate.exists() {
                return Ok(std::fs::canonicalize(&candidate).unwrap_or(candidate));
            }
        }
        which::which(engine).map_err(|_| JitterError::EngineNotFound {
            name: engine.display().to_string(),
        })
    }
}

impl Engine for ProcessEngine {
    fn run_trial(&mut self, animation: &str, config: &JitterConfig) -> JitterResult<String> {
        let engine_path = self.find_engine()?;
        let config_path = self.config.resolved_config_path();
        let log_path = self.config.resolved_log_path();

        config.write_to(&config_path)?;

        // A log left over from the previous trial must never be scored twice.
        match std::fs::remove_file(&log_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(JitterError::Io(e)),
        }

        let mut cmd = Command::new(&engine_path);
        cmd.env(ANIMATION_ENV_VAR, animation).stdin(Stdio::null());
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        // Stderr goes to a file rather than a pipe so a chatty engine cannot
        // block on a full pipe while we wait for it.
        let mut stderr_file = if self.config.capture_stderr {
            let file = tempfile::tempfile()?;
            cmd.stdout(Stdio::null()).stderr(file.try_clone()?);
            Some(file)
        } else {
            None
        };

        tracing::debug!(engine = %engine_path.display(), animation, "spawning engine");
        let child = cmd.spawn().map_err(|source| JitterError::EngineSpawn {
            path: engine_path.clone(),
            source,
        })?;

        let status = wait_with_timeout(child, self.config.timeout)?;

        if !status.success() {
            let stderr = match stderr_file.as_mut() {
                Some(file) => read_captured(file),
                None => String::new(),
            };
            return Err(JitterError::engine_failed(
                status.code().unwrap_or(-1),
                stderr.trim_end(),
            ));
        }

        read_log_lossy(&log_path)
    }
}

fn wait_with_timeout(mut child: Child, timeout: Option<Duration>) -> JitterResult<ExitStatus> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(JitterError::EngineTimeout {
                timeout_secs: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn read_captured(file: &mut std::fs::File) -> String {
    let mut bytes = Vec::new();
    if file.seek(SeekFrom::Start(0)).is_ok() {
        let _ = file.read_to_end(&mut bytes);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
