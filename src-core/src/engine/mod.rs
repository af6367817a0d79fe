//! Script-running engine for browser test runs.
//!
//! Drives a browser session through start / run / stop: each `run` loads a
//! URL for the configured number of iterations and evaluates every declared
//! script, collecting the returned values in declaration order. The browser
//! automation itself lives behind the [`BrowserDriver`] trait.

use crate::config::EngineOptions;
use crate::error::EngineError;
use crate::recorder::DesktopRecorder;
use serde::{Deserialize, Serialize};
use siterec_types::{BrowserKind, IterationResult, RunResult, ScriptResult};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A named script evaluated in the browser each iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Result key for this script's value.
    pub name: String,
    /// Script body; its return value becomes the result entry.
    pub source: String,
}

impl Script {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Build a script named after a file's stem, e.g. `foo.js` -> `foo`.
    pub fn from_path(path: &Path, source: impl Into<String>) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            source: source.into(),
        }
    }
}

/// A live browser the engine can drive.
pub trait BrowserSession: Send {
    /// Load a URL and wait for it to settle.
    fn navigate(&mut self, url: &str) -> Result<(), EngineError>;
    /// Evaluate a script in the page, returning its value.
    fn evaluate(&mut self, script: &Script) -> Result<serde_json::Value, EngineError>;
    /// Shut the browser down.
    fn close(self: Box<Self>) -> Result<(), EngineError>;
}

/// Launches browser sessions.
pub trait BrowserDriver: Send + Sync {
    fn launch(&self, browser: BrowserKind) -> Result<Box<dyn BrowserSession>, EngineError>;
}

/// The engine: owns one browser session across any number of `run` calls.
pub struct Engine {
    options: EngineOptions,
    driver: Box<dyn BrowserDriver>,
    session: Option<Box<dyn BrowserSession>>,
    recorder: Option<DesktopRecorder>,
    runs_completed: u32,
}

impl Engine {
    /// Build an engine from options and a browser driver.
    pub fn new(options: EngineOptions, driver: Box<dyn BrowserDriver>) -> Self {
        Self {
            options,
            driver,
            session: None,
            recorder: None,
            runs_completed: 0,
        }
    }

    /// Attach a desktop recorder; each iteration is then captured to video.
    pub fn with_recorder(mut self, recorder: DesktopRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Launch the browser session. A second call on a running engine is a
    /// no-op.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        if self.session.is_some() {
            return Ok(());
        }
        info!("Starting {} session", self.options.browser);
        self.session = Some(self.driver.launch(self.options.browser)?);
        Ok(())
    }

    /// Run a URL: N iterations, each evaluating every script in declaration
    /// order. The engine stays started afterwards, so further URLs can be
    /// run on the same session.
    pub async fn run(&mut self, url: &str) -> Result<RunResult, EngineError> {
        if self.session.is_none() {
            return Err(EngineError::NotStarted);
        }

        let iterations = self.options.iterations.max(1);
        let delay = Duration::from_millis(self.options.delay_ms);
        let mut results = Vec::with_capacity(iterations as usize);

        info!("Running {} for {} iterations", url, iterations);

        for iteration in 0..iterations {
            if iteration > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let video_paths = self.begin_iteration_video(iteration).await?;

            let scripts = match self.run_scripts(url) {
                Ok(scripts) => scripts,
                Err(e) => {
                    self.abort_iteration_video(video_paths.is_some()).await;
                    return Err(e);
                }
            };

            self.finish_iteration_video(video_paths).await?;

            debug!("Iteration {} collected {} values", iteration, scripts.len());
            results.push(IterationResult { scripts });
        }

        self.runs_completed += 1;
        Ok(RunResult {
            url: url.to_string(),
            iterations: results,
        })
    }

    /// Shut the browser down, bounded by the configured stop timeout.
    pub async fn stop(&mut self) -> Result<(), EngineError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        let timeout = self.options.stop_timeout();
        let secs = timeout.as_secs();
        let close = tokio::task::spawn_blocking(move || session.close());

        match tokio::time::timeout(timeout, close).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(EngineError::BrowserStop(e.to_string())),
            Err(_) => Err(EngineError::StopTimeout(secs)),
        }
    }

    /// Navigate and evaluate every declared script for one iteration.
    fn run_scripts(&mut self, url: &str) -> Result<Vec<ScriptResult>, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NotStarted)?;
        session.navigate(url)?;

        let mut scripts = Vec::with_capacity(self.options.scripts.len());
        for script in &self.options.scripts {
            let value = session.evaluate(script)?;
            scripts.push(ScriptResult {
                name: script.name.clone(),
                value,
            });
        }
        Ok(scripts)
    }

    /// Start per-iteration video capture, if a recorder is attached.
    /// Returns the (source, destination) pair for `finish_iteration_video`.
    async fn begin_iteration_video(
        &mut self,
        iteration: u32,
    ) -> Result<Option<(std::path::PathBuf, std::path::PathBuf)>, EngineError> {
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(None);
        };

        let Some(recording) = self.options.recording.as_ref() else {
            return Ok(None);
        };
        let dir = recording
            .result_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let source = std::env::temp_dir().join(format!(
            "siterec_capture_{}_{}.mp4",
            std::process::id(),
            iteration
        ));
        let destination = dir.join(format!("{}-{}.mp4", self.runs_completed, iteration));

        recorder.start(&source).await?;
        Ok(Some((source, destination)))
    }

    /// Stop per-iteration video capture started by `begin_iteration_video`.
    async fn finish_iteration_video(
        &mut self,
        paths: Option<(std::path::PathBuf, std::path::PathBuf)>,
    ) -> Result<(), EngineError> {
        let Some((_, destination)) = paths else {
            return Ok(());
        };
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.stop(&destination).await?;
        }
        Ok(())
    }

    /// Discard a capture started by `begin_iteration_video` after a failed
    /// iteration, so a later `run` starts from a clean recorder.
    async fn abort_iteration_video(&mut self, started: bool) {
        if !started {
            return;
        }
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.abort().await {
                warn!("Could not discard the iteration capture: {}", e);
            }
        }
    }
}
