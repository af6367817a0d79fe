//! Error types for recording and engine operations.

use siterec_types::{BrowserKind, Platform};
use std::fmt;
use std::path::PathBuf;

/// Error type for desktop recording operations.
#[derive(Debug)]
pub enum RecorderError {
    /// No capture origin/offset entry exists for this platform/browser pair
    MissingOffset {
        platform: Platform,
        browser: BrowserKind,
    },
    /// The viewport string could not be parsed
    InvalidViewport(String),
    /// The capture process failed to start
    CaptureStart(String),
    /// The capture process failed to stop cleanly
    CaptureStop(String),
    /// Converting the captured file to the destination failed
    Convert {
        source: PathBuf,
        destination: PathBuf,
        message: String,
    },
    /// Moving the captured file to the destination failed
    Rename {
        source: PathBuf,
        destination: PathBuf,
        message: String,
    },
    /// start() was called while a recording is already in progress
    AlreadyRecording,
    /// stop() was called with no recording in progress
    NotRecording,
    /// FFmpeg is not available on this system
    FfmpegUnavailable(String),
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderError::MissingOffset { platform, browser } => write!(
                f,
                "No screen offset configured for {} on {}",
                browser, platform
            ),
            RecorderError::InvalidViewport(s) => write!(f, "Invalid viewport: {}", s),
            RecorderError::CaptureStart(msg) => write!(f, "Failed to start capture: {}", msg),
            RecorderError::CaptureStop(msg) => write!(f, "Failed to stop capture: {}", msg),
            RecorderError::Convert {
                source,
                destination,
                message,
            } => write!(
                f,
                "Converting the video failed. Converting from {} to {}: {}",
                source.display(),
                destination.display(),
                message
            ),
            RecorderError::Rename {
                source,
                destination,
                message,
            } => write!(
                f,
                "Moving the video failed. Moving from {} to {}: {}",
                source.display(),
                destination.display(),
                message
            ),
            RecorderError::AlreadyRecording => write!(f, "A recording is already in progress"),
            RecorderError::NotRecording => write!(f, "No recording in progress"),
            RecorderError::FfmpegUnavailable(msg) => write!(f, "FFmpeg unavailable: {}", msg),
        }
    }
}

impl std::error::Error for RecorderError {}

impl From<RecorderError> for String {
    fn from(err: RecorderError) -> Self {
        err.to_string()
    }
}

/// Error type for engine operations.
#[derive(Debug)]
pub enum EngineError {
    /// The browser session failed to launch
    BrowserStart(String),
    /// Navigation to the target URL failed
    Navigation { url: String, message: String },
    /// A script failed to evaluate
    Script { name: String, message: String },
    /// run() was called before start()
    NotStarted,
    /// The browser did not shut down within the stop timeout
    StopTimeout(u64),
    /// Closing the browser session failed
    BrowserStop(String),
    /// Recording during an iteration failed
    Recording(RecorderError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::BrowserStart(msg) => write!(f, "Failed to start browser: {}", msg),
            EngineError::Navigation { url, message } => {
                write!(f, "Failed to load {}: {}", url, message)
            }
            EngineError::Script { name, message } => {
                write!(f, "Script '{}' failed: {}", name, message)
            }
            EngineError::NotStarted => write!(f, "Engine has not been started"),
            EngineError::StopTimeout(secs) => {
                write!(f, "Waited {}s for the browser to quit", secs)
            }
            EngineError::BrowserStop(msg) => write!(f, "Failed to stop browser: {}", msg),
            EngineError::Recording(err) => write!(f, "Recording failed: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Recording(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecorderError> for EngineError {
    fn from(err: RecorderError) -> Self {
        EngineError::Recording(err)
    }
}

impl From<EngineError> for String {
    fn from(err: EngineError) -> Self {
        err.to_string()
    }
}
