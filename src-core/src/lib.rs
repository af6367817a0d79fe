//! Siterec Core Library
//!
//! Screen recording for browser performance test runs: a desktop recorder
//! that drives an external ffmpeg capture process, and an engine that runs
//! named scripts against a URL for a configured number of iterations.

pub mod capture;
pub mod config;
pub mod convert;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod offsets;
pub mod recorder;

pub use config::{EngineOptions, RecordingOptions};
pub use engine::{BrowserDriver, BrowserSession, Engine, Script};
pub use error::{EngineError, RecorderError};
pub use recorder::DesktopRecorder;
