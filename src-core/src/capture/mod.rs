//! External capture-process control.
//!
//! The recorder talks to the capture process through the
//! [`CaptureController`] trait so tests can substitute a fake process. The
//! real implementation shells out to ffmpeg.

pub mod ffmpeg;

use crate::error::RecorderError;
use siterec_types::{PixelOffset, Viewport};
use std::path::PathBuf;

pub use ffmpeg::{ensure_ffmpeg, FfmpegCapture};

/// Parameters for one capture process launch.
#[derive(Debug, Clone)]
pub struct CaptureParams {
    /// X display number to grab from.
    pub display: u32,
    /// Capture size.
    pub size: Viewport,
    /// File the capture process writes to.
    pub file_path: PathBuf,
    /// Top-left corner of the grab on the display.
    pub origin: PixelOffset,
    /// Chrome-crop offset applied to the grabbed frames.
    pub offset: PixelOffset,
    /// Frames per second.
    pub framerate: u32,
    /// Encoder constant rate factor.
    pub crf: u32,
    /// Process priority adjustment (unix only).
    pub nice: i32,
}

/// A running capture, consumed by `stop`.
pub trait CaptureSession: Send {
    /// Terminate the capture and wait for the process to exit.
    fn stop(self: Box<Self>) -> Result<(), RecorderError>;
}

/// Launches capture processes.
///
/// `start` does not verify that the process actually produced output; a
/// capture that dies immediately is only observed at `stop`.
pub trait CaptureController: Send + Sync {
    fn start(&self, params: &CaptureParams) -> Result<Box<dyn CaptureSession>, RecorderError>;
}
