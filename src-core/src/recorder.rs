//! Desktop screen recorder for browser test runs.
//!
//! Thin adapter over the external capture process: derives the capture
//! region from the platform/browser geometry table, launches the capture on
//! `start`, and on `stop` moves (or transcodes) the captured file to its
//! destination.

use crate::capture::{CaptureController, CaptureParams, CaptureSession, FfmpegCapture};
use crate::config::RecordingOptions;
use crate::convert::{FfmpegConverter, VideoConverter};
use crate::defaults;
use crate::error::RecorderError;
use crate::offsets::{screen_offset, ScreenOffset};
use siterec_types::{Platform, Viewport};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

struct ActiveRecording {
    file_path: PathBuf,
    session: Box<dyn CaptureSession>,
}

/// Records the desktop while a browser test run is in progress.
///
/// Single-use lifecycle per recording: `start` launches the capture,
/// `stop` consumes it. The two must not interleave.
pub struct DesktopRecorder {
    display: u32,
    framerate: u32,
    nice: i32,
    crf: u32,
    convert: bool,
    viewport: Viewport,
    geometry: ScreenOffset,
    result_dir: Option<PathBuf>,
    controller: Box<dyn CaptureController>,
    converter: Box<dyn VideoConverter>,
    recording: Option<ActiveRecording>,
}

impl DesktopRecorder {
    /// Build a recorder for the current platform from the given options.
    ///
    /// Fails if the viewport string is malformed or the (platform, browser)
    /// pair has no geometry entry.
    pub fn new(options: &RecordingOptions) -> Result<Self, RecorderError> {
        Self::with_backends(
            options,
            Platform::current(),
            Box::new(FfmpegCapture),
            Box::new(FfmpegConverter),
        )
    }

    /// Build a recorder with explicit platform and backends. Used by tests
    /// and by callers that manage their own capture process.
    pub fn with_backends(
        options: &RecordingOptions,
        platform: Platform,
        controller: Box<dyn CaptureController>,
        converter: Box<dyn VideoConverter>,
    ) -> Result<Self, RecorderError> {
        let viewport = match &options.viewport {
            Some(s) => Viewport::parse(s).ok_or_else(|| RecorderError::InvalidViewport(s.clone()))?,
            None => defaults::viewport(),
        };
        let geometry = screen_offset(platform, options.browser)?;

        Ok(Self {
            display: options.xvfb.display,
            framerate: options.video.framerate,
            nice: options.video.nice,
            crf: options.video.crf,
            convert: options.video.convert,
            viewport,
            geometry,
            result_dir: options.result_dir.clone(),
            controller,
            converter,
            recording: None,
        })
    }

    /// Whether a capture is currently in progress.
    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Begin capturing into `file`.
    ///
    /// The capture process is not monitored after launch; a process that
    /// dies early surfaces at `stop`.
    pub async fn start(&mut self, file: &Path) -> Result<(), RecorderError> {
        if self.recording.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }

        let params = CaptureParams {
            display: self.display,
            size: self.viewport,
            file_path: file.to_path_buf(),
            origin: self.geometry.origin,
            offset: self.geometry.offset,
            framerate: self.framerate,
            crf: self.crf,
            nice: self.nice,
        };

        let session = self.controller.start(&params)?;
        self.recording = Some(ActiveRecording {
            file_path: file.to_path_buf(),
            session,
        });
        Ok(())
    }

    /// Discard an in-progress recording: stop the capture process and delete
    /// the partially written file, leaving the recorder ready for a new
    /// `start`.
    pub async fn abort(&mut self) -> Result<(), RecorderError> {
        let recording = self.recording.take().ok_or(RecorderError::NotRecording)?;

        debug!("Discarding screen recording");
        recording.session.stop()?;
        let _ = tokio::fs::remove_file(&recording.file_path).await;
        Ok(())
    }

    /// Stop the capture and place the result at `destination`.
    ///
    /// When a result directory is configured, any pre-existing file at the
    /// destination is deleted first; that deletion is best-effort because
    /// the file legitimately may not exist. Conversion or rename failures
    /// are logged and returned, and a failed conversion leaves the captured
    /// source file in place.
    pub async fn stop(&mut self, destination: &Path) -> Result<(), RecorderError> {
        let recording = self.recording.take().ok_or(RecorderError::NotRecording)?;

        debug!("Stop screen recording");
        recording.session.stop()?;

        if self.result_dir.is_some() {
            let _ = tokio::fs::remove_file(destination).await;
        }

        let result = if self.convert {
            match self
                .converter
                .convert(&recording.file_path, destination, self.crf)
            {
                Ok(()) => tokio::fs::remove_file(&recording.file_path)
                    .await
                    .map_err(|e| RecorderError::Convert {
                        source: recording.file_path.clone(),
                        destination: destination.to_path_buf(),
                        message: format!("failed to remove source after convert: {}", e),
                    }),
                Err(e) => Err(e),
            }
        } else {
            tokio::fs::rename(&recording.file_path, destination)
                .await
                .map_err(|e| RecorderError::Rename {
                    source: recording.file_path.clone(),
                    destination: destination.to_path_buf(),
                    message: e.to_string(),
                })
        };

        if let Err(e) = &result {
            error!(
                "Finalizing the video failed. From {} to {}: {}",
                recording.file_path.display(),
                destination.display(),
                e
            );
            return result;
        }

        debug!("Writing to {}", destination.display());
        Ok(())
    }
}
