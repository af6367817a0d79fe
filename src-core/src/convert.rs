//! Post-capture conversion of the recorded file.
//!
//! Transcodes the captured video to the destination path at the configured
//! quality. Behind a trait so the recorder can be tested without ffmpeg.

use crate::error::RecorderError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Converts a captured file to a destination path.
pub trait VideoConverter: Send + Sync {
    fn convert(&self, source: &Path, destination: &Path, crf: u32) -> Result<(), RecorderError>;
}

/// The real converter: an ffmpeg transcode pass.
#[derive(Debug, Default)]
pub struct FfmpegConverter;

fn resolve_ffmpeg_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("ffmpeg")
    }
    #[cfg(not(target_os = "linux"))]
    {
        ffmpeg_sidecar::paths::ffmpeg_path()
    }
}

impl VideoConverter for FfmpegConverter {
    fn convert(&self, source: &Path, destination: &Path, crf: u32) -> Result<(), RecorderError> {
        debug!(
            "Converting {} -> {} (crf {})",
            source.display(),
            destination.display(),
            crf
        );

        let mut child = Command::new(resolve_ffmpeg_path())
            .args(["-hide_banner", "-i"])
            .arg(source)
            .args(["-c:v", "libx264", "-preset", "medium", "-crf"])
            .arg(crf.to_string())
            .args(["-pix_fmt", "yuv420p", "-movflags", "+faststart", "-y"])
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecorderError::Convert {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                message: format!("failed to start ffmpeg: {}", e),
            })?;

        let stderr_output = if let Some(mut stderr) = child.stderr.take() {
            use std::io::Read;
            let mut output = String::new();
            let _ = stderr.read_to_string(&mut output);
            output
        } else {
            String::new()
        };

        let status = child.wait().map_err(|e| RecorderError::Convert {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            message: format!("ffmpeg process error: {}", e),
        })?;

        if !status.success() {
            let message = if stderr_output.is_empty() {
                format!("ffmpeg exited with {:?}", status.code())
            } else {
                stderr_output
                    .lines()
                    .last()
                    .unwrap_or(&stderr_output)
                    .to_string()
            };
            return Err(RecorderError::Convert {
                source: source.to_path_buf(),
                destination: destination.to_path_buf(),
                message,
            });
        }

        debug!("Conversion finished: {}", destination.display());
        Ok(())
    }
}
