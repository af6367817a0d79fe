//! FFmpeg-backed screen capture.
//!
//! Grabs the configured X display region with x11grab and encodes to H.264.
//! On Linux the system-installed ffmpeg is used; elsewhere the binary is
//! resolved next to the executable via ffmpeg-sidecar's path helpers.

use super::{CaptureController, CaptureParams, CaptureSession};
use crate::error::RecorderError;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Resolve the path to the FFmpeg binary.
fn resolve_ffmpeg_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        // Linux: use system FFmpeg from PATH
        PathBuf::from("ffmpeg")
    }
    #[cfg(not(target_os = "linux"))]
    {
        // Look for an ffmpeg binary next to current_exe()
        ffmpeg_sidecar::paths::ffmpeg_path()
    }
}

/// Verify that FFmpeg is available, attempting an auto-download on Linux as
/// a last resort. Call once at startup before recording.
pub fn ensure_ffmpeg() -> Result<PathBuf, RecorderError> {
    let ffmpeg = resolve_ffmpeg_path();
    debug!("Resolved ffmpeg path: {}", ffmpeg.display());

    match Command::new(&ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => Ok(ffmpeg),
        Ok(status) => Err(RecorderError::FfmpegUnavailable(format!(
            "{} exited with status {}",
            ffmpeg.display(),
            status
        ))),
        Err(e) => {
            warn!("ffmpeg not found at {}: {}", ffmpeg.display(), e);
            #[cfg(target_os = "linux")]
            {
                ffmpeg_sidecar::download::auto_download().map_err(|e| {
                    RecorderError::FfmpegUnavailable(format!(
                        "not found and auto-download failed: {}",
                        e
                    ))
                })?;
                Ok(ffmpeg_sidecar::paths::ffmpeg_path())
            }
            #[cfg(not(target_os = "linux"))]
            {
                Err(RecorderError::FfmpegUnavailable(format!(
                    "not found at {}",
                    ffmpeg.display()
                )))
            }
        }
    }
}

/// Build the argument list for an x11grab capture.
fn build_capture_args(params: &CaptureParams) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-f".into(),
        "x11grab".into(),
        "-video_size".into(),
        params.size.to_string(),
        "-framerate".into(),
        params.framerate.to_string(),
        "-i".into(),
        format!(":{}.0+{},{}", params.display, params.origin.x, params.origin.y),
    ];

    // Crop browser chrome out of the recording when the table says there is
    // any above/left of the content area.
    if !params.offset.is_zero() {
        args.push("-vf".into());
        args.push(format!(
            "crop=in_w-{x}:in_h-{y}:{x}:{y}",
            x = params.offset.x,
            y = params.offset.y
        ));
    }

    for arg in ["-c:v", "libx264", "-preset", "ultrafast", "-crf"] {
        args.push(arg.into());
    }
    args.push(params.crf.to_string());
    for arg in ["-pix_fmt", "yuv420p", "-y"] {
        args.push(arg.into());
    }
    args.push(params.file_path.to_string_lossy().to_string());
    args
}

/// The real capture controller: one ffmpeg process per recording.
#[derive(Debug, Default)]
pub struct FfmpegCapture;

impl CaptureController for FfmpegCapture {
    fn start(&self, params: &CaptureParams) -> Result<Box<dyn CaptureSession>, RecorderError> {
        let args = build_capture_args(params);
        debug!("Starting capture: ffmpeg {}", args.join(" "));

        let mut command = Command::new(resolve_ffmpeg_path());
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        if params.nice != 0 {
            let incr = params.nice;
            // Lower the capture process priority so encoding doesn't skew
            // the page load the recording is documenting.
            unsafe {
                use std::os::unix::process::CommandExt;
                command.pre_exec(move || {
                    libc::nice(incr);
                    Ok(())
                });
            }
        }

        let mut child = command
            .spawn()
            .map_err(|e| RecorderError::CaptureStart(e.to_string()))?;

        // Drain stderr into the log so ffmpeg can't block on a full pipe
        if let Some(stderr) = child.stderr.take() {
            std::thread::spawn(move || {
                use std::io::{BufRead, BufReader};
                let reader = BufReader::new(stderr);
                for line in reader.lines().map_while(Result::ok) {
                    debug!(target: "siterec::ffmpeg", "{}", line);
                }
            });
        }

        Ok(Box::new(FfmpegSession { child }))
    }
}

/// A running ffmpeg capture process.
struct FfmpegSession {
    child: Child,
}

impl CaptureSession for FfmpegSession {
    fn stop(mut self: Box<Self>) -> Result<(), RecorderError> {
        // 'q' on stdin makes ffmpeg finalize the output file and exit
        if let Some(mut stdin) = self.child.stdin.take() {
            if stdin.write_all(b"q").is_err() {
                warn!("Could not signal ffmpeg to quit, killing it");
                let _ = self.child.kill();
            }
        } else {
            let _ = self.child.kill();
        }

        let status = self
            .child
            .wait()
            .map_err(|e| RecorderError::CaptureStop(e.to_string()))?;

        debug!("Capture process exited with {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siterec_types::{PixelOffset, Viewport};

    fn params() -> CaptureParams {
        CaptureParams {
            display: 99,
            size: Viewport::new(1366, 708),
            file_path: PathBuf::from("/tmp/capture.mp4"),
            origin: PixelOffset::new(0, 66),
            offset: PixelOffset::new(0, 66),
            framerate: 30,
            crf: 23,
            nice: 0,
        }
    }

    #[test]
    fn test_capture_args_grab_input() {
        let args = build_capture_args(&params());
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], ":99.0+0,66");
    }

    #[test]
    fn test_capture_args_size_and_rate() {
        let args = build_capture_args(&params());
        let size_pos = args.iter().position(|a| a == "-video_size").unwrap();
        assert_eq!(args[size_pos + 1], "1366x708");
        let rate_pos = args.iter().position(|a| a == "-framerate").unwrap();
        assert_eq!(args[rate_pos + 1], "30");
    }

    #[test]
    fn test_capture_args_crop_filter() {
        let args = build_capture_args(&params());
        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf_pos + 1], "crop=in_w-0:in_h-66:0:66");
    }

    #[test]
    fn test_capture_args_no_crop_when_offset_zero() {
        let mut p = params();
        p.offset = PixelOffset::new(0, 0);
        let args = build_capture_args(&p);
        assert!(!args.iter().any(|a| a == "-vf"));
    }

    #[test]
    fn test_capture_args_quality_and_output() {
        let args = build_capture_args(&params());
        let crf_pos = args.iter().position(|a| a == "-crf").unwrap();
        assert_eq!(args[crf_pos + 1], "23");
        assert_eq!(args.last().unwrap(), "/tmp/capture.mp4");
    }
}
