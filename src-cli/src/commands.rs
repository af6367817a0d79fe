//! Command implementations for the siterec CLI.

use crate::colors;
use crate::exit_codes::ExitCode;
use crate::RecordArgs;
use serde_json::json;
use siterec_core::capture::ensure_ffmpeg;
use siterec_core::config;
use siterec_core::error::RecorderError;
use siterec_core::offsets::supported_browsers;
use siterec_core::DesktopRecorder;
use siterec_types::{BrowserKind, Platform, Viewport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Run a desktop capture for a fixed duration (or until Ctrl-C) and place
/// the result at the output path.
pub async fn record(args: RecordArgs, json: bool, quiet: bool) -> ExitCode {
    let mut options = config::load_options();

    // Layer CLI flags over the config file
    if let Some(browser) = &args.browser {
        match BrowserKind::parse(browser) {
            Some(b) => options.browser = b,
            None => {
                eprintln!("{}", colors::error(&format!("unknown browser: {}", browser)));
                return ExitCode::InvalidArguments;
            }
        }
    }
    if let Some(viewport) = &args.viewport {
        if Viewport::parse(viewport).is_none() {
            eprintln!("{}", colors::error(&format!("invalid viewport: {}", viewport)));
            return ExitCode::InvalidArguments;
        }
        options.viewport = Some(viewport.clone());
    }
    if let Some(display) = args.display {
        options.xvfb.display = display;
    }
    if let Some(framerate) = args.framerate {
        options.video.framerate = framerate;
    }
    if let Some(crf) = args.crf {
        options.video.crf = crf;
    }
    if let Some(nice) = args.nice {
        options.video.nice = nice;
    }
    if args.no_convert {
        options.video.convert = false;
    }
    if let Some(result_dir) = &args.result_dir {
        if let Err(e) = config::validate_directory(result_dir) {
            eprintln!("{}", colors::error(&format!("result dir: {}", e)));
            return ExitCode::InvalidArguments;
        }
        options.result_dir = Some(PathBuf::from(result_dir));
    }

    let destination = match output_path(args.output.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}", colors::error(&e));
            return ExitCode::GeneralError;
        }
    };

    if let Err(e) = ensure_ffmpeg() {
        eprintln!("{}", colors::error(&e.to_string()));
        return ExitCode::FfmpegUnavailable;
    }

    let mut recorder = match DesktopRecorder::new(&options) {
        Ok(recorder) => recorder,
        Err(e) => {
            eprintln!("{}", colors::error(&e.to_string()));
            return ExitCode::InvalidArguments;
        }
    };

    let capture_file =
        std::env::temp_dir().join(format!("siterec_capture_{}.mp4", std::process::id()));

    if let Err(e) = recorder.start(&capture_file).await {
        eprintln!("{}", colors::error(&e.to_string()));
        return ExitCode::RecordingFailedToStart;
    }

    if !quiet && !json {
        println!("{}", colors::recording("● recording"));
    }

    match args.duration {
        Some(secs) => {
            debug!("Recording for {}s", secs);
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        None => {
            if !quiet && !json {
                println!("{}", colors::dim("press Ctrl-C to stop"));
            }
            if tokio::signal::ctrl_c().await.is_err() {
                eprintln!("{}", colors::warning("failed to listen for Ctrl-C"));
            }
        }
    }

    match recorder.stop(&destination).await {
        Ok(()) => {
            if json {
                println!(
                    "{}",
                    json!({ "status": "ok", "output": destination.display().to_string() })
                );
            } else if !quiet {
                println!(
                    "{} {}",
                    colors::success("saved"),
                    colors::path(&destination.display().to_string())
                );
            }
            ExitCode::Success
        }
        Err(e @ RecorderError::Convert { .. }) => {
            eprintln!("{}", colors::error(&e.to_string()));
            eprintln!(
                "{}",
                colors::warning(&format!(
                    "captured file kept at {}",
                    capture_file.display()
                ))
            );
            ExitCode::ConvertFailed
        }
        Err(e) => {
            eprintln!("{}", colors::error(&e.to_string()));
            ExitCode::CaptureFailed
        }
    }
}

/// Verify ffmpeg availability and report capture support for this platform.
pub async fn check(json: bool, quiet: bool) -> ExitCode {
    let platform = Platform::current();
    let browsers: Vec<&str> = supported_browsers(platform)
        .iter()
        .map(|b| b.as_str())
        .collect();

    let ffmpeg = match ensure_ffmpeg() {
        Ok(path) => path,
        Err(e) => {
            if json {
                println!("{}", json!({ "ffmpeg": null, "error": e.to_string() }));
            } else {
                eprintln!("{}", colors::error(&e.to_string()));
            }
            return ExitCode::FfmpegUnavailable;
        }
    };

    // Report the PATH resolution too; the two can differ
    let ffmpeg_in_path = which::which("ffmpeg").ok();

    if json {
        println!(
            "{}",
            json!({
                "platform": platform.as_str(),
                "ffmpeg": ffmpeg.display().to_string(),
                "ffmpeg_in_path": ffmpeg_in_path.map(|p| p.display().to_string()),
                "browsers": browsers,
            })
        );
    } else if !quiet {
        println!("{} {}", colors::info("platform:"), platform);
        println!("{} {}", colors::info("ffmpeg:"), ffmpeg.display());
        println!("{} {}", colors::info("browsers:"), browsers.join(", "));
    }
    ExitCode::Success
}

/// Print version information.
pub fn version(json: bool) {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        println!("{}", json!({ "version": version }));
    } else {
        println!("siterec {}", version);
    }
}

/// Resolve the output path from the flag, expanding tildes, or generate a
/// timestamped default in the Videos directory.
fn output_path(flag: Option<&str>) -> Result<PathBuf, String> {
    match flag {
        Some(raw) => {
            let expanded = shellexpand::tilde(raw);
            Ok(PathBuf::from(expanded.as_ref()))
        }
        None => config::generate_output_path(),
    }
}
