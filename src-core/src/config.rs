//! Configuration for recordings and engine runs.
//!
//! Options load from a JSON config file in the platform config directory:
//! - Linux: `~/.config/siterec/config.json`
//! - macOS: `~/Library/Application Support/siterec/config.json`
//! - Windows: `%APPDATA%\siterec\config.json`
//!
//! Anything absent from the file falls back to the shared defaults.

use crate::defaults;
use crate::engine::Script;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use siterec_types::BrowserKind;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Xvfb-related parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XvfbParams {
    /// X display number the capture reads from.
    #[serde(default = "default_display")]
    pub display: u32,
}

fn default_display() -> u32 {
    defaults::XVFB_DISPLAY
}

impl Default for XvfbParams {
    fn default() -> Self {
        Self {
            display: defaults::XVFB_DISPLAY,
        }
    }
}

/// Video encoding parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoParams {
    /// Capture framerate.
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    /// Process priority adjustment for the capture process.
    #[serde(default)]
    pub nice: i32,
    /// Constant rate factor (encoder quality).
    #[serde(default = "default_crf")]
    pub crf: u32,
    /// Transcode the captured file to the destination instead of renaming it.
    #[serde(default = "default_convert")]
    pub convert: bool,
}

fn default_framerate() -> u32 {
    defaults::FRAMERATE
}

fn default_crf() -> u32 {
    defaults::CRF
}

fn default_convert() -> bool {
    defaults::CONVERT
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            framerate: defaults::FRAMERATE,
            nice: defaults::NICE,
            crf: defaults::CRF,
            convert: defaults::CONVERT,
        }
    }
}

/// Options consumed by the desktop recorder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordingOptions {
    /// Xvfb settings group.
    #[serde(default)]
    pub xvfb: XvfbParams,
    /// Video settings group.
    #[serde(default)]
    pub video: VideoParams,
    /// Browser the test run drives, used for the chrome-crop offset lookup.
    #[serde(default)]
    pub browser: BrowserKind,
    /// Capture viewport as `WxH`. Defaults to 1366x708 when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<String>,
    /// Result directory. When set, a pre-existing file at the stop
    /// destination is removed before the captured file is moved in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_dir: Option<PathBuf>,
}

/// Options consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Browser to launch.
    #[serde(default)]
    pub browser: BrowserKind,
    /// Scripts to evaluate each iteration, in declaration order.
    #[serde(default)]
    pub scripts: Vec<Script>,
    /// Iterations per URL.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Delay between iterations, in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,
    /// Upper bound on browser shutdown, in seconds.
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout_secs: u64,
    /// When set, each iteration is recorded into this recorder configuration's
    /// result directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording: Option<RecordingOptions>,
}

fn default_iterations() -> u32 {
    defaults::ITERATIONS
}

fn default_stop_timeout() -> u64 {
    defaults::STOP_TIMEOUT_SECS
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            browser: BrowserKind::default(),
            scripts: Vec::new(),
            iterations: defaults::ITERATIONS,
            delay_ms: defaults::ITERATION_DELAY_MS,
            stop_timeout_secs: defaults::STOP_TIMEOUT_SECS,
            recording: None,
        }
    }
}

impl EngineOptions {
    /// Stop timeout as a Duration.
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

/// Get the path to the config file.
fn config_path() -> Result<PathBuf, String> {
    let proj_dirs =
        ProjectDirs::from("", "", "siterec").ok_or("Could not determine config directory")?;
    Ok(proj_dirs.config_dir().join("config.json"))
}

/// Load recording options from disk.
/// Returns defaults if the file doesn't exist or is invalid.
pub fn load_options() -> RecordingOptions {
    match config_path() {
        Ok(path) => load_options_from(&path),
        Err(e) => {
            warn!("Failed to resolve config path: {}", e);
            RecordingOptions::default()
        }
    }
}

fn load_options_from(path: &Path) -> RecordingOptions {
    if !path.exists() {
        debug!("No config file found, using defaults");
        return RecordingOptions::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<RecordingOptions>(&contents) {
            Ok(options) => {
                debug!("Loaded config from {:?}", path);
                options
            }
            Err(e) => {
                warn!("Failed to parse config file: {}. Using defaults.", e);
                RecordingOptions::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}. Using defaults.", e);
            RecordingOptions::default()
        }
    }
}

/// Save recording options to disk, creating the config directory if needed.
pub fn save_options(options: &RecordingOptions) -> Result<(), String> {
    save_options_to(options, &config_path()?)
}

fn save_options_to(options: &RecordingOptions, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let json = serde_json::to_string_pretty(options)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;

    debug!("Saved config to {:?}", path);
    Ok(())
}

/// Get the default output directory (system Videos folder or home fallback).
pub fn default_output_dir() -> Result<PathBuf, String> {
    let user_dirs =
        directories::UserDirs::new().ok_or("Could not determine user directories")?;

    let output_dir = user_dirs
        .video_dir()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| {
            let home = user_dirs.home_dir().to_path_buf();
            let videos = home.join("Videos");
            if !videos.exists() && fs::create_dir_all(&videos).is_ok() {
                return videos;
            }
            if videos.exists() {
                videos
            } else {
                home
            }
        });

    Ok(output_dir)
}

/// Generate a timestamped output filename in the default output directory.
pub fn generate_output_path() -> Result<PathBuf, String> {
    let output_dir = default_output_dir()?;

    if !output_dir.exists() {
        fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create output directory: {}", e))?;
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S");
    Ok(output_dir.join(format!("browser-run_{}.mp4", timestamp)))
}

/// Validate that a directory exists and is writable.
pub fn validate_directory(path: &str) -> Result<(), String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err("Directory does not exist".to_string());
    }

    if !path.is_dir() {
        return Err("Path is not a directory".to_string());
    }

    // Writability probe
    let test_file = path.join(".siterec_write_test");
    match fs::write(&test_file, "test") {
        Ok(()) => {
            let _ = fs::remove_file(test_file);
            Ok(())
        }
        Err(_) => Err("Directory is not writable".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recording_options() {
        let options = RecordingOptions::default();
        assert_eq!(options.xvfb.display, 99);
        assert_eq!(options.video.framerate, 30);
        assert_eq!(options.video.nice, 0);
        assert_eq!(options.video.crf, 23);
        assert!(options.video.convert);
        assert_eq!(options.browser, BrowserKind::Chrome);
        assert!(options.viewport.is_none());
        assert!(options.result_dir.is_none());
    }

    #[test]
    fn test_recording_options_serialization() {
        let mut options = RecordingOptions::default();
        options.browser = BrowserKind::Firefox;
        options.video.crf = 18;
        options.result_dir = Some(PathBuf::from("/tmp/results"));

        let json = serde_json::to_string(&options).unwrap();
        let parsed: RecordingOptions = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.browser, BrowserKind::Firefox);
        assert_eq!(parsed.video.crf, 18);
        assert_eq!(parsed.result_dir, Some(PathBuf::from("/tmp/results")));
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        // A config that only sets the browser still gets full video defaults
        let json = r#"{"browser": "edge", "video": {"crf": 28}}"#;
        let parsed: RecordingOptions = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.browser, BrowserKind::Edge);
        assert_eq!(parsed.video.crf, 28);
        assert_eq!(parsed.video.framerate, 30);
        assert!(parsed.video.convert);
        assert_eq!(parsed.xvfb.display, 99);
    }

    #[test]
    fn test_optional_fields_not_serialized_when_none() {
        let options = RecordingOptions::default();
        let json = serde_json::to_string(&options).unwrap();
        assert!(!json.contains("viewport"));
        assert!(!json.contains("result_dir"));
    }

    #[test]
    fn test_default_engine_options() {
        let options = EngineOptions::default();
        assert_eq!(options.iterations, 3);
        assert_eq!(options.delay_ms, 0);
        assert_eq!(options.stop_timeout_secs, 10);
        assert!(options.scripts.is_empty());
        assert!(options.recording.is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("siterec_config_{}", std::process::id()));
        let path = dir.join("config.json");

        let mut options = RecordingOptions::default();
        options.browser = BrowserKind::Firefox;
        options.video.framerate = 25;
        options.viewport = Some("1280x720".into());

        save_options_to(&options, &path).unwrap();
        let loaded = load_options_from(&path);

        assert_eq!(loaded.browser, BrowserKind::Firefox);
        assert_eq!(loaded.video.framerate, 25);
        assert_eq!(loaded.viewport.as_deref(), Some("1280x720"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let loaded = load_options_from(Path::new("/definitely/not/a/siterec/config.json"));
        assert_eq!(loaded.video.crf, 23);
        assert_eq!(loaded.browser, BrowserKind::Chrome);
    }

    #[test]
    fn test_validate_directory_missing() {
        assert!(validate_directory("/definitely/not/a/real/path").is_err());
    }
}
