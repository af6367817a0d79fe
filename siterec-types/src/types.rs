//! Shared types for browser-run capture and engine results.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system the capture is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux (X11 capture via xvfb display)
    Linux,
    /// Windows
    Windows,
    /// macOS
    MacOs,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        {
            Platform::Linux
        }
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(target_os = "macos")]
        {
            Platform::MacOs
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            Platform::Linux
        }
    }

    /// Parse from string (case-insensitive). Accepts the conventional
    /// `win32`/`darwin` names as well.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Some(Platform::Linux),
            "windows" | "win32" => Some(Platform::Windows),
            "macos" | "darwin" => Some(Platform::MacOs),
            _ => None,
        }
    }

    /// String representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Browser whose window chrome determines the capture origin/offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Firefox,
    #[default]
    Chrome,
    Edge,
    Safari,
}

impl BrowserKind {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Some(BrowserKind::Firefox),
            "chrome" => Some(BrowserKind::Chrome),
            "edge" => Some(BrowserKind::Edge),
            "safari" => Some(BrowserKind::Safari),
            _ => None,
        }
    }

    /// String representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Firefox => "firefox",
            BrowserKind::Chrome => "chrome",
            BrowserKind::Edge => "edge",
            BrowserKind::Safari => "safari",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static VIEWPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,5})x(\d{1,5})$").expect("viewport regex is valid"));

/// Capture size in pixels, written as `WxH` (e.g. `1366x708`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse a `WxH` string. Returns `None` for anything that is not two
    /// positive pixel counts separated by an `x`.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = VIEWPORT_RE.captures(s.trim())?;
        let width: u32 = caps[1].parse().ok()?;
        let height: u32 = caps[2].parse().ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel offset describing where browser content begins inside the captured
/// region, used to crop window chrome and toolbars out of the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PixelOffset {
    pub x: i32,
    pub y: i32,
}

impl PixelOffset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for PixelOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// The value a single named script returned during one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptResult {
    /// Script name (file stem of the script path).
    pub name: String,
    /// Whatever the script's source evaluated to.
    pub value: serde_json::Value,
}

/// Results of one engine iteration: every declared script's value, in
/// script-declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IterationResult {
    pub scripts: Vec<ScriptResult>,
}

impl IterationResult {
    /// Look up a script's value by name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.scripts
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.value)
    }
}

/// The full result of running one URL through the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// URL that was loaded.
    pub url: String,
    /// One entry per iteration, in execution order.
    pub iterations: Vec<IterationResult>,
}
