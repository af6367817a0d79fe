//! Shared defaults for recording and engine options.

use siterec_types::Viewport;

/// Xvfb display number used when none is configured.
pub const XVFB_DISPLAY: u32 = 99;

/// Capture framerate in frames per second.
pub const FRAMERATE: u32 = 30;

/// Constant rate factor (quality) for the H.264 encoder.
pub const CRF: u32 = 23;

/// Whether the captured file is transcoded to the destination (true) or
/// renamed into place as-is (false).
pub const CONVERT: bool = true;

/// Process priority adjustment for the capture process.
pub const NICE: i32 = 0;

/// Capture viewport when none is configured.
pub fn viewport() -> Viewport {
    Viewport::new(1366, 708)
}

/// Number of engine iterations per URL.
pub const ITERATIONS: u32 = 3;

/// Delay between engine iterations, in milliseconds.
pub const ITERATION_DELAY_MS: u64 = 0;

/// Upper bound on browser shutdown, in seconds.
pub const STOP_TIMEOUT_SECS: u64 = 10;
