//! Exit codes for the CLI.
//!
//! These codes enable scripting integration by providing structured
//! feedback about operation results.

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Invalid command-line arguments
    InvalidArguments = 2,
    /// FFmpeg is not available
    FfmpegUnavailable = 3,
    /// Recording failed to start
    RecordingFailedToStart = 4,
    /// Recording failed during capture or while stopping
    CaptureFailed = 5,
    /// Converting the captured file failed (captured file preserved)
    ConvertFailed = 6,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
