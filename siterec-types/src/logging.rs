//! Platform log directory resolution.

use std::path::{Path, PathBuf};

/// Directory where log files are written.
///
/// Linux: `$XDG_STATE_HOME/siterec/logs` (or `~/.local/state/siterec/logs`).
/// macOS: `~/Library/Logs/siterec`. Windows: `%LOCALAPPDATA%\siterec\logs`.
pub fn log_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let base = directories::ProjectDirs::from("", "", "siterec")
            .expect("Failed to determine project directories");
        base.state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base.data_local_dir().join("state"))
            .join("logs")
    }

    #[cfg(target_os = "macos")]
    {
        // directories has no accessor for ~/Library/Logs, so walk up from
        // ~/Library/Application Support/siterec
        let base = directories::ProjectDirs::from("", "", "siterec")
            .expect("Failed to determine project directories");
        base.data_local_dir()
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base.data_local_dir().to_path_buf())
            .join("Logs")
            .join("siterec")
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let base = directories::ProjectDirs::from("", "", "siterec")
            .expect("Failed to determine project directories");
        base.data_local_dir().join("logs")
    }
}

/// Create the log directory if it does not exist yet.
pub fn ensure_log_dir() -> Result<(), std::io::Error> {
    std::fs::create_dir_all(log_dir())
}
