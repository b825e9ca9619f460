//! Locations of preferences, color profiles and exported images.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Per-user configuration directory of the app.
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "TourMap")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| exe_directory())
}

/// Default directory for exported tiles, overview and legend.
pub fn output_directory() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("tourmap-out")
}
