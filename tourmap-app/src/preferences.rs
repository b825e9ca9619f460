use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tourmap_core::MetricKind;
use tourmap_render::{PaintConfig, DEFAULT_LEGEND_HEIGHT, DEFAULT_LEGEND_WIDTH};
use tracing::{debug, error, info};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default)]
    pub metric: MetricKind,
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    /// Tiles painted per side of one raster; must be odd.
    #[serde(default = "default_parts")]
    pub parts: u32,
    /// Pixels around the tour bounds that still get tiles, room for markers.
    #[serde(default = "default_tile_margin")]
    pub tile_margin: i32,
    #[serde(default)]
    pub paint: PaintConfig,
    #[serde(default = "default_legend_width")]
    pub legend_width: u32,
    #[serde(default = "default_legend_height")]
    pub legend_height: u32,
    #[serde(default = "default_true")]
    pub legend_vertical: bool,
    #[serde(default = "default_true")]
    pub export_legend: bool,
    #[serde(default = "default_true")]
    pub export_overview: bool,
    /// Used to derive heart rate zones for tracks that carry none.
    #[serde(default = "default_max_pulse")]
    pub max_pulse: f64,
    /// Custom output directory. When empty, `tourmap-out/` in the working directory is used.
    #[serde(default)]
    pub output_dir: String,
}

fn default_zoom() -> u32 {
    14
}
fn default_parts() -> u32 {
    1
}
fn default_tile_margin() -> i32 {
    40
}
fn default_legend_width() -> u32 {
    DEFAULT_LEGEND_WIDTH
}
fn default_legend_height() -> u32 {
    DEFAULT_LEGEND_HEIGHT
}
fn default_true() -> bool {
    true
}
fn default_max_pulse() -> f64 {
    190.0
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            metric: MetricKind::default(),
            zoom: default_zoom(),
            parts: default_parts(),
            tile_margin: default_tile_margin(),
            paint: PaintConfig::default(),
            legend_width: default_legend_width(),
            legend_height: default_legend_height(),
            legend_vertical: true,
            export_legend: true,
            export_overview: true,
            max_pulse: default_max_pulse(),
            output_dir: String::new(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from the OS config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Where tiles, overview and legend are written.
    pub fn output_directory(&self) -> PathBuf {
        if self.output_dir.is_empty() {
            crate::app_dir::output_directory()
        } else {
            PathBuf::from(&self.output_dir)
        }
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::config_dir().join("preferences.json")
}
