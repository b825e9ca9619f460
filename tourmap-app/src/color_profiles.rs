//! Color profile I/O: one LegendColor per metric, stored as JSON files in `color_profiles/`.

use std::fs;
use std::path::{Path, PathBuf};

use tourmap_core::{LegendColor, MetricKind};
use tracing::{debug, info, warn};

const PROFILES_DIR_NAME: &str = "color_profiles";

/// Directory in the config dir where profile JSON files are stored.
pub fn color_profiles_dir() -> PathBuf {
    crate::app_dir::config_dir().join(PROFILES_DIR_NAME)
}

fn profile_path(dir: &Path, metric: MetricKind) -> PathBuf {
    dir.join(metric.id()).with_extension("json")
}

/// Write the built-in legend of every gradient metric that has no profile yet.
pub fn ensure_default_profiles(dir: &Path) {
    if let Err(e) = fs::create_dir_all(dir) {
        warn!("Could not create color_profiles dir {}: {}", dir.display(), e);
        return;
    }
    for metric in MetricKind::ALL.into_iter().filter(|m| !m.is_discrete()) {
        let path = profile_path(dir, metric);
        if path.exists() {
            continue;
        }
        if save_profile(dir, metric, &metric.default_legend()).is_ok() {
            info!("Created default color profile at {}", path.display());
        }
    }
}

/// Metrics with a profile file in `dir`.
pub fn list_profiles(dir: &Path) -> Vec<MetricKind> {
    let rd = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(_) => return Vec::new(),
    };
    let mut metrics: Vec<MetricKind> = rd
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let p = e.path();
            if p.extension().map(|ext| ext == "json").unwrap_or(false) {
                p.file_stem()
                    .and_then(|s| MetricKind::from_id(&s.to_string_lossy()))
            } else {
                None
            }
        })
        .collect();
    metrics.sort_by_key(|m| m.id());
    metrics
}

/// Load the legend of `metric`. Returns the built-in legend on error or
/// when the stored anchors are not usable.
pub fn load_profile(dir: &Path, metric: MetricKind) -> LegendColor {
    let path = profile_path(dir, metric);
    match fs::read_to_string(&path) {
        Ok(json) => match serde_json::from_str::<LegendColor>(&json) {
            Ok(legend) => match legend.validate() {
                Ok(()) => {
                    debug!("Loaded color profile from {}", path.display());
                    legend
                }
                Err(e) => {
                    warn!("Unusable color profile {}: {}", path.display(), e);
                    metric.default_legend()
                }
            },
            Err(e) => {
                warn!("Invalid color profile {}: {}", path.display(), e);
                metric.default_legend()
            }
        },
        Err(e) => {
            warn!("Could not read color profile {}: {}", path.display(), e);
            metric.default_legend()
        }
    }
}

/// Save `legend` as the profile of `metric`. Overwrites if exists.
pub fn save_profile(dir: &Path, metric: MetricKind, legend: &LegendColor) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(legend)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(profile_path(dir, metric), json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn defaults_are_written_for_gradient_metrics() {
        let dir = temp_dir("tourmap_profiles_defaults");
        ensure_default_profiles(&dir);
        let metrics = list_profiles(&dir);
        assert_eq!(metrics.len(), 5);
        assert!(!metrics.contains(&MetricKind::HrZone));
        assert_eq!(
            load_profile(&dir, MetricKind::Pace),
            MetricKind::Pace.default_legend()
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn existing_profiles_are_kept() {
        let dir = temp_dir("tourmap_profiles_keep");
        let custom = MetricKind::Altitude
            .default_legend()
            .with_max_brightness(tourmap_core::BrightnessMode::Lighten, 40);
        save_profile(&dir, MetricKind::Altitude, &custom).unwrap();
        ensure_default_profiles(&dir);
        assert_eq!(load_profile(&dir, MetricKind::Altitude), custom);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn broken_profiles_fall_back_to_builtin() {
        let dir = temp_dir("tourmap_profiles_broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("speed.json"), "[1, 2").unwrap();

        let mut unordered = MetricKind::Pulse.default_legend();
        unordered.anchors[1].threshold = 5000.0;
        save_profile(&dir, MetricKind::Pulse, &unordered).unwrap();

        assert_eq!(
            load_profile(&dir, MetricKind::Speed),
            MetricKind::Speed.default_legend()
        );
        assert_eq!(
            load_profile(&dir, MetricKind::Pulse),
            MetricKind::Pulse.default_legend()
        );
        assert_eq!(
            load_profile(&dir, MetricKind::Gradient),
            MetricKind::Gradient.default_legend()
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_files_are_not_listed() {
        let dir = temp_dir("tourmap_profiles_list");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("notes.json"), "{}").unwrap();
        fs::write(dir.join("pace.txt"), "").unwrap();
        assert!(list_profiles(&dir).is_empty());
        let _ = fs::remove_dir_all(&dir);
    }
}
