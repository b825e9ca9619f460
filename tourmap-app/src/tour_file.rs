//! Tour input: a JSON file holding one track or a list of tracks.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tourmap_core::{HrZoneContext, Track};
use tracing::{info, warn};

use crate::error::{AppError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum TourFile {
    Many(Vec<Track>),
    One(Box<Track>),
}

/// Parse and validate the tracks of a tour file. Tracks without positions are
/// skipped; an inconsistent track fails the whole file.
pub fn parse_tracks(json: &str, path: &Path) -> Result<Vec<Track>> {
    let file: TourFile = serde_json::from_str(json).map_err(|source| AppError::TourFormat {
        path: path.to_path_buf(),
        source,
    })?;
    let tracks = match file {
        TourFile::Many(tracks) => tracks,
        TourFile::One(track) => vec![*track],
    };

    let mut kept = Vec::with_capacity(tracks.len());
    for (index, track) in tracks.into_iter().enumerate() {
        track.validate()?;
        if !track.has_positions() {
            warn!(index, name = %track.name, "Skipping track without positions");
            continue;
        }
        kept.push(track);
    }
    if kept.is_empty() {
        return Err(AppError::NoTracks(path.to_path_buf()));
    }
    Ok(kept)
}

pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tracks = parse_tracks(&json, path)?;
    info!(
        path = %path.display(),
        tracks = tracks.len(),
        samples = tracks.iter().map(Track::sample_count).sum::<usize>(),
        "Loaded tour"
    );
    Ok(tracks)
}

/// Give tracks with a pulse series but no zones the zones of `max_pulse`.
pub fn fill_missing_hr_zones(tracks: &mut [Track], max_pulse: f64) -> Result<()> {
    let zones = HrZoneContext::from_max_pulse(max_pulse)?;
    for track in tracks
        .iter_mut()
        .filter(|t| t.pulse.is_some() && t.hr_zones.is_none())
    {
        track.hr_zones = Some(zones.clone());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("tour.json")
    }

    #[test]
    fn single_track_object() {
        let json = r#"{"name": "Loop", "latitudes": [47.0, 47.1], "longitudes": [8.0, 8.1],
                       "altitude": [400.0, 450.0]}"#;
        let tracks = parse_tracks(json, path()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Loop");
        assert_eq!(tracks[0].altitude.as_deref(), Some(&[400.0, 450.0][..]));
    }

    #[test]
    fn list_of_tracks_skips_empty_ones() {
        let json = r#"[
            {"latitudes": [], "longitudes": []},
            {"latitudes": [47.0], "longitudes": [8.0],
             "markers": [{"serie_index": 0, "label": "Start"}],
             "waypoints": [{"latitude": 47.0, "longitude": 8.0, "label": "Hut"}]}
        ]"#;
        let tracks = parse_tracks(json, path()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].markers[0].label, "Start");
        assert!(tracks[0].markers[0].visible);
        assert_eq!(tracks[0].waypoints[0].label, "Hut");
    }

    #[test]
    fn mismatched_series_is_rejected() {
        let json = r#"{"latitudes": [47.0, 47.1], "longitudes": [8.0, 8.1], "pulse": [120.0]}"#;
        assert!(matches!(
            parse_tracks(json, path()),
            Err(AppError::Core(_))
        ));
    }

    #[test]
    fn no_usable_track_is_an_error() {
        let json = r#"[{"latitudes": [], "longitudes": []}]"#;
        assert!(matches!(parse_tracks(json, path()), Err(AppError::NoTracks(_))));
        assert!(matches!(
            parse_tracks("not json", path()),
            Err(AppError::TourFormat { .. })
        ));
    }

    #[test]
    fn hr_zones_are_filled_only_where_missing() {
        let json = r#"[
            {"latitudes": [47.0], "longitudes": [8.0], "pulse": [130.0]},
            {"latitudes": [47.0], "longitudes": [8.0]},
            {"latitudes": [47.0], "longitudes": [8.0], "pulse": [130.0],
             "hr_zones": {"zone_min_bpm": [100.0], "zone_max_bpm": [200.0]}}
        ]"#;
        let mut tracks = parse_tracks(json, path()).unwrap();
        fill_missing_hr_zones(&mut tracks, 200.0).unwrap();
        assert_eq!(tracks[0].hr_zones.as_ref().map(|z| z.zone_count()), Some(5));
        assert!(tracks[1].hr_zones.is_none());
        assert_eq!(tracks[2].hr_zones.as_ref().map(|z| z.zone_count()), Some(1));
    }
}
