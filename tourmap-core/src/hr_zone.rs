use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::CoreError;
use crate::track::Track;

/// Color returned when no zone can be resolved for a sample.
pub const UNAVAILABLE_COLOR: Rgb = Rgb::BLACK;

/// Heart rate zone boundaries of the person who recorded a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrZoneContext {
    pub zone_min_bpm: Vec<f64>,
    pub zone_max_bpm: Vec<f64>,
}

impl HrZoneContext {
    pub fn new(zone_min_bpm: Vec<f64>, zone_max_bpm: Vec<f64>) -> crate::Result<Self> {
        let context = Self {
            zone_min_bpm,
            zone_max_bpm,
        };
        context.validate()?;
        Ok(context)
    }

    /// Five zones at 50/60/70/80/90 % of a maximum heart rate.
    pub fn from_max_pulse(max_pulse: f64) -> crate::Result<Self> {
        let bounds = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0].map(|p| (max_pulse * p).round());
        Self::new(
            bounds[..5].to_vec(),
            bounds[1..].iter().map(|b| b - 1.0).collect(),
        )
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.zone_min_bpm.is_empty() {
            return Err(CoreError::InvalidHrZones {
                reason: "no zones defined".into(),
            });
        }
        if self.zone_min_bpm.len() != self.zone_max_bpm.len() {
            return Err(CoreError::InvalidHrZones {
                reason: format!(
                    "{} minimum bounds but {} maximum bounds",
                    self.zone_min_bpm.len(),
                    self.zone_max_bpm.len()
                ),
            });
        }
        for (zone, (min, max)) in self.zone_min_bpm.iter().zip(&self.zone_max_bpm).enumerate() {
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(CoreError::InvalidHrZones {
                    reason: format!("zone {zone} has bounds {min}..{max}"),
                });
            }
        }
        Ok(())
    }

    pub fn zone_count(&self) -> usize {
        self.zone_min_bpm.len()
    }

    /// First zone whose inclusive range contains `pulse`.
    pub fn zone_index(&self, pulse: f64) -> Option<usize> {
        self.zone_min_bpm
            .iter()
            .zip(&self.zone_max_bpm)
            .position(|(&min, &max)| min <= pulse && pulse <= max)
    }
}

/// Categorical coloring by heart rate zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrZoneColorProvider {
    pub zone_colors: Vec<Rgb>,
}

impl Default for HrZoneColorProvider {
    fn default() -> Self {
        Self {
            zone_colors: vec![
                Rgb::new(0x80, 0x80, 0x80),
                Rgb::new(0x00, 0x80, 0xff),
                Rgb::new(0x00, 0xc0, 0x00),
                Rgb::new(0xff, 0x90, 0x00),
                Rgb::new(0xe0, 0x00, 0x00),
            ],
        }
    }
}

impl HrZoneColorProvider {
    pub fn new(zone_colors: Vec<Rgb>) -> Self {
        Self { zone_colors }
    }

    /// Color of the sample at `index`. A line segment ending at `index` is
    /// colored by the zone of the sample it starts from.
    pub fn color_for(&self, track: &Track, index: usize, is_line_segment: bool) -> Rgb {
        let index = if is_line_segment && index > 0 {
            index - 1
        } else {
            index
        };

        let (Some(pulse), Some(zones)) = (track.pulse.as_deref(), track.hr_zones.as_ref()) else {
            return UNAVAILABLE_COLOR;
        };

        pulse
            .get(index)
            .and_then(|&bpm| zones.zone_index(bpm))
            .and_then(|zone| self.zone_colors.get(zone).copied())
            .unwrap_or(UNAVAILABLE_COLOR)
    }

    pub fn zone_color(&self, zone: usize) -> Rgb {
        self.zone_colors
            .get(zone)
            .copied()
            .unwrap_or(UNAVAILABLE_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones() -> HrZoneContext {
        HrZoneContext::new(vec![0.0, 100.0, 140.0], vec![99.0, 139.0, 220.0]).unwrap()
    }

    fn track(pulse: Vec<f64>) -> Track {
        let n = pulse.len();
        let mut track = Track::new(vec![0.0; n], vec![0.0; n]).unwrap();
        track.pulse = Some(pulse);
        track.hr_zones = Some(zones());
        track
    }

    fn provider() -> HrZoneColorProvider {
        HrZoneColorProvider::new(vec![
            Rgb::new(1, 0, 0),
            Rgb::new(2, 0, 0),
            Rgb::new(3, 0, 0),
        ])
    }

    #[test]
    fn resolves_first_matching_zone() {
        let z = zones();
        assert_eq!(z.zone_index(80.0), Some(0));
        assert_eq!(z.zone_index(139.0), Some(1));
        assert_eq!(z.zone_index(150.0), Some(2));
        assert_eq!(z.zone_index(99.5), None);
    }

    #[test]
    fn point_uses_own_zone() {
        let track = track(vec![80.0, 120.0, 160.0]);
        assert_eq!(provider().color_for(&track, 1, false), Rgb::new(2, 0, 0));
        assert_eq!(provider().color_for(&track, 2, false), Rgb::new(3, 0, 0));
    }

    #[test]
    fn line_segment_uses_previous_zone() {
        let track = track(vec![80.0, 120.0, 160.0]);
        assert_eq!(provider().color_for(&track, 0, true), Rgb::new(1, 0, 0));
        assert_eq!(provider().color_for(&track, 1, true), Rgb::new(1, 0, 0));
        assert_eq!(provider().color_for(&track, 2, true), Rgb::new(2, 0, 0));
    }

    #[test]
    fn missing_data_is_unavailable() {
        let mut t = track(vec![80.0]);
        t.hr_zones = None;
        assert_eq!(provider().color_for(&t, 0, false), UNAVAILABLE_COLOR);

        let t = track(vec![99.5]);
        assert_eq!(provider().color_for(&t, 0, false), UNAVAILABLE_COLOR);
        assert_eq!(provider().color_for(&t, 5, false), UNAVAILABLE_COLOR);
    }

    #[test]
    fn rejects_mismatched_bounds() {
        assert!(HrZoneContext::new(vec![0.0, 100.0], vec![99.0]).is_err());
        assert!(HrZoneContext::new(vec![120.0], vec![100.0]).is_err());
        assert!(HrZoneContext::new(vec![], vec![]).is_err());
    }

    #[test]
    fn zones_from_max_pulse() {
        let z = HrZoneContext::from_max_pulse(200.0).unwrap();
        assert_eq!(z.zone_count(), 5);
        assert_eq!(z.zone_min_bpm[0], 100.0);
        assert_eq!(z.zone_max_bpm[4], 199.0);
        assert_eq!(z.zone_index(185.0), Some(4));
    }
}
