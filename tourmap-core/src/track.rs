use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::{GeoPosition, PixelBounds, WorldPixel};
use crate::hr_zone::HrZoneContext;
use crate::metric::MetricKind;
use crate::projection::{ProjectedPointCache, Projector};

/// Pixel footprint of a marker image: a label banner on top of a pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerBounds {
    pub banner_width: i32,
    pub banner_height: i32,
    pub width: i32,
    pub height: i32,
}

/// A named point of interest attached to a track sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMarker {
    pub serie_index: usize,
    pub label: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(skip)]
    bounds: OnceLock<MarkerBounds>,
}

fn default_true() -> bool {
    true
}

impl TrackMarker {
    pub fn new(serie_index: usize, label: impl Into<String>) -> Self {
        Self {
            serie_index,
            label: label.into(),
            visible: true,
            bounds: OnceLock::new(),
        }
    }

    /// Bounds computed by `measure` on first use and reused afterwards.
    pub fn bounds_or_init(&self, measure: impl FnOnce(&str) -> MarkerBounds) -> MarkerBounds {
        *self.bounds.get_or_init(|| measure(&self.label))
    }

    pub fn cached_bounds(&self) -> Option<MarkerBounds> {
        self.bounds.get().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub label: String,
}

impl Waypoint {
    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.latitude, self.longitude)
    }
}

/// One recorded tour: positions, metric series, markers and waypoints.
///
/// All metric series are parallel to the positions. Pace is stored in seconds
/// per kilometer, speed in km/h, gradient in percent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub name: String,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    #[serde(default)]
    pub altitude: Option<Vec<f64>>,
    #[serde(default)]
    pub speed: Option<Vec<f64>>,
    #[serde(default)]
    pub pulse: Option<Vec<f64>>,
    #[serde(default)]
    pub pace: Option<Vec<f64>>,
    #[serde(default)]
    pub gradient: Option<Vec<f64>>,
    #[serde(default)]
    pub markers: Vec<TrackMarker>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub hr_zones: Option<HrZoneContext>,

    #[serde(skip)]
    pixel_cache: ProjectedPointCache,
    #[serde(skip)]
    waypoint_cache: ProjectedPointCache,
}

impl Track {
    pub fn new(latitudes: Vec<f64>, longitudes: Vec<f64>) -> crate::Result<Self> {
        let track = Self {
            latitudes,
            longitudes,
            ..Self::default()
        };
        track.validate()?;
        Ok(track)
    }

    pub fn from_positions(positions: &[GeoPosition]) -> Self {
        Self {
            latitudes: positions.iter().map(|p| p.latitude).collect(),
            longitudes: positions.iter().map(|p| p.longitude).collect(),
            ..Self::default()
        }
    }

    /// Check that every series is parallel to the positions.
    pub fn validate(&self) -> crate::Result<()> {
        let expected = self.latitudes.len();
        let series: [(&'static str, Option<usize>); 6] = [
            ("longitudes", Some(self.longitudes.len())),
            ("altitude", self.altitude.as_ref().map(Vec::len)),
            ("speed", self.speed.as_ref().map(Vec::len)),
            ("pulse", self.pulse.as_ref().map(Vec::len)),
            ("pace", self.pace.as_ref().map(Vec::len)),
            ("gradient", self.gradient.as_ref().map(Vec::len)),
        ];
        for (serie, len) in series {
            if let Some(len) = len.filter(|&len| len != expected) {
                return Err(CoreError::SerieLength {
                    serie,
                    len,
                    expected,
                });
            }
        }
        if let Some(zones) = &self.hr_zones {
            zones.validate()?;
        }
        Ok(())
    }

    pub fn sample_count(&self) -> usize {
        self.latitudes.len()
    }

    pub fn has_positions(&self) -> bool {
        !self.latitudes.is_empty() && self.latitudes.len() == self.longitudes.len()
    }

    /// The series painted for `metric`; heart rate zones read the pulse.
    pub fn metric_serie(&self, metric: MetricKind) -> Option<&[f64]> {
        match metric {
            MetricKind::Altitude => self.altitude.as_deref(),
            MetricKind::Gradient => self.gradient.as_deref(),
            MetricKind::Pulse | MetricKind::HrZone => self.pulse.as_deref(),
            MetricKind::Speed => self.speed.as_deref(),
            MetricKind::Pace => self.pace.as_deref(),
        }
    }

    pub fn set_metric_serie(&mut self, metric: MetricKind, values: Vec<f64>) {
        let slot = match metric {
            MetricKind::Altitude => &mut self.altitude,
            MetricKind::Gradient => &mut self.gradient,
            MetricKind::Pulse | MetricKind::HrZone => &mut self.pulse,
            MetricKind::Speed => &mut self.speed,
            MetricKind::Pace => &mut self.pace,
        };
        *slot = Some(values);
    }

    /// Projected sample positions, cached per projection and zoom.
    pub fn world_pixels(&self, projector: &dyn Projector, zoom: u32) -> Arc<[WorldPixel]> {
        self.pixel_cache
            .project(&self.latitudes, &self.longitudes, projector, zoom)
    }

    /// Projected waypoint positions, cached per projection and zoom.
    pub fn waypoint_pixels(&self, projector: &dyn Projector, zoom: u32) -> Arc<[WorldPixel]> {
        self.waypoint_cache.project_with(projector, zoom, || {
            self.waypoints.iter().map(|w| (w.latitude, w.longitude))
        })
    }

    /// Drop cached projections after the positions or waypoints changed.
    pub fn invalidate_projection(&self) {
        self.pixel_cache.invalidate();
        self.waypoint_cache.invalidate();
    }

    /// World pixel rectangle covering all samples and waypoints.
    pub fn world_bounds(&self, projector: &dyn Projector, zoom: u32) -> Option<PixelBounds> {
        let samples = PixelBounds::of(&self.world_pixels(projector, zoom));
        let waypoints = PixelBounds::of(&self.waypoint_pixels(projector, zoom));
        match (samples, waypoints) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn start_position(&self) -> Option<GeoPosition> {
        Some(GeoPosition::new(
            *self.latitudes.first()?,
            *self.longitudes.first()?,
        ))
    }
}
