use serde::{Deserialize, Serialize};

use crate::legend_color::{self, LegendColor};
use crate::units::UnitFormat;

/// The track value a map overlay is colored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    #[default]
    Altitude,
    Gradient,
    Pulse,
    Speed,
    Pace,
    /// Heart rate zones, read from the pulse series.
    HrZone,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Altitude,
        MetricKind::Gradient,
        MetricKind::Pulse,
        MetricKind::Speed,
        MetricKind::Pace,
        MetricKind::HrZone,
    ];

    /// Stable identifier, used for color profile file names.
    pub fn id(self) -> &'static str {
        match self {
            MetricKind::Altitude => "altitude",
            MetricKind::Gradient => "gradient",
            MetricKind::Pulse => "pulse",
            MetricKind::Speed => "speed",
            MetricKind::Pace => "pace",
            MetricKind::HrZone => "hr_zone",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    pub fn unit_text(self) -> &'static str {
        match self {
            MetricKind::Altitude => "m",
            MetricKind::Gradient => "%",
            MetricKind::Pulse | MetricKind::HrZone => "bpm",
            MetricKind::Speed => "km/h",
            MetricKind::Pace => "min/km",
        }
    }

    pub fn unit_format(self) -> UnitFormat {
        match self {
            MetricKind::Pace => UnitFormat::Pace,
            _ => UnitFormat::Number,
        }
    }

    /// Factor from a user-entered legend bound to the stored value.
    /// Pace is stored in seconds but entered in minutes.
    pub fn overwrite_scale(self) -> f64 {
        match self {
            MetricKind::Pace => 60.0,
            _ => 1.0,
        }
    }

    /// Builtin legend for gradient coloring. Heart rate zones reuse the pulse legend.
    pub fn default_legend(self) -> LegendColor {
        match self {
            MetricKind::Altitude => legend_color::altitude(),
            MetricKind::Gradient => legend_color::gradient(),
            MetricKind::Pulse | MetricKind::HrZone => legend_color::pulse(),
            MetricKind::Speed => legend_color::speed(),
            MetricKind::Pace => legend_color::pace(),
        }
    }

    pub fn is_discrete(self) -> bool {
        self == MetricKind::HrZone
    }
}
