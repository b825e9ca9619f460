pub mod color;
pub mod color_source;
pub mod error;
pub mod geo;
pub mod gradient;
pub mod hr_zone;
pub mod legend_color;
pub mod metric;
pub mod projection;
pub mod track;
pub mod units;

// Re-export primary types for convenience.
pub use color::Rgb;
pub use color_source::{ColorCache, ColorSource};
pub use error::CoreError;
pub use geo::{GeoPosition, PixelBounds, WorldPixel};
pub use gradient::{color_for, GradientColorProvider};
pub use hr_zone::{HrZoneColorProvider, HrZoneContext, UNAVAILABLE_COLOR};
pub use legend_color::{BrightnessMode, ColorAnchor, LegendColor, Overwrite, ANCHOR_COUNT};
pub use metric::MetricKind;
pub use projection::{ProjectedPointCache, ProjectedPoints, ProjectionKey, Projector, WebMercator};
pub use track::{MarkerBounds, Track, TrackMarker, Waypoint};
pub use units::{
    DecimalRounding, LegendConfig, LegendUnitEngine, PaceRounding, UnitFormat, UnitRounding,
    LEGEND_MARGIN_TOP_BOTTOM,
};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
