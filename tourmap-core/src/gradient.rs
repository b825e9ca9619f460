use tracing::debug;

use crate::color::Rgb;
use crate::legend_color::{BrightnessMode, ColorAnchor, LegendColor};
use crate::metric::MetricKind;
use crate::track::Track;
use crate::units::{LegendConfig, LegendUnitEngine};

// ---------------------------------------------------------------------------
// Value -> color
// ---------------------------------------------------------------------------

/// Map a scalar to a color using the five anchors and the legend range.
///
/// Values between two anchors are interpolated linearly per channel. Values
/// outside the anchor range keep the outermost anchor color, or fade it toward
/// black (`Dim`) or white (`Lighten`) proportionally to their distance relative
/// to the legend bound. That ratio is not clamped, so values beyond the legend
/// bound saturate to black or white.
pub fn color_for(legend: &LegendColor, config: &LegendConfig, value: f64) -> Rgb {
    let anchors = &legend.anchors;

    let mut below: Option<&ColorAnchor> = None;
    let mut above: Option<&ColorAnchor> = None;
    for anchor in anchors {
        if anchor.threshold == value {
            return anchor.rgb;
        }
        if anchor.threshold < value {
            below = Some(anchor);
        } else if above.is_none() {
            above = Some(anchor);
        }
    }

    match (below, above) {
        (None, _) => extrapolate(
            legend.first(),
            legend.min_brightness,
            legend.min_brightness_factor,
            config.legend_min_value,
            value,
        ),
        (Some(_), None) => extrapolate(
            legend.last(),
            legend.max_brightness,
            legend.max_brightness_factor,
            config.legend_max_value,
            value,
        ),
        (Some(below), Some(above)) => interpolate(below, above, value),
    }
}

fn interpolate(below: &ColorAnchor, above: &ColorAnchor, value: f64) -> Rgb {
    let span = above.threshold - below.threshold;
    let offset = value - below.threshold;

    let channel = |from: u8, to: u8| -> i32 {
        let delta = to as f64 - from as f64;
        let step = if span == 0.0 {
            delta
        } else {
            delta * offset / span
        };
        (from as f64 + step) as i32
    };

    Rgb::from_clamped(
        channel(below.rgb.r, above.rgb.r),
        channel(below.rgb.g, above.rgb.g),
        channel(below.rgb.b, above.rgb.b),
    )
}

fn extrapolate(
    anchor: &ColorAnchor,
    mode: BrightnessMode,
    factor: u8,
    legend_bound: f64,
    value: f64,
) -> Rgb {
    if mode == BrightnessMode::Keep {
        return anchor.rgb;
    }

    let denominator = legend_bound - anchor.threshold;
    let ratio = if denominator == 0.0 {
        1.0
    } else {
        (value - anchor.threshold) / denominator
    };
    let amount = factor as f64 / 100.0 * ratio;

    let channel = |c: u8| -> i32 {
        let c = c as f64;
        let shifted = match mode {
            BrightnessMode::Dim => c - amount * c,
            BrightnessMode::Lighten => c + amount * (255.0 - c),
            BrightnessMode::Keep => c,
        };
        shifted as i32
    };

    Rgb::from_clamped(
        channel(anchor.rgb.r),
        channel(anchor.rgb.g),
        channel(anchor.rgb.b),
    )
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Gradient coloring for one metric: the anchor snapshot plus its legend axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientColorProvider {
    metric: MetricKind,
    legend: LegendColor,
    engine: LegendUnitEngine,
    config: LegendConfig,
}

impl GradientColorProvider {
    /// Create a provider whose legend initially spans the anchor thresholds.
    pub fn new(metric: MetricKind, legend: LegendColor) -> Self {
        let engine = LegendUnitEngine {
            unit_text: metric.unit_text().to_string(),
            overwrite_min: legend.overwrite_min,
            overwrite_max: legend.overwrite_max,
            value_scale: metric.overwrite_scale(),
        };
        let config = LegendConfig {
            units: legend.anchors.iter().map(|a| a.threshold).collect(),
            legend_min_value: legend.first().threshold,
            legend_max_value: legend.last().threshold,
            unit_text: engine.unit_text.clone(),
            unit_format: metric.unit_format(),
            number_format_digits: 0,
            unit_labels: None,
        };
        Self {
            metric,
            legend,
            engine,
            config,
        }
    }

    /// Provider with the builtin legend of `metric`.
    pub fn builtin(metric: MetricKind) -> Self {
        Self::new(metric, metric.default_legend())
    }

    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    pub fn legend(&self) -> &LegendColor {
        &self.legend
    }

    pub fn config(&self) -> &LegendConfig {
        &self.config
    }

    pub fn engine(&self) -> &LegendUnitEngine {
        &self.engine
    }

    /// Recompute the legend axis for a data range and legend height.
    pub fn configure(&mut self, pixel_height: u32, raw_min: f64, raw_max: f64) {
        self.config =
            self.engine
                .compute_units(pixel_height, raw_min, raw_max, self.metric.unit_format());
        debug!(
            metric = ?self.metric,
            raw_min,
            raw_max,
            legend_min = self.config.legend_min_value,
            legend_max = self.config.legend_max_value,
            units = self.config.units.len(),
            "Configured gradient legend"
        );
    }

    /// Configure from the metric values of all tracks. Falls back to the
    /// anchor range when no track carries the metric.
    pub fn configure_from_tracks<'a>(
        &mut self,
        pixel_height: u32,
        tracks: impl IntoIterator<Item = &'a Track>,
    ) {
        let mut range: Option<(f64, f64)> = None;
        for track in tracks {
            let Some(serie) = track.metric_serie(self.metric) else {
                continue;
            };
            for &value in serie.iter().filter(|v| v.is_finite()) {
                range = Some(match range {
                    None => (value, value),
                    Some((lo, hi)) => (lo.min(value), hi.max(value)),
                });
            }
        }

        let (raw_min, raw_max) =
            range.unwrap_or((self.legend.first().threshold, self.legend.last().threshold));
        self.configure(pixel_height, raw_min, raw_max);
    }

    pub fn color_for_value(&self, value: f64) -> Rgb {
        color_for(&self.legend, &self.config, value)
    }
}
