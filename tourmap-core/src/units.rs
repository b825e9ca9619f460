//! Legend axis units: "nice" tick values and the legend's displayed range.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::legend_color::Overwrite;

/// Space kept free above and below the color bar of a vertical legend.
pub const LEGEND_MARGIN_TOP_BOTTOM: u32 = 10;

/// Minimum vertical distance between two unit labels.
pub const PIXELS_PER_UNIT: u32 = 60;

/// Hard upper bound on emitted units, guards against a degenerate unit.
pub const MAX_UNIT_COUNT: usize = 100;

/// One hour in seconds; pace values are stored in seconds.
const HOUR: f64 = 3600.0;

/// How unit values are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitFormat {
    #[default]
    Number,
    /// Seconds displayed as `mm:ss`.
    Pace,
}

/// Derived legend axis: tick values plus display settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendConfig {
    /// Ascending tick values.
    pub units: Vec<f64>,
    pub legend_min_value: f64,
    pub legend_max_value: f64,
    pub unit_text: String,
    pub unit_format: UnitFormat,
    /// Fraction digits of number labels, 0 or 1.
    pub number_format_digits: u8,
    /// Explicit labels replacing the formatted unit values, one per unit.
    pub unit_labels: Option<Vec<String>>,
}

impl LegendConfig {
    /// Label text for a unit value, ignoring `unit_labels`.
    pub fn format_unit(&self, value: f64) -> String {
        match self.unit_format {
            UnitFormat::Pace => format!("{} {}", format_mm_ss(value as i64), self.unit_text),
            UnitFormat::Number if self.number_format_digits == 0 => {
                format!("{} {}", value as i64, self.unit_text)
            }
            UnitFormat::Number => format!("{:.1} {}", value, self.unit_text),
        }
    }

    /// Label for the unit at `index`, preferring an explicit label when present.
    /// Empty when `index` is past both the labels and the units.
    pub fn unit_label(&self, index: usize) -> String {
        if let Some(label) = self.unit_labels.as_ref().and_then(|labels| labels.get(index)) {
            return label.clone();
        }
        self.units
            .get(index)
            .map(|&unit| self.format_unit(unit))
            .unwrap_or_default()
    }

    pub fn legend_range(&self) -> f64 {
        self.legend_max_value - self.legend_min_value
    }
}

/// Format seconds as `m:ss`, negative values with a leading minus.
pub fn format_mm_ss(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{sign}{}:{:02}", abs / 60, abs % 60)
}

// ---------------------------------------------------------------------------
// Rounding strategies
// ---------------------------------------------------------------------------

/// Rounds a raw tick distance to a human friendly increment.
pub trait UnitRounding {
    fn round_unit(&self, raw_unit: f64) -> f64;
}

/// Nearest of `{1, 2, 5, 10} × 10ⁿ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalRounding;

impl UnitRounding for DecimalRounding {
    fn round_unit(&self, raw_unit: f64) -> f64 {
        if !raw_unit.is_finite() || raw_unit <= 0.0 {
            return 1.0;
        }

        let mut exponent = raw_unit.log10().floor() as i32;
        let mut mantissa = raw_unit / 10f64.powi(exponent);

        // log10 may land one decade off for exact powers of ten
        if mantissa >= 10.0 {
            exponent += 1;
            mantissa /= 10.0;
        } else if mantissa < 1.0 {
            exponent -= 1;
            mantissa *= 10.0;
        }

        let nice = [1.0, 2.0, 5.0, 10.0]
            .into_iter()
            .min_by(|a, b| (mantissa - a).abs().total_cmp(&(mantissa - b).abs()))
            .unwrap_or(1.0);

        nice * 10f64.powi(exponent)
    }
}

/// Nearest rung of a time ladder, in seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaceRounding;

const PACE_LADDER: [f64; 10] = [
    10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1800.0, HOUR,
];

impl UnitRounding for PaceRounding {
    fn round_unit(&self, raw_unit: f64) -> f64 {
        if !raw_unit.is_finite() || raw_unit <= 0.0 {
            return PACE_LADDER[0];
        }
        if raw_unit > HOUR {
            return (raw_unit / HOUR).round().max(1.0) * HOUR;
        }
        PACE_LADDER
            .into_iter()
            .min_by(|a, b| (raw_unit - a).abs().total_cmp(&(raw_unit - b).abs()))
            .unwrap_or(HOUR)
    }
}

// ---------------------------------------------------------------------------
// Unit engine
// ---------------------------------------------------------------------------

/// Computes legend units from a raw data range.
///
/// The rounding strategy is chosen by the display format; both can be
/// replaced by passing a custom [`UnitRounding`] to [`compute_units_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct LegendUnitEngine {
    pub unit_text: String,
    pub overwrite_min: Overwrite,
    pub overwrite_max: Overwrite,
    /// Multiplier from displayed overwrite values to the metric's internal scale.
    pub value_scale: f64,
}

impl LegendUnitEngine {
    pub fn new(unit_text: impl Into<String>) -> Self {
        Self {
            unit_text: unit_text.into(),
            overwrite_min: Overwrite::default(),
            overwrite_max: Overwrite::default(),
            value_scale: 1.0,
        }
    }

    pub fn with_overwrite(mut self, min: Overwrite, max: Overwrite) -> Self {
        self.overwrite_min = min;
        self.overwrite_max = max;
        self
    }

    pub fn compute_units(
        &self,
        pixel_height: u32,
        raw_min: f64,
        raw_max: f64,
        format: UnitFormat,
    ) -> LegendConfig {
        match format {
            UnitFormat::Number => {
                self.compute_units_with(pixel_height, raw_min, raw_max, format, &DecimalRounding)
            }
            UnitFormat::Pace => {
                self.compute_units_with(pixel_height, raw_min, raw_max, format, &PaceRounding)
            }
        }
    }

    pub fn compute_units_with(
        &self,
        pixel_height: u32,
        raw_min: f64,
        raw_max: f64,
        format: UnitFormat,
        rounding: &dyn UnitRounding,
    ) -> LegendConfig {
        let mut min = self
            .overwrite_min
            .active()
            .map_or(raw_min, |v| v * self.value_scale);
        let mut max = self
            .overwrite_max
            .active()
            .map_or(raw_max, |v| v * self.value_scale);

        let mut forced_unit = None;
        if max <= min || !(max - min).is_finite() {
            match format {
                UnitFormat::Number => max = min + 1.0,
                UnitFormat::Pace => {
                    max = min + HOUR;
                    forced_unit = Some(HOUR / 2.0);
                }
            }
        }

        let available_pixels = pixel_height.saturating_sub(2 * LEGEND_MARGIN_TOP_BOTTOM);
        let tick_count = (available_pixels / PIXELS_PER_UNIT).max(1);

        let unit = forced_unit
            .unwrap_or_else(|| rounding.round_unit((max - min) / tick_count as f64));

        min = snap_down(min, unit);
        max = snap_up(max, unit);

        let mut units = Vec::new();
        for step in 0..MAX_UNIT_COUNT {
            let value = min + step as f64 * unit;
            if value > max + unit * 1e-9 {
                break;
            }
            units.push(value);
        }

        let legend_min_value = units.first().copied().unwrap_or(min);
        let legend_max_value = units.last().copied().unwrap_or(max);

        trace!(
            unit,
            tick_count,
            legend_min_value,
            legend_max_value,
            "Computed legend units"
        );

        LegendConfig {
            units,
            legend_min_value,
            legend_max_value,
            unit_text: self.unit_text.clone(),
            unit_format: format,
            number_format_digits: if unit >= 1.0 { 0 } else { 1 },
            unit_labels: None,
        }
    }
}

/// Snap down to a multiple of `unit`. Truncation rounds negative values toward
/// zero, so they need one more step down unless already on a multiple.
fn snap_down(value: f64, unit: f64) -> f64 {
    let steps = (value / unit).trunc();
    if value < 0.0 && !is_multiple(value, steps, unit) {
        (steps - 1.0) * unit
    } else {
        steps * unit
    }
}

fn snap_up(value: f64, unit: f64) -> f64 {
    let steps = (value / unit).trunc();
    if value > 0.0 && !is_multiple(value, steps, unit) {
        (steps + 1.0) * unit
    } else {
        steps * unit
    }
}

fn is_multiple(value: f64, steps: f64, unit: f64) -> bool {
    (value - steps * unit).abs() <= unit * 1e-9
}
