use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::CoreError;

/// Number of control points in a legend gradient.
pub const ANCHOR_COUNT: usize = 5;

/// One legend control point: values at `threshold` are painted exactly `rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorAnchor {
    pub threshold: f64,
    pub rgb: Rgb,
}

impl ColorAnchor {
    pub const fn new(threshold: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            threshold,
            rgb: Rgb::new(r, g, b),
        }
    }
}

/// How values outside the anchor range fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessMode {
    /// Keep the outermost anchor color.
    #[default]
    Keep,
    /// Fade toward black.
    Dim,
    /// Fade toward white.
    Lighten,
}

/// A user-forced legend bound, applied only while `enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Overwrite {
    pub enabled: bool,
    pub value: f64,
}

impl Overwrite {
    pub fn active(self) -> Option<f64> {
        self.enabled.then_some(self.value)
    }
}

/// The five-anchor gradient definition edited by the legend color dialog.
///
/// The rendering pipeline only ever reads a snapshot of this struct; a paint
/// cycle clones it once and never observes later edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendColor {
    pub anchors: [ColorAnchor; ANCHOR_COUNT],
    #[serde(default)]
    pub min_brightness: BrightnessMode,
    #[serde(default)]
    pub min_brightness_factor: u8,
    #[serde(default)]
    pub max_brightness: BrightnessMode,
    #[serde(default)]
    pub max_brightness_factor: u8,
    #[serde(default)]
    pub overwrite_min: Overwrite,
    #[serde(default)]
    pub overwrite_max: Overwrite,
}

impl LegendColor {
    pub fn new(anchors: [ColorAnchor; ANCHOR_COUNT]) -> crate::Result<Self> {
        let legend = Self {
            anchors,
            min_brightness: BrightnessMode::Keep,
            min_brightness_factor: 0,
            max_brightness: BrightnessMode::Keep,
            max_brightness_factor: 0,
            overwrite_min: Overwrite::default(),
            overwrite_max: Overwrite::default(),
        };
        legend.validate()?;
        Ok(legend)
    }

    /// Check threshold ordering and brightness factor ranges.
    pub fn validate(&self) -> crate::Result<()> {
        for (index, anchor) in self.anchors.iter().enumerate() {
            if !anchor.threshold.is_finite() {
                return Err(CoreError::NonFiniteThreshold { index });
            }
            if index > 0 {
                let previous = self.anchors[index - 1].threshold;
                if anchor.threshold <= previous {
                    return Err(CoreError::AnchorOrder {
                        index,
                        threshold: anchor.threshold,
                        previous,
                    });
                }
            }
        }
        for factor in [self.min_brightness_factor, self.max_brightness_factor] {
            if factor > 100 {
                return Err(CoreError::InvalidBrightnessFactor(factor));
            }
        }
        Ok(())
    }

    pub fn with_min_brightness(mut self, mode: BrightnessMode, factor: u8) -> Self {
        self.min_brightness = mode;
        self.min_brightness_factor = factor;
        self
    }

    pub fn with_max_brightness(mut self, mode: BrightnessMode, factor: u8) -> Self {
        self.max_brightness = mode;
        self.max_brightness_factor = factor;
        self
    }

    pub fn first(&self) -> &ColorAnchor {
        &self.anchors[0]
    }

    pub fn last(&self) -> &ColorAnchor {
        &self.anchors[ANCHOR_COUNT - 1]
    }
}

// ---------------------------------------------------------------------------
// Builtin legends
// ---------------------------------------------------------------------------

/// Altitude in meters: green lowlands through brown to white peaks.
pub fn altitude() -> LegendColor {
    LegendColor {
        anchors: [
            ColorAnchor::new(0.0, 0x30, 0x90, 0x30),
            ColorAnchor::new(500.0, 0xa0, 0xc0, 0x40),
            ColorAnchor::new(1000.0, 0xc8, 0x96, 0x3c),
            ColorAnchor::new(2000.0, 0x8c, 0x5a, 0x28),
            ColorAnchor::new(3000.0, 0xf0, 0xf0, 0xf0),
        ],
        min_brightness: BrightnessMode::Dim,
        min_brightness_factor: 30,
        max_brightness: BrightnessMode::Keep,
        max_brightness_factor: 0,
        overwrite_min: Overwrite::default(),
        overwrite_max: Overwrite::default(),
    }
}

/// Heart rate in beats per minute.
pub fn pulse() -> LegendColor {
    LegendColor {
        anchors: [
            ColorAnchor::new(50.0, 0x00, 0x80, 0xff),
            ColorAnchor::new(90.0, 0x00, 0xc8, 0x64),
            ColorAnchor::new(125.0, 0xff, 0xdc, 0x00),
            ColorAnchor::new(150.0, 0xff, 0x80, 0x00),
            ColorAnchor::new(200.0, 0xdc, 0x00, 0x00),
        ],
        min_brightness: BrightnessMode::Lighten,
        min_brightness_factor: 50,
        max_brightness: BrightnessMode::Dim,
        max_brightness_factor: 50,
        overwrite_min: Overwrite::default(),
        overwrite_max: Overwrite::default(),
    }
}

/// Speed in km/h.
pub fn speed() -> LegendColor {
    LegendColor {
        anchors: [
            ColorAnchor::new(0.0, 0xdc, 0x00, 0x00),
            ColorAnchor::new(10.0, 0xff, 0x80, 0x00),
            ColorAnchor::new(20.0, 0xff, 0xff, 0x00),
            ColorAnchor::new(30.0, 0x00, 0xc8, 0x00),
            ColorAnchor::new(45.0, 0x00, 0x64, 0xff),
        ],
        min_brightness: BrightnessMode::Keep,
        min_brightness_factor: 0,
        max_brightness: BrightnessMode::Dim,
        max_brightness_factor: 40,
        overwrite_min: Overwrite::default(),
        overwrite_max: Overwrite::default(),
    }
}

/// Pace in seconds per kilometer; fast paces are the low values.
pub fn pace() -> LegendColor {
    LegendColor {
        anchors: [
            ColorAnchor::new(180.0, 0x00, 0x64, 0xff),
            ColorAnchor::new(240.0, 0x00, 0xc8, 0x00),
            ColorAnchor::new(300.0, 0xff, 0xff, 0x00),
            ColorAnchor::new(420.0, 0xff, 0x80, 0x00),
            ColorAnchor::new(600.0, 0xdc, 0x00, 0x00),
        ],
        min_brightness: BrightnessMode::Keep,
        min_brightness_factor: 0,
        max_brightness: BrightnessMode::Dim,
        max_brightness_factor: 40,
        overwrite_min: Overwrite::default(),
        overwrite_max: Overwrite::default(),
    }
}

/// Gradient in percent: blue downhill, green flat, red uphill.
pub fn gradient() -> LegendColor {
    LegendColor {
        anchors: [
            ColorAnchor::new(-20.0, 0x00, 0x00, 0xff),
            ColorAnchor::new(-5.0, 0x00, 0xc8, 0xff),
            ColorAnchor::new(0.0, 0x00, 0xc8, 0x00),
            ColorAnchor::new(5.0, 0xff, 0xc8, 0x00),
            ColorAnchor::new(20.0, 0xff, 0x00, 0x00),
        ],
        min_brightness: BrightnessMode::Dim,
        min_brightness_factor: 50,
        max_brightness: BrightnessMode::Dim,
        max_brightness_factor: 50,
        overwrite_min: Overwrite::default(),
        overwrite_max: Overwrite::default(),
    }
}
