//! Legend image: the gradient of the active metric with its unit labels.

use tourmap_core::{GradientColorProvider, LegendConfig, Rgb, LEGEND_MARGIN_TOP_BOTTOM};
use tracing::debug;

use crate::buffer::RenderBuffer;
use crate::canvas::Canvas;

pub const DEFAULT_LEGEND_WIDTH: u32 = 150;
pub const DEFAULT_LEGEND_HEIGHT: u32 = 300;
/// Width of the color bar of a vertical legend.
pub const LEGEND_GRAPHIC_WIDTH: i32 = 20;

const BAR_BORDER: Rgb = Rgb::new(0x80, 0x80, 0x80);
const LABEL_HALO: Rgb = Rgb::new(0xf1, 0xee, 0xe8);
const LABEL_COLOR: Rgb = Rgb::BLACK;

/// A unit label and where it sits on a vertical legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLabel {
    pub value: f64,
    pub text: String,
    pub position_y: i32,
}

/// Walk the legend pixel by pixel from the minimum upward, reporting each
/// pixel's value and the unit (by index) first reached at that pixel.
fn scan_legend(
    config: &LegendConfig,
    available_pixels: i32,
    mut visit: impl FnMut(i32, f64, Option<usize>),
) {
    if available_pixels <= 0 {
        return;
    }
    let pixel_value = config.legend_range() / available_pixels as f64;
    // keeps the topmost unit from being lost to float error
    let rounding = pixel_value / 100.0;

    let mut next_unit = 0;
    for pixel in 0..=available_pixels {
        let value = config.legend_min_value + pixel_value * pixel as f64;
        let unit = match config.units.get(next_unit) {
            Some(&unit) if value + rounding >= unit => {
                next_unit += 1;
                Some(next_unit - 1)
            }
            _ => None,
        };
        visit(pixel, value, unit);
    }
}

/// Unit labels of a vertical legend `legend_height` pixels high, lowest value first.
pub fn legend_labels(config: &LegendConfig, legend_height: u32) -> Vec<LegendLabel> {
    let top = 1;
    let available = legend_height as i32 - 3;
    let mut labels = Vec::with_capacity(config.units.len());
    scan_legend(config, available, |pixel, _, unit| {
        if let Some(index) = unit {
            labels.push(LegendLabel {
                value: config.units[index],
                text: config.unit_label(index),
                position_y: top + available - pixel,
            });
        }
    });
    labels
}

/// Position of `value` inside a vertical legend, `None` unless it lies
/// strictly between the legend bounds.
pub fn legend_value_position(
    config: &LegendConfig,
    legend_bounds_y: i32,
    legend_height: u32,
    value: f64,
) -> Option<i32> {
    if value <= config.legend_min_value || value >= config.legend_max_value {
        return None;
    }
    let margin = LEGEND_MARGIN_TOP_BOTTOM as i32;
    let position_y = legend_bounds_y + margin;
    let height = legend_height as i32 - 2 * margin;
    let pixel_diff = (height - 1) as f64;

    let offset = (value - config.legend_min_value) * pixel_diff / config.legend_range();
    Some(position_y + offset as i32)
}

/// Render the legend of `provider`.
///
/// Vertical legends show a color bar on the left with unit labels beside it,
/// the maximum at the top. Horizontal legends are a bare color strip.
pub fn draw_legend(
    provider: &GradientColorProvider,
    width: u32,
    height: u32,
    vertical: bool,
) -> crate::Result<RenderBuffer> {
    RenderBuffer::check_dimensions(width, height)?;
    let config = provider.config();
    let mut image = RenderBuffer::transparent(width, height);

    if vertical {
        let margin = LEGEND_MARGIN_TOP_BOTTOM as i32;
        let content_y = margin;
        let available = height as i32 - 2 * margin;

        stroke_rect(&mut image, 0, content_y, LEGEND_GRAPHIC_WIDTH, available, BAR_BORDER);

        let mut labels = Vec::new();
        scan_legend(config, available, |pixel, value, unit| {
            let y = content_y + available - pixel;
            let color = provider.color_for_value(value);
            image.draw_line(0, y, LEGEND_GRAPHIC_WIDTH, y, 1, color);
            if let Some(index) = unit {
                labels.push((y, config.unit_label(index)));
            }
        });

        // labels go on top of the color lines
        for (y, text) in &labels {
            let (_, text_height) = image.text_extent(text);
            draw_haloed_text(&mut image, text, LEGEND_GRAPHIC_WIDTH + 7, y - text_height / 2);
        }
    } else {
        let available = width as i32;
        scan_legend(config, available, |pixel, value, _| {
            let color = provider.color_for_value(value);
            image.draw_line(pixel, 0, pixel, height as i32 - 1, 1, color);
        });
        stroke_rect(&mut image, 0, 0, width as i32 - 1, height as i32 - 1, BAR_BORDER);
    }

    debug!(
        metric = ?provider.metric(),
        width,
        height,
        vertical,
        units = config.units.len(),
        "Rendered legend"
    );
    Ok(image)
}

fn draw_haloed_text(image: &mut RenderBuffer, text: &str, x: i32, y: i32) {
    for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        image.draw_text(text, x + dx, y + dy, LABEL_HALO);
    }
    image.draw_text(text, x, y, LABEL_COLOR);
}

fn stroke_rect(image: &mut RenderBuffer, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
    image.draw_line(x, y, x + width, y, 1, color);
    image.draw_line(x, y + height, x + width, y + height, 1, color);
    image.draw_line(x, y, x, y + height, 1, color);
    image.draw_line(x + width, y, x + width, y + height, 1, color);
}
