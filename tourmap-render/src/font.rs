//! Label text for markers and legends, rasterized from the embedded DejaVu Sans.
//!
//! Text is laid out on one line. Extents cover every pixel `rasterize`
//! produces, so banners measured with `text_extent` always hold their label.

use std::sync::OnceLock;

use fontdue::{Font, FontSettings, Metrics};
use tracing::warn;

/// Glyph size in pixels.
pub const PIXEL_SIZE: f32 = 12.0;

static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT: OnceLock<Option<Font>> = OnceLock::new();

fn font() -> Option<&'static Font> {
    FONT.get_or_init(|| match Font::from_bytes(FONT_DATA, FontSettings::default()) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!(error = %e, "Label font could not be parsed, labels are not drawn");
            None
        }
    })
    .as_ref()
}

struct Glyph {
    c: char,
    /// Top-left corner of the glyph bitmap, relative to the line's top-left.
    x: i32,
    y: i32,
    metrics: Metrics,
}

struct Layout {
    glyphs: Vec<Glyph>,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

fn layout(font: &Font, text: &str) -> Layout {
    let (ascent, line_height) = match font.horizontal_line_metrics(PIXEL_SIZE) {
        Some(line) => (line.ascent.ceil() as i32, (line.ascent - line.descent).ceil() as i32),
        None => (PIXEL_SIZE.ceil() as i32, PIXEL_SIZE.ceil() as i32),
    };

    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let (mut left, mut top) = (0, 0);
    let mut bottom = line_height;
    for c in text.chars() {
        let metrics = font.metrics(c, PIXEL_SIZE);
        let x = pen.round() as i32 + metrics.xmin;
        // ymin is the bitmap's bottom edge above the baseline
        let y = ascent - metrics.ymin - metrics.height as i32;
        if metrics.width > 0 && metrics.height > 0 {
            left = left.min(x);
            top = top.min(y);
            bottom = bottom.max(y + metrics.height as i32);
        }
        pen += metrics.advance_width;
        glyphs.push(Glyph { c, x, y, metrics });
    }

    let mut right = pen.ceil() as i32;
    for g in glyphs.iter().filter(|g| g.metrics.width > 0) {
        right = right.max(g.x + g.metrics.width as i32);
    }
    if text.is_empty() {
        right = 0;
    }

    Layout {
        glyphs,
        left,
        top,
        width: right - left,
        height: bottom - top,
    }
}

/// Width and height of `text` in pixels.
pub fn text_extent(text: &str) -> (i32, i32) {
    match font() {
        Some(font) => {
            let layout = layout(font, text);
            (layout.width, layout.height)
        }
        None => (0, 0),
    }
}

/// Call `plot(x, y, coverage)` for every covered pixel of `text` with its
/// top-left corner at `(x, y)`.
pub fn rasterize(text: &str, x: i32, y: i32, mut plot: impl FnMut(i32, i32, u8)) {
    let Some(font) = font() else {
        return;
    };
    let layout = layout(font, text);
    let (origin_x, origin_y) = (x - layout.left, y - layout.top);
    for glyph in &layout.glyphs {
        if glyph.metrics.width == 0 {
            continue;
        }
        let (metrics, coverage) = font.rasterize(glyph.c, PIXEL_SIZE);
        if metrics.width == 0 {
            continue;
        }
        for (row, line) in coverage.chunks_exact(metrics.width).enumerate() {
            for (col, &alpha) in line.iter().enumerate() {
                if alpha > 0 {
                    plot(
                        origin_x + glyph.x + col as i32,
                        origin_y + glyph.y + row as i32,
                        alpha,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pixels(text: &str) -> HashMap<(i32, i32), u8> {
        let mut out = HashMap::new();
        rasterize(text, 0, 0, |x, y, a| {
            out.insert((x, y), a);
        });
        out
    }

    #[test]
    fn embedded_font_loads() {
        let font = font().unwrap();
        assert_ne!(font.lookup_glyph_index('ö'), 0);
        assert_ne!(font.lookup_glyph_index('€'), 0);
    }

    #[test]
    fn extent_of_label() {
        let (empty_w, line) = text_extent("");
        assert_eq!(empty_w, 0);
        assert!(line >= PIXEL_SIZE as i32);

        let (a, a_h) = text_extent("A");
        let (summit, summit_h) = text_extent("Summit");
        assert!(a > 0);
        assert!(summit > a);
        assert_eq!(a_h, line);
        assert_eq!(summit_h, line);
    }

    #[test]
    fn rasterized_pixels_stay_within_extent() {
        for text in ["4:30 min/km", "jQ|", "Höhe über Meer", "ÅÉ"] {
            let (w, h) = text_extent(text);
            rasterize(text, 0, 0, |x, y, _| {
                assert!(x >= 0 && x < w, "{text}: x {x} outside {w}");
                assert!(y >= 0 && y < h, "{text}: y {y} outside {h}");
            });
        }
    }

    #[test]
    fn umlauts_are_drawn_as_their_own_glyphs() {
        let plain = pixels("Hohe");
        let umlaut = pixels("Höhe");
        let unknown = pixels("H?he");
        assert!(!umlaut.is_empty());
        assert_ne!(umlaut, plain);
        assert_ne!(umlaut, unknown);
        // dots above the o are the only extra ink
        assert!(umlaut.len() > plain.len());
    }

    #[test]
    fn lowercase_differs_from_uppercase() {
        assert_ne!(pixels("km"), pixels("KM"));
    }

    #[test]
    fn space_draws_nothing() {
        assert!(pixels("   ").is_empty());
        assert!(text_extent("   ").0 > 0);
    }
}
