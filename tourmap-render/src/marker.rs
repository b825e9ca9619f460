//! Marker, waypoint and start/end images drawn on top of tracks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tourmap_core::{MarkerBounds, Rgb};
use tracing::trace;

use crate::buffer::RenderBuffer;
use crate::canvas::Canvas;
use crate::font;

/// Padding between banner border and label text.
pub const MARKER_MARGIN: i32 = 2;
/// Length of the pole below a marker banner.
pub const MARKER_POLE: i32 = 16;

const BANNER_BACKGROUND: Rgb = Rgb::new(0xff, 0xff, 0xe1);
const BANNER_BORDER: Rgb = Rgb::new(0x40, 0x40, 0x40);
const LABEL_COLOR: Rgb = Rgb::BLACK;

const START_COLOR: Rgb = Rgb::new(0x00, 0xb4, 0x00);
const END_COLOR: Rgb = Rgb::new(0xe6, 0x00, 0x00);
const WAYPOINT_COLOR: Rgb = Rgb::new(0xff, 0x8c, 0x00);
const PIN_OUTLINE: Rgb = Rgb::new(0x20, 0x20, 0x20);

/// Footprint of a marker with `label`: banner plus pole.
pub fn measure_marker(label: &str) -> MarkerBounds {
    let (text_width, text_height) = font::text_extent(label);
    let banner_width = text_width + 2 * MARKER_MARGIN + 1;
    let banner_height = text_height + 2 * MARKER_MARGIN;
    MarkerBounds {
        banner_width,
        banner_height,
        width: banner_width,
        height: banner_height + MARKER_POLE,
    }
}

/// Banner with the label and a pole whose foot marks the anchor point.
pub fn render_marker_image(label: &str, bounds: MarkerBounds) -> RenderBuffer {
    let mut image = RenderBuffer::transparent(bounds.width as u32, bounds.height as u32);

    image.fill_rect(0, 0, bounds.banner_width, bounds.banner_height, BANNER_BORDER);
    image.fill_rect(
        1,
        1,
        bounds.banner_width - 2,
        bounds.banner_height - 2,
        BANNER_BACKGROUND,
    );
    image.draw_text(label, MARKER_MARGIN + 1, MARKER_MARGIN, LABEL_COLOR);

    let pole_x = bounds.width / 2;
    image.draw_line(
        pole_x,
        bounds.banner_height,
        pole_x,
        bounds.height - 1,
        1,
        BANNER_BORDER,
    );
    image
}

/// Round head on a short pole, e.g. for tour start/end and waypoints.
fn pin_image(diameter: i32, pole: i32, color: Rgb) -> RenderBuffer {
    let mut image = RenderBuffer::transparent(diameter as u32, (diameter + pole) as u32);
    let center = diameter / 2;
    image.draw_line(center, diameter - 1, center, diameter + pole - 1, 2, PIN_OUTLINE);
    image.fill_oval(0, 0, diameter, diameter, PIN_OUTLINE);
    image.fill_oval(2, 2, diameter - 4, diameter - 4, color);
    image
}

/// Fixed images shared by every paint: tour start, tour end and waypoint.
#[derive(Debug, Clone)]
pub struct SymbolImages {
    pub start: Arc<RenderBuffer>,
    pub end: Arc<RenderBuffer>,
    pub waypoint: Arc<RenderBuffer>,
}

impl Default for SymbolImages {
    fn default() -> Self {
        Self {
            start: Arc::new(pin_image(14, 8, START_COLOR)),
            end: Arc::new(pin_image(14, 8, END_COLOR)),
            waypoint: Arc::new(pin_image(10, 6, WAYPOINT_COLOR)),
        }
    }
}

/// Rasterized marker labels, shared across tiles of one repaint.
#[derive(Debug, Default)]
pub struct MarkerImageCache {
    images: Mutex<HashMap<String, Arc<RenderBuffer>>>,
}

impl MarkerImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The image for `label`, rendered on first request.
    pub fn get_or_render(&self, label: &str, bounds: MarkerBounds) -> Arc<RenderBuffer> {
        let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(image) = images.get(label) {
            return Arc::clone(image);
        }
        trace!(label, "Rendering marker image");
        let image = Arc::new(render_marker_image(label, bounds));
        images.insert(label.to_string(), Arc::clone(&image));
        image
    }

    pub fn len(&self) -> usize {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all images; called once per full repaint.
    pub fn clear(&self) {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
