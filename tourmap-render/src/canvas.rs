use tourmap_core::Rgb;

use crate::buffer::RenderBuffer;
use crate::font;

/// Drawing surface used by the tile painter and the legend renderer.
///
/// Coordinates are device pixels of the surface; anything outside is clipped
/// by the implementation.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Line from `(x0, y0)` to `(x1, y1)`, `line_width` pixels thick.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, line_width: u32, color: Rgb);

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb);

    /// Ellipse inscribed in the rectangle at `(x, y)`.
    fn fill_oval(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb);

    /// Alpha blend `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &RenderBuffer, x: i32, y: i32);

    /// Text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb);

    fn text_extent(&self, text: &str) -> (i32, i32) {
        font::text_extent(text)
    }
}

/// A drawing command captured by [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Line {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        width: u32,
        color: Rgb,
    },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Rgb,
    },
    Oval {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Rgb,
    },
    Image {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        color: Rgb,
    },
}

impl DrawOp {
    /// The same command moved by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> DrawOp {
        match self.clone() {
            DrawOp::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color,
            } => DrawOp::Line {
                x0: x0 + dx,
                y0: y0 + dy,
                x1: x1 + dx,
                y1: y1 + dy,
                width,
                color,
            },
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => DrawOp::Rect {
                x: x + dx,
                y: y + dy,
                width,
                height,
                color,
            },
            DrawOp::Oval {
                x,
                y,
                width,
                height,
                color,
            } => DrawOp::Oval {
                x: x + dx,
                y: y + dy,
                width,
                height,
                color,
            },
            DrawOp::Image {
                x,
                y,
                width,
                height,
            } => DrawOp::Image {
                x: x + dx,
                y: y + dy,
                width,
                height,
            },
            DrawOp::Text { text, x, y, color } => DrawOp::Text {
                text,
                x: x + dx,
                y: y + dy,
                color,
            },
        }
    }
}

/// Canvas that only records commands, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, line_width: u32, color: Rgb) {
        self.ops.push(DrawOp::Line {
            x0,
            y0,
            x1,
            y1,
            width: line_width,
            color,
        });
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_oval(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        self.ops.push(DrawOp::Oval {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_image(&mut self, image: &RenderBuffer, x: i32, y: i32) {
        self.ops.push(DrawOp::Image {
            x,
            y,
            width: image.width,
            height: image.height,
        });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut canvas = RecordingCanvas::new(10, 10);
        canvas.draw_line(0, 0, 5, 5, 2, Rgb::BLUE);
        canvas.fill_rect(1, 1, 2, 2, Rgb::WHITE);
        assert_eq!(canvas.ops.len(), 2);
        assert_eq!(canvas.lines().count(), 1);
    }

    #[test]
    fn translated_moves_every_coordinate() {
        let op = DrawOp::Line {
            x0: 1,
            y0: 2,
            x1: 3,
            y1: 4,
            width: 1,
            color: Rgb::BLACK,
        };
        assert_eq!(
            op.translated(10, 20),
            DrawOp::Line {
                x0: 11,
                y0: 22,
                x1: 13,
                y1: 24,
                width: 1,
                color: Rgb::BLACK,
            }
        );
    }
}
