use tourmap_core::Rgb;

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::font;

/// An RGBA pixel buffer representing a painted image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> Self {
        let mut buffer = Self::transparent(width, height);
        for chunk in buffer.pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        buffer
    }

    /// Create a fully transparent buffer, the background of tile overlays.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: color.to_rgba().repeat(width as usize * height as usize),
        }
    }

    pub fn check_dimensions(width: u32, height: u32) -> crate::Result<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// RGBA of a pixel, `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[i..i + 4]);
        Some(rgba)
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_rgba());
        }
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    fn blend_pixel(&mut self, x: i32, y: i32, src: &[u8]) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let alpha = src[3] as u32;
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.pixels[i..i + 4].copy_from_slice(src);
            return;
        }
        let dst = &mut self.pixels[i..i + 4];
        for c in 0..3 {
            dst[c] = ((src[c] as u32 * alpha + dst[c] as u32 * (255 - alpha)) / 255) as u8;
        }
        dst[3] = (alpha + dst[3] as u32 * (255 - alpha) / 255) as u8;
    }

    /// Stamp a disc of diameter `width` centered on `(cx, cy)`.
    fn stamp(&mut self, cx: i32, cy: i32, width: u32, color: Rgb) {
        let w = width as i32;
        if w <= 1 {
            self.set_pixel(cx, cy, color);
            return;
        }
        self.fill_oval(cx - w / 2, cy - w / 2, w, w, color);
    }
}

impl Canvas for RenderBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, line_width: u32, color: Rgb) {
        // Bresenham, stamping the pen at each step.
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.stamp(x, y, line_width, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + width).min(self.width as i32);
        let y_end = (y + height).min(self.height as i32);
        for py in y_start..y_end {
            for px in x_start..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    fn fill_oval(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb) {
        if width <= 0 || height <= 0 {
            return;
        }
        let rx = width as f64 / 2.0;
        let ry = height as f64 / 2.0;
        let cx = x as f64 + rx;
        let cy = y as f64 + ry;
        for py in y.max(0)..(y + height).min(self.height as i32) {
            for px in x.max(0)..(x + width).min(self.width as i32) {
                let nx = (px as f64 + 0.5 - cx) / rx;
                let ny = (py as f64 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.set_pixel(px, py, color);
                }
            }
        }
    }

    fn draw_image(&mut self, image: &RenderBuffer, x: i32, y: i32) {
        for iy in 0..image.height as i32 {
            let ty = y + iy;
            if ty < 0 || ty >= self.height as i32 {
                continue;
            }
            for ix in 0..image.width as i32 {
                let Some(i) = image.index(ix, iy) else {
                    continue;
                };
                self.blend_pixel(x + ix, ty, &image.pixels[i..i + 4]);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb) {
        let [r, g, b, _] = color.to_rgba();
        font::rasterize(text, x, y, |px, py, coverage| {
            self.blend_pixel(px, py, &[r, g, b, coverage])
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = RenderBuffer::new(4, 4);
        assert_eq!(buf.pixels.len(), 4 * 4 * 4);
        for chunk in buf.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn transparent_buffer_has_no_painted_pixels() {
        assert_eq!(RenderBuffer::transparent(8, 8).painted_pixel_count(), 0);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut buf = RenderBuffer::transparent(8, 8);
        buf.fill_rect(-2, 6, 4, 10, RED);
        assert_eq!(buf.painted_pixel_count(), 2 * 2);
        assert_eq!(buf.pixel(0, 7), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(2, 7), Some([0, 0, 0, 0]));
    }

    #[test]
    fn thin_line_hits_both_endpoints() {
        let mut buf = RenderBuffer::transparent(16, 16);
        buf.draw_line(1, 2, 12, 9, 1, RED);
        assert_eq!(buf.pixel(1, 2), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(12, 9), Some([255, 0, 0, 255]));
        assert_eq!(buf.painted_pixel_count(), 12);
    }

    #[test]
    fn thick_line_is_wider() {
        let mut thin = RenderBuffer::transparent(32, 32);
        let mut thick = RenderBuffer::transparent(32, 32);
        thin.draw_line(4, 16, 28, 16, 1, RED);
        thick.draw_line(4, 16, 28, 16, 5, RED);
        assert!(thick.painted_pixel_count() > 4 * thin.painted_pixel_count());
    }

    #[test]
    fn oval_is_inscribed() {
        let mut buf = RenderBuffer::transparent(10, 10);
        buf.fill_oval(0, 0, 10, 10, RED);
        assert_eq!(buf.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn draw_image_skips_transparent_pixels() {
        let mut image = RenderBuffer::transparent(2, 2);
        image.set_pixel(1, 1, RED);
        let mut buf = RenderBuffer::new(4, 4);
        buf.draw_image(&image, 2, 2);
        assert_eq!(buf.pixel(2, 2), Some([0, 0, 0, 255]));
        assert_eq!(buf.pixel(3, 3), Some([255, 0, 0, 255]));
    }

    #[test]
    fn text_is_painted() {
        let mut buf = RenderBuffer::transparent(40, 12);
        buf.draw_text("12", 0, 0, Rgb::WHITE);
        assert!(buf.painted_pixel_count() > 0);
        // edges of the glyphs are blended, not stamped
        assert!(buf
            .pixels
            .chunks_exact(4)
            .any(|px| px[3] > 0 && px[3] < 255));
    }
}
