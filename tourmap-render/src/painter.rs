use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use tourmap_core::{ColorCache, ColorSource, MarkerBounds, Projector, Rgb, Track, WorldPixel};

use crate::buffer::RenderBuffer;
use crate::canvas::Canvas;
use crate::marker::{measure_marker, MarkerImageCache, SymbolImages};
use crate::tile::TileViewport;

// ---------------------------------------------------------------------------
// Paint configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotType {
    #[default]
    Line,
    Dot,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderType {
    /// A fixed border color.
    Color,
    /// The line color darkened by `border_dimm` percent.
    #[default]
    Darker,
}

fn default_true() -> bool {
    true
}

fn default_line_width() -> u32 {
    3
}

fn default_border_width() -> u32 {
    1
}

fn default_border_dimm() -> u8 {
    20
}

fn default_line_color() -> Rgb {
    Rgb::BLUE
}

/// How tracks and their decorations are painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintConfig {
    #[serde(default = "default_true")]
    pub draw_tour: bool,
    #[serde(default = "default_true")]
    pub draw_start_end: bool,
    #[serde(default = "default_true")]
    pub draw_markers: bool,
    #[serde(default = "default_true")]
    pub draw_waypoints: bool,
    #[serde(default)]
    pub plot_type: PlotType,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default = "default_true")]
    pub draw_border: bool,
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    #[serde(default)]
    pub border_type: BorderType,
    #[serde(default)]
    pub border_color: Rgb,
    /// Percent the line color is darkened for `BorderType::Darker`.
    #[serde(default = "default_border_dimm")]
    pub border_dimm: u8,
    /// Used when a track has no value for the active metric.
    #[serde(default = "default_line_color")]
    pub default_color: Rgb,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            draw_tour: true,
            draw_start_end: true,
            draw_markers: true,
            draw_waypoints: true,
            plot_type: PlotType::Line,
            line_width: default_line_width(),
            draw_border: true,
            border_width: default_border_width(),
            border_type: BorderType::Darker,
            border_color: Rgb::BLACK,
            border_dimm: default_border_dimm(),
            default_color: default_line_color(),
        }
    }
}

impl PaintConfig {
    /// Channel factor applied to line colors for darker borders.
    pub fn border_brightness(&self) -> f32 {
        1.0 - self.border_dimm.min(100) as f32 / 100.0
    }
}

// ---------------------------------------------------------------------------
// Context and result
// ---------------------------------------------------------------------------

/// Snapshot of everything one paint cycle reads.
///
/// The color source is cloned in when the cycle starts, so edits to the
/// legend during painting never reach tiles of the same cycle.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub tracks: Vec<Arc<Track>>,
    pub color_source: ColorSource,
    pub config: PaintConfig,
}

impl RenderContext {
    pub fn new(tracks: Vec<Arc<Track>>, color_source: ColorSource, config: PaintConfig) -> Self {
        Self {
            tracks,
            color_source,
            config,
        }
    }
}

/// What a single tile paint produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintResult {
    pub is_content_in_tile: bool,
    pub segments: usize,
    pub symbols: usize,
    pub markers: usize,
    pub waypoints: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Border,
    Fill,
}

// ---------------------------------------------------------------------------
// Painter
// ---------------------------------------------------------------------------

/// Paints the tracks of a [`RenderContext`] onto individual map tiles.
pub struct TileOverlayPainter {
    context: RenderContext,
    projector: Arc<dyn Projector>,
    zoom: u32,
    symbols: SymbolImages,
    marker_images: MarkerImageCache,
}

impl TileOverlayPainter {
    pub fn new(context: RenderContext, projector: Arc<dyn Projector>, zoom: u32) -> Self {
        Self {
            context,
            projector,
            zoom,
            symbols: SymbolImages::default(),
            marker_images: MarkerImageCache::new(),
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn projector(&self) -> &dyn Projector {
        self.projector.as_ref()
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn marker_images(&self) -> &MarkerImageCache {
        &self.marker_images
    }

    /// Start a full repaint: marker label images are rendered afresh.
    pub fn begin_repaint(&self) {
        self.marker_images.clear();
    }

    fn pixels(&self, track: &Track) -> Arc<[WorldPixel]> {
        track.world_pixels(self.projector.as_ref(), self.zoom)
    }

    /// Whether anything of the context could be visible in `tile`.
    pub fn is_painting_needed(&self, tile: &TileViewport) -> bool {
        let config = &self.context.config;

        for track in &self.context.tracks {
            if !track.has_positions() {
                continue;
            }
            let pixels = self.pixels(track);

            if config.draw_tour && pixels.iter().any(|&p| tile.contains(p)) {
                return true;
            }

            if config.draw_start_end {
                if let (Some(&start), Some(&end)) = (pixels.first(), pixels.last()) {
                    if footprint_touches(tile, start, image_size(&self.symbols.start))
                        || footprint_touches(tile, end, image_size(&self.symbols.end))
                    {
                        return true;
                    }
                }
            }

            if config.draw_markers {
                for marker in paintable_markers(track, pixels.len()) {
                    let bounds = marker.bounds_or_init(measure_marker);
                    let size = (bounds.width, bounds.height);
                    if footprint_touches(tile, pixels[marker.serie_index], size) {
                        return true;
                    }
                }
            }
        }

        if config.draw_waypoints {
            let size = image_size(&self.symbols.waypoint);
            for track in &self.context.tracks {
                if track.waypoints.is_empty() {
                    continue;
                }
                let pixels = track.waypoint_pixels(self.projector.as_ref(), self.zoom);
                if pixels.iter().any(|&p| footprint_touches(tile, p, size)) {
                    return true;
                }
            }
        }

        false
    }

    /// Paint `tile` onto `canvas`, which is `parts` tiles wide and high with
    /// `tile` in the center.
    pub fn do_paint<C: Canvas + ?Sized>(
        &self,
        tile: &TileViewport,
        parts: u32,
        canvas: &mut C,
    ) -> PaintResult {
        let config = &self.context.config;
        let offset = tile.dev_part_offset(parts);
        let mut result = PaintResult::default();
        let mut colors = ColorCache::new();

        if config.draw_tour {
            for track in &self.context.tracks {
                if !track.has_positions() {
                    continue;
                }
                let pixels = self.pixels(track);
                let passes: &[Pass] = if config.draw_border {
                    &[Pass::Border, Pass::Fill]
                } else {
                    &[Pass::Fill]
                };
                for &pass in passes {
                    self.paint_track(
                        track,
                        &pixels,
                        tile,
                        offset,
                        pass,
                        canvas,
                        &mut colors,
                        &mut result,
                    );
                }
            }
        }

        for track in &self.context.tracks {
            if !track.has_positions() {
                continue;
            }
            let pixels = self.pixels(track);

            if config.draw_start_end {
                // end first so the start stays visible on round trips
                if let Some(&end) = pixels.last() {
                    if self.paint_symbol(&self.symbols.end, tile, end, offset, canvas) {
                        result.symbols += 1;
                    }
                }
                if let Some(&start) = pixels.first() {
                    if self.paint_symbol(&self.symbols.start, tile, start, offset, canvas) {
                        result.symbols += 1;
                    }
                }
            }

            if config.draw_markers {
                for marker in paintable_markers(track, pixels.len()) {
                    let bounds = marker.bounds_or_init(measure_marker);
                    let (x, y) = tile.to_device(pixels[marker.serie_index]);
                    if !is_bounds_in_tile(bounds, x, y, tile.size as i32) {
                        continue;
                    }
                    let image = self.marker_images.get_or_render(&marker.label, bounds);
                    canvas.draw_image(
                        &image,
                        x - bounds.width / 2 + offset,
                        y - bounds.height + offset,
                    );
                    result.markers += 1;
                }
            }
        }

        if config.draw_waypoints {
            for track in &self.context.tracks {
                if track.waypoints.is_empty() {
                    continue;
                }
                let pixels = track.waypoint_pixels(self.projector.as_ref(), self.zoom);
                for &p in pixels.iter() {
                    if self.paint_symbol(&self.symbols.waypoint, tile, p, offset, canvas) {
                        result.waypoints += 1;
                    }
                }
            }
        }

        result.is_content_in_tile =
            result.segments + result.symbols + result.markers + result.waypoints > 0;

        trace!(
            world_x = tile.world_x,
            world_y = tile.world_y,
            parts,
            segments = result.segments,
            symbols = result.symbols,
            markers = result.markers,
            waypoints = result.waypoints,
            "Painted tile"
        );
        result
    }

    fn paint_symbol<C: Canvas + ?Sized>(
        &self,
        image: &RenderBuffer,
        tile: &TileViewport,
        position: WorldPixel,
        offset: i32,
        canvas: &mut C,
    ) -> bool {
        let (x, y) = tile.to_device(position);
        let (width, height) = image_size(image);
        let bounds = MarkerBounds {
            banner_width: width,
            banner_height: height,
            width,
            height,
        };
        if !is_bounds_in_tile(bounds, x, y, tile.size as i32) {
            return false;
        }
        canvas.draw_image(image, x - width / 2 + offset, y - height + offset);
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_track<C: Canvas + ?Sized>(
        &self,
        track: &Track,
        pixels: &[WorldPixel],
        tile: &TileViewport,
        offset: i32,
        pass: Pass,
        canvas: &mut C,
        colors: &mut ColorCache,
        result: &mut PaintResult,
    ) {
        let config = &self.context.config;
        let source = &self.context.color_source;

        let width = match pass {
            Pass::Border => config.line_width + 2 * config.border_width,
            Pass::Fill => config.line_width,
        };
        let brightness = config.border_brightness();
        let mut color_at = |index: usize, is_line: bool| -> Rgb {
            let color = source
                .cached_color_for(colors, track, index, is_line)
                .unwrap_or(config.default_color);
            match (pass, config.border_type) {
                (Pass::Fill, _) => color,
                (Pass::Border, BorderType::Color) => config.border_color,
                (Pass::Border, BorderType::Darker) => color.scaled(brightness),
            }
        };
        let device = |p: WorldPixel| -> (i32, i32) {
            let (x, y) = tile.to_device(p);
            (x + offset, y + offset)
        };
        let w = width as i32;

        match config.plot_type {
            PlotType::Line => {
                let mut from = (0, 0);
                let mut last_inside: Option<usize> = None;

                for (index, &p) in pixels.iter().enumerate() {
                    let to = device(p);
                    if index == 0 {
                        from = to;
                        continue;
                    }

                    if tile.contains(p) {
                        if to != from {
                            let color = color_at(index, true);
                            canvas.draw_line(from.0, from.1, to.0, to.1, width, color);
                            if width == 2 {
                                canvas.fill_rect(to.0 - w / 2, to.1 - w / 2, w, w, color);
                            } else {
                                canvas.fill_oval(to.0 - w / 2, to.1 - w / 2, w, w, color);
                            }
                            if pass == Pass::Fill {
                                result.segments += 1;
                            }
                        }
                        last_inside = Some(index);
                    } else if last_inside == Some(index - 1) {
                        // leave the tile with a segment toward the outside sample
                        let color = color_at(index - 1, true);
                        canvas.draw_line(from.0, from.1, to.0, to.1, width, color);
                        if pass == Pass::Fill {
                            result.segments += 1;
                        }
                    }

                    from = to;
                }
            }

            PlotType::Dot | PlotType::Square => {
                let mut last_drawn: Option<(i32, i32)> = None;
                for (index, &p) in pixels.iter().enumerate() {
                    if !tile.contains(p) {
                        continue;
                    }
                    let at = device(p);
                    if last_drawn == Some(at) {
                        continue;
                    }
                    let color = color_at(index, false);
                    if config.plot_type == PlotType::Dot {
                        canvas.fill_oval(at.0 - w / 2, at.1 - w / 2, w, w, color);
                    } else {
                        canvas.fill_rect(at.0 - w / 2, at.1 - w / 2, w, w, color);
                    }
                    last_drawn = Some(at);
                    if pass == Pass::Fill {
                        result.segments += 1;
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds tests
// ---------------------------------------------------------------------------

fn image_size(image: &RenderBuffer) -> (i32, i32) {
    (image.width as i32, image.height as i32)
}

fn paintable_markers(
    track: &Track,
    sample_count: usize,
) -> impl Iterator<Item = &tourmap_core::TrackMarker> {
    track.markers.iter().filter(move |m| {
        m.visible && !m.label.is_empty() && m.serie_index < sample_count
    })
}

/// Whether an image of `bounds`, hanging above `(x, y)` and centered
/// horizontally, touches a tile of `size` pixels in device space.
pub fn is_bounds_in_tile(bounds: MarkerBounds, x: i32, y: i32, size: i32) -> bool {
    let left = x - bounds.width / 2;
    let right = x + bounds.width / 2;
    let top = y - bounds.height;

    let in_range = |v: i32| (0..=size).contains(&v);
    (in_range(left) || in_range(right)) && (in_range(y) || in_range(top))
}

/// World space footprint test for images anchored at their bottom center.
pub fn footprint_touches(tile: &TileViewport, p: WorldPixel, (width, height): (i32, i32)) -> bool {
    p.x - width / 2 + width >= tile.world_x
        && p.x - width / 2 < tile.right()
        && p.y >= tile.world_y
        && p.y < tile.bottom() + height
}
