pub mod buffer;
pub mod canvas;
pub mod error;
pub mod export;
pub mod font;
pub mod legend;
pub mod marker;
pub mod painter;
pub mod renderer;
pub mod tile;

pub use buffer::RenderBuffer;
pub use canvas::{Canvas, DrawOp, RecordingCanvas};
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use legend::{
    draw_legend, legend_labels, legend_value_position, LegendLabel, DEFAULT_LEGEND_HEIGHT,
    DEFAULT_LEGEND_WIDTH, LEGEND_GRAPHIC_WIDTH,
};
pub use marker::{measure_marker, MarkerImageCache, SymbolImages};
pub use painter::{
    BorderType, PaintConfig, PaintResult, PlotType, RenderContext, TileOverlayPainter,
};
pub use renderer::{paint_tiles, PaintRun, TileImage};
pub use tile::{build_tile_grid, check_parts, TileViewport, MAX_PARTS, MAX_TILE_SIZE, TILE_SIZE};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
