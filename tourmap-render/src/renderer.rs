use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::buffer::RenderBuffer;
use crate::painter::{PaintResult, TileOverlayPainter};
use crate::tile::{check_parts, TileViewport};

/// One painted overlay tile.
#[derive(Debug, Clone)]
pub struct TileImage {
    pub tile: TileViewport,
    pub parts: u32,
    pub buffer: RenderBuffer,
    pub result: PaintResult,
}

/// Summary of a multi-tile paint.
#[derive(Debug)]
pub struct PaintRun {
    pub images: Vec<TileImage>,
    pub elapsed: Duration,
    pub tiles_requested: usize,
    pub tiles_skipped: usize,
}

/// Paint many tiles in parallel, each into its own transparent buffer.
///
/// Starts a full repaint (marker images are re-rendered once) and skips
/// tiles for which painting is not needed. Tiles that turn out empty are
/// dropped as well.
pub fn paint_tiles(
    painter: &TileOverlayPainter,
    tiles: &[TileViewport],
    parts: u32,
) -> crate::Result<PaintRun> {
    let parts = check_parts(parts)?;
    let start = Instant::now();
    painter.begin_repaint();

    debug!(tiles = tiles.len(), parts, zoom = painter.zoom(), "Painting tiles");

    let images: Vec<TileImage> = tiles
        .par_iter()
        .filter(|tile| painter.is_painting_needed(tile))
        .map(|tile| {
            let size = tile.image_size(parts);
            let mut buffer = RenderBuffer::transparent(size, size);
            let result = painter.do_paint(tile, parts, &mut buffer);
            TileImage {
                tile: *tile,
                parts,
                buffer,
                result,
            }
        })
        .filter(|image| image.result.is_content_in_tile)
        .collect();

    let elapsed = start.elapsed();
    let tiles_skipped = tiles.len() - images.len();
    info!(
        painted = images.len(),
        skipped = tiles_skipped,
        elapsed_ms = elapsed.as_millis() as u64,
        "Tile paint complete"
    );

    Ok(PaintRun {
        images,
        elapsed,
        tiles_requested: tiles.len(),
        tiles_skipped,
    })
}
