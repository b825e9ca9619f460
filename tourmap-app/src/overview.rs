//! Stitches painted tiles into one image covering the whole tile grid.

use image::{imageops, RgbaImage};
use tourmap_render::{RenderBuffer, TileImage, TileViewport};
use tracing::{debug, warn};

fn to_rgba_image(buffer: &RenderBuffer) -> Option<RgbaImage> {
    RgbaImage::from_raw(buffer.width, buffer.height, buffer.pixels.clone())
}

/// The center tile of a painted raster.
pub fn center_part(image: &TileImage) -> Option<RgbaImage> {
    let raster = to_rgba_image(&image.buffer)?;
    let offset = image.tile.dev_part_offset(image.parts) as u32;
    let size = image.tile.size;
    Some(imageops::crop_imm(&raster, offset, offset, size, size).to_image())
}

/// Overview of `grid`; tiles without an image stay transparent.
/// `None` for an empty grid.
pub fn stitch_overview(grid: &[TileViewport], images: &[TileImage]) -> Option<RgbaImage> {
    let first = grid.first()?;
    let size = first.size;
    let min_x = grid.iter().map(TileViewport::tile_x).min()?;
    let min_y = grid.iter().map(TileViewport::tile_y).min()?;
    let max_x = grid.iter().map(TileViewport::tile_x).max()?;
    let max_y = grid.iter().map(TileViewport::tile_y).max()?;

    let mut overview = RgbaImage::new((max_x - min_x + 1) * size, (max_y - min_y + 1) * size);
    for image in images {
        let Some(part) = center_part(image) else {
            warn!(
                tile_x = image.tile.tile_x(),
                tile_y = image.tile.tile_y(),
                "Tile buffer does not match its size"
            );
            continue;
        };
        let x = (image.tile.tile_x() - min_x) as i64 * size as i64;
        let y = (image.tile.tile_y() - min_y) as i64 * size as i64;
        imageops::replace(&mut overview, &part, x, y);
    }

    debug!(
        width = overview.width(),
        height = overview.height(),
        tiles = images.len(),
        "Stitched overview"
    );
    Some(overview)
}
