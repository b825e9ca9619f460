use tourmap_core::{PixelBounds, WorldPixel};

use crate::error::RenderError;

/// Default slippy map tile edge in pixels.
pub const TILE_SIZE: u32 = 256;
/// Largest accepted tile edge.
pub const MAX_TILE_SIZE: u32 = 4096;
/// Largest accepted part count; a raster is at most `MAX_PARTS` tiles wide.
pub const MAX_PARTS: u32 = 9;

/// One map tile in world pixel space: `[world_x, world_x + size) × [world_y, world_y + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileViewport {
    pub world_x: i32,
    pub world_y: i32,
    pub size: u32,
}

impl TileViewport {
    /// A tile with its top-left corner at world pixel `(world_x, world_y)`.
    /// The tile must lie in the non-negative world quadrant with its far
    /// edges still representable.
    pub fn new(world_x: i32, world_y: i32, size: u32) -> crate::Result<Self> {
        if size == 0 || size > MAX_TILE_SIZE {
            return Err(RenderError::InvalidTileSize(size));
        }
        let fits = |v: i32| v >= 0 && v.checked_add(size as i32).is_some();
        if !fits(world_x) || !fits(world_y) {
            return Err(RenderError::InvalidTileOrigin {
                x: world_x as i64,
                y: world_y as i64,
            });
        }
        Ok(Self {
            world_x,
            world_y,
            size,
        })
    }

    /// The tile at column `tile_x`, row `tile_y` of the tile grid.
    pub fn from_tile_index(tile_x: u32, tile_y: u32, size: u32) -> crate::Result<Self> {
        let (x, y) = (tile_x as i64 * size as i64, tile_y as i64 * size as i64);
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(world_x), Ok(world_y)) => Self::new(world_x, world_y, size),
            _ => Err(RenderError::InvalidTileOrigin { x, y }),
        }
    }

    /// Grid column. An origin left of the world counts as column 0.
    pub fn tile_x(&self) -> u32 {
        self.world_x.max(0) as u32 / self.size.max(1)
    }

    /// Grid row. An origin above the world counts as row 0.
    pub fn tile_y(&self) -> u32 {
        self.world_y.max(0) as u32 / self.size.max(1)
    }

    pub fn right(&self) -> i32 {
        self.world_x + self.size as i32
    }

    pub fn bottom(&self) -> i32 {
        self.world_y + self.size as i32
    }

    #[inline]
    pub fn contains(&self, p: WorldPixel) -> bool {
        p.x >= self.world_x && p.y >= self.world_y && p.x < self.right() && p.y < self.bottom()
    }

    /// Offset of the center part within a painted image of `parts × parts` tiles.
    #[inline]
    pub fn dev_part_offset(&self, parts: u32) -> i32 {
        let offset = (parts.max(1) as i64 - 1) / 2 * self.size as i64;
        offset.min(i32::MAX as i64) as i32
    }

    /// Edge of the painted image for `parts`.
    pub fn image_size(&self, parts: u32) -> u32 {
        self.size.saturating_mul(parts.max(1))
    }

    /// Device position of a world pixel inside this tile, without part offset.
    #[inline]
    pub fn to_device(&self, p: WorldPixel) -> (i32, i32) {
        (p.x - self.world_x, p.y - self.world_y)
    }
}

/// Reject part counts that have no center part or exceed [`MAX_PARTS`].
pub fn check_parts(parts: u32) -> crate::Result<u32> {
    if parts == 0 || parts % 2 == 0 || parts > MAX_PARTS {
        return Err(RenderError::InvalidParts(parts));
    }
    Ok(parts)
}

/// All tiles touching `bounds` grown by `margin` pixels, limited to a world
/// of `map_size` pixels. Row major order.
pub fn build_tile_grid(
    bounds: PixelBounds,
    margin: i32,
    size: u32,
    map_size: i64,
) -> crate::Result<Vec<TileViewport>> {
    if size == 0 {
        return Err(RenderError::InvalidTileSize(size));
    }
    let tiles_per_axis = (map_size / size as i64).max(1);
    let index = |v: i32| (v as i64).div_euclid(size as i64).clamp(0, tiles_per_axis - 1);

    let (x0, x1) = (index(bounds.min.x - margin), index(bounds.max.x + margin));
    let (y0, y1) = (index(bounds.min.y - margin), index(bounds.max.y + margin));

    let mut tiles = Vec::with_capacity(((x1 - x0 + 1) * (y1 - y0 + 1)) as usize);
    for ty in y0..=y1 {
        for tx in x0..=x1 {
            tiles.push(TileViewport::from_tile_index(tx as u32, ty as u32, size)?);
        }
    }
    Ok(tiles)
}
