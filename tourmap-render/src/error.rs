use thiserror::Error;

/// Errors originating from tile painting, legend rendering and export.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid tile size: {0}×{0} (must be 1..={max})", max = crate::tile::MAX_TILE_SIZE)]
    InvalidTileSize(u32),

    #[error("tile origin ({x}, {y}) is outside the world")]
    InvalidTileOrigin { x: i64, y: i64 },

    #[error("invalid part count: {0} (must be odd, 1..={max})", max = crate::tile::MAX_PARTS)]
    InvalidParts(u32),

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] tourmap_core::CoreError),
}
