use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a command line run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid tour file {path}: {source}")]
    TourFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("tour file {0} contains no track with positions")]
    NoTracks(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Core(#[from] tourmap_core::CoreError),

    #[error(transparent)]
    Render(#[from] tourmap_render::RenderError),
}

pub type Result<T> = std::result::Result<T, AppError>;
