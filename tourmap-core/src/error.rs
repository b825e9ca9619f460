use thiserror::Error;

/// Errors originating from the legend, color and track model.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("legend anchors must ascend by threshold: anchor {index} ({threshold}) <= previous ({previous})")]
    AnchorOrder {
        index: usize,
        threshold: f64,
        previous: f64,
    },

    #[error("legend anchor {index} has a non-finite threshold")]
    NonFiniteThreshold { index: usize },

    #[error("invalid brightness factor: {0} (must be <= 100)")]
    InvalidBrightnessFactor(u8),

    #[error("invalid heart rate zones: {reason}")]
    InvalidHrZones { reason: String },

    #[error("track series `{serie}` has {len} samples, expected {expected}")]
    SerieLength {
        serie: &'static str,
        len: usize,
        expected: usize,
    },
}
