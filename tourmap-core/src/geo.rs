use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Absolute pixel coordinate at one zoom level, before subtracting a tile origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WorldPixel {
    pub x: i32,
    pub y: i32,
}

impl WorldPixel {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis aligned world pixel rectangle, both corners inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min: WorldPixel,
    pub max: WorldPixel,
}

impl PixelBounds {
    pub fn of(pixels: &[WorldPixel]) -> Option<Self> {
        let first = *pixels.first()?;
        Some(pixels.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| b.include(*p),
        ))
    }

    pub fn include(self, p: WorldPixel) -> Self {
        Self {
            min: WorldPixel::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: WorldPixel::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    pub fn union(self, other: Self) -> Self {
        self.include(other.min).include(other.max)
    }
}
