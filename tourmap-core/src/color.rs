use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLUE: Self = Self::new(0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from possibly out-of-range channel values, clamping each to `[0, 255]`.
    #[inline]
    pub fn from_clamped(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }

    /// Pack as `0xRRGGBB`.
    #[inline]
    pub fn pack(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub fn unpack(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Multiply every channel by `factor`, truncating toward zero.
    ///
    /// Used for track borders, which are painted in a darker shade of the line color.
    pub fn scaled(self, factor: f32) -> Self {
        Self::from_clamped(
            (self.r as f32 * factor) as i32,
            (self.g as f32 * factor) as i32,
            (self.b as f32 * factor) as i32,
        )
    }

    /// RGBA bytes with full opacity.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trip() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.pack(), 0x123456);
        assert_eq!(Rgb::unpack(0x123456), c);
    }

    #[test]
    fn from_clamped_saturates() {
        assert_eq!(Rgb::from_clamped(-20, 300, 128), Rgb::new(0, 255, 128));
    }

    #[test]
    fn scaled_darkens_by_factor() {
        assert_eq!(Rgb::new(100, 200, 255).scaled(0.8), Rgb::new(80, 160, 204));
        assert_eq!(Rgb::WHITE.scaled(1.0), Rgb::WHITE);
    }
}
