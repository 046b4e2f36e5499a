use serde::{Deserialize, Serialize};

/// An sRGB color with components in `0.0..=1.0`.
///
/// Serializes as a 24-bit `0xRRGGBB` integer so configuration files can use
/// the familiar hex notation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` value. Bits above the low 24 are ignored.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Linear-light components, for shading math on an sRGB target.
    pub fn to_linear(&self) -> [f32; 3] {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [decode(self.r), decode(self.g), decode(self.b)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_channels() {
        let c = Color::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.to_hex(), 0xff8000);
    }

    #[test]
    fn display_is_padded_hex() {
        assert_eq!(Color::from_hex(0x044a88).to_string(), "#044a88");
    }

    #[test]
    fn linear_conversion_preserves_endpoints() {
        assert_eq!(Color::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = Color::WHITE.to_linear();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear();
        assert!(mid[0] > 0.2 && mid[0] < 0.22);
    }
}
