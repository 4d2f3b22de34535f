use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LayoutError;

/// An RGBA quadruple with all channels in `[0, 1]`.
///
/// This is the only color representation the engine works with; resolving CSS
/// color names, color-space conversions and the like are left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn parse(input: &str) -> Result<Self, LayoutError> {
        let invalid = || LayoutError::InvalidColor(input.to_string());
        let hex = input.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| -> Result<f32, LayoutError> {
            let byte = u8::from_str_radix(hex.get(range).ok_or_else(invalid)?, 16)
                .map_err(|_| invalid())?;
            Ok(byte as f32 / 255.0)
        };
        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 { channel(6..8)? } else { 1.0 };
        Ok(Self { r, g, b, a })
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiplies the opacity channel, keeping it inside `[0, 1]`.
    pub fn scale_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Rgba {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

const PALETTE_HEX: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

static PALETTE: Lazy<Vec<Rgba>> = Lazy::new(|| {
    PALETTE_HEX
        .iter()
        .map(|hex| Rgba::parse(hex).expect("palette entries are valid hex"))
        .collect()
});

/// The default node palette (the classic tab10 cycle).
pub fn default_palette() -> &'static [Rgba] {
    &PALETTE
}

/// Flat fallback for flows whose color mode is `Flat`.
pub fn default_flow_color() -> Rgba {
    Rgba::new(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 1.0)
}

/// Node color of last resort when the configured palette is empty.
pub fn fallback_node_color() -> Rgba {
    Rgba::new(1.0, 0.2, 2.0 / 3.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let color = Rgba::parse("#FF8000").unwrap();
        assert!((color.r - 1.0).abs() < 1e-6);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-6);
        assert!((color.b - 0.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn parses_eight_digit_hex() {
        let color = Rgba::parse("#aaaaaa66").unwrap();
        assert!((color.a - 102.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Rgba::parse("ff8000").is_err());
        assert!(Rgba::parse("#ff80").is_err());
        assert!(Rgba::parse("#gg0000").is_err());
    }

    #[test]
    fn alpha_scaling_clamps() {
        let color = Rgba::new(0.5, 0.5, 0.5, 0.8);
        assert!((color.scale_alpha(0.5).a - 0.4).abs() < 1e-6);
        assert_eq!(color.scale_alpha(10.0).a, 1.0);
    }

    #[test]
    fn palette_has_ten_entries() {
        assert_eq!(default_palette().len(), 10);
        assert_eq!(default_palette()[0], Rgba::parse("#1f77b4").unwrap());
    }
}
