use serde::{Deserialize, Serialize};

/// Errors from parsing color strings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("expected 6 hex digits, got {0:?}")]
    BadLength(String),
    #[error("invalid hex digits in {0:?}")]
    BadDigits(String),
}

/// Linear RGB color with components in `[0, 1]`.
///
/// Hex values map straight to channel values; no sRGB decode happens here or
/// on output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Parse a CSS-style `#rrggbb` string.
    pub fn from_css(css: &str) -> Result<Self, ColorError> {
        let digits = css
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(css.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorError::BadLength(css.to_string()));
        }
        let hex =
            u32::from_str_radix(digits, 16).map_err(|_| ColorError::BadDigits(css.to_string()))?;
        Ok(Self::from_hex(hex))
    }

    /// Pack back to `0xRRGGBB`, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Multiply every channel by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
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
        let c = Color::from_hex(0xff0080);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn css_matches_hex() {
        let css = Color::from_css("#a9c388").unwrap();
        assert_eq!(css, Color::from_hex(0xa9c388));
        assert_eq!(css.to_hex(), 0xa9c388);
    }

    #[test]
    fn css_errors() {
        assert!(matches!(
            Color::from_css("a9c388"),
            Err(ColorError::MissingHash(_))
        ));
        assert!(matches!(Color::from_css("#fff"), Err(ColorError::BadLength(_))));
        assert!(matches!(
            Color::from_css("#zzzzzz"),
            Err(ColorError::BadDigits(_))
        ));
    }

    #[test]
    fn display_is_css() {
        assert_eq!(Color::from_hex(0x0afd3f).to_string(), "#0afd3f");
        assert_eq!(Color::default().to_string(), "#ffffff");
    }

    #[test]
    fn scaled_multiplies_channels() {
        let c = Color::WHITE.scaled(0.5);
        assert_eq!(c.to_array(), [0.5, 0.5, 0.5]);
    }
}
