//! Packed RGB colour utilities
//!
//! Every drawing routine works with colours packed as `0xRRGGBB` in a `u32`.
//! This module shades them (`lighten`/`darken`), mixes them, converts them to
//! `image::Rgba`, and parses colour strings from config files and the CLI:
//! - Hex: `#RGB`, `#RRGGBB`, `0xRRGGBB`
//! - Anything CSS understands: `rgb()`, `hsl()`, `oklch()`, named colours

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Conspicuous magenta used for emergency assets.
pub const MAGENTA: u32 = 0xFF00FF;

/// Neutral grey used when no base colour is known.
pub const NEUTRAL_GREY: u32 = 0x888888;

/// Error type for colour parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3 or 6 hex chars after the prefix)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Split a packed colour into its channels.
pub fn channels(color: u32) -> (u8, u8, u8) {
    (((color >> 16) & 0xFF) as u8, ((color >> 8) & 0xFF) as u8, (color & 0xFF) as u8)
}

/// Pack three channels into `0xRRGGBB`.
pub fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Move every channel toward white by `percent` (0-100).
///
/// # Examples
///
/// ```
/// use mockart::color::lighten;
///
/// assert_eq!(lighten(0x000000, 50.0), 0x808080);
/// assert_eq!(lighten(0x123456, 0.0), 0x123456);
/// assert_eq!(lighten(0x123456, 100.0), 0xFFFFFF);
/// ```
pub fn lighten(color: u32, percent: f32) -> u32 {
    let t = percent.clamp(0.0, 100.0) / 100.0;
    let (r, g, b) = channels(color);
    let up = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
    pack(up(r), up(g), up(b))
}

/// Move every channel toward black by `percent` (0-100).
///
/// # Examples
///
/// ```
/// use mockart::color::darken;
///
/// assert_eq!(darken(0xFFFFFF, 50.0), 0x808080);
/// assert_eq!(darken(0x123456, 100.0), 0x000000);
/// ```
pub fn darken(color: u32, percent: f32) -> u32 {
    let t = percent.clamp(0.0, 100.0) / 100.0;
    let (r, g, b) = channels(color);
    let down = |c: u8| (c as f32 * (1.0 - t)).round() as u8;
    pack(down(r), down(g), down(b))
}

/// Linear mix of two colours, `t = 0` gives `a`, `t = 1` gives `b`.
pub fn mix(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let (ar, ag, ab) = channels(a);
    let (br, bg, bb) = channels(b);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    pack(lerp(ar, br), lerp(ag, bg), lerp(ab, bb))
}

/// Convert a packed colour plus alpha (0.0-1.0) into an image pixel.
pub fn to_rgba(color: u32, alpha: f32) -> Rgba<u8> {
    let (r, g, b) = channels(color);
    Rgba([r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
}

/// Parse a colour string into a packed `0xRRGGBB` colour.
///
/// Hex forms take a fast path; everything else is handed to lightningcss.
/// Alpha is discarded, the engine carries transparency separately.
///
/// # Examples
///
/// ```
/// use mockart::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), 0xFF0000);
/// assert_eq!(parse_color("0x00ff00").unwrap(), 0x00FF00);
/// assert_eq!(parse_color("blue").unwrap(), 0x0000FF);
/// ```
pub fn parse_color(s: &str) -> Result<u32, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#').or_else(|| s.strip_prefix("0x")) {
        return parse_hex(hex);
    }

    parse_css_color(s)
}

fn parse_hex(hex: &str) -> Result<u32, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    match hex.len() {
        3 => {
            let digits: Vec<u32> = hex.chars().filter_map(|c| c.to_digit(16)).collect();
            Ok(digits.iter().fold(0u32, |acc, d| (acc << 8) | (d * 17)))
        }
        6 => u32::from_str_radix(hex, 16).map_err(|_| ColorError::InvalidLength(hex.len())),
        len => Err(ColorError::InvalidLength(len)),
    }
}

fn parse_css_color(s: &str) -> Result<u32, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(pack(rgba.red, rgba.green, rgba.blue)),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
                Ok(pack(to_u8(rgb.r), to_u8(rgb.g), to_u8(rgb.b)))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

/// Format a packed colour as `#RRGGBB`.
pub fn format_hex(color: u32) -> String {
    format!("#{:06X}", color & 0xFFFFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_roundtrip_pack() {
        assert_eq!(channels(0x112233), (0x11, 0x22, 0x33));
        assert_eq!(pack(0x11, 0x22, 0x33), 0x112233);
    }

    #[test]
    fn test_lighten_moves_toward_white() {
        let base = 0x406080;
        let light = lighten(base, 25.0);
        let (r, g, b) = channels(light);
        assert!(r > 0x40 && g > 0x60 && b > 0x80);
    }

    #[test]
    fn test_darken_moves_toward_black() {
        assert_eq!(darken(0x808080, 50.0), 0x404040);
    }

    #[test]
    fn test_shading_percent_is_clamped() {
        assert_eq!(lighten(0x101010, 250.0), 0xFFFFFF);
        assert_eq!(darken(0x101010, -20.0), 0x101010);
    }

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(mix(0x000000, 0xFFFFFF, 0.0), 0x000000);
        assert_eq!(mix(0x000000, 0xFFFFFF, 1.0), 0xFFFFFF);
        assert_eq!(mix(0x000000, 0xFFFFFF, 0.5), 0x808080);
    }

    #[test]
    fn test_to_rgba_alpha() {
        assert_eq!(to_rgba(0xFF0000, 1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(to_rgba(0xFF0000, 0.0), Rgba([255, 0, 0, 0]));
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#fff"), Ok(0xFFFFFF));
        assert_eq!(parse_color("#8B4513"), Ok(0x8B4513));
        assert_eq!(parse_color("0x8b4513"), Ok(0x8B4513));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#12G"), Err(ColorError::InvalidHex('G')));
        assert!(matches!(parse_color("notacolor"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_parse_css_functional() {
        assert_eq!(parse_color("rgb(255, 0, 0)"), Ok(0xFF0000));
        assert_eq!(parse_color("hsl(120, 100%, 50%)"), Ok(0x00FF00));
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(0xff00ff), "#FF00FF");
    }
}
