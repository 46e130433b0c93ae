//! Colors used by the simulation: piece colors and the slot highlight.
//!
//! Components are RGBA `f32` in the range [0.0, 1.0].

pub use rgb::Rgba;

/// The color type used throughout galpon.
pub type Color = Rgba<f32>;

/// Pure white.
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Translucent green of the slot highlight.
pub const HIGHLIGHT_GREEN: Color = Color::new(0.0, 1.0, 0.0, 0.4);

/// Default color of printed pieces (`#8e9eb9`).
pub const PIECE_STEEL: Color = Color::new(0.5568628, 0.61960787, 0.7254902, 1.0);

/// Forklift body yellow (`#e8ec6a`).
pub const FORKLIFT_YELLOW: Color = Color::new(0.9098039, 0.9254902, 0.41568628, 1.0);

/// Parses a `#rrggbb` or `rrggbb` hex string into an opaque color.
///
/// Returns `None` if the string is not six hex digits.
pub fn from_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|c| c as f32 / 255.0)
    };

    Some(Color::new(channel(0)?, channel(2)?, channel(4)?, 1.0))
}

/// Formats an opaque color as `#rrggbb`.
pub fn to_hex(color: Color) -> String {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", c(color.r), c(color.g), c(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = from_hex("#8e9eb9").unwrap();
        assert!((c.r - PIECE_STEEL.r).abs() < 1.0e-6);
        assert!((c.b - PIECE_STEEL.b).abs() < 1.0e-6);
        assert_eq!(from_hex("ffffff"), Some(WHITE));
        assert_eq!(from_hex("#fff"), None);
        assert_eq!(from_hex("#gg0000"), None);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex(PIECE_STEEL), "#8e9eb9");
        assert_eq!(to_hex(WHITE), "#ffffff");
    }
}
