//! Accent color derivation.
//!
//! Every accent is described by a single base color; the hover, shadow,
//! light and dark variants are always recomputed from it.

use serde::{Deserialize, Serialize};
use std::fmt;

const HOVER_DARKEN: f32 = 0.10;
const LIGHT_LIGHTEN: f32 = 0.20;
const DARK_DARKEN: f32 = 0.20;
const SHADOW_ALPHA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` (leading `#` optional). Returns `None` on
    /// anything else.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            3 => {
                let expand = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Some(Self {
                    r: expand(0).ok()?,
                    g: expand(1).ok()?,
                    b: expand(2).ok()?,
                })
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation toward black.
    pub fn darken(self, amount: f32) -> Self {
        self.map(|c| c * (1.0 - amount))
    }

    /// Linear interpolation toward white.
    pub fn lighten(self, amount: f32) -> Self {
        self.map(|c| c + (255.0 - c) * amount)
    }

    pub fn rgba(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    pub fn channel_sum(self) -> u32 {
        u32::from(self.r) + u32::from(self.g) + u32::from(self.b)
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        let channel = |c: u8| f(f32::from(c)).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccentColor {
    pub base: String,
    pub hover: String,
    pub shadow: String,
    pub light: String,
    pub dark: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl AccentColor {
    /// Recomputes the derived fields from `base`, keeping `is_custom`.
    pub fn rederived(&self) -> Self {
        Self {
            is_custom: self.is_custom,
            ..derive_accent(&self.base)
        }
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        AccentPreset::default().accent()
    }
}

/// Derives the accent variants from a hex base color.
///
/// Malformed input does not error: every field is set to the input unchanged.
pub fn derive_accent(base_hex: &str) -> AccentColor {
    let Some(rgb) = Rgb::parse_hex(base_hex) else {
        return AccentColor {
            base: base_hex.to_string(),
            hover: base_hex.to_string(),
            shadow: base_hex.to_string(),
            light: base_hex.to_string(),
            dark: base_hex.to_string(),
            is_custom: true,
        };
    };

    AccentColor {
        base: rgb.to_hex(),
        hover: rgb.darken(HOVER_DARKEN).to_hex(),
        shadow: rgb.rgba(SHADOW_ALPHA),
        light: rgb.lighten(LIGHT_LIGHTEN).to_hex(),
        dark: rgb.darken(DARK_DARKEN).to_hex(),
        is_custom: true,
    }
}

/// The fixed palette offered next to the custom color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccentPreset {
    #[default]
    Blue,
    Emerald,
    Violet,
    Rose,
    Amber,
    Slate,
}

impl AccentPreset {
    pub const ALL: [AccentPreset; 6] = [
        AccentPreset::Blue,
        AccentPreset::Emerald,
        AccentPreset::Violet,
        AccentPreset::Rose,
        AccentPreset::Amber,
        AccentPreset::Slate,
    ];

    pub fn base_hex(self) -> &'static str {
        match self {
            AccentPreset::Blue => kestrel_config::DEFAULT_ACCENT_HEX,
            AccentPreset::Emerald => "#10b981",
            AccentPreset::Violet => "#8b5cf6",
            AccentPreset::Rose => "#f43f5e",
            AccentPreset::Amber => "#f59e0b",
            AccentPreset::Slate => "#64748b",
        }
    }

    pub fn accent(self) -> AccentColor {
        AccentColor {
            is_custom: false,
            ..derive_accent(self.base_hex())
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| format!("{p:?}").to_ascii_lowercase() == name)
    }

    /// Finds the preset whose base equals `hex`, ignoring case.
    pub fn matching(hex: &str) -> Option<Self> {
        let rgb = Rgb::parse_hex(hex)?;
        Self::ALL
            .into_iter()
            .find(|p| Rgb::parse_hex(p.base_hex()) == Some(rgb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(Rgb::parse_hex("#2e8b57"), Some(Rgb::new(0x2e, 0x8b, 0x57)));
        assert_eq!(Rgb::parse_hex("fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#gg0000"), None);
    }

    #[test]
    fn darken_and_lighten_clamp_at_extremes() {
        let white = Rgb::new(255, 255, 255);
        let black = Rgb::new(0, 0, 0);
        assert_eq!(white.lighten(0.2), white);
        assert_eq!(black.darken(0.2), black);
        assert_eq!(white.darken(1.0), black);
    }

    #[test]
    fn derives_expected_variants() {
        let accent = derive_accent("#2E8B57");
        assert_eq!(accent.base, "#2e8b57");
        // 46,139,87 * 0.9 -> 41,125,78
        assert_eq!(accent.hover, "#297d4e");
        assert_eq!(accent.shadow, "rgba(46, 139, 87, 0.5)");
        assert!(accent.is_custom);
    }

    #[test]
    fn malformed_input_is_returned_unchanged() {
        let accent = derive_accent("not-a-color");
        assert_eq!(accent.base, "not-a-color");
        assert_eq!(accent.hover, "not-a-color");
        assert_eq!(accent.dark, "not-a-color");
    }

    #[test]
    fn presets_are_not_custom() {
        for preset in AccentPreset::ALL {
            let accent = preset.accent();
            assert!(!accent.is_custom);
            assert_eq!(AccentPreset::matching(&accent.base), Some(preset));
        }
        assert_eq!(AccentPreset::from_name("Violet"), Some(AccentPreset::Violet));
    }
}
