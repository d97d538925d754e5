//! Accent color handling for the TwoSide sidebar.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCENT: &str = "#2c3e50";

/// Swatches offered by the template picker. Any other valid hex is accepted too.
pub const PRESET_ACCENTS: &[&str] = &[
    "#2c3e50", "#1e3a8a", "#0f766e", "#7c2d12", "#6b21a8", "#be123c", "#374151",
];

const LIGHT_TEXT: &str = "#ffffff";
const DARK_TEXT: &str = "#1f2937";

/// A validated color, always stored as lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccentColor(String);

impl Default for AccentColor {
    fn default() -> Self {
        Self(DEFAULT_ACCENT.to_string())
    }
}

impl AccentColor {
    /// Accepts `#rgb` or `#rrggbb` in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return None,
        };
        Some(Self(format!("#{}", expanded.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }

    /// WCAG relative luminance in 0.0 – 1.0.
    pub fn luminance(&self) -> f64 {
        let (r, g, b) = self.rgb();
        let linear = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
    }

    /// Readable text color on top of this accent.
    pub fn contrast_text(&self) -> AccentColor {
        if self.luminance() > 0.4 {
            AccentColor(DARK_TEXT.to_string())
        } else {
            AccentColor(LIGHT_TEXT.to_string())
        }
    }
}

impl TryFrom<String> for AccentColor {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        AccentColor::parse(&raw).ok_or_else(|| format!("invalid accent color '{raw}'"))
    }
}

impl From<AccentColor> for String {
    fn from(color: AccentColor) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_forms() {
        assert_eq!(AccentColor::parse("#ABC").unwrap().as_str(), "#aabbcc");
        assert_eq!(AccentColor::parse(" #1E3A8A ").unwrap().as_str(), "#1e3a8a");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "1e3a8a", "#12345", "#ggg000", "blue"] {
            assert!(AccentColor::parse(bad).is_none(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_rgb_channels() {
        assert_eq!(AccentColor::parse("#0f766e").unwrap().rgb(), (15, 118, 110));
    }

    #[test]
    fn test_contrast_text_flips_on_light_accents() {
        assert_eq!(AccentColor::default().contrast_text().as_str(), LIGHT_TEXT);
        assert_eq!(
            AccentColor::parse("#fde68a").unwrap().contrast_text().as_str(),
            DARK_TEXT
        );
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in PRESET_ACCENTS {
            assert!(AccentColor::parse(preset).is_some());
        }
    }
}
