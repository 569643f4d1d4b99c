//! Shared style superset.
//!
//! Every block type draws its `style` from this one record. Which keys are
//! legal for a given type is declared by the schema tables in
//! [`crate::validate`]; keys outside that subset are stripped on validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Font stacks offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FontFamily {
    ModernSans,
    BookSans,
    OrganicSans,
    GeometricSans,
    HeavySans,
    RoundedSans,
    ModernSerif,
    BookSerif,
    Monospace,
}

impl FontFamily {
    pub const TOKENS: &'static [&'static str] = &[
        "MODERN_SANS",
        "BOOK_SANS",
        "ORGANIC_SANS",
        "GEOMETRIC_SANS",
        "HEAVY_SANS",
        "ROUNDED_SANS",
        "MODERN_SERIF",
        "BOOK_SERIF",
        "MONOSPACE",
    ];

    /// CSS `font-family` value emitted for this stack
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::ModernSans => {
                r#""Helvetica Neue", "Arial Nova", "Nimbus Sans", Arial, sans-serif"#
            }
            FontFamily::BookSans => r#"Optima, Candara, "Noto Sans", source-sans-pro, sans-serif"#,
            FontFamily::OrganicSans => {
                r#"Seravek, "Gill Sans Nova", Ubuntu, Calibri, "DejaVu Sans", source-sans-pro, sans-serif"#
            }
            FontFamily::GeometricSans => {
                r#"Avenir, "Avenir Next LT Pro", Montserrat, Corbel, "URW Gothic", source-sans-pro, sans-serif"#
            }
            FontFamily::HeavySans => {
                r#"Bahnschrift, "DIN Alternate", "Franklin Gothic Medium", "Nimbus Sans Narrow", sans-serif-condensed, sans-serif"#
            }
            FontFamily::RoundedSans => {
                r#"ui-rounded, "Hiragino Maru Gothic ProN", Quicksand, Comfortaa, Manjari, "Arial Rounded MT Bold", Calibri, source-sans-pro, sans-serif"#
            }
            FontFamily::ModernSerif => r#"Charter, "Bitstream Charter", "Sitka Text", Cambria, serif"#,
            FontFamily::BookSerif => {
                r#""Iowan Old Style", "Palatino Linotype", "URW Palladio L", P052, serif"#
            }
            FontFamily::Monospace => r#""Nimbus Mono PS", "Courier New", "Cutive Mono", monospace"#,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Bold,
    Normal,
}

impl FontWeight {
    pub const TOKENS: &'static [&'static str] = &["bold", "normal"];

    pub fn as_css(self) -> &'static str {
        match self {
            FontWeight::Bold => "bold",
            FontWeight::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub const TOKENS: &'static [&'static str] = &["left", "center", "right"];

    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Box padding in pixels. All four sides are required when present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Padding {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// CSS shorthand in top/right/bottom/left order
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Superset of every style key a block may carry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl BlockStyle {
    pub fn is_empty(&self) -> bool {
        *self == BlockStyle::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_css_order() {
        let padding = Padding {
            top: 1.0,
            bottom: 3.0,
            left: 4.0,
            right: 2.0,
        };
        assert_eq!(padding.to_css(), "1px 2px 3px 4px");
    }

    #[test]
    fn test_font_family_tokens_match_serde() {
        let all = [
            FontFamily::ModernSans,
            FontFamily::BookSans,
            FontFamily::OrganicSans,
            FontFamily::GeometricSans,
            FontFamily::HeavySans,
            FontFamily::RoundedSans,
            FontFamily::ModernSerif,
            FontFamily::BookSerif,
            FontFamily::Monospace,
        ];
        for (family, token) in all.iter().zip(FontFamily::TOKENS) {
            let json = serde_json::to_value(family).unwrap();
            assert_eq!(json, serde_json::Value::String(token.to_string()));
        }
    }

    #[test]
    fn test_empty_style_serializes_to_empty_object() {
        let json = serde_json::to_string(&BlockStyle::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
