//! Color literals used by diagram styles.
//!
//! Styles accept exactly three spellings: `#rgb`, `#rrggbb` and one of the
//! sixteen basic HTML color names (case-insensitive). Parsed colors are
//! normalized: names become their canonical capitalized form (`"red"` becomes
//! `"Red"`) and hex literals become six upper-case digits (`"#abc"` becomes
//! `"#AABBCC"`).

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};

use crate::error::StyleError;

/// One of the sixteen basic named colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamedColor {
    Aqua,
    Black,
    Blue,
    Fuchsia,
    Gray,
    Green,
    Lime,
    Maroon,
    Navy,
    Olive,
    Purple,
    Red,
    Silver,
    Teal,
    White,
    Yellow,
}

impl NamedColor {
    /// All named colors, alphabetically.
    pub const ALL: [NamedColor; 16] = [
        Self::Aqua,
        Self::Black,
        Self::Blue,
        Self::Fuchsia,
        Self::Gray,
        Self::Green,
        Self::Lime,
        Self::Maroon,
        Self::Navy,
        Self::Olive,
        Self::Purple,
        Self::Red,
        Self::Silver,
        Self::Teal,
        Self::White,
        Self::Yellow,
    ];

    /// Returns the canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aqua => "Aqua",
            Self::Black => "Black",
            Self::Blue => "Blue",
            Self::Fuchsia => "Fuchsia",
            Self::Gray => "Gray",
            Self::Green => "Green",
            Self::Lime => "Lime",
            Self::Maroon => "Maroon",
            Self::Navy => "Navy",
            Self::Olive => "Olive",
            Self::Purple => "Purple",
            Self::Red => "Red",
            Self::Silver => "Silver",
            Self::Teal => "Teal",
            Self::White => "White",
            Self::Yellow => "Yellow",
        }
    }

    /// Returns the sRGB components.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Aqua => [0x00, 0xFF, 0xFF],
            Self::Black => [0x00, 0x00, 0x00],
            Self::Blue => [0x00, 0x00, 0xFF],
            Self::Fuchsia => [0xFF, 0x00, 0xFF],
            Self::Gray => [0x80, 0x80, 0x80],
            Self::Green => [0x00, 0x80, 0x00],
            Self::Lime => [0x00, 0xFF, 0x00],
            Self::Maroon => [0x80, 0x00, 0x00],
            Self::Navy => [0x00, 0x00, 0x80],
            Self::Olive => [0x80, 0x80, 0x00],
            Self::Purple => [0x80, 0x00, 0x80],
            Self::Red => [0xFF, 0x00, 0x00],
            Self::Silver => [0xC0, 0xC0, 0xC0],
            Self::Teal => [0x00, 0x80, 0x80],
            Self::White => [0xFF, 0xFF, 0xFF],
            Self::Yellow => [0xFF, 0xFF, 0x00],
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|named| named.name().eq_ignore_ascii_case(name))
    }
}

/// A validated, normalized style color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    rgb: [u8; 3],
    name: Option<NamedColor>,
}

impl Color {
    /// Parse and normalize a color literal.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidArgument`] for a blank string and
    /// [`StyleError::InvalidColor`] for anything that is neither a `#rgb` /
    /// `#rrggbb` literal nor one of the sixteen named colors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fretwork_core::color::Color;
    /// let short = Color::new("#ABC").unwrap();
    /// let long = Color::new("#AABBCC").unwrap();
    /// assert_eq!(short.rgb(), long.rgb());
    /// assert_eq!(Color::new("red").unwrap().to_string(), "Red");
    /// assert!(Color::new("notacolor").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, StyleError> {
        let trimmed = color_str.trim();
        if trimmed.is_empty() {
            return Err(StyleError::InvalidArgument(
                "color must not be blank".to_string(),
            ));
        }

        if let Some(digits) = trimmed.strip_prefix('#') {
            let well_formed = matches!(digits.len(), 3 | 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit());
            if !well_formed {
                return Err(StyleError::InvalidColor(color_str.to_string()));
            }
            let parsed = DynamicColor::from_str(trimmed)
                .map_err(|_| StyleError::InvalidColor(color_str.to_string()))?;
            let rgba = parsed.to_alpha_color::<Srgb>().to_rgba8();
            return Ok(Self {
                rgb: [rgba.r, rgba.g, rgba.b],
                name: None,
            });
        }

        NamedColor::from_name(trimmed)
            .map(Self::from)
            .ok_or_else(|| StyleError::InvalidColor(color_str.to_string()))
    }

    /// Returns `true` if `color_str` parses as a valid color.
    pub fn is_valid(color_str: &str) -> bool {
        Self::new(color_str).is_ok()
    }

    /// Returns the sRGB components.
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    /// Returns the named color, if this color was written by name.
    pub fn named(&self) -> Option<NamedColor> {
        self.name
    }

    /// Returns the lower-cased value used in SVG `fill` and `stroke` properties.
    pub fn to_svg_value(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Self {
            rgb: named.rgb(),
            name: Some(named),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from(NamedColor::Black)
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(named) => f.write_str(named.name()),
            None => {
                let [r, g, b] = self.rgb;
                write!(f, "#{r:02X}{g:02X}{b:02X}")
            }
        }
    }
}
