//! Tagged values stored in style nodes.

use std::{fmt, str::FromStr};

use crate::{color::Color, draw::format_number, error::StyleError};

/// A single style value.
///
/// Values set through the typed schema keep their type. Values read from XML
/// or configuration arrive as [`StyleValue::Text`] and are parsed lazily by the
/// typed accessors, so unknown keys survive a round trip untouched. Enums are
/// stored as text.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Text(String),
    Double(f64),
    Int(i64),
    Bool(bool),
}

impl StyleValue {
    /// Returns the value as text, borrowing when it already is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Interpret the value stored under `key` as an integer.
    pub fn to_int(&self, key: &str) -> Result<i64, StyleError> {
        match self {
            Self::Int(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| StyleError::invalid_value(key, text, "expected an integer")),
            other => Err(StyleError::invalid_value(
                key,
                other.to_string(),
                "expected an integer",
            )),
        }
    }

    /// Interpret the value stored under `key` as a finite number.
    pub fn to_double(&self, key: &str) -> Result<f64, StyleError> {
        match self {
            Self::Double(value) => Ok(*value),
            Self::Int(value) => Ok(*value as f64),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| StyleError::invalid_value(key, text, "expected a number")),
            Self::Bool(value) => Err(StyleError::invalid_value(
                key,
                value.to_string(),
                "expected a number",
            )),
        }
    }

    /// Interpret the value stored under `key` as a boolean.
    pub fn to_bool(&self, key: &str) -> Result<bool, StyleError> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::Text(text) => parse_bool(text)
                .ok_or_else(|| StyleError::invalid_value(key, text, "expected true or false")),
            other => Err(StyleError::invalid_value(
                key,
                other.to_string(),
                "expected true or false",
            )),
        }
    }

    /// Parse the value stored under `key` as an enum.
    pub fn to_enum<T>(&self, key: &str) -> Result<T, StyleError>
    where
        T: FromStr<Err = String>,
    {
        let text = self.to_string();
        text.parse()
            .map_err(|reason| StyleError::invalid_value(key, text, reason))
    }

    /// Parse the value as a normalized [`Color`].
    pub fn to_color(&self) -> Result<Color, StyleError> {
        Color::new(&self.to_string())
    }
}

/// Parse the boolean spellings accepted in style files.
fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Double(value) => f.write_str(&format_number(*value)),
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Color> for StyleValue {
    fn from(value: Color) -> Self {
        Self::Text(value.to_string())
    }
}
