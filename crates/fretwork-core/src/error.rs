//! Error type for style resolution and value validation.
//!
//! Every fallible operation in this crate returns [`StyleError`]. Validation
//! happens before any mutation, so a failed call never leaves a style node
//! partially updated.

use thiserror::Error;

/// Errors raised by the style cascade, the typed style schema and the color
/// utility.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    /// A required input was missing or blank.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A numeric property was set outside of its documented domain.
    #[error("Value {value} for `{key}` is out of range, expected {expected}")]
    OutOfRange {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// Resolution reached the root of the cascade without finding the key.
    #[error("Style key `{0}` not found")]
    KeyNotFound(String),

    /// A color literal could not be parsed.
    #[error("Invalid color `{0}`")]
    InvalidColor(String),

    /// A stored value could not be parsed as the requested type.
    #[error("Invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A mutating call was made on a read-only style level.
    #[error("Style level `{0}` is read-only")]
    ReadOnly(String),
}

impl StyleError {
    /// Create an [`StyleError::InvalidValue`] for `key`.
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
