//! Configuration types for Fretwork rendering.
//!
//! All types implement [`serde::Deserialize`] for loading from external
//! sources such as TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`StyleConfig`] - Style overrides applied as the `"user"` level of the
//!   style cascade, between the built-in defaults and every diagram.
//!
//! Style keys are the dotted keys of the style cascade. Tables are
//! flattened, so these two snippets are equivalent:
//!
//! ```toml
//! [style]
//! "grid.stringspacing" = 32
//! "root.color" = "Red"
//! ```
//!
//! ```toml
//! [style.grid]
//! stringspacing = 32
//!
//! [style.root]
//! color = "Red"
//! ```
//!
//! # Example
//!
//! ```
//! # use fretwork::config::AppConfig;
//! # use fretwork::style::DiagramStyle;
//! let config = AppConfig::default();
//! let user = config.style().user_style(&DiagramStyle::defaults()).unwrap();
//! assert!(user.store().is_empty());
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use fretwork_core::{
    color::Color,
    style::{DiagramStyle, StyleValue},
};

use crate::error::FretworkError;

/// Name of the style level built from the configuration.
pub const USER_LEVEL: &str = "user";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given style configuration.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// A configured style value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Nested keys, joined to the parent key with a `.`.
    Table(IndexMap<String, ConfigValue>),
}

/// Style overrides keyed by dotted style key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StyleConfig {
    entries: IndexMap<String, ConfigValue>,
}

impl StyleConfig {
    /// Creates an empty style configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a single entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Returns `true` if nothing is configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the configured entries with tables flattened into dotted
    /// keys, in file order.
    pub fn entries(&self) -> Vec<(String, StyleValue)> {
        let mut flat = Vec::new();
        flatten_into(&mut flat, None, &self.entries);
        flat
    }

    /// Build the `"user"` style level on top of `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::Config`] for a color key holding something
    /// that is not a color, and [`FretworkError::Style`] for blank keys.
    pub fn user_style(&self, defaults: &DiagramStyle) -> Result<DiagramStyle, FretworkError> {
        let entries = self.entries();
        for (key, value) in &entries {
            if key.ends_with("color") && !Color::is_valid(&value.to_string()) {
                return Err(FretworkError::Config(format!(
                    "Invalid color `{value}` for style key `{key}`"
                )));
            }
        }

        let user = DiagramStyle::new(USER_LEVEL, defaults);
        debug!(entries = entries.len(); "Applying configured style");
        user.import_entries(entries)?;
        Ok(user)
    }
}

fn flatten_into(
    flat: &mut Vec<(String, StyleValue)>,
    prefix: Option<&str>,
    entries: &IndexMap<String, ConfigValue>,
) {
    for (key, value) in entries {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        let value = match value {
            ConfigValue::Bool(value) => StyleValue::from(*value),
            ConfigValue::Int(value) => StyleValue::from(*value),
            ConfigValue::Float(value) => StyleValue::from(*value),
            ConfigValue::Text(value) => StyleValue::from(value.as_str()),
            ConfigValue::Table(table) => {
                flatten_into(flat, Some(&key), table);
                continue;
            }
        };
        flat.push((key, value));
    }
}

impl From<Color> for ConfigValue {
    fn from(color: Color) -> Self {
        Self::Text(color.to_string())
    }
}
