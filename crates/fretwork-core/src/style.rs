//! The style cascade.
//!
//! Visual properties live in [`StyleStore`] levels chained from the built-in
//! defaults down to individual diagram elements:
//!
//! ```text
//! defaults -> user -> collection -> diagram -> element
//! ```
//!
//! [`DiagramStyle`] wraps a level with one typed getter and validating setter
//! per known property.

mod defaults;
mod kinds;
mod schema;
mod store;
mod value;

pub use defaults::DEFAULTS_LEVEL;
pub use kinds::{
    BarreStack, BarreVerticalAlignment, LabelLayoutModel, MarkShape, MarkType, Orientation,
    TextAlignment, TextStyle, TitleLabelStyle,
};
pub use schema::DiagramStyle;
pub use store::StyleStore;
pub use value::StyleValue;

pub use crate::error::StyleError;
