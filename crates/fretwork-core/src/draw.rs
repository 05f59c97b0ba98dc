//! Drawing primitives shared by the SVG exporter.
//!
//! - [`RenderLayer`] / [`LayeredOutput`]: z-ordered collection of SVG nodes
//! - [`mark_shape`]: fixed vector constructions for mark shapes
//! - [`format_number`]: locale-invariant number formatting for attributes

mod layer;
mod number;

pub mod mark_shape;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use number::format_number;
