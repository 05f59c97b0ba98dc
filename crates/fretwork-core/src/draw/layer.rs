//! Layer-based rendering for SVG output.
//!
//! Diagram parts are pushed into a [`LayeredOutput`] tagged with the
//! [`RenderLayer`] they belong to. Rendering emits one `<g data-layer="…">`
//! group per non-empty layer, bottom to top, so the paint order of a diagram
//! never depends on the order its parts were produced in.
//!
//! # Example
//!
//! ```
//! # use fretwork_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Circle, Rectangle};
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Marks, Box::new(Circle::new()));
//! output.add_to_layer(RenderLayer::Background, Box::new(Rectangle::new()));
//!
//! // Background renders first even though it was added last
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// The paint layers of a fretboard diagram.
///
/// Layers are rendered from bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background and border
    Background,
    /// Grid rectangle, string and fret lines, nut
    Grid,
    /// Barres stacked under the marks
    BarresUnder,
    /// Marks and their text
    Marks,
    /// Barres stacked over the marks
    BarresOver,
    /// Fret labels beside the grid
    FretLabels,
    /// Diagram title
    Title,
}

impl RenderLayer {
    /// Returns the name written to the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Grid => "grid",
            Self::BarresUnder => "barres-under",
            Self::Marks => "marks",
            Self::BarresOver => "barres-over",
            Self::FretLabels => "fret-labels",
            Self::Title => "title",
        }
    }
}

/// SVG nodes grouped by [`RenderLayer`].
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    ///
    /// Nodes keep the order they were added in within their layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g>` element with a `data-layer`
    /// attribute. Empty layers are skipped.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order inside each layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group =
            svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}
