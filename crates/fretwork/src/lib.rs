//! Fretwork - parametric fretboard chord and scale diagrams.
//!
//! A [`Diagram`] is a gridded fretboard holding marks, barres and fret
//! labels. Every visual property is resolved through a cascade of style
//! levels (defaults, user, collection, diagram, element) and the result is
//! rendered to deterministic SVG.
//!
//! # Example
//!
//! ```
//! use fretwork::{DiagramBuilder, MarkPosition};
//! use fretwork::style::MarkType;
//!
//! let builder = DiagramBuilder::default();
//! let mut diagram = builder.new_diagram(6, 5).unwrap();
//! diagram.set_title(Some("Em".to_string()));
//! diagram.new_mark(MarkPosition::new(5, 2), MarkType::Normal, "2").unwrap();
//! diagram.new_mark(MarkPosition::new(4, 2), MarkType::Normal, "3").unwrap();
//!
//! let svg = builder.render_svg(&diagram).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod collection;
pub mod config;
pub mod export;
pub mod layout;

mod diagram;
mod error;
mod xml;

pub use fretwork_core::{color, geometry, style};

pub use collection::DiagramCollection;
pub use diagram::{
    Barre, BarrePosition, Diagram, FretLabel, FretLabelPosition, FretLabelSide, MIN_FRETS,
    MIN_STRINGS, Mark, MarkPosition,
};
pub use error::FretworkError;

use std::collections::BTreeSet;

use log::{debug, info};

use config::AppConfig;
use style::DiagramStyle;

/// Builder for loading, rendering and saving Fretwork diagrams.
///
/// The builder owns the top of the style cascade: the read-only built-in
/// defaults and the `"user"` level made from the configuration. Every
/// diagram it creates or loads inherits from that user level.
///
/// # Examples
///
/// ```rust,no_run
/// use fretwork::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"<diagram title="E5" strings="6" frets="4">
///   <mark type="Root" string="6" fret="0"/>
///   <mark string="5" fret="2"/>
/// </diagram>"#;
///
/// // With custom config
/// let builder = DiagramBuilder::new(AppConfig::default())
///     .expect("Invalid configuration");
///
/// // Load a diagram from XML
/// let diagram = builder.load_xml(source)
///     .expect("Failed to load");
///
/// // Render it to SVG
/// let svg = builder.render_svg(&diagram)
///     .expect("Failed to render");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Debug)]
pub struct DiagramBuilder {
    config: AppConfig,
    user_style: DiagramStyle,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        let defaults = DiagramStyle::defaults();
        Self {
            config: AppConfig::default(),
            user_style: DiagramStyle::new(config::USER_LEVEL, &defaults),
        }
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including style overrides
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::Config`] if the style configuration holds an
    /// invalid color, or [`FretworkError::Style`] for a blank style key.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use fretwork::{DiagramBuilder, config::AppConfig};
    ///
    /// let config = AppConfig::default();
    /// let builder = DiagramBuilder::new(config).expect("Invalid configuration");
    /// ```
    pub fn new(config: AppConfig) -> Result<Self, FretworkError> {
        let user_style = config.style().user_style(&DiagramStyle::defaults())?;
        info!(
            configured_keys = user_style.store().local_keys().len();
            "Diagram builder configured"
        );
        Ok(Self { config, user_style })
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the `"user"` style level every diagram inherits from.
    pub fn user_style(&self) -> &DiagramStyle {
        &self.user_style
    }

    /// Create an empty diagram chained to the user style level.
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::OutOfRange`] for fewer than
    /// [`MIN_STRINGS`] strings or [`MIN_FRETS`] frets.
    pub fn new_diagram(&self, num_strings: u32, num_frets: u32) -> Result<Diagram, FretworkError> {
        Diagram::new(&self.user_style, num_strings, num_frets)
    }

    /// Create an empty named collection chained to the user style level.
    pub fn new_collection(&self, name: impl Into<String>) -> DiagramCollection {
        DiagramCollection::new(name, &self.user_style)
    }

    /// Load a diagram from its XML form.
    ///
    /// # Arguments
    ///
    /// * `source` - The `<diagram>` document as a string
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::Xml`] for text that is not well-formed XML,
    /// [`FretworkError::MalformedXml`] for a document that does not describe
    /// a diagram, and the model's placement errors for invalid elements.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use fretwork::DiagramBuilder;
    ///
    /// let builder = DiagramBuilder::default();
    /// let diagram = builder
    ///     .load_xml(r#"<diagram strings="4" frets="4"/>"#)
    ///     .expect("Failed to load diagram");
    /// ```
    pub fn load_xml(&self, source: &str) -> Result<Diagram, FretworkError> {
        info!("Loading diagram");
        let diagram = xml::read_diagram(source, &self.user_style)?;
        debug!(title:? = diagram.title(); "Diagram loaded successfully");
        Ok(diagram)
    }

    /// Serialize a diagram to XML.
    pub fn write_xml(&self, diagram: &Diagram) -> String {
        xml::write_diagram(diagram)
    }

    /// Render a diagram to an SVG string.
    ///
    /// # Arguments
    ///
    /// * `diagram` - The diagram to render
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::Style`] if a resolved style value cannot be
    /// interpreted.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use fretwork::DiagramBuilder;
    ///
    /// let builder = DiagramBuilder::default();
    /// let diagram = builder.new_diagram(6, 5).expect("Invalid dimensions");
    ///
    /// let svg = builder.render_svg(&diagram)
    ///     .expect("Failed to render diagram");
    ///
    /// println!("{}", svg);
    /// ```
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, FretworkError> {
        info!(
            strings = diagram.num_strings(),
            frets = diagram.num_frets();
            "Rendering diagram"
        );
        let svg = export::svg::render_svg(diagram)?;
        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }

    /// Returns the sorted names of the colors a diagram renders with.
    pub fn colors_in_use(&self, diagram: &Diagram) -> Result<BTreeSet<String>, FretworkError> {
        diagram.colors_in_use()
    }
}
