//! SVG rendering of fretboard diagrams.
//!
//! [`render_svg`] is a pure function of the diagram and its resolved style.
//! The drawing is built unrotated on a canvas of
//! [`GridLayout::canvas_size`]; a `LeftRight` diagram is then turned by -90
//! degrees around the canvas center and shifted back into view.

mod elements;
mod frame;

use log::{debug, info};
use svg::{
    Document,
    node::{Comment, element as svg_element},
};

use fretwork_core::{
    draw::{LayeredOutput, format_number},
    style::Orientation,
};

use crate::{diagram::Diagram, error::FretworkError, export::Exporter, layout::GridLayout};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#;
const SVG_DOCTYPE: &str = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

/// SVG exporter.
#[derive(Debug, Default, Clone, Copy)]
pub struct Svg;

impl Exporter for Svg {
    fn format_name(&self) -> &'static str {
        "SVG"
    }

    fn render_diagram(&self, diagram: &Diagram) -> Result<String, FretworkError> {
        render_svg(diagram)
    }
}

/// Render `diagram` to a complete SVG document.
///
/// # Errors
///
/// Returns [`FretworkError::Style`] if a style value needed for drawing is
/// missing or cannot be parsed.
pub fn render_svg(diagram: &Diagram) -> Result<String, FretworkError> {
    let renderer = Renderer {
        diagram,
        layout: diagram.layout()?,
    };
    let document = renderer.render_document()?;
    debug!("SVG document rendered");
    Ok(format!("{XML_DECLARATION}\n{SVG_DOCTYPE}\n{document}\n"))
}

/// Draws one diagram against its precomputed layout.
struct Renderer<'a> {
    diagram: &'a Diagram,
    layout: GridLayout,
}

impl Renderer<'_> {
    fn render_document(&self) -> Result<Document, FretworkError> {
        let mut output = LayeredOutput::new();
        self.render_background(&mut output)?;
        self.render_grid(&mut output)?;
        self.render_barres(&mut output)?;
        self.render_marks(&mut output)?;
        self.render_fret_labels(&mut output)?;
        self.render_title(&mut output)?;

        let image = self.layout.image_size();
        info!(
            width = image.width(),
            height = image.height(),
            marks = self.diagram.marks().len();
            "Rendering SVG"
        );

        let mut document = Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("version", "1.1")
            .set("width", format_number(image.width()))
            .set("height", format_number(image.height()))
            .add(Comment::new(format!(
                "Created with Fretwork {}",
                env!("CARGO_PKG_VERSION")
            )));

        let groups = output.render();
        match self.layout.orientation() {
            Orientation::UpDown => {
                for group in groups {
                    document = document.add(group);
                }
            }
            Orientation::LeftRight => {
                let mut body = svg_element::Group::new().set("transform", self.rotation());
                for group in groups {
                    body = body.add(group);
                }
                document = document.add(body);
            }
        }
        Ok(document)
    }

    /// Turn the canvas by -90 degrees around its center, then shift it so the
    /// rotated canvas starts at the origin.
    fn rotation(&self) -> String {
        let canvas = self.layout.canvas_size();
        let center = canvas.center();
        let tx = (canvas.height() - canvas.width()) / 2.0;
        let ty = (canvas.width() - canvas.height()) / 2.0;
        format!(
            "translate({} {}) rotate(-90 {} {})",
            format_number(tx),
            format_number(ty),
            format_number(center.x()),
            format_number(center.y())
        )
    }
}

#[cfg(test)]
mod tests {
    use fretwork_core::style::{DiagramStyle, MarkType, TitleLabelStyle};

    use super::*;
    use crate::diagram::{BarrePosition, FretLabelPosition, FretLabelSide, MarkPosition};

    fn chord() -> Diagram {
        let mut diagram = Diagram::new(&DiagramStyle::defaults(), 6, 5).unwrap();
        diagram.set_title(Some("C7".to_string()));
        diagram
            .new_mark(MarkPosition::new(5, 3), MarkType::Root, "1")
            .unwrap();
        diagram
            .new_mark(MarkPosition::new(6, 0), MarkType::Muted, "")
            .unwrap();
        diagram
            .new_barre(BarrePosition::new(1, 1, 3), "")
            .unwrap();
        diagram
            .new_fret_label(FretLabelPosition::new(FretLabelSide::Left, 1), "3")
            .unwrap();
        diagram
    }

    fn position_of(svg: &str, needle: &str) -> usize {
        svg.find(needle)
            .unwrap_or_else(|| panic!("`{needle}` not found in:\n{svg}"))
    }

    #[test]
    fn test_document_shape() {
        let svg = render_svg(&chord()).unwrap();
        assert!(svg.starts_with(XML_DECLARATION));
        assert!(svg.contains(SVG_DOCTYPE));
        assert!(svg.contains(&format!(
            "<!-- Created with Fretwork {} -->",
            env!("CARGO_PKG_VERSION")
        )));
        assert_eq!(svg.matches("<svg").count(), 1);
    }

    #[test]
    fn test_layers_in_paint_order() {
        let svg = render_svg(&chord()).unwrap();
        let order = [
            "data-layer=\"background\"",
            "data-layer=\"grid\"",
            "data-layer=\"barres-under\"",
            "data-layer=\"marks\"",
            "data-layer=\"fret-labels\"",
            "data-layer=\"title\"",
        ];
        let positions: Vec<usize> = order.iter().map(|layer| position_of(&svg, layer)).collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{positions:?}");
        assert!(!svg.contains("data-layer=\"barres-over\""));
    }

    #[test]
    fn test_barres_over_marks() {
        let diagram = chord();
        diagram
            .style()
            .set_barre_stack(fretwork_core::style::BarreStack::OverMarks)
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        assert!(!svg.contains("data-layer=\"barres-under\""));
        assert!(position_of(&svg, "data-layer=\"marks\"") < position_of(&svg, "data-layer=\"barres-over\""));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let diagram = chord();
        assert_eq!(render_svg(&diagram).unwrap(), render_svg(&diagram).unwrap());
    }

    #[test]
    fn test_empty_diagram_dimensions() {
        let diagram = Diagram::new(&DiagramStyle::defaults(), 6, 5).unwrap();
        let svg = render_svg(&diagram).unwrap();
        assert!(svg.contains(r#"width="190""#));
        assert!(svg.contains(r#"height="190""#));
        assert!(!svg.contains("data-layer=\"marks\""));
        assert!(!svg.contains("data-layer=\"title\""));
    }

    #[test]
    fn test_left_right_swaps_dimensions() {
        let diagram = Diagram::new(&DiagramStyle::defaults(), 4, 5).unwrap();
        let up_down = render_svg(&diagram).unwrap();
        assert!(up_down.contains(r#"width="130""#));
        assert!(up_down.contains(r#"height="190""#));

        diagram
            .style()
            .set_orientation(Orientation::LeftRight)
            .unwrap();
        let left_right = render_svg(&diagram).unwrap();
        assert!(left_right.contains(r#"width="190""#));
        assert!(left_right.contains(r#"height="130""#));
        assert!(left_right.contains(r#"transform="translate(30 -30) rotate(-90 65 95)""#));
    }

    #[test]
    fn test_chord_name_title_split() {
        let diagram = chord();
        diagram
            .style()
            .set_title_label_style(TitleLabelStyle::ChordName)
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        // 20pt title with a 0.75 modifier ratio
        assert!(svg.contains(r#"<tspan style="font-size:15pt;">7</tspan>"#), "{svg}");

        let plain = render_svg(&chord()).unwrap();
        assert!(!plain.contains("<tspan"));
        assert!(plain.contains(">C7</text>"));
    }

    #[test]
    fn test_single_character_chord_name_has_no_tspan() {
        let mut diagram = chord();
        diagram.set_title(Some("C".to_string()));
        diagram
            .style()
            .set_title_label_style(TitleLabelStyle::ChordName)
            .unwrap();
        assert!(!render_svg(&diagram).unwrap().contains("<tspan"));
    }

    #[test]
    fn test_font_family_applies_to_texts_without_own_font() {
        let diagram = chord();
        diagram.style().set_font_family("monospace").unwrap();
        let svg = render_svg(&diagram).unwrap();
        assert!(!svg.contains("font-family:serif;"), "{svg}");
        // Title, root mark text and fret label
        assert_eq!(svg.matches("font-family:monospace;").count(), 3, "{svg}");

        diagram.style().set_title_text_font("Georgia").unwrap();
        let svg = render_svg(&diagram).unwrap();
        assert!(svg.contains("font-family:Georgia;"));
        assert_eq!(svg.matches("font-family:monospace;").count(), 2, "{svg}");
    }
}
