//! Marks, barres and fret labels.

use svg::node::{Text as SvgText, element as svg_element};

use fretwork_core::{
    draw::{LayeredOutput, RenderLayer, SvgNode, format_number, mark_shape},
    style::{BarreStack, BarreVerticalAlignment, TextAlignment},
};

use super::{Renderer, frame::line};
use crate::{diagram::FretLabelSide, error::FretworkError};

/// Distance of a top or bottom aligned barre from the row center, relative
/// to the fret spacing.
const BARRE_ALIGNMENT_OFFSET: f64 = 0.25;

const MARK_SHAPE_STYLE: &[(&str, &str)] = &[
    ("mark.color", "fill"),
    ("mark.opacity", "fill-opacity"),
    ("mark.bordercolor", "stroke"),
    ("mark.borderthickness", "stroke-width"),
];

const MARK_TEXT_STYLE: &[(&str, &str)] = &[
    ("mark.textstyle", ""),
    ("mark.textalignment", "text-anchor"),
    ("mark.textcolor", "fill"),
    ("mark.textopacity", "fill-opacity"),
];

const BARRE_ARC_STYLE: &[(&str, &str)] = &[
    ("barre.color", "fill"),
    ("barre.opacity", "fill-opacity"),
    ("barre.linecolor", "stroke"),
    ("barre.linethickness", "stroke-width"),
];

const BARRE_LINE_STYLE: &[(&str, &str)] = &[
    ("barre.linecolor", "stroke"),
    ("barre.opacity", "stroke-opacity"),
    ("barre.linethickness", "stroke-width"),
];

const FRET_LABEL_STYLE: &[(&str, &str)] = &[
    ("fretlabel.textstyle", ""),
    ("fretlabel.textcolor", "fill"),
    ("fretlabel.textopacity", "fill-opacity"),
];

impl Renderer<'_> {
    /// Each mark resolves its style under its own mark type prefix.
    pub(super) fn render_marks(&self, output: &mut LayeredOutput) -> Result<(), FretworkError> {
        let layout = &self.layout;
        let half_spacing = 0.5 * layout.string_spacing().min(layout.fret_spacing());

        for mark in self.diagram.marks() {
            let style = mark.style();
            let mark_type = mark.mark_type();
            let prefix = mark_type.prefix();
            if !style.mark_visible(mark_type)? {
                continue;
            }

            let position = mark.position();
            let center = layout.cell_center(position.string(), position.fret());
            let radius = style.mark_radius_ratio(mark_type)? * half_spacing;
            let shape_style = style.get_svg_style(MARK_SHAPE_STYLE, prefix)?;
            if let Some(shape) =
                mark_shape::render(style.mark_shape(mark_type)?, center, radius, &shape_style)
            {
                output.add_to_layer(RenderLayer::Marks, shape);
            }

            if mark.text().is_empty() || !style.mark_text_visible(mark_type)? {
                continue;
            }
            let font_size = style.mark_text_size_ratio(mark_type)? * 2.0 * radius;
            let x = match style.mark_text_alignment(mark_type)? {
                TextAlignment::Left => center.x() - radius,
                TextAlignment::Center => center.x(),
                TextAlignment::Right => center.x() + radius,
            };
            let css = format!(
                "font-family:{};font-size:{}pt;dominant-baseline:central;{}",
                style.mark_font(mark_type)?,
                format_number(font_size),
                style.get_svg_style(MARK_TEXT_STYLE, prefix)?
            );
            let text = svg_element::Text::new("")
                .set("x", format_number(x))
                .set("y", format_number(center.y()))
                .set("style", css)
                .add(SvgText::new(mark.text()));
            output.add_to_layer(RenderLayer::Marks, Box::new(text));
        }
        Ok(())
    }

    /// Barres are elliptical arcs spanning their strings, or straight lines
    /// when the arc ratio is zero.
    pub(super) fn render_barres(&self, output: &mut LayeredOutput) -> Result<(), FretworkError> {
        let layout = &self.layout;
        let fret_spacing = layout.fret_spacing();

        for barre in self.diagram.barres() {
            let style = barre.style();
            if !style.barre_visible()? {
                continue;
            }
            let layer = match style.barre_stack()? {
                BarreStack::UnderMarks => RenderLayer::BarresUnder,
                BarreStack::OverMarks => RenderLayer::BarresOver,
            };

            let position = barre.position();
            let offset = match style.barre_vertical_alignment()? {
                BarreVerticalAlignment::Top => -fret_spacing * BARRE_ALIGNMENT_OFFSET,
                BarreVerticalAlignment::Middle => 0.0,
                BarreVerticalAlignment::Bottom => fret_spacing * BARRE_ALIGNMENT_OFFSET,
            };
            let y = layout.fret_center_y(position.fret()) + offset;
            let start = layout.string_x(position.start_string());
            let end = layout.string_x(position.end_string());

            let arc_ratio = style.barre_arc_ratio()?;
            let node: SvgNode = if arc_ratio > 0.0 {
                let data = format!(
                    "M {} {} A {} {} 0 0 1 {} {}",
                    format_number(start),
                    format_number(y),
                    format_number((end - start) / 2.0),
                    format_number(arc_ratio * fret_spacing),
                    format_number(end),
                    format_number(y)
                );
                Box::new(
                    svg_element::Path::new()
                        .set("d", data)
                        .set("style", style.get_svg_style(BARRE_ARC_STYLE, "")?),
                )
            } else {
                Box::new(line(
                    (start, y),
                    (end, y),
                    &style.get_svg_style(BARRE_LINE_STYLE, "")?,
                ))
            };
            output.add_to_layer(layer, node);
        }
        Ok(())
    }

    /// Left labels end at the grid padding, right labels start there.
    pub(super) fn render_fret_labels(
        &self,
        output: &mut LayeredOutput,
    ) -> Result<(), FretworkError> {
        let layout = &self.layout;

        for label in self.diagram.fret_labels() {
            let style = label.style();
            if label.text().is_empty() || !style.fret_label_text_visible()? {
                continue;
            }
            let position = label.position();
            let padding = style.fret_label_grid_padding()?;
            let (x, anchor) = match position.side() {
                FretLabelSide::Left => (layout.grid_left() - padding, "end"),
                FretLabelSide::Right => (layout.grid_right() + padding, "start"),
            };
            let font_size = style.fret_label_text_size_ratio()? * layout.fret_spacing();
            let css = format!(
                "font-family:{};font-size:{}pt;text-anchor:{anchor};dominant-baseline:central;{}",
                style.fret_label_font()?,
                format_number(font_size),
                style.get_svg_style(FRET_LABEL_STYLE, "")?
            );
            let text = svg_element::Text::new("")
                .set("x", format_number(x))
                .set("y", format_number(layout.fret_center_y(position.fret())))
                .set("style", css)
                .add(SvgText::new(label.text()));
            output.add_to_layer(RenderLayer::FretLabels, Box::new(text));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use fretwork_core::{
        color::NamedColor,
        style::{DiagramStyle, MarkShape, MarkType},
    };

    use crate::{
        diagram::{BarrePosition, Diagram, FretLabelPosition, FretLabelSide, MarkPosition},
        export::svg::render_svg,
    };

    fn diagram() -> Diagram {
        Diagram::new(&DiagramStyle::defaults(), 6, 5).unwrap()
    }

    #[test]
    fn test_root_mark_is_square_at_cell() {
        let mut diagram = diagram();
        diagram
            .new_mark(MarkPosition::new(5, 3), MarkType::Root, "")
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        // Center (140, 95), radius 0.67 * 15
        assert!(svg.contains(r#"x="129.95""#), "{svg}");
        assert!(svg.contains(r#"y="84.95""#));
        assert!(svg.contains(r#"width="20.1""#));
        assert!(svg.contains("fill:black;fill-opacity:1;stroke:black;stroke-width:2;"));
    }

    #[test]
    fn test_typed_mark_style_overrides_generic() {
        let mut diagram = diagram();
        diagram
            .style()
            .set_mark_color(MarkType::Root, NamedColor::Red)
            .unwrap();
        diagram
            .style()
            .set_mark_color(MarkType::Normal, NamedColor::Blue)
            .unwrap();
        diagram
            .new_mark(MarkPosition::new(5, 3), MarkType::Root, "")
            .unwrap();
        diagram
            .new_mark(MarkPosition::new(4, 2), MarkType::Muted, "")
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        assert!(svg.contains("fill:red;"));
        assert!(svg.contains("fill:blue;"));
        // Muted marks are an X
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_mark_text() {
        let mut diagram = diagram();
        diagram
            .new_mark(MarkPosition::new(2, 1), MarkType::Normal, "3")
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        // 0.5 * 2 * 10.05
        assert!(svg.contains(
            "font-family:serif;font-size:10.05pt;dominant-baseline:central;text-anchor:middle;fill:white;fill-opacity:1;"
        ));
        assert!(svg.contains(">3</text>"));

        diagram
            .style()
            .set_mark_text_visible(MarkType::Normal, false)
            .unwrap();
        assert!(!render_svg(&diagram).unwrap().contains("<text"));
    }

    #[test]
    fn test_hidden_and_shapeless_marks() {
        let mut diagram = diagram();
        let mark = diagram
            .new_mark(MarkPosition::new(2, 1), MarkType::Normal, "")
            .unwrap();
        mark.style()
            .set_mark_shape(MarkType::Normal, MarkShape::None)
            .unwrap();
        assert!(!render_svg(&diagram).unwrap().contains("data-layer=\"marks\""));

        let mark = diagram.mark_at_mut(MarkPosition::new(2, 1)).unwrap();
        mark.style()
            .set_mark_shape(MarkType::Normal, MarkShape::Diamond)
            .unwrap();
        mark.style()
            .set_mark_visible(MarkType::Normal, false)
            .unwrap();
        assert!(!render_svg(&diagram).unwrap().contains("<polygon"));
    }

    #[test]
    fn test_barre_arc_and_line() {
        let mut diagram = diagram();
        diagram
            .new_barre(BarrePosition::new(1, 1, 6), "")
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        // Row 1 center is at 35, arc height 0.5 * 30
        assert!(svg.contains(r#"d="M 20 35 A 75 15 0 0 1 170 35""#), "{svg}");

        let barre = diagram.barre_at(BarrePosition::new(1, 1, 6)).unwrap();
        barre.style().set_barre_arc_ratio(0.0).unwrap();
        barre
            .style()
            .set_barre_vertical_alignment(fretwork_core::style::BarreVerticalAlignment::Top)
            .unwrap();
        let svg = render_svg(&diagram).unwrap();
        assert!(!svg.contains("<path"));
        assert!(svg.contains(r#"y1="27.5""#));
        assert!(svg.contains("stroke:black;stroke-opacity:1;stroke-width:2;"));
    }

    #[test]
    fn test_fret_labels_anchor_to_grid() {
        let mut diagram = diagram();
        diagram
            .new_fret_label(FretLabelPosition::new(FretLabelSide::Left, 2), "5")
            .unwrap();
        diagram
            .new_fret_label(FretLabelPosition::new(FretLabelSide::Right, 2), "7")
            .unwrap();
        let layout = diagram.layout().unwrap();
        let svg = render_svg(&diagram).unwrap();

        let left_x = fretwork_core::draw::format_number(layout.grid_left() - 6.0);
        let right_x = fretwork_core::draw::format_number(layout.grid_right() + 6.0);
        assert!(svg.contains(&format!(r#"x="{left_x}""#)));
        assert!(svg.contains(&format!(r#"x="{right_x}""#)));
        assert!(svg.contains("text-anchor:end;"));
        assert!(svg.contains("text-anchor:start;"));
        assert!(svg.contains("font-size:18pt;"));
    }
}
