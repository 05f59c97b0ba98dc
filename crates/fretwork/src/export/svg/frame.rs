//! Background, grid and title.

use svg::node::{Text as SvgText, element as svg_element};

use fretwork_core::{
    draw::{LayeredOutput, RenderLayer, format_number},
    style::{TextAlignment, TitleLabelStyle},
};

use super::Renderer;
use crate::{error::FretworkError, layout::has_visible_title};

const GRID_STYLE: &[(&str, &str)] = &[
    ("grid.color", "fill"),
    ("grid.opacity", "fill-opacity"),
    ("grid.linecolor", "stroke"),
    ("grid.linethickness", "stroke-width"),
];

const GRID_LINE_STYLE: &[(&str, &str)] = &[
    ("grid.linecolor", "stroke"),
    ("grid.linethickness", "stroke-width"),
];

const TITLE_STYLE: &[(&str, &str)] = &[
    ("title.textstyle", ""),
    ("title.textsize", "font-size"),
    ("title.textalignment", "text-anchor"),
    ("title.textcolor", "fill"),
    ("title.textopacity", "fill-opacity"),
];

impl Renderer<'_> {
    pub(super) fn render_background(&self, output: &mut LayeredOutput) -> Result<(), FretworkError> {
        let style = self.diagram.style();
        let mut style_map = vec![("diagram.color", "fill"), ("diagram.opacity", "fill-opacity")];
        if style.border_thickness()? > 0.0 {
            style_map.push(("diagram.bordercolor", "stroke"));
            style_map.push(("diagram.borderthickness", "stroke-width"));
        }

        let canvas = self.layout.canvas_size();
        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", format_number(canvas.width()))
            .set("height", format_number(canvas.height()))
            .set("style", style.get_svg_style(&style_map, "")?);
        output.add_to_layer(RenderLayer::Background, Box::new(background));
        Ok(())
    }

    /// The grid rectangle draws the outer strings and the first and last
    /// fret lines; only interior lines are drawn separately.
    pub(super) fn render_grid(&self, output: &mut LayeredOutput) -> Result<(), FretworkError> {
        let style = self.diagram.style();
        let layout = &self.layout;

        let grid = svg_element::Rectangle::new()
            .set("x", format_number(layout.grid_left()))
            .set("y", format_number(layout.grid_top()))
            .set("width", format_number(layout.grid_width()))
            .set("height", format_number(layout.grid_height()))
            .set("style", style.get_svg_style(GRID_STYLE, "")?);
        output.add_to_layer(RenderLayer::Grid, Box::new(grid));

        let line_style = style.get_svg_style(GRID_LINE_STYLE, "")?;
        for string in 2..self.diagram.num_strings() {
            let x = layout.string_x(string);
            output.add_to_layer(
                RenderLayer::Grid,
                Box::new(line(
                    (x, layout.grid_top()),
                    (x, layout.grid_bottom()),
                    &line_style,
                )),
            );
        }
        for fret in 1..self.diagram.num_frets() {
            let y = layout.fret_line_y(fret);
            output.add_to_layer(
                RenderLayer::Grid,
                Box::new(line(
                    (layout.grid_left(), y),
                    (layout.grid_right(), y),
                    &line_style,
                )),
            );
        }

        if style.nut_visible()? {
            let nut_style = format!(
                "{}stroke-width:{};stroke-linecap:square;",
                style.get_svg_style(&[("grid.linecolor", "stroke")], "")?,
                format_number(style.grid_line_thickness()? * style.nut_ratio()?)
            );
            output.add_to_layer(
                RenderLayer::Grid,
                Box::new(line(
                    (layout.grid_left(), layout.grid_top()),
                    (layout.grid_right(), layout.grid_top()),
                    &nut_style,
                )),
            );
        }
        Ok(())
    }

    /// The title baseline sits one text size below the top margin, which
    /// keeps it above the open-string row when the layout pads vertically.
    pub(super) fn render_title(&self, output: &mut LayeredOutput) -> Result<(), FretworkError> {
        if !has_visible_title(self.diagram)? {
            return Ok(());
        }
        let title = self.diagram.title().unwrap_or_default();
        let style = self.diagram.style();
        let layout = &self.layout;
        let size = style.title_text_size()?;

        let x = match style.title_text_alignment()? {
            TextAlignment::Left => layout.grid_left(),
            TextAlignment::Center => (layout.grid_left() + layout.grid_right()) / 2.0,
            TextAlignment::Right => layout.grid_right(),
        };
        let y = style.margin_top()? + size;
        let css = format!(
            "font-family:{};{}",
            style.title_font()?,
            style.get_svg_style(TITLE_STYLE, "")?
        );

        let split = match style.title_label_style()? {
            TitleLabelStyle::ChordName => title.char_indices().nth(1).map(|(index, _)| index),
            TitleLabelStyle::Normal => None,
        };
        let text = svg_element::Text::new("")
            .set("x", format_number(x))
            .set("y", format_number(y))
            .set("style", css);
        let text = match split {
            Some(index) => {
                let (root, modifier) = title.split_at(index);
                let modifier_style = format!(
                    "font-size:{}pt;",
                    format_number(size * style.title_text_size_mod_ratio()?)
                );
                text.add(SvgText::new(root)).add(
                    svg_element::TSpan::new("")
                        .set("style", modifier_style)
                        .add(SvgText::new(modifier)),
                )
            }
            None => text.add(SvgText::new(title)),
        };
        output.add_to_layer(RenderLayer::Title, Box::new(text));
        Ok(())
    }
}

pub(super) fn line(from: (f64, f64), to: (f64, f64), style: &str) -> svg_element::Line {
    svg_element::Line::new()
        .set("x1", format_number(from.0))
        .set("y1", format_number(from.1))
        .set("x2", format_number(to.0))
        .set("y2", format_number(to.1))
        .set("style", style)
}
