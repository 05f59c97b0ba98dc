//! Builds a barre chord diagram in code and prints its SVG and XML forms.
//!
//! ```text
//! cargo run -p fretwork --example chord > f_major.svg
//! ```

use fretwork::{
    BarrePosition, DiagramBuilder, FretLabelPosition, FretLabelSide, FretworkError, MarkPosition,
    color::NamedColor,
    style::{MarkType, TitleLabelStyle},
};

fn main() -> Result<(), FretworkError> {
    let builder = DiagramBuilder::default();
    let mut diagram = builder.new_diagram(6, 4)?;
    diagram.set_title(Some("Fmaj7".to_string()));
    diagram
        .style()
        .set_title_label_style(TitleLabelStyle::ChordName)?;

    diagram.new_barre(BarrePosition::new(1, 1, 6), "1")?;
    diagram.new_mark(MarkPosition::new(6, 1), MarkType::Root, "1")?;
    diagram.new_mark(MarkPosition::new(5, 3), MarkType::Normal, "3")?;
    diagram.new_mark(MarkPosition::new(4, 2), MarkType::Normal, "2")?;
    diagram.new_fret_label(FretLabelPosition::new(FretLabelSide::Left, 1), "1fr")?;

    if let Some(root) = diagram.mark_at(MarkPosition::new(6, 1)) {
        root.style()
            .set_mark_color(MarkType::Root, NamedColor::Maroon)?;
    }

    println!("{}", builder.render_svg(&diagram)?);
    eprintln!("{}", builder.write_xml(&diagram));
    eprintln!("colors: {:?}", builder.colors_in_use(&diagram)?);
    Ok(())
}
