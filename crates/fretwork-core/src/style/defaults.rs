//! Built-in default style values.

use crate::{
    color::{Color, NamedColor},
    style::{
        BarreStack, BarreVerticalAlignment, DiagramStyle, LabelLayoutModel, MarkShape,
        Orientation, StyleStore, StyleValue, TextAlignment, TextStyle, TitleLabelStyle,
    },
};

/// Name of the built-in root level.
pub const DEFAULTS_LEVEL: &str = "defaults";

const DEFAULT_FONT: &str = "serif";

/// A blank text font resolves to `diagram.fontfamily`.
const INHERIT_FONT: &str = "";

fn color(named: NamedColor) -> StyleValue {
    Color::from(named).into()
}

fn default_entries() -> Vec<(&'static str, StyleValue)> {
    vec![
        ("diagram.margintop", 20.0.into()),
        ("diagram.marginbottom", 20.0.into()),
        ("diagram.marginleft", 20.0.into()),
        ("diagram.marginright", 20.0.into()),
        ("diagram.color", color(NamedColor::White)),
        ("diagram.opacity", 1.0.into()),
        ("diagram.bordercolor", color(NamedColor::Black)),
        ("diagram.borderthickness", 0.0.into()),
        ("diagram.fontfamily", DEFAULT_FONT.into()),
        ("diagram.labellayoutmodel", LabelLayoutModel::AddPaddingBoth.into()),
        ("diagram.orientation", Orientation::UpDown.into()),
        ("grid.stringspacing", 30.0.into()),
        ("grid.fretspacing", 30.0.into()),
        ("grid.color", color(NamedColor::White)),
        ("grid.opacity", 1.0.into()),
        ("grid.linecolor", color(NamedColor::Black)),
        ("grid.linethickness", 2.0.into()),
        ("grid.nutvisible", true.into()),
        ("grid.nutratio", 2.0.into()),
        ("title.visible", true.into()),
        ("title.textsize", 20.0.into()),
        ("title.textsizemodratio", 0.75.into()),
        ("title.textfont", INHERIT_FONT.into()),
        ("title.textstyle", TextStyle::Regular.into()),
        ("title.textalignment", TextAlignment::Center.into()),
        ("title.textcolor", color(NamedColor::Black)),
        ("title.textopacity", 1.0.into()),
        ("title.gridpadding", 10.0.into()),
        ("title.labelstyle", TitleLabelStyle::Normal.into()),
        ("fretlabel.textvisible", true.into()),
        ("fretlabel.textsizeratio", 0.6.into()),
        ("fretlabel.textfont", INHERIT_FONT.into()),
        ("fretlabel.textstyle", TextStyle::Regular.into()),
        ("fretlabel.textcolor", color(NamedColor::Black)),
        ("fretlabel.textopacity", 1.0.into()),
        ("fretlabel.gridpadding", 6.0.into()),
        ("fretlabel.textwidthratio", 0.6.into()),
        ("barre.visible", true.into()),
        ("barre.verticalalignment", BarreVerticalAlignment::Middle.into()),
        ("barre.stack", BarreStack::UnderMarks.into()),
        ("barre.arcratio", 0.5.into()),
        ("barre.color", color(NamedColor::Black)),
        ("barre.opacity", 1.0.into()),
        ("barre.linecolor", color(NamedColor::Black)),
        ("barre.linethickness", 2.0.into()),
        ("mark.shape", MarkShape::Circle.into()),
        ("mark.visible", true.into()),
        ("mark.color", color(NamedColor::Black)),
        ("mark.opacity", 1.0.into()),
        ("mark.radiusratio", 0.67.into()),
        ("mark.bordercolor", color(NamedColor::Black)),
        ("mark.borderthickness", 2.0.into()),
        ("mark.textvisible", true.into()),
        ("mark.textsizeratio", 0.5.into()),
        ("mark.textfont", INHERIT_FONT.into()),
        ("mark.textstyle", TextStyle::Regular.into()),
        ("mark.textalignment", TextAlignment::Center.into()),
        ("mark.textcolor", color(NamedColor::White)),
        ("mark.textopacity", 1.0.into()),
        ("muted.shape", MarkShape::X.into()),
        ("open.color", color(NamedColor::White)),
        ("open.textcolor", color(NamedColor::Black)),
        ("root.shape", MarkShape::Square.into()),
        ("openroot.shape", MarkShape::Square.into()),
        ("openroot.color", color(NamedColor::White)),
        ("openroot.textcolor", color(NamedColor::Black)),
    ]
}

impl DiagramStyle {
    /// Create the read-only root level holding the built-in values.
    ///
    /// Every schema property resolves against this level, so a cascade
    /// rooted here never fails with [`StyleError::KeyNotFound`].
    ///
    /// [`StyleError::KeyNotFound`]: crate::error::StyleError::KeyNotFound
    pub fn defaults() -> DiagramStyle {
        let store = StyleStore::seeded(DEFAULTS_LEVEL, default_entries());
        store.mark_read_only();
        DiagramStyle::from_store(store)
    }
}
