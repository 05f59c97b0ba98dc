//! Elements placed on a diagram.
//!
//! Elements are created and moved only through [`Diagram`](crate::Diagram).
//! Each one owns a style level chained to its diagram's level.

use fretwork_core::style::{DiagramStyle, MarkType};

use super::position::{BarrePosition, FretLabelPosition, MarkPosition};

/// A mark on a string/fret cell.
#[derive(Debug)]
pub struct Mark {
    position: MarkPosition,
    mark_type: MarkType,
    text: String,
    style: DiagramStyle,
}

impl Mark {
    pub(crate) fn new(
        position: MarkPosition,
        mark_type: MarkType,
        text: String,
        parent: &DiagramStyle,
    ) -> Self {
        Self {
            position,
            mark_type,
            text,
            style: DiagramStyle::new("mark", parent),
        }
    }

    pub fn position(&self) -> MarkPosition {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: MarkPosition) {
        self.position = position;
    }

    pub fn mark_type(&self) -> MarkType {
        self.mark_type
    }

    pub fn set_mark_type(&mut self, mark_type: MarkType) {
        self.mark_type = mark_type;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns the mark's own style level.
    pub fn style(&self) -> &DiagramStyle {
        &self.style
    }

    pub(crate) fn duplicate(&self, parent: &DiagramStyle) -> Self {
        Self {
            position: self.position,
            mark_type: self.mark_type,
            text: self.text.clone(),
            style: self.style.duplicate_with_parent(parent),
        }
    }
}

/// A text label beside the grid.
#[derive(Debug)]
pub struct FretLabel {
    position: FretLabelPosition,
    text: String,
    style: DiagramStyle,
}

impl FretLabel {
    pub(crate) fn new(position: FretLabelPosition, text: String, parent: &DiagramStyle) -> Self {
        Self {
            position,
            text,
            style: DiagramStyle::new("fretlabel", parent),
        }
    }

    pub fn position(&self) -> FretLabelPosition {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: FretLabelPosition) {
        self.position = position;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn style(&self) -> &DiagramStyle {
        &self.style
    }

    pub(crate) fn duplicate(&self, parent: &DiagramStyle) -> Self {
        Self {
            position: self.position,
            text: self.text.clone(),
            style: self.style.duplicate_with_parent(parent),
        }
    }
}

/// A bar across a contiguous range of strings at one fret.
#[derive(Debug)]
pub struct Barre {
    position: BarrePosition,
    text: String,
    style: DiagramStyle,
}

impl Barre {
    pub(crate) fn new(position: BarrePosition, text: String, parent: &DiagramStyle) -> Self {
        Self {
            position,
            text,
            style: DiagramStyle::new("barre", parent),
        }
    }

    pub fn position(&self) -> BarrePosition {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: BarrePosition) {
        self.position = position;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn style(&self) -> &DiagramStyle {
        &self.style
    }

    pub(crate) fn duplicate(&self, parent: &DiagramStyle) -> Self {
        Self {
            position: self.position,
            text: self.text.clone(),
            style: self.style.duplicate_with_parent(parent),
        }
    }
}
