//! The fretboard diagram model.
//!
//! A [`Diagram`] is a grid of `num_strings` strings and `num_frets` frets
//! holding [`Mark`]s, [`FretLabel`]s and [`Barre`]s. All placement goes
//! through the diagram so the bounds and uniqueness invariants hold at all
//! times:
//!
//! - at most one mark per cell and one fret label per side and fret
//! - barres on the same fret never share a string
//! - every position lies on the fretboard
//!
//! # Example
//!
//! ```
//! # use fretwork::{Diagram, MarkPosition, BarrePosition};
//! # use fretwork::style::{DiagramStyle, MarkType};
//! let defaults = DiagramStyle::defaults();
//! let mut diagram = Diagram::new(&defaults, 6, 5).unwrap();
//!
//! diagram.new_barre(BarrePosition::new(1, 1, 6), "").unwrap();
//! diagram.new_mark(MarkPosition::new(5, 3), MarkType::Root, "1").unwrap();
//!
//! assert!(!diagram.can_add_barre_at(BarrePosition::new(1, 2, 3)));
//! ```

mod element;
mod position;

pub use element::{Barre, FretLabel, Mark};
pub use position::{BarrePosition, FretLabelPosition, FretLabelSide, MarkPosition};

use std::collections::BTreeSet;

use log::{debug, info};

use fretwork_core::style::{DiagramStyle, MarkType};

use crate::{
    error::FretworkError,
    layout::{ElementPosition, GridLayout},
};

/// Smallest number of strings a diagram can have.
pub const MIN_STRINGS: u32 = 2;

/// Smallest number of frets a diagram can have.
pub const MIN_FRETS: u32 = 1;

/// A fretboard diagram.
#[derive(Debug)]
pub struct Diagram {
    title: Option<String>,
    num_strings: u32,
    num_frets: u32,
    marks: Vec<Mark>,
    fret_labels: Vec<FretLabel>,
    barres: Vec<Barre>,
    style: DiagramStyle,
}

impl Diagram {
    /// Create an empty diagram whose style inherits from `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::OutOfRange`] for fewer than two strings or
    /// fewer than one fret.
    pub fn new(
        parent: &DiagramStyle,
        num_strings: u32,
        num_frets: u32,
    ) -> Result<Self, FretworkError> {
        check_dimensions(num_strings, num_frets)?;
        debug!(strings = num_strings, frets = num_frets; "Creating diagram");
        Ok(Self {
            title: None,
            num_strings,
            num_frets,
            marks: Vec::new(),
            fret_labels: Vec::new(),
            barres: Vec::new(),
            style: DiagramStyle::new("diagram", parent),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn num_strings(&self) -> u32 {
        self.num_strings
    }

    pub fn num_frets(&self) -> u32 {
        self.num_frets
    }

    /// Returns the diagram's own style level.
    pub fn style(&self) -> &DiagramStyle {
        &self.style
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn fret_labels(&self) -> &[FretLabel] {
        &self.fret_labels
    }

    pub fn barres(&self) -> &[Barre] {
        &self.barres
    }

    /// Returns `true` if the diagram has no elements.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.fret_labels.is_empty() && self.barres.is_empty()
    }

    /// Change the string and fret counts.
    ///
    /// Every element is checked against the new bounds before anything
    /// changes. Marks below the board (on fret `num_frets + 1`) stay below
    /// the board.
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::OutOfRange`] for invalid counts and
    /// [`FretworkError::CantResizeDiagram`] if an element would fall off the
    /// fretboard. The diagram is unchanged in both cases.
    pub fn resize(&mut self, num_strings: u32, num_frets: u32) -> Result<(), FretworkError> {
        check_dimensions(num_strings, num_frets)?;
        let bottom = self.num_frets + 1;
        let cant_resize = |reason: String| FretworkError::CantResizeDiagram {
            strings: num_strings,
            frets: num_frets,
            reason,
        };

        for mark in &self.marks {
            let position = mark.position();
            if position.string() > num_strings {
                return Err(cant_resize(format!("mark at {position} is off the new grid")));
            }
            if position.fret() > num_frets && position.fret() != bottom {
                return Err(cant_resize(format!("mark at {position} is off the new grid")));
            }
        }
        if let Some(label) = self
            .fret_labels
            .iter()
            .find(|label| label.position().fret() > num_frets)
        {
            return Err(cant_resize(format!(
                "fret label at {} is off the new grid",
                label.position()
            )));
        }
        if let Some(barre) = self.barres.iter().find(|barre| {
            barre.position().fret() > num_frets || barre.position().end_string() > num_strings
        }) {
            return Err(cant_resize(format!(
                "barre at {} is off the new grid",
                barre.position()
            )));
        }

        info!(
            strings = num_strings,
            frets = num_frets,
            old_strings = self.num_strings,
            old_frets = self.num_frets;
            "Resizing diagram"
        );
        self.num_strings = num_strings;
        self.num_frets = num_frets;
        for mark in &mut self.marks {
            if mark.position().fret() == bottom {
                let moved = mark.position().with_fret(num_frets + 1);
                mark.set_position(moved);
            }
        }
        Ok(())
    }

    /// Returns `true` if `position` lies on the fretboard.
    pub fn is_valid_mark_position(&self, position: MarkPosition) -> bool {
        (1..=self.num_strings).contains(&position.string())
            && position.fret() <= self.num_frets + 1
    }

    /// Returns `true` if a new mark can be placed at `position`.
    pub fn can_add_mark_at(&self, position: MarkPosition) -> bool {
        self.is_valid_mark_position(position) && self.mark_at(position).is_none()
    }

    /// Place a new mark.
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::ElementPositionOffFretboard`] or
    /// [`FretworkError::ElementAlreadyExistsAtPosition`].
    pub fn new_mark(
        &mut self,
        position: MarkPosition,
        mark_type: MarkType,
        text: impl Into<String>,
    ) -> Result<&mut Mark, FretworkError> {
        self.check_mark_target(position, None)?;
        debug!(position:% = position, mark_type:% = mark_type; "Adding mark");
        let index = self.marks.len();
        self.marks
            .push(Mark::new(position, mark_type, text.into(), &self.style));
        Ok(&mut self.marks[index])
    }

    pub fn mark_at(&self, position: MarkPosition) -> Option<&Mark> {
        self.marks.iter().find(|mark| mark.position() == position)
    }

    pub fn mark_at_mut(&mut self, position: MarkPosition) -> Option<&mut Mark> {
        self.marks.iter_mut().find(|mark| mark.position() == position)
    }

    /// Move the mark at `from` to `to`.
    pub fn set_mark_position(
        &mut self,
        from: MarkPosition,
        to: MarkPosition,
    ) -> Result<(), FretworkError> {
        let index = self
            .marks
            .iter()
            .position(|mark| mark.position() == from)
            .ok_or_else(|| FretworkError::ElementNotFound(from.to_string()))?;
        self.check_mark_target(to, Some(index))?;
        self.marks[index].set_position(to);
        Ok(())
    }

    /// Remove and return the mark at `position`.
    pub fn remove_mark(&mut self, position: MarkPosition) -> Option<Mark> {
        let index = self.marks.iter().position(|mark| mark.position() == position)?;
        Some(self.marks.remove(index))
    }

    fn check_mark_target(
        &self,
        position: MarkPosition,
        ignore: Option<usize>,
    ) -> Result<(), FretworkError> {
        if !self.is_valid_mark_position(position) {
            return Err(FretworkError::ElementPositionOffFretboard(position.to_string()));
        }
        let taken = self
            .marks
            .iter()
            .enumerate()
            .any(|(index, mark)| Some(index) != ignore && mark.position() == position);
        if taken {
            return Err(FretworkError::ElementAlreadyExistsAtPosition(
                position.to_string(),
            ));
        }
        Ok(())
    }

    /// Returns `true` if `position` lies beside an existing fret.
    pub fn is_valid_fret_label_position(&self, position: FretLabelPosition) -> bool {
        (1..=self.num_frets).contains(&position.fret())
    }

    pub fn can_add_fret_label_at(&self, position: FretLabelPosition) -> bool {
        self.is_valid_fret_label_position(position) && self.fret_label_at(position).is_none()
    }

    /// Place a new fret label.
    pub fn new_fret_label(
        &mut self,
        position: FretLabelPosition,
        text: impl Into<String>,
    ) -> Result<&mut FretLabel, FretworkError> {
        self.check_fret_label_target(position, None)?;
        debug!(position:% = position; "Adding fret label");
        let index = self.fret_labels.len();
        self.fret_labels
            .push(FretLabel::new(position, text.into(), &self.style));
        Ok(&mut self.fret_labels[index])
    }

    pub fn fret_label_at(&self, position: FretLabelPosition) -> Option<&FretLabel> {
        self.fret_labels
            .iter()
            .find(|label| label.position() == position)
    }

    pub fn fret_label_at_mut(&mut self, position: FretLabelPosition) -> Option<&mut FretLabel> {
        self.fret_labels
            .iter_mut()
            .find(|label| label.position() == position)
    }

    /// Move the fret label at `from` to `to`.
    pub fn set_fret_label_position(
        &mut self,
        from: FretLabelPosition,
        to: FretLabelPosition,
    ) -> Result<(), FretworkError> {
        let index = self
            .fret_labels
            .iter()
            .position(|label| label.position() == from)
            .ok_or_else(|| FretworkError::ElementNotFound(from.to_string()))?;
        self.check_fret_label_target(to, Some(index))?;
        self.fret_labels[index].set_position(to);
        Ok(())
    }

    pub fn remove_fret_label(&mut self, position: FretLabelPosition) -> Option<FretLabel> {
        let index = self
            .fret_labels
            .iter()
            .position(|label| label.position() == position)?;
        Some(self.fret_labels.remove(index))
    }

    fn check_fret_label_target(
        &self,
        position: FretLabelPosition,
        ignore: Option<usize>,
    ) -> Result<(), FretworkError> {
        if !self.is_valid_fret_label_position(position) {
            return Err(FretworkError::ElementPositionOffFretboard(position.to_string()));
        }
        let taken = self
            .fret_labels
            .iter()
            .enumerate()
            .any(|(index, label)| Some(index) != ignore && label.position() == position);
        if taken {
            return Err(FretworkError::ElementAlreadyExistsAtPosition(
                position.to_string(),
            ));
        }
        Ok(())
    }

    /// Returns `true` if `position` spans at least two strings of an
    /// existing fret.
    pub fn is_valid_barre_position(&self, position: BarrePosition) -> bool {
        (1..=self.num_frets).contains(&position.fret())
            && position.start_string() >= 1
            && position.start_string() < position.end_string()
            && position.end_string() <= self.num_strings
    }

    /// Returns `true` if a new barre can be placed at `position` without
    /// overlapping another barre.
    pub fn can_add_barre_at(&self, position: BarrePosition) -> bool {
        self.is_valid_barre_position(position)
            && !self
                .barres
                .iter()
                .any(|barre| barre.position().overlaps(position))
    }

    /// Place a new barre.
    pub fn new_barre(
        &mut self,
        position: BarrePosition,
        text: impl Into<String>,
    ) -> Result<&mut Barre, FretworkError> {
        self.check_barre_target(position, None)?;
        debug!(position:% = position; "Adding barre");
        let index = self.barres.len();
        self.barres
            .push(Barre::new(position, text.into(), &self.style));
        Ok(&mut self.barres[index])
    }

    /// Returns the barre placed exactly at `position`.
    pub fn barre_at(&self, position: BarrePosition) -> Option<&Barre> {
        self.barres.iter().find(|barre| barre.position() == position)
    }

    pub fn barre_at_mut(&mut self, position: BarrePosition) -> Option<&mut Barre> {
        self.barres
            .iter_mut()
            .find(|barre| barre.position() == position)
    }

    /// Returns the barre spanning `string` at `fret`.
    pub fn barre_covering(&self, fret: u32, string: u32) -> Option<&Barre> {
        self.barres
            .iter()
            .find(|barre| barre.position().covers(fret, string))
    }

    /// Move the barre at `from` to `to`. The barre's current span does not
    /// count as an overlap.
    pub fn set_barre_position(
        &mut self,
        from: BarrePosition,
        to: BarrePosition,
    ) -> Result<(), FretworkError> {
        let index = self
            .barres
            .iter()
            .position(|barre| barre.position() == from)
            .ok_or_else(|| FretworkError::ElementNotFound(from.to_string()))?;
        self.check_barre_target(to, Some(index))?;
        self.barres[index].set_position(to);
        Ok(())
    }

    pub fn remove_barre(&mut self, position: BarrePosition) -> Option<Barre> {
        let index = self
            .barres
            .iter()
            .position(|barre| barre.position() == position)?;
        Some(self.barres.remove(index))
    }

    fn check_barre_target(
        &self,
        position: BarrePosition,
        ignore: Option<usize>,
    ) -> Result<(), FretworkError> {
        if !self.is_valid_barre_position(position) {
            return Err(FretworkError::ElementPositionOffFretboard(position.to_string()));
        }
        let overlapping = self
            .barres
            .iter()
            .enumerate()
            .any(|(index, barre)| Some(index) != ignore && barre.position().overlaps(position));
        if overlapping {
            return Err(FretworkError::ElementAlreadyExistsAtPosition(
                position.to_string(),
            ));
        }
        Ok(())
    }

    /// Compute the grid geometry for the current model and style.
    pub fn layout(&self) -> Result<GridLayout, FretworkError> {
        GridLayout::compute(self)
    }

    /// Width of the rendered image.
    pub fn image_width(&self) -> Result<f64, FretworkError> {
        Ok(self.layout()?.image_size().width())
    }

    /// Height of the rendered image.
    pub fn image_height(&self) -> Result<f64, FretworkError> {
        Ok(self.layout()?.image_size().height())
    }

    /// Map a point of the rendered image to an element position.
    ///
    /// Returns `Ok(None)` when the point does not correspond to a position of
    /// kind `P`.
    ///
    /// ```
    /// # use fretwork::{Diagram, MarkPosition};
    /// # use fretwork::style::DiagramStyle;
    /// let diagram = Diagram::new(&DiagramStyle::defaults(), 6, 5).unwrap();
    /// let center = diagram.layout().unwrap().cell_center(3, 2);
    /// let hit = diagram.position_at::<MarkPosition>(center.x(), center.y()).unwrap();
    /// assert_eq!(hit, Some(MarkPosition::new(3, 2)));
    /// ```
    pub fn position_at<P: ElementPosition>(
        &self,
        x: f64,
        y: f64,
    ) -> Result<Option<P>, FretworkError> {
        let hit = self.layout()?.hit_test(x, y);
        Ok(P::from_hit(self, hit))
    }

    /// Returns the normalized names of all colors the renderer resolves for
    /// this diagram, sorted.
    pub fn colors_in_use(&self) -> Result<BTreeSet<String>, FretworkError> {
        let style = &self.style;
        let mut colors = BTreeSet::new();
        colors.insert(style.background_color()?.to_string());
        if style.border_thickness()? > 0.0 {
            colors.insert(style.border_color()?.to_string());
        }
        colors.insert(style.grid_color()?.to_string());
        colors.insert(style.grid_line_color()?.to_string());
        if style.title_visible()? && self.title.as_deref().is_some_and(|t| !t.is_empty()) {
            colors.insert(style.title_text_color()?.to_string());
        }

        for mark in &self.marks {
            let mark_style = mark.style();
            let mark_type = mark.mark_type();
            if !mark_style.mark_visible(mark_type)? {
                continue;
            }
            colors.insert(mark_style.mark_color(mark_type)?.to_string());
            if mark_style.mark_border_thickness(mark_type)? > 0.0 {
                colors.insert(mark_style.mark_border_color(mark_type)?.to_string());
            }
            if !mark.text().is_empty() && mark_style.mark_text_visible(mark_type)? {
                colors.insert(mark_style.mark_text_color(mark_type)?.to_string());
            }
        }

        for barre in &self.barres {
            let barre_style = barre.style();
            if barre_style.barre_visible()? {
                colors.insert(barre_style.barre_color()?.to_string());
                colors.insert(barre_style.barre_line_color()?.to_string());
            }
        }

        for label in &self.fret_labels {
            if label.style().fret_label_text_visible()? {
                colors.insert(label.style().fret_label_text_color()?.to_string());
            }
        }

        Ok(colors)
    }
}

impl Clone for Diagram {
    /// The copy gets its own style level with the same parent, and every
    /// element gets its own level chained to the copy.
    fn clone(&self) -> Self {
        self.with_style(self.style.duplicate())
    }
}

impl Diagram {
    /// Deep copy of this diagram whose style level is chained to `parent`.
    pub(crate) fn rechained(&self, parent: &DiagramStyle) -> Diagram {
        self.with_style(self.style.duplicate_with_parent(parent))
    }

    fn with_style(&self, style: DiagramStyle) -> Diagram {
        Self {
            title: self.title.clone(),
            num_strings: self.num_strings,
            num_frets: self.num_frets,
            marks: self.marks.iter().map(|mark| mark.duplicate(&style)).collect(),
            fret_labels: self
                .fret_labels
                .iter()
                .map(|label| label.duplicate(&style))
                .collect(),
            barres: self
                .barres
                .iter()
                .map(|barre| barre.duplicate(&style))
                .collect(),
            style,
        }
    }
}

fn check_dimensions(num_strings: u32, num_frets: u32) -> Result<(), FretworkError> {
    if num_strings < MIN_STRINGS {
        return Err(FretworkError::OutOfRange {
            what: "string count",
            value: i64::from(num_strings),
            expected: "at least 2",
        });
    }
    if num_frets < MIN_FRETS {
        return Err(FretworkError::OutOfRange {
            what: "fret count",
            value: i64::from(num_frets),
            expected: "at least 1",
        });
    }
    Ok(())
}
