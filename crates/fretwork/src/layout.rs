//! Grid geometry and hit testing.
//!
//! [`GridLayout`] is a snapshot of where the grid sits on the canvas for a
//! given diagram and its resolved style. The grid is offset by the margins
//! and, depending on the label layout model, by the space needed for fret
//! labels, the title, open-string marks and below-the-board marks.
//!
//! All coordinates here are in the unrotated canvas. A `LeftRight` diagram is
//! drawn unrotated and then turned by -90 degrees as a whole, so only
//! [`GridLayout::image_size`] and [`GridLayout::hit_test`] deal with rotation.

use log::trace;

use fretwork_core::{
    geometry::{Point, Size},
    style::Orientation,
};

use crate::{
    diagram::{BarrePosition, Diagram, FretLabelPosition, FretLabelSide, MarkPosition},
    error::FretworkError,
};

/// Fraction of the side margin that still snaps to the outer strings.
const MARGIN_SNAP_RATIO: f64 = 1.0 / 3.0;

/// Grid placement for one diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    num_strings: u32,
    num_frets: u32,
    string_spacing: f64,
    fret_spacing: f64,
    margin_left: f64,
    margin_right: f64,
    grid_left: f64,
    grid_top: f64,
    canvas: Size,
    orientation: Orientation,
}

impl GridLayout {
    /// Compute the layout of `diagram` from its resolved style.
    pub fn compute(diagram: &Diagram) -> Result<Self, FretworkError> {
        let style = diagram.style();
        let string_spacing = style.string_spacing()?;
        let fret_spacing = style.fret_spacing()?;
        let margin_left = style.margin_left()?;
        let margin_right = style.margin_right()?;
        let margin_top = style.margin_top()?;
        let margin_bottom = style.margin_bottom()?;
        let layout_model = style.label_layout_model()?;
        let orientation = style.orientation()?;

        let (left_labels, right_labels) = if layout_model.pads_horizontally() {
            (
                max_fret_label_width(diagram, FretLabelSide::Left, fret_spacing)?,
                max_fret_label_width(diagram, FretLabelSide::Right, fret_spacing)?,
            )
        } else {
            (0.0, 0.0)
        };

        let (above, below) = if layout_model.pads_vertically() {
            let open = diagram.marks().iter().any(|mark| mark.position().fret() == 0);
            let bottom = diagram
                .marks()
                .iter()
                .any(|mark| mark.position().fret() == diagram.num_frets() + 1);
            let title = if has_visible_title(diagram)? {
                style.title_grid_padding()? + style.title_text_size()?
            } else {
                0.0
            };
            (
                if open { fret_spacing } else { 0.0 } + title,
                if bottom { fret_spacing } else { 0.0 },
            )
        } else {
            (0.0, 0.0)
        };

        let grid_left = margin_left + left_labels;
        let grid_top = margin_top + above;
        let grid_width = string_spacing * f64::from(diagram.num_strings() - 1);
        let grid_height = fret_spacing * f64::from(diagram.num_frets());
        let canvas = Size::new(
            grid_left + grid_width + right_labels + margin_right,
            grid_top + grid_height + below + margin_bottom,
        );

        trace!(
            grid_left,
            grid_top,
            width = canvas.width(),
            height = canvas.height();
            "Computed grid layout"
        );

        Ok(Self {
            num_strings: diagram.num_strings(),
            num_frets: diagram.num_frets(),
            string_spacing,
            fret_spacing,
            margin_left,
            margin_right,
            grid_left,
            grid_top,
            canvas,
            orientation,
        })
    }

    pub fn string_spacing(&self) -> f64 {
        self.string_spacing
    }

    pub fn fret_spacing(&self) -> f64 {
        self.fret_spacing
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn grid_left(&self) -> f64 {
        self.grid_left
    }

    pub fn grid_top(&self) -> f64 {
        self.grid_top
    }

    pub fn grid_right(&self) -> f64 {
        self.grid_left + self.grid_width()
    }

    pub fn grid_bottom(&self) -> f64 {
        self.grid_top + self.grid_height()
    }

    pub fn grid_width(&self) -> f64 {
        self.string_spacing * f64::from(self.num_strings - 1)
    }

    pub fn grid_height(&self) -> f64 {
        self.fret_spacing * f64::from(self.num_frets)
    }

    /// Size of the canvas before rotation.
    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Size of the rendered image. Width and height are exchanged for
    /// [`Orientation::LeftRight`].
    pub fn image_size(&self) -> Size {
        match self.orientation {
            Orientation::UpDown => self.canvas,
            Orientation::LeftRight => self.canvas.transpose(),
        }
    }

    /// X coordinate of string `string` (1-based).
    pub fn string_x(&self, string: u32) -> f64 {
        self.grid_left + f64::from(string) * self.string_spacing - self.string_spacing
    }

    /// Y coordinate of fret line `fret`; line 0 is the nut.
    pub fn fret_line_y(&self, fret: u32) -> f64 {
        self.grid_top + f64::from(fret) * self.fret_spacing
    }

    /// Y coordinate of the middle of fret row `fret`.
    ///
    /// Row 0 lies half a row above the nut and row `num_frets + 1` half a row
    /// below the board.
    pub fn fret_center_y(&self, fret: u32) -> f64 {
        self.grid_top + (f64::from(fret) - 0.5) * self.fret_spacing
    }

    /// Center of the cell at `string`, `fret` in the unrotated canvas.
    pub fn cell_center(&self, string: u32, fret: u32) -> Point {
        Point::new(self.string_x(string), self.fret_center_y(fret))
    }

    /// Map a point of the rendered image back to the unrotated canvas.
    pub fn to_canvas(&self, x: f64, y: f64) -> Point {
        match self.orientation {
            Orientation::UpDown => Point::new(x, y),
            Orientation::LeftRight => Point::new(self.canvas.width() - y, x),
        }
    }

    /// Find the string lane and fret row under a point of the rendered image.
    pub fn hit_test(&self, x: f64, y: f64) -> GridHit {
        let point = self.to_canvas(x, y);
        GridHit {
            string: self.string_lane(point.x()),
            fret: self.fret_row(point.y()),
        }
    }

    /// Strings snap to the nearest line inside the grid plus a third of each
    /// side margin. Left of that is lane 0, right of it lane `n + 1`.
    fn string_lane(&self, x: f64) -> i64 {
        let n = i64::from(self.num_strings);
        if x < self.grid_left - self.margin_left * MARGIN_SNAP_RATIO {
            return 0;
        }
        if x > self.grid_right() + self.margin_right * MARGIN_SNAP_RATIO {
            return n + 1;
        }
        let nearest = ((x - self.grid_left) / self.string_spacing).round() as i64 + 1;
        nearest.clamp(1, n)
    }

    /// Rows run from 0 (above the nut) to `num_frets + 1` (below the board).
    /// Anything outside that band is -1.
    fn fret_row(&self, y: f64) -> i64 {
        let top = self.grid_top - self.fret_spacing;
        let bottom = self.grid_bottom() + self.fret_spacing;
        if y < top || y > bottom {
            return -1;
        }
        let row = ((y - top) / self.fret_spacing).floor() as i64;
        row.min(i64::from(self.num_frets) + 1)
    }
}

/// String lane and fret row under a point.
///
/// Lanes range from 0 to `num_strings + 1` and rows from -1 to
/// `num_frets + 1`; values outside the fretboard mark points beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridHit {
    string: i64,
    fret: i64,
}

impl GridHit {
    pub fn string(self) -> i64 {
        self.string
    }

    pub fn fret(self) -> i64 {
        self.fret
    }
}

/// A position kind that can be picked from the rendered image.
pub trait ElementPosition: Sized {
    /// Convert a raw grid hit into a position of this kind, if any.
    fn from_hit(diagram: &Diagram, hit: GridHit) -> Option<Self>;
}

impl ElementPosition for MarkPosition {
    fn from_hit(diagram: &Diagram, hit: GridHit) -> Option<Self> {
        let string = u32::try_from(hit.string()).ok()?;
        let fret = u32::try_from(hit.fret()).ok()?;
        let position = MarkPosition::new(string, fret);
        diagram.is_valid_mark_position(position).then_some(position)
    }
}

impl ElementPosition for FretLabelPosition {
    fn from_hit(diagram: &Diagram, hit: GridHit) -> Option<Self> {
        let fret = u32::try_from(hit.fret()).ok()?;
        let n = i64::from(diagram.num_strings());
        let side = if hit.string() <= n / 2 {
            FretLabelSide::Left
        } else if hit.string() > (n + 1) / 2 {
            FretLabelSide::Right
        } else {
            return None;
        };
        let position = FretLabelPosition::new(side, fret);
        diagram
            .is_valid_fret_label_position(position)
            .then_some(position)
    }
}

impl ElementPosition for BarrePosition {
    /// An existing barre under the point wins. Otherwise the widest addable
    /// span starting at the hit string is chosen.
    fn from_hit(diagram: &Diagram, hit: GridHit) -> Option<Self> {
        let string = u32::try_from(hit.string()).ok()?;
        let fret = u32::try_from(hit.fret()).ok()?;
        if !(1..=diagram.num_frets()).contains(&fret)
            || !(1..=diagram.num_strings()).contains(&string)
        {
            return None;
        }
        if let Some(barre) = diagram.barre_covering(fret, string) {
            return Some(barre.position());
        }
        ((string + 1)..=diagram.num_strings())
            .rev()
            .map(|end| BarrePosition::new(fret, string, end))
            .find(|position| diagram.can_add_barre_at(*position))
    }
}

/// Width reserved for the fret labels on `side`, including their padding.
///
/// Text width is estimated from the character count, the font size and the
/// label's width ratio. A side without labels needs no space.
pub fn max_fret_label_width(
    diagram: &Diagram,
    side: FretLabelSide,
    fret_spacing: f64,
) -> Result<f64, FretworkError> {
    let mut widest: Option<f64> = None;
    for label in diagram
        .fret_labels()
        .iter()
        .filter(|label| label.position().side() == side)
    {
        let style = label.style();
        let font_size = style.fret_label_text_size_ratio()? * fret_spacing;
        let text_width =
            label.text().chars().count() as f64 * font_size * style.fret_label_text_width_ratio()?;
        let width = style.fret_label_grid_padding()? + text_width;
        widest = Some(widest.map_or(width, |current| current.max(width)));
    }
    Ok(widest.unwrap_or(0.0))
}

/// Returns `true` if the diagram has a non-empty title and titles are shown.
pub(crate) fn has_visible_title(diagram: &Diagram) -> Result<bool, FretworkError> {
    let has_text = diagram.title().is_some_and(|title| !title.is_empty());
    Ok(has_text && diagram.style().title_visible()?)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use fretwork_core::style::{DiagramStyle, LabelLayoutModel, MarkType};

    use super::*;

    fn diagram(strings: u32, frets: u32) -> Diagram {
        Diagram::new(&DiagramStyle::defaults(), strings, frets).unwrap()
    }

    fn rotated(diagram: &Diagram) -> Diagram {
        let copy = diagram.clone();
        copy.style()
            .set_orientation(Orientation::LeftRight)
            .unwrap();
        copy
    }

    /// Where a canvas point ends up in the rendered image.
    fn rendered_point(layout: &GridLayout, point: Point) -> Point {
        match layout.orientation() {
            Orientation::UpDown => point,
            Orientation::LeftRight => Point::new(point.y(), layout.canvas_size().width() - point.x()),
        }
    }

    #[test]
    fn test_plain_grid() {
        let layout = diagram(6, 5).layout().unwrap();
        assert_approx_eq!(f64, layout.grid_left(), 20.0);
        assert_approx_eq!(f64, layout.grid_top(), 20.0);
        assert_approx_eq!(f64, layout.grid_width(), 150.0);
        assert_approx_eq!(f64, layout.grid_height(), 150.0);
        assert_eq!(layout.canvas_size(), Size::new(190.0, 190.0));
    }

    #[test]
    fn test_title_and_open_marks_push_grid_down() {
        let mut diagram = diagram(6, 5);
        diagram.set_title(Some("C".to_string()));
        assert_approx_eq!(f64, diagram.layout().unwrap().grid_top(), 20.0 + 10.0 + 20.0);

        diagram
            .new_mark(MarkPosition::new(1, 0), MarkType::Open, "")
            .unwrap();
        assert_approx_eq!(f64, diagram.layout().unwrap().grid_top(), 80.0);

        diagram.style().set_title_visible(false).unwrap();
        assert_approx_eq!(f64, diagram.layout().unwrap().grid_top(), 50.0);
    }

    #[test]
    fn test_bottom_marks_extend_canvas() {
        let mut diagram = diagram(6, 5);
        diagram
            .new_mark(MarkPosition::new(2, 6), MarkType::Bottom, "")
            .unwrap();
        let layout = diagram.layout().unwrap();
        assert_approx_eq!(f64, layout.canvas_size().height(), 220.0);
    }

    #[test]
    fn test_fret_labels_push_grid_right() {
        let mut diagram = diagram(6, 5);
        diagram
            .new_fret_label(FretLabelPosition::new(FretLabelSide::Left, 1), "12")
            .unwrap();
        diagram
            .new_fret_label(FretLabelPosition::new(FretLabelSide::Left, 2), "5")
            .unwrap();

        // 6 padding + 2 chars * 18pt * 0.6
        let expected = 6.0 + 2.0 * 18.0 * 0.6;
        assert_approx_eq!(
            f64,
            max_fret_label_width(&diagram, FretLabelSide::Left, 30.0).unwrap(),
            expected
        );
        assert_approx_eq!(
            f64,
            max_fret_label_width(&diagram, FretLabelSide::Right, 30.0).unwrap(),
            0.0
        );

        let layout = diagram.layout().unwrap();
        assert_approx_eq!(f64, layout.grid_left(), 20.0 + expected);
        assert_approx_eq!(f64, layout.canvas_size().width(), 190.0 + expected);
    }

    #[test]
    fn test_overlap_model_reserves_nothing() {
        let mut diagram = diagram(6, 5);
        diagram.set_title(Some("Am".to_string()));
        diagram
            .new_fret_label(FretLabelPosition::new(FretLabelSide::Right, 1), "1")
            .unwrap();
        diagram
            .style()
            .set_label_layout_model(LabelLayoutModel::Overlap)
            .unwrap();
        assert_eq!(diagram.layout().unwrap().canvas_size(), Size::new(190.0, 190.0));
    }

    #[test]
    fn test_left_right_swaps_image_size() {
        let mut diagram = diagram(4, 12);
        diagram.set_title(Some("E".to_string()));
        let upright = diagram.layout().unwrap();
        let rotated = rotated(&diagram).layout().unwrap();
        assert_eq!(rotated.image_size(), upright.image_size().transpose());
        assert_approx_eq!(f64, rotated.image_size().width(), upright.canvas_size().height());
    }

    #[test]
    fn test_round_trip_both_orientations() {
        let upright = diagram(6, 5);
        let rotated = rotated(&upright);
        for diagram in [&upright, &rotated] {
            let layout = diagram.layout().unwrap();
            let point = rendered_point(&layout, layout.cell_center(3, 2));
            assert_eq!(
                diagram.position_at::<MarkPosition>(point.x(), point.y()).unwrap(),
                Some(MarkPosition::new(3, 2))
            );
        }
    }

    #[test]
    fn test_string_lanes() {
        let layout = diagram(6, 5).layout().unwrap();
        let y = layout.fret_center_y(1);
        // Grid spans 20..170 and the snap zone extends 20/3 to either side
        assert_eq!(layout.hit_test(14.0, y).string(), 1);
        assert_eq!(layout.hit_test(13.0, y).string(), 0);
        assert_eq!(layout.hit_test(176.0, y).string(), 6);
        assert_eq!(layout.hit_test(177.0, y).string(), 7);
        assert_eq!(layout.hit_test(34.0, y).string(), 1);
        assert_eq!(layout.hit_test(36.0, y).string(), 2);
    }

    #[test]
    fn test_fret_rows() {
        let layout = diagram(6, 5).layout().unwrap();
        let x = layout.string_x(1);
        assert_eq!(layout.hit_test(x, -11.0).fret(), -1);
        assert_eq!(layout.hit_test(x, 5.0).fret(), 0);
        assert_eq!(layout.hit_test(x, 21.0).fret(), 1);
        assert_eq!(layout.hit_test(x, 171.0).fret(), 6);
        assert_eq!(layout.hit_test(x, 200.0).fret(), 6);
        assert_eq!(layout.hit_test(x, 201.0).fret(), -1);
    }

    #[test]
    fn test_fret_label_sides() {
        let six = diagram(6, 5);
        let layout = six.layout().unwrap();
        let y = layout.fret_center_y(2);
        let at = |diagram: &Diagram, string: u32| {
            let x = diagram.layout().unwrap().string_x(string);
            diagram.position_at::<FretLabelPosition>(x, y).unwrap()
        };
        assert_eq!(at(&six, 3), Some(FretLabelPosition::new(FretLabelSide::Left, 2)));
        assert_eq!(at(&six, 4), Some(FretLabelPosition::new(FretLabelSide::Right, 2)));
        assert_eq!(
            six.position_at::<FretLabelPosition>(0.0, y).unwrap(),
            Some(FretLabelPosition::new(FretLabelSide::Left, 2))
        );

        let five = diagram(5, 5);
        assert_eq!(at(&five, 2), Some(FretLabelPosition::new(FretLabelSide::Left, 2)));
        assert_eq!(at(&five, 3), None);
        assert_eq!(at(&five, 4), Some(FretLabelPosition::new(FretLabelSide::Right, 2)));

        // Above the nut is not a label row
        let x = layout.string_x(1);
        assert_eq!(
            six.position_at::<FretLabelPosition>(x, layout.fret_center_y(0))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_barre_hits() {
        let mut diagram = diagram(6, 5);
        let layout = diagram.layout().unwrap();
        let point = layout.cell_center(2, 1);
        assert_eq!(
            diagram
                .position_at::<BarrePosition>(point.x(), point.y())
                .unwrap(),
            Some(BarrePosition::new(1, 2, 6))
        );

        diagram.new_barre(BarrePosition::new(1, 4, 6), "").unwrap();
        assert_eq!(
            diagram
                .position_at::<BarrePosition>(point.x(), point.y())
                .unwrap(),
            Some(BarrePosition::new(1, 2, 3))
        );

        let covered = layout.cell_center(5, 1);
        assert_eq!(
            diagram
                .position_at::<BarrePosition>(covered.x(), covered.y())
                .unwrap(),
            Some(BarrePosition::new(1, 4, 6))
        );

        let last = layout.cell_center(6, 2);
        assert_eq!(
            diagram
                .position_at::<BarrePosition>(last.x(), last.y())
                .unwrap(),
            None
        );
    }

    proptest! {
        #[test]
        fn prop_every_cell_center_hits_its_cell(
            strings in 2u32..13,
            frets in 1u32..25,
            string_seed in 0u32..1000,
            fret_seed in 0u32..1000,
            left_right in any::<bool>(),
        ) {
            let diagram = Diagram::new(&DiagramStyle::defaults(), strings, frets).unwrap();
            if left_right {
                diagram.style().set_orientation(Orientation::LeftRight).unwrap();
            }
            let string = string_seed % strings + 1;
            let fret = fret_seed % (frets + 2);
            let layout = diagram.layout().unwrap();
            let point = rendered_point(&layout, layout.cell_center(string, fret));

            let hit = diagram.position_at::<MarkPosition>(point.x(), point.y()).unwrap();
            prop_assert_eq!(hit, Some(MarkPosition::new(string, fret)));
        }

        #[test]
        fn prop_canvas_contains_grid(
            strings in 2u32..13,
            frets in 1u32..25,
            spacing in 5.0f64..80.0,
        ) {
            let diagram = Diagram::new(&DiagramStyle::defaults(), strings, frets).unwrap();
            diagram.style().set_string_spacing(spacing).unwrap();
            let layout = diagram.layout().unwrap();
            prop_assert!(layout.grid_right() <= layout.canvas_size().width());
            prop_assert!(layout.grid_bottom() <= layout.canvas_size().height());
            prop_assert!(layout.grid_left() >= 0.0);
        }
    }
}
