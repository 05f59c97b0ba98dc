//! Vector constructions for mark shapes.
//!
//! Every shape is centered on a grid cell and sized by the mark radius. The
//! constructions are fixed: a square is the circle's bounding box, a diamond
//! touches the bounding box at its edge midpoints and an X is a twelve-point
//! polygon made of two diagonal bars.

use svg::node::element as svg_element;

use crate::{
    draw::{SvgNode, format_number},
    geometry::Point,
    style::MarkShape,
};

/// Half-width of an X bar relative to the mark radius.
const X_BAR_RATIO: f64 = 0.25;

/// Build the SVG node for `shape` centered at `center`.
///
/// Returns `None` for [`MarkShape::None`].
pub fn render(shape: MarkShape, center: Point, radius: f64, style: &str) -> Option<SvgNode> {
    let node: SvgNode = match shape {
        MarkShape::None => return None,
        MarkShape::Circle => Box::new(
            svg_element::Circle::new()
                .set("cx", format_number(center.x()))
                .set("cy", format_number(center.y()))
                .set("r", format_number(radius))
                .set("style", style),
        ),
        MarkShape::Square => Box::new(
            svg_element::Rectangle::new()
                .set("x", format_number(center.x() - radius))
                .set("y", format_number(center.y() - radius))
                .set("width", format_number(radius * 2.0))
                .set("height", format_number(radius * 2.0))
                .set("style", style),
        ),
        MarkShape::Diamond => Box::new(
            svg_element::Polygon::new()
                .set("points", points_attribute(&diamond_points(center, radius)))
                .set("style", style),
        ),
        MarkShape::X => Box::new(
            svg_element::Polygon::new()
                .set("points", points_attribute(&x_points(center, radius)))
                .set("style", style),
        ),
    };
    Some(node)
}

/// Corner points of a diamond, clockwise from the top.
pub fn diamond_points(center: Point, radius: f64) -> Vec<Point> {
    vec![
        Point::new(center.x(), center.y() - radius),
        Point::new(center.x() + radius, center.y()),
        Point::new(center.x(), center.y() + radius),
        Point::new(center.x() - radius, center.y()),
    ]
}

/// Outline of an X: a plus sign whose outer corners touch the mark radius,
/// rotated by 45 degrees.
pub fn x_points(center: Point, radius: f64) -> Vec<Point> {
    let a = radius * X_BAR_RATIO;
    // Arm length that keeps the outer corners on the mark radius
    let r = (radius * radius - a * a).sqrt();
    let plus = [
        (a, -r),
        (a, -a),
        (r, -a),
        (r, a),
        (a, a),
        (a, r),
        (-a, r),
        (-a, a),
        (-r, a),
        (-r, -a),
        (-a, -a),
        (-a, -r),
    ];
    let scale = std::f64::consts::FRAC_1_SQRT_2;
    plus.iter()
        .map(|&(x, y)| {
            Point::new(
                center.x() + (x - y) * scale,
                center.y() + (x + y) * scale,
            )
        })
        .collect()
}

/// Format points as an SVG `points` attribute: `x1,y1 x2,y2 …`.
pub fn points_attribute(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", format_number(point.x()), format_number(point.y())))
        .collect::<Vec<_>>()
        .join(" ")
}
