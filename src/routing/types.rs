use serde::Serialize;

use super::geometry::{Point, cubic_derivative, cubic_point, quadratic_point};
use crate::ir::EdgeId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    pub fn point_at(&self, t: f64) -> Point {
        cubic_point(self.start, self.control1, self.control2, self.end, t)
    }

    pub fn tangent_at(&self, t: f64) -> Point {
        cubic_derivative(self.start, self.control1, self.control2, self.end, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadraticBezier {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadraticBezier {
    pub fn point_at(&self, t: f64) -> Point {
        quadratic_point(self.start, self.control, self.end, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Manhattan polyline. `primary` is the axis of the first leg; interior points
/// come in pairs sharing the bend coordinate on that axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrthogonalPath {
    pub points: Vec<Point>,
    pub primary: Axis,
    /// Set when the endpoints were aligned and a lateral jog was inserted.
    pub jog: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EdgePath {
    Line { start: Point, end: Point },
    Orthogonal(OrthogonalPath),
    Cubic(CubicBezier),
    Quadratic(QuadraticBezier),
}

/// Samples per curve when flattening for measurement or export.
pub const CURVE_SAMPLES: usize = 32;

impl EdgePath {
    pub fn start(&self) -> Point {
        match self {
            EdgePath::Line { start, .. } => *start,
            EdgePath::Orthogonal(path) => path.points.first().copied().unwrap_or_default(),
            EdgePath::Cubic(curve) => curve.start,
            EdgePath::Quadratic(curve) => curve.start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            EdgePath::Line { end, .. } => *end,
            EdgePath::Orthogonal(path) => path.points.last().copied().unwrap_or_default(),
            EdgePath::Cubic(curve) => curve.end,
            EdgePath::Quadratic(curve) => curve.end,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EdgePath::Line { .. } => "line",
            EdgePath::Orthogonal(_) => "orthogonal",
            EdgePath::Cubic(_) => "cubic",
            EdgePath::Quadratic(_) => "quadratic",
        }
    }

    /// Polyline approximation. Straight variants return their exact vertices.
    pub fn flatten(&self, samples: usize) -> Vec<Point> {
        let samples = samples.max(1);
        match self {
            EdgePath::Line { start, end } => vec![*start, *end],
            EdgePath::Orthogonal(path) => path.points.clone(),
            EdgePath::Cubic(curve) => (0..=samples)
                .map(|i| curve.point_at(i as f64 / samples as f64))
                .collect(),
            EdgePath::Quadratic(curve) => (0..=samples)
                .map(|i| curve.point_at(i as f64 / samples as f64))
                .collect(),
        }
    }

    pub fn length(&self) -> f64 {
        polyline_length(&self.flatten(CURVE_SAMPLES))
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg_path(&self) -> String {
        match self {
            EdgePath::Line { start, end } => points_to_path(&[*start, *end]),
            EdgePath::Orthogonal(path) => points_to_path(&path.points),
            EdgePath::Cubic(c) => format!(
                "M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                c.start.x,
                c.start.y,
                c.control1.x,
                c.control1.y,
                c.control2.x,
                c.control2.y,
                c.end.x,
                c.end.y
            ),
            EdgePath::Quadratic(q) => format!(
                "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
                q.start.x, q.start.y, q.control.x, q.control.y, q.end.x, q.end.y
            ),
        }
    }
}

fn points_to_path(points: &[Point]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].x, points[0].y));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.x, point.y));
    }
    d
}

pub(crate) fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// Self-loop curve plus the two points a caller needs to draw its arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelfLoopPath {
    pub curve: CubicBezier,
    pub arrow_base: Point,
    pub arrow_tip: Point,
}

impl SelfLoopPath {
    pub fn path(&self) -> EdgePath {
        EdgePath::Cubic(self.curve)
    }
}

/// Final geometry for one edge in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    pub edge: EdgeId,
    pub source: Point,
    pub destination: Point,
    pub path: EdgePath,
    pub offset: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<(Point, Point)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_path_for_polyline() {
        let path = EdgePath::Orthogonal(OrthogonalPath {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 0.0),
                Point::new(5.0, 10.0),
            ],
            primary: Axis::Horizontal,
            jog: false,
        });
        assert_eq!(
            path.to_svg_path(),
            "M 0.00 0.00 L 5.00 0.00 L 5.00 10.00"
        );
    }

    #[test]
    fn svg_path_for_curves() {
        let quad = EdgePath::Quadratic(QuadraticBezier {
            start: Point::new(0.0, 0.0),
            control: Point::new(5.0, 5.0),
            end: Point::new(10.0, 0.0),
        });
        assert_eq!(quad.to_svg_path(), "M 0.00 0.00 Q 5.00 5.00 10.00 0.00");
        assert_eq!(quad.kind(), "quadratic");
    }

    #[test]
    fn flatten_keeps_endpoints() {
        let curve = EdgePath::Cubic(CubicBezier {
            start: Point::new(0.0, 0.0),
            control1: Point::new(0.0, 10.0),
            control2: Point::new(10.0, 10.0),
            end: Point::new(10.0, 0.0),
        });
        let points = curve.flatten(8);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], curve.start());
        assert!(points[8].approx_eq(curve.end(), 1e-9));
    }

    #[test]
    fn straight_line_length() {
        let line = EdgePath::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(3.0, 4.0),
        };
        assert!((line.length() - 5.0).abs() < 1e-9);
    }
}
