use crate::config::RoutingMode;

use super::geometry::{EPSILON, Point, Rect, lerp};
use super::types::{
    Axis, CURVE_SAMPLES, CubicBezier, EdgePath, OrthogonalPath, SelfLoopPath, polyline_length,
};

/// Lateral jog inserted when orthogonal endpoints are aligned on the primary axis.
pub const ORTHO_JOG: f64 = 10.0;
/// Self-loop radius never drops below this multiple of the anchor radius.
const LOOP_MIN_RADIUS_RATIO: f64 = 1.5;
/// Largest share of a self-loop's length the arrowhead may take.
const ARROW_MAX_LENGTH_RATIO: f64 = 0.3;

pub fn build_path(source: Point, destination: Point, mode: RoutingMode) -> EdgePath {
    match mode {
        RoutingMode::Direct => direct_path(source, destination),
        RoutingMode::Orthogonal => orthogonal_path(source, destination),
        // Bundling has no routing of its own yet.
        RoutingMode::Bezier | RoutingMode::Bundling => bezier_path(source, destination),
    }
}

pub fn direct_path(source: Point, destination: Point) -> EdgePath {
    EdgePath::Line {
        start: source,
        end: destination,
    }
}

/// Manhattan route bending halfway along the dominant axis.
pub fn orthogonal_path(source: Point, destination: Point) -> EdgePath {
    let dx = destination.x - source.x;
    let dy = destination.y - source.y;
    if dx.abs() < EPSILON && dy.abs() < EPSILON {
        return direct_path(source, destination);
    }

    if dx.abs() >= dy.abs() {
        let mid_x = source.x + dx / 2.0;
        if dy.abs() < EPSILON {
            let lateral = source.y + ORTHO_JOG;
            return EdgePath::Orthogonal(OrthogonalPath {
                points: vec![
                    source,
                    Point::new(mid_x, source.y),
                    Point::new(mid_x, lateral),
                    Point::new(destination.x, lateral),
                    destination,
                ],
                primary: Axis::Horizontal,
                jog: true,
            });
        }
        EdgePath::Orthogonal(OrthogonalPath {
            points: vec![
                source,
                Point::new(mid_x, source.y),
                Point::new(mid_x, destination.y),
                destination,
            ],
            primary: Axis::Horizontal,
            jog: false,
        })
    } else {
        let mid_y = source.y + dy / 2.0;
        if dx.abs() < EPSILON {
            let lateral = source.x + ORTHO_JOG;
            return EdgePath::Orthogonal(OrthogonalPath {
                points: vec![
                    source,
                    Point::new(source.x, mid_y),
                    Point::new(lateral, mid_y),
                    Point::new(lateral, destination.y),
                    destination,
                ],
                primary: Axis::Vertical,
                jog: true,
            });
        }
        EdgePath::Orthogonal(OrthogonalPath {
            points: vec![
                source,
                Point::new(source.x, mid_y),
                Point::new(destination.x, mid_y),
                destination,
            ],
            primary: Axis::Vertical,
            jog: false,
        })
    }
}

/// Cubic whose control points sit on the chord at 1/3 and 2/3, so it leaves and
/// enters along the straight direction.
pub fn bezier_path(source: Point, destination: Point) -> EdgePath {
    if source.distance(destination) < EPSILON {
        return direct_path(source, destination);
    }
    EdgePath::Cubic(CubicBezier {
        start: source,
        control1: lerp(source, destination, 1.0 / 3.0),
        control2: lerp(source, destination, 2.0 / 3.0),
        end: destination,
    })
}

/// Loop from the right-side midpoint back into the top-side midpoint.
pub fn self_loop_path(rect: &Rect, loop_padding: f64, arrow_length: f64) -> SelfLoopPath {
    let center = rect.center();
    let start = Point::new(rect.right(), center.y);
    let end = Point::new(center.x, rect.y);
    let anchor_radius = rect.width.min(rect.height) / 2.0;
    let loop_radius = (loop_padding + anchor_radius).max(LOOP_MIN_RADIUS_RATIO * anchor_radius);

    let curve = CubicBezier {
        start,
        control1: Point::new(start.x + loop_radius, start.y),
        control2: Point::new(end.x, end.y - loop_radius),
        end,
    };

    let samples: Vec<Point> = (0..=CURVE_SAMPLES)
        .map(|i| curve.point_at(i as f64 / CURVE_SAMPLES as f64))
        .collect();
    let length = polyline_length(&samples);
    let head = arrow_length.min(ARROW_MAX_LENGTH_RATIO * length);
    SelfLoopPath {
        curve,
        arrow_base: point_at_length(&samples, length - head),
        arrow_tip: point_at_length(&samples, length),
    }
}

/// Point at arc length `distance` along a polyline, clamped to its ends.
pub(crate) fn point_at_length(points: &[Point], distance: f64) -> Point {
    let Some(first) = points.first().copied() else {
        return Point::ZERO;
    };
    if distance <= 0.0 {
        return first;
    }
    let mut walked = 0.0;
    for pair in points.windows(2) {
        let step = pair[0].distance(pair[1]);
        if step > EPSILON && walked + step >= distance {
            return lerp(pair[0], pair[1], (distance - walked) / step);
        }
        walked += step;
    }
    points.last().copied().unwrap_or(first)
}
