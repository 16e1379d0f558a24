use crate::config::RoutingMode;

use super::geometry::{Point, lerp};
use super::types::{Axis, CubicBezier, EdgePath, OrthogonalPath, QuadraticBezier};

/// Folds a repulsion offset into an already-built path.
///
/// Curves move both control points, orthogonal routes move their bend
/// coordinate, and straight lines become a quadratic arc whose apex sits at
/// `midpoint + offset`. A zero offset returns the path untouched.
///
/// The shape follows the `path` variant, not `mode`; `mode` only flags a
/// cubic arriving under a non-curved routing mode. Orthogonal routes without
/// a jog take only the primary-axis part of the offset, so every turn stays a
/// right angle and the perpendicular part is dropped.
pub fn apply_repulsion(path: &EdgePath, offset: Point, mode: RoutingMode) -> EdgePath {
    if offset.is_zero() {
        return path.clone();
    }
    match path {
        EdgePath::Cubic(curve) => {
            if !mode.is_curved() {
                tracing::trace!(?mode, "cubic path offset under non-curved routing mode");
            }
            EdgePath::Cubic(CubicBezier {
                control1: curve.control1 + offset,
                control2: curve.control2 + offset,
                ..*curve
            })
        }
        EdgePath::Orthogonal(route) => EdgePath::Orthogonal(shift_bends(route, offset)),
        EdgePath::Line { start, end } => {
            let apex = lerp(*start, *end, 0.5) + offset;
            // A quadratic passes through `(start + 2c + end) / 4` at t = 1/2.
            let control = apex * 2.0 - lerp(*start, *end, 0.5);
            EdgePath::Quadratic(QuadraticBezier {
                start: *start,
                control,
                end: *end,
            })
        }
        EdgePath::Quadratic(curve) => EdgePath::Quadratic(QuadraticBezier {
            control: curve.control + offset,
            ..*curve
        }),
    }
}

fn shift_bends(route: &OrthogonalPath, offset: Point) -> OrthogonalPath {
    let mut points = route.points.clone();
    let last = points.len().saturating_sub(1);
    // Interior points 1 and 2 share the bend coordinate on the primary axis.
    for point in points.iter_mut().take(last.min(3)).skip(1) {
        match route.primary {
            Axis::Horizontal => point.x += offset.x,
            Axis::Vertical => point.y += offset.y,
        }
    }
    if route.jog {
        // Points 2 and 3 form the lateral leg.
        for point in points.iter_mut().take(last).skip(2) {
            match route.primary {
                Axis::Horizontal => point.y += offset.y,
                Axis::Vertical => point.x += offset.x,
            }
        }
    }
    OrthogonalPath {
        points,
        primary: route.primary,
        jog: route.jog,
    }
}
