use crate::config::AnchorMode;

use super::geometry::{EPSILON, Point, Rect, angle};

/// Side midpoints and corners of a node. South is +Y (screen space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    pub fn point_on(self, rect: &Rect) -> Point {
        let c = rect.center();
        match self {
            Compass::North => Point::new(c.x, rect.y),
            Compass::NorthEast => Point::new(rect.right(), rect.y),
            Compass::East => Point::new(rect.right(), c.y),
            Compass::SouthEast => Point::new(rect.right(), rect.bottom()),
            Compass::South => Point::new(c.x, rect.bottom()),
            Compass::SouthWest => Point::new(rect.x, rect.bottom()),
            Compass::West => Point::new(rect.x, c.y),
            Compass::NorthWest => Point::new(rect.x, rect.y),
        }
    }
}

/// Four 90° sectors with boundaries at ±45° and ±135°.
pub fn cardinal_sector(direction: Point) -> Compass {
    let deg = angle(direction).to_degrees();
    if (-45.0..45.0).contains(&deg) {
        Compass::East
    } else if (45.0..135.0).contains(&deg) {
        Compass::South
    } else if (-135.0..-45.0).contains(&deg) {
        Compass::North
    } else {
        Compass::West
    }
}

/// Eight 45° sectors with boundaries at odd multiples of 22.5°.
pub fn octagonal_sector(direction: Point) -> Compass {
    let deg = angle(direction).to_degrees();
    if (-22.5..22.5).contains(&deg) {
        Compass::East
    } else if (22.5..67.5).contains(&deg) {
        Compass::SouthEast
    } else if (67.5..112.5).contains(&deg) {
        Compass::South
    } else if (112.5..157.5).contains(&deg) {
        Compass::SouthWest
    } else if (-67.5..-22.5).contains(&deg) {
        Compass::NorthEast
    } else if (-112.5..-67.5).contains(&deg) {
        Compass::North
    } else if (-157.5..-112.5).contains(&deg) {
        Compass::NorthWest
    } else {
        Compass::West
    }
}

/// Connection point on `rect` for an edge heading toward `target`.
pub fn resolve_anchor(rect: &Rect, target: Point, mode: AnchorMode) -> Point {
    let center = rect.center();
    let direction = target - center;
    match mode {
        AnchorMode::Center => center,
        AnchorMode::Cardinal if direction.is_zero() => center,
        AnchorMode::Cardinal => cardinal_sector(direction).point_on(rect),
        AnchorMode::Octagonal if direction.is_zero() => center,
        AnchorMode::Octagonal => octagonal_sector(direction).point_on(rect),
        AnchorMode::Dynamic => ray_exit_point(rect, target),
    }
}

/// Where the ray from the center of `rect` toward `target` leaves the rectangle.
pub fn ray_exit_point(rect: &Rect, target: Point) -> Point {
    let center = rect.center();
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    if dx.abs() < EPSILON && dy.abs() < EPSILON {
        return center;
    }
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    if dx.abs() < EPSILON {
        let y = if dy > 0.0 { rect.bottom() } else { rect.y };
        return Point::new(center.x, y);
    }

    let slope = dy / dx;
    if (slope * half_w).abs() <= half_h {
        let sign = dx.signum();
        return Point::new(center.x + sign * half_w, center.y + sign * slope * half_w);
    }
    if slope.abs() >= EPSILON && (half_h / slope).abs() <= half_w {
        let sign = dy.signum();
        return Point::new(center.x + sign * half_h / slope, center.y + sign * half_h);
    }
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn node() -> Rect {
        Rect::new(100.0, 100.0, 50.0, 50.0)
    }

    /// Targets 100 units away from the node center at every 45° step, starting east
    /// and turning clockwise on screen.
    fn compass_targets() -> Vec<(Point, Compass)> {
        let c = node().center();
        vec![
            (Point::new(c.x + 100.0, c.y), Compass::East),
            (Point::new(c.x + 100.0, c.y + 100.0), Compass::SouthEast),
            (Point::new(c.x, c.y + 100.0), Compass::South),
            (Point::new(c.x - 100.0, c.y + 100.0), Compass::SouthWest),
            (Point::new(c.x - 100.0, c.y), Compass::West),
            (Point::new(c.x - 100.0, c.y - 100.0), Compass::NorthWest),
            (Point::new(c.x, c.y - 100.0), Compass::North),
            (Point::new(c.x + 100.0, c.y - 100.0), Compass::NorthEast),
        ]
    }

    #[test]
    fn cardinal_sweep_lands_on_side_midpoints() {
        let rect = node();
        let sides = [
            Compass::North,
            Compass::East,
            Compass::South,
            Compass::West,
        ];
        for (target, compass) in compass_targets() {
            let got = resolve_anchor(&rect, target, AnchorMode::Cardinal);
            if sides.contains(&compass) {
                assert!(got.approx_eq(compass.point_on(&rect), TOL), "{compass:?}: got {got:?}");
            } else {
                // Diagonals sit on a sector boundary; either neighbouring side is valid.
                assert!(
                    sides.iter().any(|side| got.approx_eq(side.point_on(&rect), TOL)),
                    "{compass:?}: {got:?} is not a side midpoint"
                );
            }
        }
        // Just past the 45° boundary is south.
        let got = resolve_anchor(&rect, Point::new(225.0, 226.0), AnchorMode::Cardinal);
        assert_eq!(got, Point::new(125.0, 150.0));
    }

    #[test]
    fn octagonal_sweep_lands_on_claimed_points() {
        let rect = node();
        for (target, compass) in compass_targets() {
            let got = resolve_anchor(&rect, target, AnchorMode::Octagonal);
            assert!(
                got.approx_eq(compass.point_on(&rect), TOL),
                "{compass:?}: got {got:?}"
            );
        }
        let se = resolve_anchor(&rect, Point::new(225.0, 225.0), AnchorMode::Octagonal);
        assert_eq!(se, Point::new(150.0, 150.0));
    }

    #[test]
    fn dynamic_east_hits_right_midpoint() {
        let rect = node();
        let got = resolve_anchor(&rect, Point::new(400.0, 125.0), AnchorMode::Dynamic);
        assert!(got.approx_eq(Point::new(150.0, 125.0), TOL));
    }

    #[test]
    fn dynamic_diagonal_hits_corner() {
        let rect = node();
        let got = resolve_anchor(&rect, Point::new(225.0, 225.0), AnchorMode::Dynamic);
        assert!(got.approx_eq(Point::new(150.0, 150.0), TOL));
        let got = resolve_anchor(&rect, Point::new(25.0, 25.0), AnchorMode::Dynamic);
        assert!(got.approx_eq(Point::new(100.0, 100.0), TOL));
    }

    #[test]
    fn dynamic_vertical_and_steep_rays() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let up = ray_exit_point(&rect, Point::new(50.0, -300.0));
        assert!(up.approx_eq(Point::new(50.0, 0.0), TOL));
        // Steep ray exits the bottom side: slope 4, x offset = 25 / 4.
        let steep = ray_exit_point(&rect, Point::new(60.0, 65.0));
        assert!(steep.approx_eq(Point::new(56.25, 50.0), TOL));
        // Shallow ray exits the left side.
        let shallow = ray_exit_point(&rect, Point::new(-150.0, 5.0));
        assert!(shallow.approx_eq(Point::new(0.0, 20.0), TOL));
    }

    #[test]
    fn coincident_centers_fall_back_to_center() {
        let rect = node();
        let c = rect.center();
        for mode in [
            AnchorMode::Center,
            AnchorMode::Cardinal,
            AnchorMode::Octagonal,
            AnchorMode::Dynamic,
        ] {
            assert_eq!(resolve_anchor(&rect, c, mode), c);
        }
    }

    #[test]
    fn cardinal_scenario_between_two_nodes() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(200.0, 0.0, 100.0, 50.0);
        let source = resolve_anchor(&a, b.center(), AnchorMode::Cardinal);
        let dest = resolve_anchor(&b, a.center(), AnchorMode::Cardinal);
        assert_eq!(source, Point::new(100.0, 25.0));
        assert_eq!(dest, Point::new(200.0, 25.0));
    }
}
