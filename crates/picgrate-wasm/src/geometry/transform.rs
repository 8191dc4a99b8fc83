//! Rotation of points and polygons about an arbitrary centre.

use std::f64::consts::FRAC_PI_2;

use super::types::{Point, Polygon};

/// Angles within this distance of a quarter-turn multiple are snapped to it.
const QUARTER_TURN_TOLERANCE: f64 = 1e-12;

/// A counter-clockwise rotation about a fixed centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    center: Point,
    sin: f64,
    cos: f64,
}

impl Rotation {
    /// Creates a rotation by `angle` radians about `center`.
    ///
    /// Multiples of a quarter turn use exact sine and cosine values so that
    /// axis-aligned geometry stays axis-aligned.
    pub fn new(angle: f64, center: Point) -> Self {
        let quarters = (angle / FRAC_PI_2).round();
        let (sin, cos) = if (angle - quarters * FRAC_PI_2).abs() <= QUARTER_TURN_TOLERANCE {
            quarter_turn(quarters)
        } else {
            angle.sin_cos()
        };
        Self { center, sin, cos }
    }

    /// Returns `true` if this rotation leaves every point in place.
    pub fn is_identity(&self) -> bool {
        self.sin.abs() <= f64::EPSILON && (self.cos - 1.0).abs() <= f64::EPSILON
    }

    /// Rotates a single point.
    pub fn apply(&self, point: Point) -> Point {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        Point::new(
            dx.mul_add(self.cos, -(dy * self.sin)) + self.center.x,
            dx.mul_add(self.sin, dy * self.cos) + self.center.y,
        )
    }

    /// Rotates every vertex of `polygon` in place.
    pub fn apply_polygon(&self, polygon: &mut Polygon) {
        for point in &mut polygon.points {
            *point = self.apply(*point);
        }
    }

    /// Rotates every polygon in place.
    pub fn apply_all(&self, polygons: &mut [Polygon]) {
        if self.is_identity() {
            return;
        }
        for polygon in polygons {
            self.apply_polygon(polygon);
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quarter_turn(quarters: f64) -> (f64, f64) {
    match (quarters as i64).rem_euclid(4) {
        0 => (0.0, 1.0),
        1 => (1.0, 0.0),
        2 => (0.0, -1.0),
        _ => (-1.0, 0.0),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use std::f64::consts::PI;

    use proptest::prelude::*;

    use super::*;
    use crate::geometry::types::LayerSpec;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn ut_rot_001_quarter_turn_is_exact() {
        let rot = Rotation::new(FRAC_PI_2, Point::new(0.0, 0.0));
        let p = rot.apply(Point::new(1.0, 0.0));
        assert_eq!(p, Point::new(0.0, 1.0));
    }

    #[test]
    fn ut_rot_002_negative_quarter_turn_about_center() {
        let rot = Rotation::new(-FRAC_PI_2, Point::new(10.0, 5.0));
        let p = rot.apply(Point::new(10.0, 8.0));
        assert_eq!(p, Point::new(13.0, 5.0));
    }

    #[test]
    fn ut_rot_003_half_turn_maps_through_center() {
        let rot = Rotation::new(PI, Point::new(1.0, 1.0));
        let p = rot.apply(Point::new(3.0, 4.0));
        assert_eq!(p, Point::new(-1.0, -2.0));
    }

    #[test]
    fn ut_rot_004_zero_angle_is_identity() {
        let rot = Rotation::new(0.0, Point::new(7.0, 7.0));
        assert!(rot.is_identity());
        assert!(!Rotation::new(0.3, Point::new(0.0, 0.0)).is_identity());
    }

    #[test]
    fn ut_rot_005_general_angle() {
        let rot = Rotation::new(PI / 6.0, Point::new(0.0, 0.0));
        let p = rot.apply(Point::new(2.0, 0.0));
        assert_close(p.x, 3.0f64.sqrt());
        assert_close(p.y, 1.0);
    }

    #[test]
    fn ut_rot_006_polygon_area_preserved() {
        let mut poly = Polygon::rectangle(
            Point::new(0.0, 0.0),
            Point::new(2.0, 3.0),
            LayerSpec::new(1, 0),
        );
        let rot = Rotation::new(-FRAC_PI_2, Point::new(0.0, 0.0));
        rot.apply_polygon(&mut poly);
        assert_close(poly.signed_area(), 6.0);
        assert_eq!(poly.points[2], Point::new(3.0, -2.0));
    }

    proptest! {
        #[test]
        fn rotation_preserves_distance_to_center(
            angle in -10.0f64..10.0,
            cx in -100.0f64..100.0,
            cy in -100.0f64..100.0,
            x in -100.0f64..100.0,
            y in -100.0f64..100.0,
        ) {
            let center = Point::new(cx, cy);
            let p = Rotation::new(angle, center).apply(Point::new(x, y));
            let before = (x - cx).hypot(y - cy);
            let after = (p.x - cx).hypot(p.y - cy);
            prop_assert!((before - after).abs() < 1e-9);
        }
    }
}
