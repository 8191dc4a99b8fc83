//! Fracturing of oversized polygons into pieces with a bounded vertex count.
//!
//! A polygon with too many vertices is cut at the median vertex coordinate
//! along the longer side of its bounding box, and each half is processed
//! again until it fits. Cuts are half-plane clips, which split a polygon
//! into exactly two pieces when it is monotone along the cut axis. Every
//! grating tooth and taper wedge is monotone along X.

use crate::error::GratingError;

use super::types::{Point, Polygon};

/// Smallest accepted vertex cap.
pub const MIN_FRACTURE_POINTS: usize = 5;

/// Depth at which recursion stops and a piece is emitted as-is.
const MAX_DEPTH: u32 = 48;

const POINT_EQUALITY_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Splits `polygon` into pieces of at most `max_points` vertices each.
///
/// Polygons that already fit are returned unchanged as the only element.
///
/// # Errors
///
/// Returns [`GratingError::InvalidParameter`] if `max_points` is below
/// [`MIN_FRACTURE_POINTS`].
pub fn fracture(polygon: Polygon, max_points: usize) -> Result<Vec<Polygon>, GratingError> {
    if max_points < MIN_FRACTURE_POINTS {
        return Err(GratingError::invalid(format!(
            "fracture needs max_points >= {MIN_FRACTURE_POINTS}, got {max_points}"
        )));
    }

    let mut pieces = Vec::new();
    let mut pending = vec![(polygon, 0_u32)];
    while let Some((current, depth)) = pending.pop() {
        if current.len() <= max_points || depth >= MAX_DEPTH {
            pieces.push(current);
            continue;
        }

        let Some((low, high)) = split(&current) else {
            pieces.push(current);
            continue;
        };
        if low.len() >= current.len() || high.len() >= current.len() {
            pieces.push(current);
            continue;
        }
        // Push high first so pieces come out low-to-high along the cut axis.
        pending.push((high, depth + 1));
        pending.push((low, depth + 1));
    }
    Ok(pieces)
}

/// Fractures every polygon in `polygons`, preserving order.
///
/// # Errors
///
/// See [`fracture`].
pub fn fracture_all(
    polygons: Vec<Polygon>,
    max_points: usize,
) -> Result<Vec<Polygon>, GratingError> {
    let mut out = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        out.extend(fracture(polygon, max_points)?);
    }
    Ok(out)
}

fn split(polygon: &Polygon) -> Option<(Polygon, Polygon)> {
    let bounds = polygon.bounds();
    let axis = if bounds.width() >= bounds.height() {
        Axis::X
    } else {
        Axis::Y
    };
    let (min, max) = match axis {
        Axis::X => (bounds.min_x, bounds.max_x),
        Axis::Y => (bounds.min_y, bounds.max_y),
    };
    if max - min <= POINT_EQUALITY_EPSILON {
        return None;
    }

    let mut coords: Vec<f64> = polygon.points.iter().map(|&p| coord(p, axis)).collect();
    coords.sort_by(f64::total_cmp);
    let median = coords.get(coords.len() / 2).copied().unwrap_or(min);
    let cut = if median <= min || median >= max {
        (min + max) / 2.0
    } else {
        median
    };

    let low = clip(&polygon.points, axis, cut, true);
    let high = clip(&polygon.points, axis, cut, false);
    if low.len() < 3 || high.len() < 3 {
        return None;
    }
    Some((
        Polygon::new(low, polygon.layer),
        Polygon::new(high, polygon.layer),
    ))
}

/// Sutherland-Hodgman clip against the half-plane `coord <= cut` (or `>=`).
fn clip(points: &[Point], axis: Axis, cut: f64, keep_low: bool) -> Vec<Point> {
    let inside = |p: Point| {
        let c = coord(p, axis);
        if keep_low {
            c <= cut
        } else {
            c >= cut
        }
    };

    let mut out: Vec<Point> = Vec::with_capacity(points.len() / 2 + 4);
    let Some(&last) = points.last() else {
        return out;
    };
    let mut previous = last;
    for &current in points {
        match (inside(previous), inside(current)) {
            (true, true) => push_distinct(&mut out, current),
            (true, false) => push_distinct(&mut out, intersect(previous, current, axis, cut)),
            (false, true) => {
                push_distinct(&mut out, intersect(previous, current, axis, cut));
                push_distinct(&mut out, current);
            }
            (false, false) => {}
        }
        previous = current;
    }

    if out.len() > 1 {
        if let (Some(&first), Some(&end)) = (out.first(), out.last()) {
            if same_point(first, end) {
                out.pop();
            }
        }
    }
    out
}

fn intersect(a: Point, b: Point, axis: Axis, cut: f64) -> Point {
    let (ca, cb) = (coord(a, axis), coord(b, axis));
    let t = (cut - ca) / (cb - ca);
    match axis {
        Axis::X => Point::new(cut, t.mul_add(b.y - a.y, a.y)),
        Axis::Y => Point::new(t.mul_add(b.x - a.x, a.x), cut),
    }
}

const fn coord(p: Point, axis: Axis) -> f64 {
    match axis {
        Axis::X => p.x,
        Axis::Y => p.y,
    }
}

fn push_distinct(out: &mut Vec<Point>, p: Point) {
    if out.last().is_some_and(|&q| same_point(p, q)) {
        return;
    }
    out.push(p);
}

fn same_point(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= POINT_EQUALITY_EPSILON && (a.y - b.y).abs() <= POINT_EQUALITY_EPSILON
}
