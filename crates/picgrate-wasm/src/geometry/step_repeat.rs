//! Step-repeat polygon duplication and uniform rectangle rows.
//!
//! Duplicates a block polygon at evenly spaced offsets.

use super::types::{LayerSpec, Point, Polygon};

/// Duplicates `block` `count` times, copy `i` shifted by `i * step`.
///
/// A `count` of zero yields no polygons.
pub fn step_repeat(block: &Polygon, count: u32, step: Point) -> Vec<Polygon> {
    let mut copies = Vec::with_capacity(count as usize);
    for i in 0..count {
        let offset_x = f64::from(i) * step.x;
        let offset_y = f64::from(i) * step.y;
        copies.push(Polygon::new(
            block
                .points
                .iter()
                .map(|p| p.offset(offset_x, offset_y))
                .collect(),
            block.layer,
        ));
    }
    copies
}

/// Builds `count` parallel rectangles running along `+x`.
///
/// Every rectangle spans `length` in X starting at `start.x` and `thickness`
/// in Y. Rectangle centres are `pitch` apart in Y and the row as a whole is
/// centred on `start.y`, so rectangle `i` is centred at
/// `start.y + (i - (count - 1) / 2) * pitch`.
pub fn rectangle_row(
    start: Point,
    length: f64,
    thickness: f64,
    count: u32,
    pitch: f64,
    layer: LayerSpec,
) -> Vec<Polygon> {
    if count == 0 {
        return Vec::new();
    }
    let first_centre = (f64::from(count) - 1.0).mul_add(-pitch / 2.0, start.y);
    let block = Polygon::rectangle(
        Point::new(start.x, first_centre - thickness / 2.0),
        Point::new(start.x + length, first_centre + thickness / 2.0),
        layer,
    );
    step_repeat(&block, count, Point::new(0.0, pitch))
}
