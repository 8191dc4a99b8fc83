//! Polygon fill triangulation for mesh previews.
//!
//! Converts closed polygon boundaries into triangle geometry using the
//! `earclip` ear-clipping triangulation algorithm.

use crate::error::GratingError;

use super::types::{GeometryBuilder, Polygon};

/// Fill a closed polygon by triangulating its boundary into `builder`.
///
/// The closing edge is implicit; a repeated first point at the end is
/// tolerated.
///
/// # Errors
///
/// Returns [`GratingError::DegenerateGeometry`] if vertex index arithmetic
/// overflows. Degenerate boundaries (fewer than 3 points, or zero area) are
/// handled gracefully with a warning and no geometry output.
pub fn fill_polygon(builder: &mut GeometryBuilder, polygon: &Polygon) -> Result<(), GratingError> {
    builder.mark_polygon();

    if polygon.len() < 3 {
        builder.warn(format!(
            "polygon has {} point(s); need at least 3; skipping polygon",
            polygon.len()
        ));
        return Ok(());
    }

    let flat = polygon.flat_coords();
    let indices = earclip::earcut::earcut(&flat, &[], 2);

    if indices.is_empty() {
        builder.warn(format!(
            "earclip produced no triangles for polygon on layer {}/{}; skipping",
            polygon.layer.layer, polygon.layer.datatype
        ));
        return Ok(());
    }

    let base_vertex = emit_vertices(builder, &flat);
    emit_triangles(builder, &indices, base_vertex)
}

/// Pushes every vertex of the flat buffer and returns the index of the first.
fn emit_vertices(builder: &mut GeometryBuilder, flat: &[f64]) -> u32 {
    let base = builder.vertex_count();
    for pair in flat.chunks_exact(2) {
        if let [x, y] = *pair {
            builder.push_vertex(x, y);
        }
    }
    base
}

/// Convert earclip triangle indices (relative to the flat buffer) into
/// `GeometryBuilder` triangle calls using the base vertex offset.
fn emit_triangles(
    builder: &mut GeometryBuilder,
    indices: &[usize],
    base_vertex: u32,
) -> Result<(), GratingError> {
    for tri in indices.chunks_exact(3) {
        if let [ia, ib, ic] = *tri {
            let a = offset_index(base_vertex, ia)?;
            let b = offset_index(base_vertex, ib)?;
            let c = offset_index(base_vertex, ic)?;
            builder.push_triangle(a, b, c);
        }
    }
    Ok(())
}

fn offset_index(base: u32, offset: usize) -> Result<u32, GratingError> {
    let offset_u32 = u32::try_from(offset)
        .map_err(|_| GratingError::DegenerateGeometry("index overflow".into()))?;
    base.checked_add(offset_u32)
        .ok_or_else(|| GratingError::DegenerateGeometry("vertex index overflow".into()))
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::geometry::types::{LayerGeometry, LayerSpec, Point};

    const LAYER: LayerSpec = LayerSpec::new(1, 2);

    fn fill_and_build(polygon: &Polygon) -> LayerGeometry {
        let mut builder = GeometryBuilder::new();
        let result = fill_polygon(&mut builder, polygon);
        assert!(result.is_ok(), "expected fill_polygon to succeed");
        builder.build()
    }

    #[test]
    fn ut_reg_001_square_gives_two_triangles() {
        let square = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0), LAYER);
        let geom = fill_and_build(&square);
        assert_eq!(geom.vertex_count, 4);
        assert_eq!(geom.indices.len(), 6);
        assert_eq!(geom.polygon_count, 1);
        assert!(geom.warnings.is_empty());
    }

    #[test]
    fn ut_reg_002_trapezoid_taper_triangulates() {
        let taper = Polygon::new(
            vec![
                Point::new(1.0, 0.0),
                Point::new(10.0, 20.0),
                Point::new(-10.0, 20.0),
                Point::new(-1.0, 0.0),
            ],
            LAYER,
        );
        let geom = fill_and_build(&taper);
        assert_eq!(geom.indices.len(), 6);
        assert!((geom.bounds.max_y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ut_reg_003_degenerate_polygon_warns() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], LAYER);
        let geom = fill_and_build(&line);
        assert_eq!(geom.vertex_count, 0);
        assert_eq!(geom.warnings.len(), 1);
        assert_eq!(geom.polygon_count, 1);
    }

    #[test]
    fn ut_reg_004_indices_offset_by_existing_vertices() {
        let mut builder = GeometryBuilder::new();
        builder.push_vertex(100.0, 100.0);
        let square = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(1.0, 1.0), LAYER);
        assert!(fill_polygon(&mut builder, &square).is_ok());
        let geom = builder.build();
        assert!(geom.indices.iter().all(|&i| (1..5).contains(&i)));
    }
}
