//! Core geometry types and the `GeometryBuilder` mesh accumulator.

use serde::{Deserialize, Serialize};

/// 2D point in layout coordinate space (microns).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates an empty bounding box that will expand with the first `update` call.
    pub const fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expands the bounding box to include the given point.
    pub fn update(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Expands the bounding box to include another box.
    pub fn union(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.update(other.min_x, other.min_y);
        self.update(other.max_x, other.max_y);
    }

    /// Returns `true` if no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Width along X. Zero for an empty box.
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Height along Y. Zero for an empty box.
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// GDSII-style layer and datatype tag attached to every shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Layer number.
    pub layer: u16,
    /// Datatype number.
    pub datatype: u16,
}

impl LayerSpec {
    /// Creates a layer tag.
    pub const fn new(layer: u16, datatype: u16) -> Self {
        Self { layer, datatype }
    }
}

/// A closed polygon on a single layer.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
    /// Layer tag.
    pub layer: LayerSpec,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub const fn new(points: Vec<Point>, layer: LayerSpec) -> Self {
        Self { points, layer }
    }

    /// Axis-aligned rectangle spanning the two corners, wound counter-clockwise.
    pub fn rectangle(a: Point, b: Point, layer: LayerSpec) -> Self {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        Self::new(
            vec![
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            layer,
        )
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for p in &self.points {
            bounds.update(p.x, p.y);
        }
        bounds
    }

    /// Signed shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let Some(&last) = self.points.last() else {
            return 0.0;
        };
        let mut twice_area = 0.0;
        let mut previous = last;
        for &current in &self.points {
            twice_area += previous.x.mul_add(current.y, -(current.x * previous.y));
            previous = current;
        }
        twice_area / 2.0
    }

    /// Flattens the vertices into `[x0, y0, x1, y1, ...]`.
    pub fn flat_coords(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.points.len() * 2);
        for p in &self.points {
            flat.push(p.x);
            flat.push(p.y);
        }
        flat
    }
}

/// Converts a length to `u32`, saturating at `u32::MAX`.
pub fn saturate_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Triangulated preview of a layout.
///
/// Positions are interleaved `[x0, y0, x1, y1, ...]` as `f32` for WebGL.
/// Indices reference into the positions array as a triangle list.
#[derive(Debug, Clone)]
pub struct LayerGeometry {
    /// Interleaved vertex positions `[x0, y0, x1, y1, ...]`.
    pub positions: Vec<f32>,
    /// Triangle-list indices into the positions array.
    pub indices: Vec<u32>,
    /// Axis-aligned bounding box of all vertices.
    pub bounds: BoundingBox,
    /// Number of polygons triangulated into this mesh.
    pub polygon_count: u32,
    /// Number of vertices (`positions.len() / 2`).
    pub vertex_count: u32,
    /// Warning messages generated during triangulation.
    pub warnings: Vec<String>,
}

/// Accumulator for building a triangle mesh incrementally.
///
/// Passed by mutable reference to triangulation functions.
/// Vertices and indices are collected in flat `Vec`s to minimize allocations.
#[derive(Debug)]
pub struct GeometryBuilder {
    positions: Vec<f32>,
    indices: Vec<u32>,
    bounds: BoundingBox,
    polygon_count: u32,
    warnings: Vec<String>,
}

impl GeometryBuilder {
    /// Creates an empty builder.
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
            bounds: BoundingBox::new(),
            polygon_count: 0,
            warnings: Vec::new(),
        }
    }

    /// Adds a vertex and returns its index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_vertex(&mut self, x: f64, y: f64) -> u32 {
        let idx = self.positions.len() / 2;
        self.positions.push(x as f32);
        self.positions.push(y as f32);
        self.bounds.update(x, y);
        saturate_u32(idx)
    }

    /// Adds a triangle from three vertex indices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    /// Counts one more source polygon in the mesh.
    pub fn mark_polygon(&mut self) {
        self.polygon_count = self.polygon_count.saturating_add(1);
    }

    /// Records a warning message.
    pub fn warn(&mut self, msg: String) {
        tracing::warn!("{msg}");
        self.warnings.push(msg);
    }

    /// Returns the current number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        saturate_u32(self.positions.len() / 2)
    }

    /// Consumes the builder and produces a [`LayerGeometry`].
    pub fn build(self) -> LayerGeometry {
        let vertex_count = saturate_u32(self.positions.len() / 2);
        LayerGeometry {
            positions: self.positions,
            indices: self.indices,
            bounds: self.bounds,
            polygon_count: self.polygon_count,
            vertex_count,
            warnings: self.warnings,
        }
    }
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
