//! Layout containers that devices add their shapes and ports to.

use std::collections::BTreeMap;

use crate::error::GratingError;

use super::region::fill_polygon;
use super::types::{BoundingBox, GeometryBuilder, Polygon};
use crate::coupler::port::Port;

/// Anything a device can be added to.
pub trait LayoutTarget {
    /// Adds one tagged polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot accept the polygon.
    fn add_polygon(&mut self, polygon: &Polygon) -> Result<(), GratingError>;

    /// Registers a named connection point. Targets without a port list ignore it.
    fn add_port(&mut self, _name: &str, _port: Port) {}
}

/// A named container of polygons and ports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    name: String,
    polygons: Vec<Polygon>,
    ports: BTreeMap<String, Port>,
}

impl Cell {
    /// Creates an empty cell.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polygons: Vec::new(),
            ports: BTreeMap::new(),
        }
    }

    /// Cell name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polygons added so far, in insertion order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// All ports, ordered by name.
    pub fn ports(&self) -> impl Iterator<Item = (&str, &Port)> {
        self.ports.iter().map(|(name, port)| (name.as_str(), port))
    }

    /// Appends a polygon.
    pub fn push_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Bounding box of every polygon.
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for polygon in &self.polygons {
            bounds.union(&polygon.bounds());
        }
        bounds
    }
}

impl LayoutTarget for Cell {
    fn add_polygon(&mut self, polygon: &Polygon) -> Result<(), GratingError> {
        self.push_polygon(polygon.clone());
        Ok(())
    }

    fn add_port(&mut self, name: &str, port: Port) {
        self.ports.insert(name.to_string(), port);
    }
}

impl LayoutTarget for GeometryBuilder {
    fn add_polygon(&mut self, polygon: &Polygon) -> Result<(), GratingError> {
        fill_polygon(self, polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupler::port::Direction;
    use crate::geometry::types::{LayerSpec, Point};

    const LAYER: LayerSpec = LayerSpec::new(1, 2);

    #[test]
    fn ut_lay_001_cell_collects_polygons_and_ports() {
        let mut cell = Cell::new("top");
        let square = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(2.0, 1.0), LAYER);
        assert!(cell.add_polygon(&square).is_ok());
        cell.add_port("output", Port::new(Point::new(0.0, 0.0), Direction::West));

        assert_eq!(cell.name(), "top");
        assert_eq!(cell.polygons().len(), 1);
        assert_eq!(
            cell.port("output").map(|p| p.direction),
            Some(Direction::West)
        );
        assert!((cell.bounds().width() - 2.0).abs() < f64::EPSILON);
        assert_eq!(cell.ports().count(), 1);
    }

    #[test]
    fn ut_lay_002_mesh_target_ignores_ports() {
        let mut builder = GeometryBuilder::new();
        let square = Polygon::rectangle(Point::new(0.0, 0.0), Point::new(1.0, 1.0), LAYER);
        assert!(builder.add_polygon(&square).is_ok());
        builder.add_port("output", Port::new(Point::new(0.0, 0.0), Direction::North));
        let geom = builder.build();
        assert_eq!(geom.polygon_count, 1);
        assert_eq!(geom.indices.len(), 6);
    }
}
