//! Grating coupler construction.
//!
//! [`GratingCouplerBuilder`] runs a fixed pipeline: validate the
//! [`GratingSpec`], generate a straight or focusing grating facing `+y` from
//! the port, rotate it about the port to the requested [`Direction`], and
//! register the single output [`Port`]. The result is an immutable
//! [`GratingCoupler`] that can be added to any [`LayoutTarget`].

pub mod focusing;
pub mod ids;
pub mod port;
pub mod spec;
pub mod straight;
pub mod waveguide;

use serde::Serialize;

use crate::error::GratingError;
use crate::geometry::layout::{Cell, LayoutTarget};
use crate::geometry::transform::Rotation;
use crate::geometry::types::{BoundingBox, LayerSpec, Point, Polygon};

use self::focusing::build_focusing;
use self::ids::IdSource;
use self::port::{Direction, Port};
use self::spec::{GratingMode, GratingSpec};
use self::straight::build_straight;
use self::waveguide::WaveguideInterface;

/// Name of the port every grating coupler registers.
pub const OUTPUT_PORT: &str = "output";

/// Prefix of generated cell names.
pub const CELL_NAME_PREFIX: &str = "GratingCoupler--";

/// Transitional shapes joining the waveguide to the grating region.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaperPath {
    /// Taper polygons.
    pub polygons: Vec<Polygon>,
}

/// One grating tooth, possibly fractured into several polygons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooth {
    /// Row index for straight gratings; focusing order `q` for curved ones.
    pub order: u32,
    /// Polygons making up the tooth.
    pub polygons: Vec<Polygon>,
}

/// Ordered teeth, nearest the port first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToothGeometry {
    /// Teeth in order.
    pub teeth: Vec<Tooth>,
}

impl ToothGeometry {
    /// Number of teeth.
    pub fn len(&self) -> usize {
        self.teeth.len()
    }

    /// Returns `true` if there are no teeth.
    pub fn is_empty(&self) -> bool {
        self.teeth.is_empty()
    }

    /// Every tooth polygon in order.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.teeth.iter().flat_map(|tooth| tooth.polygons.iter())
    }
}

/// A fully built grating coupler.
#[derive(Debug, Clone, PartialEq)]
pub struct GratingCoupler {
    name: String,
    mode: GratingMode,
    spec: GratingSpec,
    layer: LayerSpec,
    direction: Direction,
    taper: TaperPath,
    teeth: ToothGeometry,
    output: Port,
    warnings: Vec<String>,
}

impl GratingCoupler {
    /// Cell name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generator that produced the teeth.
    pub const fn mode(&self) -> GratingMode {
        self.mode
    }

    /// Parameters the coupler was built from.
    pub const fn spec(&self) -> &GratingSpec {
        &self.spec
    }

    /// Layer every shape is on.
    pub const fn layer(&self) -> LayerSpec {
        self.layer
    }

    /// Direction the device faces.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Taper shapes, in final orientation.
    pub const fn taper(&self) -> &TaperPath {
        &self.taper
    }

    /// Teeth, in final orientation.
    pub const fn teeth(&self) -> &ToothGeometry {
        &self.teeth
    }

    /// Number of teeth.
    pub fn num_teeth(&self) -> usize {
        self.teeth.len()
    }

    /// The output port other devices attach to.
    pub const fn output_port(&self) -> Port {
        self.output
    }

    /// All registered ports by name.
    pub fn ports(&self) -> impl Iterator<Item = (&'static str, Port)> {
        std::iter::once((OUTPUT_PORT, self.output))
    }

    /// Non-fatal conditions met while building.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Every polygon: teeth first, then the taper.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.teeth.polygons().chain(self.taper.polygons.iter())
    }

    /// Bounding box of every polygon.
    pub fn bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::new();
        for polygon in self.polygons() {
            bounds.union(&polygon.bounds());
        }
        bounds
    }

    /// Adds every polygon and the output port to `target`.
    ///
    /// # Errors
    ///
    /// Propagates the first error reported by `target`.
    pub fn add_to<T: LayoutTarget + ?Sized>(&self, target: &mut T) -> Result<(), GratingError> {
        for polygon in self.polygons() {
            target.add_polygon(polygon)?;
        }
        for (name, port) in self.ports() {
            target.add_port(name, port);
        }
        Ok(())
    }

    /// Collects the coupler into a standalone [`Cell`] named after it.
    pub fn to_cell(&self) -> Cell {
        let mut cell = Cell::new(self.name.clone());
        for polygon in self.polygons() {
            cell.push_polygon(polygon.clone());
        }
        for (name, port) in self.ports() {
            cell.add_port(name, port);
        }
        cell
    }
}

/// Summary of a built coupler and its preview mesh, returned to JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouplerMeta {
    /// Cell name.
    pub name: String,
    /// Bounding box of every polygon.
    pub bounds: BoundingBox,
    /// Number of layout polygons.
    pub polygon_count: u32,
    /// Number of mesh vertices.
    pub vertex_count: u32,
    /// Number of mesh triangle indices.
    pub index_count: u32,
    /// Number of teeth.
    pub num_teeth: u32,
    /// Generator used.
    pub mode: GratingMode,
    /// The output port.
    pub output: Port,
    /// Layer every shape is on.
    pub layer: LayerSpec,
    /// Number of warnings.
    pub warning_count: u32,
    /// Warnings from construction and triangulation.
    pub warnings: Vec<String>,
}

/// Builds [`GratingCoupler`]s from a spec, a port, and a facing direction.
#[derive(Debug, Clone, PartialEq)]
pub struct GratingCouplerBuilder {
    spec: GratingSpec,
    port: Point,
    direction: Direction,
}

impl GratingCouplerBuilder {
    /// Starts a builder at the origin facing east.
    pub fn new(spec: GratingSpec) -> Self {
        Self {
            spec,
            port: Point::default(),
            direction: Direction::default(),
        }
    }

    /// Sets the output port position.
    #[must_use]
    pub const fn port(mut self, port: Point) -> Self {
        self.port = port;
        self
    }

    /// Sets the direction the device faces.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Parameters this builder uses.
    pub const fn spec(&self) -> &GratingSpec {
        &self.spec
    }

    /// Builds a coupler named `GratingCoupler--<id>` with the next id from `ids`.
    ///
    /// # Errors
    ///
    /// See [`GratingCouplerBuilder::build`].
    pub fn build_with_ids<W, I>(&self, wgt: &W, ids: &mut I) -> Result<GratingCoupler, GratingError>
    where
        W: WaveguideInterface + ?Sized,
        I: IdSource + ?Sized,
    {
        self.build(wgt, format!("{CELL_NAME_PREFIX}{}", ids.next_id()))
    }

    /// Builds a coupler with an explicit cell name.
    ///
    /// # Errors
    ///
    /// Returns [`GratingError::InvalidParameter`] if the grating parameters or the
    /// waveguide widths are invalid, and [`GratingError::DegenerateGeometry`]
    /// if the focusing equation has no solution for the requested focus.
    /// Nothing is built when validation fails.
    pub fn build<W>(&self, wgt: &W, name: impl Into<String>) -> Result<GratingCoupler, GratingError>
    where
        W: WaveguideInterface + ?Sized,
    {
        let name = name.into();
        let mode = self.spec.validate()?;
        wgt.check_widths()?;

        let mut warnings = Vec::new();
        if self.spec.num_teeth() == 0 {
            warn(
                &mut warnings,
                format!(
                    "grating length {} is shorter than one period {}; no teeth generated",
                    self.spec.length, self.spec.period
                ),
            );
        }

        tracing::debug!(
            name = %name,
            ?mode,
            direction = %self.direction,
            resist = %wgt.resist_polarity(),
            num_teeth = self.spec.num_teeth(),
            "building grating coupler"
        );

        let (mut taper, mut teeth) = match mode {
            GratingMode::Straight => build_straight(&self.spec, wgt, self.port),
            GratingMode::Focusing { focus_distance } => {
                build_focusing(&self.spec, wgt, self.port, focus_distance)?
            }
        };

        let fractured = teeth.teeth.iter().filter(|t| t.polygons.len() > 1).count();
        if fractured > 0 {
            warn(
                &mut warnings,
                format!("fractured {fractured} teeth to at most {} points", self.spec.max_points),
            );
        }

        let rotation = Rotation::new(self.direction.rotation(), self.port);
        rotation.apply_all(&mut taper.polygons);
        for tooth in &mut teeth.teeth {
            rotation.apply_all(&mut tooth.polygons);
        }

        Ok(GratingCoupler {
            name,
            mode,
            spec: self.spec,
            layer: wgt.layer(),
            direction: self.direction,
            taper,
            teeth,
            output: Port::new(self.port, self.direction.flip()),
            warnings,
        })
    }
}

fn warn(warnings: &mut Vec<String>, msg: String) {
    tracing::warn!("{msg}");
    warnings.push(msg);
}
