//! Focusing grating: curved teeth that bring the diffracted light to a
//! focal point, with the first tooth closed onto the waveguide as the taper.
//!
//! Tooth `q` lies on the curve of constant optical path difference
//! `q * wavelength` from the focal point:
//!
//! ```text
//! neff = wavelength / period + sin_theta
//! c1   = q * wavelength * sin_theta
//! c2   = (q * wavelength)^2
//! c3   = neff^2 - sin_theta^2
//! x(t) = width * t - width / 2
//! y(t) = (c1 + neff * sqrt(c2 - c3 * x(t)^2)) / c3
//! ```
//!
//! The curve is even in `x`, so every tooth is symmetric about the port axis.

use crate::error::GratingError;
use crate::geometry::fracture::{fracture, fracture_all};
use crate::geometry::path::{CurveSample, Path};
use crate::geometry::types::{LayerSpec, Point, Polygon};

use super::spec::GratingSpec;
use super::waveguide::WaveguideInterface;
use super::{TaperPath, Tooth, ToothGeometry};

/// Scalars of the focusing condition shared by every tooth of one grating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusingCondition {
    /// Free-space wavelength.
    pub wavelength: f64,
    /// Sine of the fiber incidence angle.
    pub sin_theta: f64,
    /// Effective index matched by the grating period.
    pub neff: f64,
    /// `neff² − sin_theta²`.
    pub c3: f64,
    /// Grating width.
    pub width: f64,
    /// Half the grating width.
    pub half_width: f64,
}

impl FocusingCondition {
    /// Derives the condition from the grating parameters.
    pub fn new(spec: &GratingSpec) -> Self {
        let neff = spec.wavelength / spec.period + spec.sin_theta;
        Self {
            wavelength: spec.wavelength,
            sin_theta: spec.sin_theta,
            neff,
            c3: neff.mul_add(neff, -(spec.sin_theta * spec.sin_theta)),
            width: spec.width,
            half_width: 0.5 * spec.width,
        }
    }

    /// `c2 − c3·x²` at the grating edge for tooth `q`; the tooth curve is
    /// real across the full width only when this is positive.
    pub fn edge_discriminant(&self, q: u32) -> f64 {
        let qw = f64::from(q) * self.wavelength;
        qw.mul_add(qw, -(self.c3 * self.half_width * self.half_width))
    }
}

/// Index of the first tooth: the focus distance rounded to whole periods.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn first_tooth_index(focus_distance: f64, period: f64) -> u32 {
    (focus_distance / period + 0.5).floor() as u32
}

/// Position and derivative of tooth `q`'s centre line at parameter `t`,
/// relative to the port.
pub fn tooth_curve(cond: &FocusingCondition, q: u32, t: f64) -> CurveSample {
    let qw = f64::from(q) * cond.wavelength;
    let c1 = qw * cond.sin_theta;
    let c2 = qw * qw;
    let x = cond.width.mul_add(t, -cond.half_width);
    let root = (cond.c3 * x).mul_add(-x, c2).sqrt();
    CurveSample {
        position: Point::new(x, cond.neff.mul_add(root, c1) / cond.c3),
        derivative: Point::new(cond.width, -cond.neff * cond.width * x / root),
    }
}

/// Builds the curved teeth of a focusing grating.
///
/// Each tooth is a strip `period * dutycycle` wide along [`tooth_curve`],
/// for `q` from [`first_tooth_index`] over `num_teeth` consecutive values.
/// The first tooth is replaced by a wedge: its far edge closed through the
/// two core edges at the port, which joins the waveguide to the grating.
/// The returned taper path therefore carries no polygons of its own, except
/// when the grating is shorter than one period: the wedge of tooth `qmin`
/// is then returned as the taper so the device still meets the waveguide.
/// Every polygon is wound counter-clockwise and fractured to
/// `spec.max_points` vertices.
///
/// # Errors
///
/// Returns [`GratingError::DegenerateGeometry`] if the focusing equation has
/// no real solution across the grating width for the first tooth, and
/// propagates kernel parameter errors.
pub fn build_focusing<W: WaveguideInterface + ?Sized>(
    spec: &GratingSpec,
    wgt: &W,
    port: Point,
    focus_distance: f64,
) -> Result<(TaperPath, ToothGeometry), GratingError> {
    let cond = FocusingCondition::new(spec);
    let qmin = first_tooth_index(focus_distance, spec.period);
    let num_teeth = spec.num_teeth();

    if cond.c3 <= 0.0 {
        return Err(GratingError::DegenerateGeometry(format!(
            "no focusing solution: neff² − sin²θ = {} is not positive",
            cond.c3
        )));
    }
    if cond.edge_discriminant(qmin) <= 0.0 {
        return Err(GratingError::DegenerateGeometry(format!(
            "focus distance {focus_distance} is too short for a {} wide grating \
             (first tooth q = {qmin})",
            spec.width
        )));
    }
    tracing::debug!(qmin, num_teeth, neff = cond.neff, "building focusing teeth");

    let layer = wgt.layer();
    let half_core = 0.5 * wgt.core_width();
    let mut teeth = Vec::with_capacity(num_teeth as usize);

    for q in qmin..qmin.saturating_add(num_teeth) {
        let (far_edge, strip) = sweep_tooth(spec, &cond, q, port, layer)?;
        let polygons = if q == qmin {
            let wedge = taper_wedge(far_edge, port, half_core, layer);
            fracture(wedge, spec.max_points)?
        } else {
            fracture_all(strip.into_polygons(), spec.max_points)?
        };
        teeth.push(Tooth { order: q, polygons });
    }

    let mut taper = TaperPath::default();
    if num_teeth == 0 {
        let (far_edge, _) = sweep_tooth(spec, &cond, qmin, port, layer)?;
        let wedge = taper_wedge(far_edge, port, half_core, layer);
        taper.polygons = fracture(wedge, spec.max_points)?;
    }

    Ok((taper, ToothGeometry { teeth }))
}

/// Sweeps tooth `q` from the port, returning its far edge and its strip.
fn sweep_tooth(
    spec: &GratingSpec,
    cond: &FocusingCondition,
    q: u32,
    port: Point,
    layer: LayerSpec,
) -> Result<(Vec<Point>, Path), GratingError> {
    let mut strip = Path::new(spec.period * spec.dutycycle, port, layer);
    let far_edge = strip.parametric(
        |t| tooth_curve(cond, q, t),
        spec.evaluations,
        spec.max_points,
    )?;
    Ok((far_edge, strip))
}

/// Closes a tooth's far edge through the core edges at the port.
fn taper_wedge(far_edge: Vec<Point>, port: Point, half_core: f64, layer: LayerSpec) -> Polygon {
    let mut points = Vec::with_capacity(far_edge.len() + 2);
    points.push(port.offset(-half_core, 0.0));
    points.push(port.offset(half_core, 0.0));
    points.extend(far_edge.into_iter().rev());
    Polygon::new(points, layer)
}
