//! Extruded paths: width-varying linear segments, parallel rails, and
//! parametric curves widened into polygon strips.
//!
//! A [`Path`] keeps a current end point and heading. Each operation appends
//! polygons for every rail and advances the end point, so successive calls
//! chain into a continuous shape.

use crate::error::GratingError;

use super::types::{LayerSpec, Point, Polygon};

/// Smallest vertex cap that still fits one quadrilateral strip piece.
pub const MIN_STRIP_POINTS: usize = 4;

/// Position and first derivative of a curve at one parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Curve position relative to the path end.
    pub position: Point,
    /// Derivative of the position with respect to the curve parameter.
    pub derivative: Point,
}

/// A multi-rail path extruded from a start point.
#[derive(Debug, Clone)]
pub struct Path {
    end: Point,
    heading: Point,
    width: f64,
    rails: u32,
    distance: f64,
    layer: LayerSpec,
    polygons: Vec<Polygon>,
}

impl Path {
    /// Creates a single-rail path of the given width heading in `+y`.
    pub const fn new(width: f64, start: Point, layer: LayerSpec) -> Self {
        Self {
            end: start,
            heading: Point::new(0.0, 1.0),
            width,
            rails: 1,
            distance: 0.0,
            layer,
            polygons: Vec::new(),
        }
    }

    /// Uses `rails` parallel rails whose centres are `distance` apart.
    #[must_use]
    pub fn with_rails(mut self, rails: u32, distance: f64) -> Self {
        self.rails = rails.max(1);
        self.distance = distance;
        self
    }

    /// Current end point of the path centre line.
    pub const fn end(&self) -> Point {
        self.end
    }

    /// Current rail width.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Current distance between adjacent rail centres.
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Current unit heading.
    pub const fn heading(&self) -> Point {
        self.heading
    }

    /// Polygons drawn so far.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Consumes the path and returns its polygons.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Extrudes a straight segment of `length` along the current heading.
    ///
    /// Rail width and rail spacing vary linearly to `final_width` and
    /// `final_distance` when given; otherwise they stay constant.
    pub fn segment(&mut self, length: f64, final_width: Option<f64>, final_distance: Option<f64>) {
        let width_end = final_width.unwrap_or(self.width);
        let distance_end = final_distance.unwrap_or(self.distance);
        let normal = left_normal(self.heading);
        let start = self.end;
        let end = start.offset(self.heading.x * length, self.heading.y * length);

        for rail in 0..self.rails {
            let factor = self.rail_factor(rail);
            let c0 = along(start, normal, factor * self.distance);
            let c1 = along(end, normal, factor * distance_end);
            self.polygons.push(Polygon::new(
                vec![
                    along(c0, normal, -self.width / 2.0),
                    along(c1, normal, -width_end / 2.0),
                    along(c1, normal, width_end / 2.0),
                    along(c0, normal, self.width / 2.0),
                ],
                self.layer,
            ));
        }

        self.end = end;
        self.width = width_end;
        self.distance = distance_end;
    }

    /// Sweeps a parametric curve `t ∈ [0, 1]` relative to the current end
    /// point and widens it by the rail width along the curve normal.
    ///
    /// The curve is sampled at `evaluations` evenly spaced parameters. Each
    /// rail strip is split into consecutive pieces of at most `max_points`
    /// vertices, wound counter-clockwise. Returns the sampled outer left
    /// edge, in parameter order.
    ///
    /// # Errors
    ///
    /// Returns [`GratingError::InvalidParameter`] if `evaluations < 2` or
    /// `max_points` is below [`MIN_STRIP_POINTS`], and
    /// [`GratingError::DegenerateGeometry`] if the curve produces a
    /// non-finite sample or a zero-length derivative.
    pub fn parametric<F>(
        &mut self,
        curve: F,
        evaluations: usize,
        max_points: usize,
    ) -> Result<Vec<Point>, GratingError>
    where
        F: Fn(f64) -> CurveSample,
    {
        if evaluations < 2 {
            return Err(GratingError::invalid(format!(
                "parametric curve needs at least 2 evaluations, got {evaluations}"
            )));
        }
        if max_points < MIN_STRIP_POINTS {
            return Err(GratingError::invalid(format!(
                "max_points must be at least {MIN_STRIP_POINTS}, got {max_points}"
            )));
        }

        let samples = sample_curve(&curve, evaluations)?;
        let chunk = (max_points / 2).max(2);
        let mut outer_left = Vec::new();

        for rail in 0..self.rails {
            let offset = self.rail_factor(rail) * self.distance;
            let mut left = Vec::with_capacity(samples.len());
            let mut right = Vec::with_capacity(samples.len());
            for &(position, normal) in &samples {
                let centre = along(self.end.offset(position.x, position.y), normal, offset);
                left.push(along(centre, normal, self.width / 2.0));
                right.push(along(centre, normal, -self.width / 2.0));
            }
            self.push_strip_pieces(&left, &right, chunk);
            outer_left = left;
        }

        if let Some(&(position, normal)) = samples.last() {
            self.end = self.end.offset(position.x, position.y);
            self.heading = Point::new(normal.y, -normal.x);
        }

        Ok(outer_left)
    }

    fn push_strip_pieces(&mut self, left: &[Point], right: &[Point], chunk: usize) {
        let last = left.len().saturating_sub(1);
        let mut start = 0;
        while start < last {
            let end = (start + chunk - 1).min(last);
            let (Some(left_piece), Some(right_piece)) =
                (left.get(start..=end), right.get(start..=end))
            else {
                return;
            };
            let mut points = right_piece.to_vec();
            points.extend(left_piece.iter().rev());
            self.polygons.push(Polygon::new(points, self.layer));
            start = end;
        }
    }

    fn rail_factor(&self, rail: u32) -> f64 {
        f64::from(rail) - (f64::from(self.rails) - 1.0) / 2.0
    }
}

/// Samples `curve` at `evaluations` parameters, returning positions with
/// their unit left normals.
fn sample_curve<F>(curve: &F, evaluations: usize) -> Result<Vec<(Point, Point)>, GratingError>
where
    F: Fn(f64) -> CurveSample,
{
    let last = evaluations - 1;
    let mut samples = Vec::with_capacity(evaluations);
    for step in 0..evaluations {
        let t = ratio(step, last);
        let sample = curve(t);
        let d = sample.derivative;
        let norm = d.x.hypot(d.y);
        let finite = sample.position.x.is_finite() && sample.position.y.is_finite();
        if !finite || !norm.is_finite() || norm <= f64::EPSILON {
            return Err(GratingError::DegenerateGeometry(format!(
                "parametric curve is undefined at t = {t}"
            )));
        }
        let tangent = Point::new(d.x / norm, d.y / norm);
        samples.push((sample.position, left_normal(tangent)));
    }
    Ok(samples)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(step: usize, last: usize) -> f64 {
    step as f64 / last as f64
}

const fn left_normal(direction: Point) -> Point {
    Point::new(-direction.y, direction.x)
}

fn along(point: Point, direction: Point, amount: f64) -> Point {
    Point::new(
        direction.x.mul_add(amount, point.x),
        direction.y.mul_add(amount, point.y),
    )
}
