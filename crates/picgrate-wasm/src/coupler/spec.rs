//! Grating parameters, their validation, and the option object accepted at
//! the wasm boundary.

use serde::{Deserialize, Serialize};

use crate::error::GratingError;
use crate::geometry::fracture::MIN_FRACTURE_POINTS;
use crate::geometry::types::Point;

use super::port::Direction;
use super::waveguide::WaveguideTemplate;

/// Default number of parametric evaluations per curved tooth.
pub const DEFAULT_EVALUATIONS: usize = 99;

/// Default vertex cap for tessellated and fractured polygons.
pub const DEFAULT_MAX_POINTS: usize = 199;

/// Sine of the default 8° fiber incidence angle.
pub fn default_sin_theta() -> f64 {
    8.0_f64.to_radians().sin()
}

/// Which generator a validated spec selects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum GratingMode {
    /// Rectangular teeth in a straight row.
    Straight,
    /// Curved teeth focusing onto a point `focus_distance` from the port.
    Focusing {
        /// Distance from the port to the focal point.
        focus_distance: f64,
    },
}

/// Full set of grating parameters.
///
/// Lengths are in microns. `wavelength` shares the unit of `period`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GratingSpec {
    /// Width of the grating region, across the propagation direction.
    pub width: f64,
    /// Length of the grating region, along the propagation direction.
    pub length: f64,
    /// Length of the taper from the waveguide to the grating region.
    pub taper_length: f64,
    /// Grating period.
    pub period: f64,
    /// Fraction of each period occupied by tooth material, in `[0, 1]`.
    pub dutycycle: f64,
    /// Focus distance; `None` builds a straight grating.
    pub focus_distance: Option<f64>,
    /// Free-space wavelength.
    pub wavelength: f64,
    /// Sine of the fiber incidence angle.
    pub sin_theta: f64,
    /// Parametric evaluations per curved tooth.
    pub evaluations: usize,
    /// Vertex cap for tessellated and fractured polygons.
    pub max_points: usize,
}

impl Default for GratingSpec {
    fn default() -> Self {
        Self {
            width: 20.0,
            length: 50.0,
            taper_length: 20.0,
            period: 1.0,
            dutycycle: 0.5,
            focus_distance: None,
            wavelength: 1.55,
            sin_theta: default_sin_theta(),
            evaluations: DEFAULT_EVALUATIONS,
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

impl GratingSpec {
    /// Checks every parameter and returns the generator to use.
    ///
    /// # Errors
    ///
    /// Returns [`GratingError::InvalidParameter`] if the dutycycle is outside
    /// `[0, 1]`, a supplied focus distance is not strictly positive, or any
    /// other parameter is non-finite or out of range.
    pub fn validate(&self) -> Result<GratingMode, GratingError> {
        if !(0.0..=1.0).contains(&self.dutycycle) {
            return Err(GratingError::invalid(format!(
                "dutycycle must be between 0 and 1, got {}",
                self.dutycycle
            )));
        }

        positive("period", self.period)?;
        positive("width", self.width)?;
        positive("wavelength", self.wavelength)?;
        non_negative("length", self.length)?;
        non_negative("taper_length", self.taper_length)?;

        if !(-1.0..=1.0).contains(&self.sin_theta) {
            return Err(GratingError::invalid(format!(
                "sin_theta must be between -1 and 1, got {}",
                self.sin_theta
            )));
        }
        if self.evaluations < 2 {
            return Err(GratingError::invalid(format!(
                "evaluations must be at least 2, got {}",
                self.evaluations
            )));
        }
        if self.max_points < MIN_FRACTURE_POINTS {
            return Err(GratingError::invalid(format!(
                "max_points must be at least {MIN_FRACTURE_POINTS}, got {}",
                self.max_points
            )));
        }

        match self.focus_distance {
            None => Ok(GratingMode::Straight),
            Some(focus_distance) if focus_distance.is_finite() && focus_distance > 0.0 => {
                Ok(GratingMode::Focusing { focus_distance })
            }
            Some(focus_distance) => Err(GratingError::invalid(format!(
                "focus_distance must be strictly positive, got {focus_distance}"
            ))),
        }
    }

    /// Number of whole grating periods that fit in `length`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn num_teeth(&self) -> u32 {
        let raw = (self.length / self.period).floor();
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }
        raw as u32
    }
}

fn positive(label: &str, value: f64) -> Result<(), GratingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GratingError::invalid(format!(
            "{label} must be finite and positive, got {value}"
        )))
    }
}

fn non_negative(label: &str, value: f64) -> Result<(), GratingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GratingError::invalid(format!(
            "{label} must be finite and non-negative, got {value}"
        )))
    }
}

/// Option object accepted by the wasm API.
///
/// Every field is optional on the JavaScript side; missing fields take the
/// [`GratingSpec`] and [`WaveguideTemplate`] defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CouplerOptions {
    /// Explicit cell name. Generated when absent.
    pub name: Option<String>,
    /// Output port position.
    pub port: Point,
    /// Direction the device faces.
    pub direction: Direction,
    /// Focus distance; absent for a straight grating.
    pub focus_distance: Option<f64>,
    /// See [`GratingSpec::width`].
    pub width: f64,
    /// See [`GratingSpec::length`].
    pub length: f64,
    /// See [`GratingSpec::taper_length`].
    pub taper_length: f64,
    /// See [`GratingSpec::period`].
    pub period: f64,
    /// See [`GratingSpec::dutycycle`].
    pub dutycycle: f64,
    /// See [`GratingSpec::wavelength`].
    pub wavelength: f64,
    /// See [`GratingSpec::sin_theta`].
    pub sin_theta: f64,
    /// See [`GratingSpec::evaluations`].
    pub evaluations: usize,
    /// See [`GratingSpec::max_points`].
    pub max_points: usize,
    /// Waveguide the coupler attaches to.
    pub waveguide: WaveguideTemplate,
}

impl Default for CouplerOptions {
    fn default() -> Self {
        let spec = GratingSpec::default();
        Self {
            name: None,
            port: Point::default(),
            direction: Direction::default(),
            focus_distance: spec.focus_distance,
            width: spec.width,
            length: spec.length,
            taper_length: spec.taper_length,
            period: spec.period,
            dutycycle: spec.dutycycle,
            wavelength: spec.wavelength,
            sin_theta: spec.sin_theta,
            evaluations: spec.evaluations,
            max_points: spec.max_points,
            waveguide: WaveguideTemplate::default(),
        }
    }
}

impl CouplerOptions {
    /// Grating parameters carried by these options.
    pub const fn grating_spec(&self) -> GratingSpec {
        GratingSpec {
            width: self.width,
            length: self.length,
            taper_length: self.taper_length,
            period: self.period,
            dutycycle: self.dutycycle,
            focus_distance: self.focus_distance,
            wavelength: self.wavelength,
            sin_theta: self.sin_theta,
            evaluations: self.evaluations,
            max_points: self.max_points,
        }
    }
}
