//! Waveguide interface consumed by devices, and resist polarity.
//!
//! A device reads the waveguide's physical widths, resist polarity, and
//! layer tag once while it is built and never changes them.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GratingError;
use crate::geometry::types::LayerSpec;

/// Which material a drawn polygon represents in fabrication.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ResistPolarity {
    /// Positive resist: drawn shapes are etched away, so the cladding
    /// trenches around the core are drawn. Tagged `+`.
    EtchPositive,
    /// Negative resist: drawn shapes remain, so the core itself is drawn.
    /// Tagged `-`.
    EtchNegative,
}

impl ResistPolarity {
    /// Fraction of each grating period that is drawn, given the fraction
    /// occupied by tooth material.
    ///
    /// Positive resist draws the gaps between teeth instead of the teeth.
    pub fn drawn_fraction(self, dutycycle: f64) -> f64 {
        match self {
            Self::EtchNegative => dutycycle,
            Self::EtchPositive => 1.0 - dutycycle,
        }
    }
}

impl Display for ResistPolarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::EtchPositive => write!(f, "etch-positive"),
            Self::EtchNegative => write!(f, "etch-negative"),
        }
    }
}

impl FromStr for ResistPolarity {
    type Err = GratingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "etch-positive" => Ok(Self::EtchPositive),
            "-" | "etch-negative" => Ok(Self::EtchNegative),
            other => Err(GratingError::invalid(format!(
                "unknown resist polarity `{other}`; expected `+` or `-`"
            ))),
        }
    }
}

impl TryFrom<String> for ResistPolarity {
    type Error = GratingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The read-only view of a waveguide that devices are built against.
pub trait WaveguideInterface {
    /// Width of the waveguide core.
    fn core_width(&self) -> f64;
    /// Width of each cladding trench beside the core.
    fn clad_width(&self) -> f64;
    /// Resist polarity of the fabrication process.
    fn resist_polarity(&self) -> ResistPolarity;
    /// Layer and datatype all device shapes are drawn on.
    fn layer(&self) -> LayerSpec;

    /// Checks that both widths are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`GratingError::InvalidParameter`] naming the offending width.
    fn check_widths(&self) -> Result<(), GratingError> {
        for (label, value) in [("core width", self.core_width()), ("clad width", self.clad_width())] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GratingError::invalid(format!(
                    "waveguide {label} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Plain waveguide description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveguideTemplate {
    /// Core width.
    pub wg_width: f64,
    /// Cladding trench width.
    pub clad_width: f64,
    /// Resist polarity.
    pub resist: ResistPolarity,
    /// Layer number.
    pub layer: u16,
    /// Datatype number.
    pub datatype: u16,
}

impl Default for WaveguideTemplate {
    fn default() -> Self {
        Self {
            wg_width: 2.0,
            clad_width: 10.0,
            resist: ResistPolarity::EtchPositive,
            layer: 1,
            datatype: 2,
        }
    }
}

impl WaveguideInterface for WaveguideTemplate {
    fn core_width(&self) -> f64 {
        self.wg_width
    }

    fn clad_width(&self) -> f64 {
        self.clad_width
    }

    fn resist_polarity(&self) -> ResistPolarity {
        self.resist
    }

    fn layer(&self) -> LayerSpec {
        LayerSpec::new(self.layer, self.datatype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_wg_001_parse_symbol_and_name_tags() {
        assert_eq!("+".parse(), Ok(ResistPolarity::EtchPositive));
        assert_eq!("-".parse(), Ok(ResistPolarity::EtchNegative));
        assert_eq!("etch-positive".parse(), Ok(ResistPolarity::EtchPositive));
        assert_eq!("etch-negative".parse(), Ok(ResistPolarity::EtchNegative));
    }

    #[test]
    fn ut_wg_002_unknown_resist_fails_closed() {
        let result = "positive".parse::<ResistPolarity>();
        assert!(matches!(result, Err(GratingError::InvalidParameter(_))));
        let result = ResistPolarity::try_from(String::new());
        assert!(matches!(result, Err(GratingError::InvalidParameter(_))));
    }

    #[test]
    fn ut_wg_003_drawn_fraction_swaps_for_positive_resist() {
        assert!((ResistPolarity::EtchNegative.drawn_fraction(0.7) - 0.7).abs() < 1e-12);
        assert!((ResistPolarity::EtchPositive.drawn_fraction(0.7) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn ut_wg_004_template_exposes_interface() {
        let wgt = WaveguideTemplate {
            resist: ResistPolarity::EtchNegative,
            ..WaveguideTemplate::default()
        };
        assert!((wgt.core_width() - 2.0).abs() < f64::EPSILON);
        assert!((wgt.clad_width() - 10.0).abs() < f64::EPSILON);
        assert_eq!(wgt.resist_polarity(), ResistPolarity::EtchNegative);
        assert_eq!(wgt.layer(), LayerSpec::new(1, 2));
        assert!(wgt.check_widths().is_ok());
    }

    #[test]
    fn ut_wg_005_check_widths_rejects_zero_width() {
        let wgt = WaveguideTemplate {
            wg_width: 0.0,
            ..WaveguideTemplate::default()
        };
        assert!(matches!(
            wgt.check_widths(),
            Err(GratingError::InvalidParameter(_))
        ));
    }
}
