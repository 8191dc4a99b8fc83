//! Straight grating: a linear taper followed by a row of rectangular teeth.
//!
//! Geometry is authored facing `+y` from the port.

use crate::geometry::path::Path;
use crate::geometry::step_repeat::rectangle_row;
use crate::geometry::types::{LayerSpec, Point};

use super::spec::GratingSpec;
use super::waveguide::{ResistPolarity, WaveguideInterface};
use super::{TaperPath, Tooth, ToothGeometry};

/// Builds the taper and tooth row of a straight grating.
///
/// Negative resist draws the core: one path widening from the core width to
/// the grating width. Positive resist draws the two cladding trenches, which
/// spread apart over the taper and then run alongside the grating region.
/// In both cases each drawn rectangle covers the drawn fraction of its
/// period and the first one starts where the taper ends.
pub fn build_straight<W: WaveguideInterface + ?Sized>(
    spec: &GratingSpec,
    wgt: &W,
    port: Point,
) -> (TaperPath, ToothGeometry) {
    let layer = wgt.layer();
    let resist = wgt.resist_polarity();

    let taper = match resist {
        ResistPolarity::EtchNegative => {
            let mut path = Path::new(wgt.core_width(), port, layer);
            path.segment(spec.taper_length, Some(spec.width), None);
            path
        }
        ResistPolarity::EtchPositive => {
            let mut path = Path::new(wgt.clad_width(), port, layer)
                .with_rails(2, wgt.core_width() + wgt.clad_width());
            path.segment(
                spec.taper_length,
                None,
                Some(spec.width + wgt.clad_width()),
            );
            path.segment(spec.length, None, None);
            path
        }
    };

    let drawn = resist.drawn_fraction(spec.dutycycle);
    let teeth = tooth_row(spec, port, drawn, layer);

    (
        TaperPath {
            polygons: taper.into_polygons(),
        },
        teeth,
    )
}

/// Centre line of the tooth row, measured from the port along `+y`.
///
/// Places the first tooth's near edge at the end of the taper regardless of
/// the number of teeth.
pub fn row_centre_offset(spec: &GratingSpec, drawn_fraction: f64) -> f64 {
    let n = f64::from(spec.num_teeth());
    (0.5 * (n - 1.0 + drawn_fraction)).mul_add(spec.period, spec.taper_length)
}

fn tooth_row(spec: &GratingSpec, port: Point, drawn: f64, layer: LayerSpec) -> ToothGeometry {
    let start = Point::new(
        port.x - 0.5 * spec.width,
        port.y + row_centre_offset(spec, drawn),
    );
    let rects = rectangle_row(
        start,
        spec.width,
        spec.period * drawn,
        spec.num_teeth(),
        spec.period,
        layer,
    );
    ToothGeometry {
        teeth: (0_u32..)
            .zip(rects)
            .map(|(order, rect)| Tooth {
                order,
                polygons: vec![rect],
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::coupler::waveguide::WaveguideTemplate;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn template(resist: ResistPolarity) -> WaveguideTemplate {
        WaveguideTemplate {
            wg_width: 0.5,
            clad_width: 3.0,
            resist,
            layer: 4,
            datatype: 0,
        }
    }

    fn spec(dutycycle: f64) -> GratingSpec {
        GratingSpec {
            dutycycle,
            ..GratingSpec::default()
        }
    }

    #[test]
    fn ut_stg_001_negative_taper_widens_to_grating() {
        let (taper, _) = build_straight(
            &spec(0.7),
            &template(ResistPolarity::EtchNegative),
            Point::new(0.0, 0.0),
        );
        assert_eq!(taper.polygons.len(), 1);
        let b = taper.polygons[0].bounds();
        assert_close(b.min_y, 0.0);
        assert_close(b.max_y, 20.0);
        assert_close(b.width(), 20.0);
        assert_close(taper.polygons[0].points[0].x, 0.25);
        assert_eq!(taper.polygons[0].layer, LayerSpec::new(4, 0));
    }

    #[test]
    fn ut_stg_002_negative_teeth_use_dutycycle() {
        let (_, teeth) = build_straight(
            &spec(0.7),
            &template(ResistPolarity::EtchNegative),
            Point::new(0.0, 0.0),
        );
        assert_eq!(teeth.len(), 50);

        let first = teeth.teeth[0].polygons[0].bounds();
        let second = teeth.teeth[1].polygons[0].bounds();
        assert_close(first.height(), 0.7);
        assert_close(first.width(), 20.0);
        assert_close(first.min_x, -10.0);
        assert_close(first.min_y, 20.0);
        assert_close(second.min_y - first.min_y, 1.0);

        let last = teeth.teeth[49].polygons[0].bounds();
        let centre = (first.min_y + last.max_y) / 2.0;
        assert_close(centre, 0.5f64.mul_add(49.0 + 0.7, 20.0));
    }

    #[test]
    fn ut_stg_003_positive_rails_then_straight_run() {
        let (taper, _) = build_straight(
            &spec(0.7),
            &template(ResistPolarity::EtchPositive),
            Point::new(0.0, 0.0),
        );
        assert_eq!(taper.polygons.len(), 4);

        let first_right = taper.polygons[0].bounds();
        assert_close(first_right.min_x, 0.25);
        assert_close(first_right.max_x, 13.0);
        let run_left = taper.polygons[3].bounds();
        assert_close(run_left.min_y, 20.0);
        assert_close(run_left.max_y, 70.0);
        assert_close(run_left.min_x, -13.0);
        assert_close(run_left.max_x, -10.0);
    }

    #[test]
    fn ut_stg_004_positive_teeth_use_gap_width() {
        let (_, teeth) = build_straight(
            &spec(0.7),
            &template(ResistPolarity::EtchPositive),
            Point::new(0.0, 0.0),
        );
        assert_eq!(teeth.len(), 50);
        let first = teeth.teeth[0].polygons[0].bounds();
        assert_close(first.height(), 0.3);
        assert_close(first.min_y, 20.0);
        assert_close(row_centre_offset(&spec(0.7), 0.3), 0.5f64.mul_add(49.3, 20.0));
    }

    #[test]
    fn ut_stg_005_port_offset_translates_everything() {
        let port = Point::new(100.0, -40.0);
        let (taper, teeth) = build_straight(
            &spec(0.5),
            &template(ResistPolarity::EtchNegative),
            port,
        );
        assert_close(taper.polygons[0].bounds().min_y, -40.0);
        assert_close(teeth.teeth[0].polygons[0].bounds().min_x, 90.0);
        assert_close(teeth.teeth[0].polygons[0].bounds().min_y, -20.0);
    }

    #[test]
    fn ut_stg_006_short_grating_has_no_teeth() {
        let short = GratingSpec {
            length: 0.9,
            ..GratingSpec::default()
        };
        let (taper, teeth) = build_straight(
            &short,
            &template(ResistPolarity::EtchNegative),
            Point::new(0.0, 0.0),
        );
        assert!(teeth.is_empty());
        assert_eq!(taper.polygons.len(), 1);
    }
}
