//! Integration tests for the native twin of the wasm export and the mesh buffers.

use picgrate_wasm::coupler::port::Direction;
use picgrate_wasm::coupler::spec::CouplerOptions;
use picgrate_wasm::coupler::waveguide::{ResistPolarity, WaveguideTemplate};
use picgrate_wasm::geometry::Point;
use picgrate_wasm::{
    build_grating_coupler_internal, get_indices, get_positions, polygon_coords_internal,
};

/// Default options → positions.len() == vertex_count * 2 and every index in range.
#[test]
#[allow(clippy::expect_used)]
fn default_coupler_mesh_invariants() {
    let meta = build_grating_coupler_internal(&CouplerOptions::default())
        .expect("default options should build");
    assert!(meta.vertex_count > 0, "should produce geometry");

    let positions = get_positions();
    let indices = get_indices();

    assert_eq!(
        positions.len(),
        meta.vertex_count as usize * 2,
        "positions length should match vertex_count * 2"
    );
    assert_eq!(indices.len(), meta.index_count as usize);
    assert_eq!(indices.len() % 3, 0, "indices form a triangle list");

    let max_idx = positions.len() / 2;
    for idx in &indices {
        assert!(
            (*idx as usize) < max_idx,
            "index {idx} out of bounds for {max_idx} vertices"
        );
    }
}

/// Focusing options → every polygon fits the vertex cap and lies inside the reported bounds.
#[test]
#[allow(clippy::expect_used)]
fn focusing_polygons_within_bounds() {
    let options = CouplerOptions {
        focus_distance: Some(25.0),
        max_points: 40,
        port: Point::new(-10.0, 4.0),
        direction: Direction::South,
        waveguide: WaveguideTemplate {
            resist: ResistPolarity::EtchNegative,
            ..WaveguideTemplate::default()
        },
        ..CouplerOptions::default()
    };
    let meta = build_grating_coupler_internal(&options).expect("focusing options should build");
    let polygons = polygon_coords_internal();
    assert_eq!(polygons.len(), meta.polygon_count as usize);
    assert!(
        meta.warnings.iter().any(|w| w.contains("fractured")),
        "a 40 point cap should fracture the curved teeth"
    );

    for coords in &polygons {
        assert_eq!(coords.len() % 2, 0);
        assert!(coords.len() / 2 <= 40, "polygon exceeds vertex cap");
        for pair in coords.chunks_exact(2) {
            if let [x, y] = pair {
                assert!(*x >= meta.bounds.min_x - 1e-9 && *x <= meta.bounds.max_x + 1e-9);
                assert!(*y >= meta.bounds.min_y - 1e-9 && *y <= meta.bounds.max_y + 1e-9);
            }
        }
    }
    assert!((meta.bounds.max_y - 4.0).abs() < 1e-9, "south-facing device ends at the port");
    assert_eq!(meta.output.direction, Direction::North);
}

/// Too-short grating → zero teeth, a warning, and taper-only output.
#[test]
#[allow(clippy::expect_used)]
fn short_grating_warns() {
    let options = CouplerOptions {
        length: 0.4,
        ..CouplerOptions::default()
    };
    let meta = build_grating_coupler_internal(&options).expect("short grating still builds");
    assert_eq!(meta.num_teeth, 0);
    assert_eq!(meta.warning_count, 1);
    assert_eq!(meta.polygon_count, 4, "cladding rails only");
}

/// Degenerate focus → error string, buffers untouched from the previous build.
#[test]
#[allow(clippy::expect_used)]
fn degenerate_focus_keeps_previous_buffers() {
    build_grating_coupler_internal(&CouplerOptions::default()).expect("default options should build");
    let before = get_indices();

    let options = CouplerOptions {
        focus_distance: Some(1.0),
        ..CouplerOptions::default()
    };
    let result = build_grating_coupler_internal(&options);
    assert!(result.is_err(), "focus shorter than the grating half-width should fail");
    assert_eq!(get_indices(), before);
}
