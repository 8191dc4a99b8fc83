#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::indexing_slicing)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `picgrate` WASM module: parametric grating coupler layout for photonic
//! integrated circuits, with a triangulated preview mesh for WebGL.

pub mod coupler;
pub mod error;
pub mod geometry;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::coupler::ids::SequentialIds;
use crate::coupler::spec::CouplerOptions;
use crate::coupler::{CouplerMeta, GratingCouplerBuilder};
use crate::error::GratingError;
use crate::geometry::types::saturate_u32;
use crate::geometry::{GeometryBuilder, LayerGeometry, Polygon};

thread_local! {
    static LAST_GEOMETRY: RefCell<Option<LayerGeometry>> = const { RefCell::new(None) };
    static LAST_POLYGONS: RefCell<Vec<Polygon>> = const { RefCell::new(Vec::new()) };
    static CELL_IDS: RefCell<SequentialIds> = const { RefCell::new(SequentialIds::starting_at(0)) };
}

fn store_device(geom: LayerGeometry, polygons: Vec<Polygon>) {
    LAST_GEOMETRY.with(|g| {
        *g.borrow_mut() = Some(geom);
    });
    LAST_POLYGONS.with(|p| {
        *p.borrow_mut() = polygons;
    });
}

#[cfg(target_arch = "wasm32")]
fn forward_warnings(warnings: &[String]) {
    for msg in warnings {
        web_sys::console::warn_1(&JsValue::from_str(msg));
    }
}

#[cfg(not(target_arch = "wasm32"))]
const fn forward_warnings(_warnings: &[String]) {}

/// Initialize the WASM module. Sets up the panic hook for debugging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Build a grating coupler from a JavaScript option object.
///
/// Every option is optional; see [`CouplerOptions`] for names and defaults.
/// Returns [`CouplerMeta`] as a `JsValue` via `serde-wasm-bindgen`.
/// The preview mesh and layout polygons are stored internally; retrieve them
/// with [`get_positions`], [`get_indices`] and [`get_polygons`].
///
/// # Errors
///
/// Returns a descriptive error string if the options cannot be decoded or
/// describe an invalid or degenerate grating.
#[wasm_bindgen]
pub fn build_grating_coupler(options: JsValue) -> Result<JsValue, JsValue> {
    let options: CouplerOptions = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&GratingError::Config(e.to_string()).to_string()))?;
    let meta = build_grating_coupler_internal(&options).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&meta).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Internal build logic shared between the wasm export and native tests.
#[doc(hidden)]
pub fn build_grating_coupler_internal(options: &CouplerOptions) -> Result<CouplerMeta, String> {
    let builder = GratingCouplerBuilder::new(options.grating_spec())
        .port(options.port)
        .direction(options.direction);

    let coupler = match &options.name {
        Some(name) => builder.build(&options.waveguide, name.clone()),
        None => CELL_IDS.with(|ids| builder.build_with_ids(&options.waveguide, &mut *ids.borrow_mut())),
    }
    .map_err(|e| e.to_string())?;

    let mut mesh = GeometryBuilder::new();
    coupler.add_to(&mut mesh).map_err(|e| e.to_string())?;
    let geom = mesh.build();

    let mut warnings = coupler.warnings().to_vec();
    warnings.extend(geom.warnings.iter().cloned());
    forward_warnings(&warnings);

    let polygons: Vec<Polygon> = coupler.polygons().cloned().collect();
    let meta = CouplerMeta {
        name: coupler.name().to_string(),
        bounds: coupler.bounds(),
        polygon_count: saturate_u32(polygons.len()),
        vertex_count: geom.vertex_count,
        index_count: saturate_u32(geom.indices.len()),
        num_teeth: saturate_u32(coupler.num_teeth()),
        mode: coupler.mode(),
        output: coupler.output_port(),
        layer: coupler.layer(),
        warning_count: saturate_u32(warnings.len()),
        warnings,
    };

    store_device(geom, polygons);

    Ok(meta)
}

/// Retrieve the position buffer for the last built device.
///
/// Returns a copy of the interleaved `[x0, y0, x1, y1, ...]` positions.
/// Returns an empty array if nothing has been built yet.
#[wasm_bindgen]
pub fn get_positions() -> Vec<f32> {
    LAST_GEOMETRY.with(|g| {
        g.borrow()
            .as_ref()
            .map_or_else(Vec::new, |geom| geom.positions.clone())
    })
}

/// Retrieve the index buffer for the last built device.
///
/// Returns a copy of the triangle-list indices.
/// Returns an empty array if nothing has been built yet.
#[wasm_bindgen]
pub fn get_indices() -> Vec<u32> {
    LAST_GEOMETRY.with(|g| {
        g.borrow()
            .as_ref()
            .map_or_else(Vec::new, |geom| geom.indices.clone())
    })
}

/// Retrieve the layout polygons of the last built device.
///
/// Returns one `Float64Array` of flat `[x0, y0, x1, y1, ...]` coordinates per
/// polygon, teeth first and the taper last.
#[wasm_bindgen]
pub fn get_polygons() -> js_sys::Array {
    polygon_coords_internal()
        .iter()
        .map(|coords| js_sys::Float64Array::from(coords.as_slice()))
        .collect()
}

/// Flat polygon coordinates behind [`get_polygons`], for native callers.
#[doc(hidden)]
pub fn polygon_coords_internal() -> Vec<Vec<f64>> {
    LAST_POLYGONS.with(|p| p.borrow().iter().map(Polygon::flat_coords).collect())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_build_default_coupler() {
        let meta = build_grating_coupler_internal(&CouplerOptions::default());
        assert!(meta.is_ok());
        assert_eq!(get_polygons().length(), 54);
    }
}
