//! In-crate geometry kernel: points and polygons, extruded paths, rectangle
//! rows, rotation, fracturing, and triangulation into preview meshes.

pub mod fracture;
pub mod layout;
pub mod path;
pub mod region;
pub mod step_repeat;
pub mod transform;
pub mod types;

pub use fracture::*;
pub use layout::*;
pub use path::*;
pub use region::*;
pub use step_repeat::*;
pub use transform::*;
pub use types::*;
