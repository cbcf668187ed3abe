//! GPU object picking.
//!
//! Recovers object identity and 3D world position from a 2D cursor by
//! rendering the scene twice into offscreen targets and reading back the
//! single texel under the cursor:
//!
//! 1. an id pass drawing each object flat in its encoded pick id color,
//! 2. a depth pass packing view-space depth into 24 bits of RGB.
//!
//! A decoded id of zero means the cursor is over the background; the world
//! position then falls back to the ray's intersection with the ground
//! plane (y = 0).

mod decode;
mod id_alloc;
mod mesh_cache;
mod picker;
mod result;
mod unproject;

pub use decode::{decode_depth, decode_id, encode_id_color, pack_depth};
pub use id_alloc::PickIdAllocator;
pub use mesh_cache::{GpuMesh, MeshCache};
pub use picker::{GpuPicker, SelectMode};
pub use result::PickResult;
pub use unproject::{ndc_from_pixel, PickRay};
