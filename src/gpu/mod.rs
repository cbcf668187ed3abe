//! GPU infrastructure: device/queue ownership, shader composition, dynamic
//! buffers, and pixel readback.

pub mod dynamic_buffer;
pub mod readback;
pub mod render_context;
pub mod shader_composer;
