//! Blocking single-pixel readback from a staging buffer.
//!
//! Picking copies one texel into a 256-byte staging buffer (the minimum
//! `bytes_per_row` alignment), then maps it and reads the first four bytes.
//! The map is resolved with a blocking device poll; on native this costs one
//! queue drain, acceptable at picking's throttled cadence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::StagehandError;

/// Map the first four bytes of `staging` and return them.
///
/// The staging buffer must have `MAP_READ` usage and the copy writing it
/// must already be submitted.
///
/// # Errors
///
/// Returns [`StagehandError::Readback`] if the device poll fails or the map
/// callback reports an error.
pub fn read_pixel(
    device: &wgpu::Device,
    staging: &wgpu::Buffer,
) -> Result<[u8; 4], StagehandError> {
    let map_ok = Arc::new(AtomicBool::new(false));
    let map_ok_cb = Arc::clone(&map_ok);

    let slice = staging.slice(..4);
    slice.map_async(wgpu::MapMode::Read, move |result| {
        if result.is_ok() {
            map_ok_cb.store(true, Ordering::SeqCst);
        }
    });

    let _ = device
        .poll(wgpu::PollType::Wait)
        .map_err(|e| StagehandError::Readback(format!("device poll: {e}")))?;

    if !map_ok.load(Ordering::SeqCst) {
        return Err(StagehandError::Readback(
            "staging buffer map failed".to_owned(),
        ));
    }

    let pixel = {
        let data = slice.get_mapped_range();
        [data[0], data[1], data[2], data[3]]
    };
    staging.unmap();
    Ok(pixel)
}
