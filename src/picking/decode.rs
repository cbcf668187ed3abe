//! Pixel codecs shared between the WGSL passes and the CPU readback path.
//!
//! Pick ids are encoded as 24-bit RGB colors, one byte per channel, so a
//! readback of the `Rgba8Unorm` target recovers the id exactly. Depth is
//! packed the same way: view-space |z| normalized by the camera far plane,
//! scaled to the full 24-bit range, with the sign of view z in alpha.

/// Largest value representable in 24 bits; the depth packing range.
const DEPTH_SCALE: f32 = 16_777_215.0;

/// Encode a pick id into the RGBA color the id pass draws with. Alpha is
/// forced to 1 so id zero (reserved for the background) is never drawn.
#[must_use]
pub fn encode_id_color(id: u32) -> [f32; 4] {
    let r = (id >> 16) & 0xff;
    let g = (id >> 8) & 0xff;
    let b = id & 0xff;
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Decode a pick id from a readback pixel. Zero means background.
#[must_use]
pub fn decode_id(pixel: [u8; 4]) -> u32 {
    u32::from(pixel[0]) * 65536 + u32::from(pixel[1]) * 256 + u32::from(pixel[2])
}

/// CPU mirror of the depth pass packing: `view_z` (negative in front of
/// the camera) normalized by `far` into 24 bits of RGB, sign in alpha.
#[must_use]
pub fn pack_depth(view_z: f32, far: f32) -> [u8; 4] {
    let depth = (view_z.abs() / far).clamp(0.0, 1.0);
    let scaled = (depth * DEPTH_SCALE).round() as u32;
    let r = (scaled >> 16) & 0xff;
    let g = (scaled >> 8) & 0xff;
    let b = scaled & 0xff;
    let a = if view_z < 0.0 { 255 } else { 0 };
    [r as u8, g as u8, b as u8, a]
}

/// Decode a depth pixel back into view-space z. Returns `None` when the
/// RGB channels are all zero, which the depth pass reserves for the cleared
/// background.
#[must_use]
pub fn decode_depth(pixel: [u8; 4], far: f32) -> Option<f32> {
    let [r, g, b, a] = pixel;
    if r == 0 && g == 0 && b == 0 {
        return None;
    }
    let scaled =
        u32::from(r) * 65536 + u32::from(g) * 256 + u32::from(b);
    let depth = scaled as f32 / DEPTH_SCALE;
    let magnitude = depth * far;
    // alpha >= 128 marks a fragment in front of the camera (negative view z)
    Some(if a >= 128 { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn id_survives_color_round_trip() {
        for id in [1_u32, 2, 255, 256, 65535, 65536, 0x00ab_cdef] {
            let color = encode_id_color(id);
            let pixel = [
                (color[0] * 255.0).round() as u8,
                (color[1] * 255.0).round() as u8,
                (color[2] * 255.0).round() as u8,
                255,
            ];
            assert_eq!(decode_id(pixel), id);
        }
    }

    #[test]
    fn background_pixel_decodes_to_zero() {
        assert_eq!(decode_id([0, 0, 0, 0]), 0);
    }

    #[test]
    fn depth_round_trips_within_quantization() {
        let far = 1000.0;
        for view_z in [-0.5_f32, -10.0, -123.456, -999.0] {
            let pixel = pack_depth(view_z, far);
            let decoded = decode_depth(pixel, far).unwrap();
            // 24-bit quantization over [0, far]
            assert!((decoded - view_z).abs() < far / DEPTH_SCALE * 2.0);
        }
    }

    #[test]
    fn depth_sign_is_carried_in_alpha() {
        let far = 100.0;
        let in_front = pack_depth(-50.0, far);
        assert_eq!(in_front[3], 255);
        assert!(decode_depth(in_front, far).unwrap() < 0.0);

        let behind = pack_depth(50.0, far);
        assert_eq!(behind[3], 0);
        assert!(decode_depth(behind, far).unwrap() > 0.0);
    }

    #[test]
    fn cleared_depth_pixel_is_background() {
        assert_eq!(decode_depth([0, 0, 0, 0], 100.0), None);
    }
}
