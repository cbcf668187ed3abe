//! Cursor-to-ray math.
//!
//! The readback gives a depth along the view axis, not a full position, so
//! the world point is recovered by unprojecting the cursor pixel to a ray
//! and interpolating between its near and far ends at that depth. wgpu
//! clip space puts the near plane at NDC z = 0 and the far plane at z = 1.

use glam::Vec3;

use crate::camera::core::Camera;

const PLANE_EPSILON: f32 = 1e-6;

/// Convert a pixel coordinate (top-left origin) to NDC x/y, sampling the
/// pixel center. Coordinates outside the viewport clamp to the edge.
#[must_use]
pub fn ndc_from_pixel(pixel: (u32, u32), size: (u32, u32)) -> (f32, f32) {
    let (width, height) = (size.0.max(1), size.1.max(1));
    let x = pixel.0.min(width - 1);
    let y = pixel.1.min(height - 1);
    let ndc_x = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
    // pixel rows grow downward, NDC y grows upward
    let ndc_y = 1.0 - (y as f32 + 0.5) / height as f32 * 2.0;
    (ndc_x, ndc_y)
}

/// The cursor ray through a pixel, as matching near/far point pairs in
/// view and world space.
#[derive(Debug, Clone, Copy)]
pub struct PickRay {
    /// Ray start on the near plane, view space.
    pub near_view: Vec3,
    /// Ray end on the far plane, view space.
    pub far_view: Vec3,
    /// Ray start on the near plane, world space.
    pub near_world: Vec3,
    /// Ray end on the far plane, world space.
    pub far_world: Vec3,
}

impl PickRay {
    /// The ray through `pixel` for the given camera and viewport size.
    #[must_use]
    pub fn from_camera(
        camera: &Camera,
        pixel: (u32, u32),
        size: (u32, u32),
    ) -> Self {
        let (ndc_x, ndc_y) = ndc_from_pixel(pixel, size);
        let inv_proj = camera.projection.matrix().inverse();
        let near_view = inv_proj.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far_view = inv_proj.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        let world = camera.world_matrix();
        Self {
            near_view,
            far_view,
            near_world: world.transform_point3(near_view),
            far_world: world.transform_point3(far_view),
        }
    }

    /// The world-space point on this ray at the given view-space z
    /// (negative in front of the camera). The interpolation factor is
    /// affine, so it transfers directly from view to world space.
    #[must_use]
    pub fn world_point_at_view_z(&self, view_z: f32) -> Vec3 {
        let span = self.far_view.z - self.near_view.z;
        if span.abs() < PLANE_EPSILON {
            return self.near_world;
        }
        let t = (view_z - self.near_view.z) / span;
        self.near_world.lerp(self.far_world, t)
    }

    /// Where this ray crosses the ground plane (y = 0) in world space, or
    /// `None` when the ray runs parallel to it.
    #[must_use]
    pub fn ground_plane_point(&self) -> Option<Vec3> {
        let dy = self.far_world.y - self.near_world.y;
        if dy.abs() < PLANE_EPSILON {
            return None;
        }
        let t = -self.near_world.y / dy;
        Some(self.near_world.lerp(self.far_world, t))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::camera::core::Projection;

    fn forward_camera() -> Camera {
        Camera {
            eye: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            projection: Projection::Perspective {
                fovy: std::f32::consts::FRAC_PI_4,
                aspect: 1.0,
                znear: 0.1,
                zfar: 100.0,
            },
        }
    }

    #[test]
    fn center_pixel_is_ndc_origin() {
        let (x, y) = ndc_from_pixel((50, 50), (100, 100));
        assert!(x.abs() < 0.02);
        assert!(y.abs() < 0.02);
    }

    #[test]
    fn pixel_y_flips_into_ndc() {
        let (_, top) = ndc_from_pixel((0, 0), (100, 100));
        let (_, bottom) = ndc_from_pixel((0, 99), (100, 100));
        assert!(top > 0.9);
        assert!(bottom < -0.9);
    }

    #[test]
    fn out_of_bounds_pixels_clamp() {
        let (x, _) = ndc_from_pixel((500, 0), (100, 100));
        let (edge_x, _) = ndc_from_pixel((99, 0), (100, 100));
        assert_eq!(x, edge_x);
    }

    #[test]
    fn center_ray_spans_near_to_far() {
        let camera = forward_camera();
        let ray = PickRay::from_camera(&camera, (50, 50), (100, 100));
        assert!((ray.near_view.z - -0.1).abs() < 1e-3);
        assert!((ray.far_view.z - -100.0).abs() < 0.1);
        // camera sits at the origin looking down -z, so world == view
        assert!((ray.far_world.z - -100.0).abs() < 0.1);
    }

    #[test]
    fn depth_interpolation_recovers_view_z() {
        let camera = forward_camera();
        let ray = PickRay::from_camera(&camera, (50, 50), (100, 100));
        let point = ray.world_point_at_view_z(-25.0);
        assert!((point.z - -25.0).abs() < 0.05);
    }

    #[test]
    fn ground_plane_hit_from_above() {
        let camera = Camera {
            eye: Vec3::new(0.0, 5.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fovy: std::f32::consts::FRAC_PI_4,
                aspect: 1.0,
                znear: 0.1,
                zfar: 100.0,
            },
        };
        let ray = PickRay::from_camera(&camera, (50, 50), (100, 100));
        let point = ray.ground_plane_point().unwrap();
        // the center ray passes through the look-at target at the origin
        assert!(point.length() < 0.05);
        assert!(point.y.abs() < 1e-3);
    }

    #[test]
    fn horizontal_ray_misses_ground_plane() {
        let camera = Camera {
            eye: Vec3::new(0.0, 5.0, 0.0),
            target: Vec3::new(0.0, 5.0, -1.0),
            up: Vec3::Y,
            projection: Projection::Perspective {
                fovy: std::f32::consts::FRAC_PI_4,
                aspect: 1.0,
                znear: 0.1,
                zfar: 100.0,
            },
        };
        let ray = PickRay::from_camera(&camera, (50, 50), (100, 100));
        assert_eq!(ray.ground_plane_point(), None);
    }
}
