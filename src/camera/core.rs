use glam::{Mat4, Vec3};

/// Projection parameters. The picker accepts either kind; the active one is
/// selected by the embedding editor based on its current view mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fovy: f32,
        /// Viewport aspect ratio (width / height).
        aspect: f32,
        /// Near clipping plane distance.
        znear: f32,
        /// Far clipping plane distance.
        zfar: f32,
    },
    /// Orthographic projection.
    Orthographic {
        /// Half of the vertical view extent in world units.
        half_height: f32,
        /// Viewport aspect ratio (width / height).
        aspect: f32,
        /// Near clipping plane distance.
        znear: f32,
        /// Far clipping plane distance.
        zfar: f32,
    },
}

impl Projection {
    /// Build the projection matrix.
    ///
    /// Both variants use the `_rh` glam constructors, which already target
    /// the wgpu/Vulkan [0,1] clip-space depth range.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective {
                fovy,
                aspect,
                znear,
                zfar,
            } => Mat4::perspective_rh(fovy, aspect, znear, zfar),
            Self::Orthographic {
                half_height,
                aspect,
                znear,
                zfar,
            } => {
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    znear,
                    zfar,
                )
            }
        }
    }

    /// Far clipping plane distance (used by the depth-encode shader).
    pub fn far(&self) -> f32 {
        match *self {
            Self::Perspective { zfar, .. } | Self::Orthographic { zfar, .. } => {
                zfar
            }
        }
    }
}

/// Camera defined by eye position, target, up vector, and projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Active projection parameters.
    pub projection: Projection,
}

impl Camera {
    /// World-to-view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View-to-world matrix (the camera's world transform). Used to carry
    /// reconstructed view-space points back into world space.
    pub fn world_matrix(&self) -> Mat4 {
        self.view().inverse()
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection.matrix() * self.view()
    }

    /// Far clipping plane distance.
    pub fn far(&self) -> f32 {
        self.projection.far()
    }
}

/// GPU uniform buffer shared by the id and depth picking passes.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// World-to-view matrix (the depth pass needs view-space z).
    pub view: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Far clipping plane distance for depth normalization.
    pub far: f32,
}

impl CameraUniform {
    /// Build the uniform contents from the given camera.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            position: camera.eye.to_array(),
            far: camera.far(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 5.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Projection::Perspective {
                fovy: std::f32::consts::FRAC_PI_4,
                aspect: 1.6,
                znear: 0.1,
                zfar: 100.0,
            },
        }
    }

    #[test]
    fn world_matrix_inverts_view() {
        let camera = test_camera();
        let round_trip = camera.world_matrix() * camera.view();
        let identity = Mat4::IDENTITY;
        for (a, b) in round_trip
            .to_cols_array()
            .iter()
            .zip(identity.to_cols_array().iter())
        {
            assert!((a - b).abs() < 1e-5, "expected identity, got {round_trip}");
        }
    }

    #[test]
    fn eye_maps_to_view_origin() {
        let camera = test_camera();
        let origin = camera.view().transform_point3(camera.eye);
        assert!(origin.length() < 1e-5);
    }

    #[test]
    fn orthographic_far_reported() {
        let projection = Projection::Orthographic {
            half_height: 10.0,
            aspect: 1.0,
            znear: 0.1,
            zfar: 500.0,
        };
        assert_eq!(projection.far(), 500.0);
    }
}
