use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective camera for the 3D view.
/// Gameplay never reads it; it only tracks the viewport and produces matrices.
pub struct Camera3D {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width in CSS pixels.
    pub viewport_width: f32,
    /// Viewport height in CSS pixels.
    pub viewport_height: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl Camera3D {
    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 20.0),
            target: Vec3::ZERO,
            fov_y,
            near,
            far,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }

    /// Width over height of the current viewport.
    pub fn aspect(&self) -> f32 {
        self.viewport_width / self.viewport_height
    }

    /// Resize the viewport (e.g. on window resize).
    /// Degenerate sizes are ignored so the projection never divides by zero.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            log::warn!("Camera3D: ignoring viewport resize to {}x{}", width, height);
            return false;
        }
        self.viewport_width = width;
        self.viewport_height = height;
        true
    }

    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        self.target = target;
    }

    /// Right-handed view matrix, Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Right-handed perspective projection, Z in [0, 1].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: (self.projection_matrix() * self.view_matrix()).to_cols_array_2d(),
        }
    }
}
