//! Perspective camera used for pointer unprojection

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_Z};

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero, negative or NaN sizes can't be normalized against
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_valid() {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Perspective camera (OpenGL clip conventions, looks down -Z by default)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, CAMERA_Z),
            orientation: Quat::IDENTITY,
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            aspect: Viewport::default().aspect(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl Camera {
    pub fn new(fov_degrees: f32, camera_z: f32, viewport: Viewport) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, camera_z),
            fov_y: fov_degrees.to_radians(),
            aspect: viewport.aspect(),
            ..Default::default()
        }
    }

    /// Boundary-only reconfiguration; never call mid-tick
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_valid() {
            self.aspect = viewport.aspect();
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    /// World-to-view transform
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// Map a normalized-device-coordinate point back into world space
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        (self.projection() * self.view()).inverse().project_point3(ndc)
    }
}
