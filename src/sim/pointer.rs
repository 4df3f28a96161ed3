//! Pointer projection
//!
//! Client pixel coordinates are normalized to device space, cast as a ray
//! from the camera and intersected with a fixed world-z plane. That hit is
//! the interaction point the fragment field reacts to.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::camera::{Camera, Viewport};

/// Ray z-components below this are treated as parallel to the plane
const PARALLEL_EPSILON: f32 = 1e-4;

/// Result of the last projection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionOutcome {
    /// World point updated
    Hit,
    /// Ray parallel to the depth plane; world point retained
    NoIntersection,
    /// Plane lies behind the camera; world point retained
    BehindCamera,
    /// Viewport has no area; nothing updated
    InvalidViewport,
}

/// Pointer state, mutated only by [`PointerState::update`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// Normalized device coordinates, y up, in [-1, 1]
    pub device: Vec2,
    /// Interaction point in world space
    pub world: Vec3,
    pub outcome: ProjectionOutcome,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            device: Vec2::ZERO,
            world: Vec3::ZERO,
            outcome: ProjectionOutcome::Hit,
        }
    }
}

/// Client pixels (origin top-left, y down) to device coordinates
#[inline]
pub fn client_to_device(client: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (client.x / viewport.width) * 2.0 - 1.0,
        -(client.y / viewport.height) * 2.0 + 1.0,
    )
}

impl PointerState {
    /// Project a client-space pointer position onto the plane `z = plane_z`
    pub fn update(
        &mut self,
        client: Vec2,
        viewport: Viewport,
        camera: &Camera,
        plane_z: f32,
    ) -> ProjectionOutcome {
        self.outcome = if viewport.is_valid() {
            self.device = client_to_device(client, viewport);
            self.project(camera, plane_z)
        } else {
            ProjectionOutcome::InvalidViewport
        };

        if self.outcome != ProjectionOutcome::Hit {
            log::debug!("pointer projection skipped: {:?}", self.outcome);
        }
        self.outcome
    }

    /// Re-cast the current device coordinates (after a camera change)
    pub fn reproject(&mut self, camera: &Camera, plane_z: f32) -> ProjectionOutcome {
        self.outcome = self.project(camera, plane_z);
        self.outcome
    }

    fn project(&mut self, camera: &Camera, plane_z: f32) -> ProjectionOutcome {
        let on_ray = camera.unproject(self.device.extend(0.5));
        let dir = (on_ray - camera.position).normalize_or_zero();

        if dir.z.abs() < PARALLEL_EPSILON {
            return ProjectionOutcome::NoIntersection;
        }

        let distance = (plane_z - camera.position.z) / dir.z;
        if !distance.is_finite() || distance <= 0.0 {
            return ProjectionOutcome::BehindCamera;
        }

        self.world = camera.position + dir * distance;
        ProjectionOutcome::Hit
    }
}
