//! Scene state and registration
//!
//! Everything the per-tick update reads or writes lives in one
//! `SceneState`, passed by `&mut` into [`super::tick`]. No globals.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::animator::{AnimatedObject, AnimatedSpec};
use super::camera::{Camera, Viewport};
use super::fragment::{FieldParams, FragmentField, GeometryHandle};
use super::pointer::PointerState;
use super::scroll::ScrollState;
use super::text::{TextRig, TextRole};
use crate::tuning::Tuning;

/// Position, XYZ Euler rotation and scale of a rendered object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    /// Radians, applied in X then Y then Z order
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }
}

/// Complete per-frame state of the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    pub tuning: Tuning,
    pub scroll: ScrollState,
    pub pointer: PointerState,
    pub camera: Camera,
    pub viewport: Viewport,
    pub fragments: FragmentField,
    pub objects: Vec<AnimatedObject>,
    pub text: TextRig,
    /// Spin shared by fragments (direct-mapped from scroll)
    pub fragment_rotation_y: f32,
    /// Time uniform fed to the firing function
    pub firing_time: f32,
    /// Ticks since start
    pub ticks: u64,
    /// Fragments repelled on the last tick
    pub repelled: usize,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(Tuning::default(), Viewport::default())
    }
}

impl SceneState {
    pub fn new(tuning: Tuning, viewport: Viewport) -> Self {
        let camera = Camera::new(tuning.fov_degrees, tuning.camera_z, viewport);
        Self {
            tuning,
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
            camera,
            viewport,
            fragments: FragmentField::new(),
            objects: Vec::new(),
            text: TextRig::default(),
            fragment_rotation_y: 0.0,
            firing_time: 0.0,
            ticks: 0,
            repelled: 0,
        }
    }

    /// Force parameters for the fragment field, read from the current tuning
    pub fn field_params(&self) -> FieldParams {
        FieldParams::from(&self.tuning)
    }

    /// Swap tuning at a tick boundary
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        self.camera.fov_y = tuning.fov_degrees.to_radians();
        self.camera.position.z = tuning.camera_z;
        for object in &mut self.objects {
            object.retune(&tuning);
        }
        self.tuning = tuning;
        log::info!("Tuning applied");
    }

    /// Boundary-only viewport change
    pub fn resize(&mut self, viewport: Viewport, document_height: f32) {
        if viewport.is_valid() {
            self.viewport = viewport;
            self.camera.resize(viewport);
        } else {
            log::debug!("ignoring degenerate viewport {:?}", viewport);
        }
        self.scroll.set_extent(document_height, self.viewport.height);
    }

    // === Registration (once, after assets load) ===

    pub fn register_fragment(&mut self, handle: GeometryHandle, local_vertices: &[Vec3], anchor: Vec3) -> usize {
        self.fragments.register(handle, local_vertices, anchor)
    }

    /// Cut a decoded position buffer into per-triangle fragments
    pub fn register_triangle_soup(
        &mut self,
        positions: &[f32],
        scale: f32,
        anchor: Vec3,
        first_handle: u32,
    ) -> usize {
        let created = self
            .fragments
            .register_triangle_soup(positions, scale, anchor, first_handle);
        log::info!("Registered {} fragments ({} total)", created, self.fragments.len());
        created
    }

    pub fn register_object(&mut self, spec: AnimatedSpec) -> usize {
        self.objects
            .push(AnimatedObject::new(spec, self.tuning.shell_lerp));
        log::info!("Registered animated object {:?}", spec.handle);
        self.objects.len() - 1
    }

    pub fn register_text(&mut self, handle: GeometryHandle, role: TextRole) {
        self.text.register(handle, role);
        log::info!("Registered {} text", role.as_str());
    }

    // === Outputs ===

    pub fn fragment_transforms(&self) -> impl Iterator<Item = (GeometryHandle, Transform)> + '_ {
        let rotation = Vec3::new(0.0, self.fragment_rotation_y, 0.0);
        self.fragments.iter().map(move |f| {
            (
                f.handle,
                Transform {
                    translation: f.position,
                    rotation,
                    scale: Vec3::ONE,
                },
            )
        })
    }

    pub fn object_transforms(&self) -> impl Iterator<Item = (GeometryHandle, Transform)> + '_ {
        self.objects.iter().map(|o| {
            (
                o.handle,
                Transform {
                    translation: o.position,
                    rotation: Vec3::new(0.0, o.rotation_y, 0.0),
                    scale: Vec3::splat(o.current_scale()),
                },
            )
        })
    }

    pub fn text_transforms(&self) -> impl Iterator<Item = (GeometryHandle, Transform)> + '_ {
        self.text.iter().map(|e| (e.handle, e.transform))
    }

    pub fn firing_time(&self) -> f32 {
        self.firing_time
    }
}
