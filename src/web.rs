//! Browser facade
//!
//! The page's JavaScript owns the DOM listeners and the renderer; it posts
//! raw events here and reads back instance matrices once per animation
//! frame.

use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::renderer::{FiringUniform, collect_instances, instance_floats};
use crate::sim::{
    AnimatedSpec, FrameClock, GeometryHandle, InputMailbox, SceneState, TextRole, Viewport,
};
use crate::tuning::Tuning;

#[wasm_bindgen]
pub struct SceneCore {
    state: SceneState,
    mailbox: InputMailbox,
    clock: FrameClock,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl SceneCore {
    /// Create a core sized to the current window. Tuning is read from
    /// LocalStorage when present.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, document_height: f32) -> SceneCore {
        console_error_panic_hook::set_once();
        // A second core on the same page finds the logger already installed
        let _ = console_log::init_with_level(log::Level::Info);

        let mut state = SceneState::new(Tuning::load(), Viewport::new(width, height));
        state.resize(Viewport::new(width, height), document_height);
        log::info!("Scene core ready ({width}x{height})");

        SceneCore {
            state,
            mailbox: InputMailbox::new(),
            clock: FrameClock::new(),
            last_time: None,
        }
    }

    /// Replace tuning from a JSON document; returns false if it was rejected
    pub fn set_tuning(&mut self, json: &str) -> bool {
        match Tuning::from_json(json) {
            Ok(tuning) => {
                tuning.save();
                self.state.apply_tuning(tuning);
                true
            }
            Err(e) => {
                log::warn!("Rejected tuning: {e}");
                false
            }
        }
    }

    // === Events ===

    pub fn on_scroll(&mut self, offset: f32) {
        self.mailbox.post_scroll(offset);
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.mailbox.post_pointer(client_x, client_y);
    }

    pub fn on_resize(&mut self, width: f32, height: f32, document_height: f32) {
        self.mailbox.post_resize(width, height, document_height);
    }

    // === Registration ===

    /// Cut a decoded mesh position buffer into fragments. Returns the count.
    pub fn register_fragments(
        &mut self,
        positions: &[f32],
        scale: f32,
        anchor_x: f32,
        anchor_y: f32,
        anchor_z: f32,
        first_handle: u32,
    ) -> u32 {
        self.state.register_triangle_soup(
            positions,
            scale,
            Vec3::new(anchor_x, anchor_y, anchor_z),
            first_handle,
        ) as u32
    }

    /// Register the solid and point shells of the secondary model
    pub fn register_shells(&mut self, solid_handle: u32, points_handle: u32) {
        let tuning = self.state.tuning.clone();
        self.state
            .register_object(AnimatedSpec::solid_shell(GeometryHandle(solid_handle), &tuning));
        self.state
            .register_object(AnimatedSpec::point_shell(GeometryHandle(points_handle), &tuning));
    }

    /// Register a text mesh by role name; returns false for unknown roles
    pub fn register_text(&mut self, handle: u32, role: &str) -> bool {
        match TextRole::from_str(role) {
            Some(role) => {
                self.state.register_text(GeometryHandle(handle), role);
                true
            }
            None => {
                log::warn!("Unknown text role '{role}'");
                false
            }
        }
    }

    // === Frame ===

    /// Advance to `time_ms` (the requestAnimationFrame timestamp)
    pub fn frame(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => crate::consts::FRAME_DT,
        };
        self.last_time = Some(time_ms);
        self.clock.advance(&mut self.state, &mut self.mailbox, dt)
    }

    /// Geometry handles, in the same order as `instance_matrices`
    pub fn instance_handles(&self) -> js_sys::Uint32Array {
        let (handles, _) = collect_instances(&self.state);
        let ids: Vec<u32> = handles.into_iter().map(|h| h.0).collect();
        js_sys::Uint32Array::from(ids.as_slice())
    }

    /// Column-major model matrices, 16 floats per tracked object
    pub fn instance_matrices(&self) -> js_sys::Float32Array {
        let (_, instances) = collect_instances(&self.state);
        js_sys::Float32Array::from(instance_floats(&instances))
    }

    /// Firing uniform block as 8 floats
    pub fn firing_uniform(&self) -> js_sys::Float32Array {
        let floats: [f32; 8] = FiringUniform::from_scene(&self.state).to_floats();
        js_sys::Float32Array::from(floats.as_slice())
    }

    pub fn firing_time(&self) -> f32 {
        self.state.firing_time()
    }

    pub fn scroll_fraction(&self) -> f32 {
        self.state.scroll.fraction
    }
}
