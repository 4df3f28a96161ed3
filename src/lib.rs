//! Scatterfield - scroll/pointer-reactive fragment physics and animation core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (scroll tracking, pointer projection,
//!   fragment physics, smoothed animators, firing signal, text rig)
//! - `renderer`: POD instance/uniform records for the rendering collaborator
//! - `tuning`: Data-driven dynamics constants
//! - `web`: wasm-bindgen facade (wasm32 only)

pub mod renderer;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use tuning::{ReturnLaw, Tuning, TuningError};

/// Engine configuration constants
pub mod consts {
    /// Canonical frame timestep. Per-frame constants below are expressed
    /// in units of one frame at this rate.
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum fixed steps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest real frame time fed to the accumulator (tab switches etc.)
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Effect strength bands (raw scroll offset in pixels)
    pub const EFFECT_RAMP_END: f32 = 2.0;
    pub const EFFECT_HOLD_END: f32 = 10.0;
    /// Effect strength at the top of the page and across the hold band
    pub const EFFECT_TOP: f32 = 2.0;
    pub const EFFECT_HOLD: f32 = 1.0;

    /// Fragment field
    pub const BASE_RADIUS: f32 = 12.0;
    pub const FORCE_SCALE: f32 = 4.0;
    pub const RETURN_FORCE: f32 = 0.05;
    pub const DAMPING: f32 = 0.85;
    /// Scale applied to source mesh coordinates when fragments are cut
    pub const FRAGMENT_MESH_SCALE: f32 = 2.8;
    /// Rest placement of the fragment cluster
    pub const FRAGMENT_ANCHOR: [f32; 3] = [0.0, -6.0, 0.0];

    /// Shells (secondary model)
    pub const SHELL_LERP: f32 = 0.1;
    pub const SHELL_MAX_SCALE: f32 = 3.5;
    pub const SHELL_SCROLL_THRESHOLD: f32 = 5.0;
    pub const SHELL_POINTS_FACTOR: f32 = 1.1;
    pub const SHELL_SOLID_FACTOR: f32 = 1.1 * 0.99;
    pub const SHELL_POSITION: [f32; 3] = [0.0, -8.0, 0.0];
    /// Rotation at full scroll (720 degrees)
    pub const SCROLL_ROTATION: f32 = std::f32::consts::PI * 4.0;

    /// Firing signal
    pub const FIRING_FREQ_MIN: f32 = 2.0;
    pub const FIRING_FREQ_MAX: f32 = 4.0;
    pub const FIRING_PHASE_SPAN: f32 = 10.0;
    pub const FIRING_PERIOD: f32 = 5.0;
    pub const FIRING_THRESHOLD: f32 = 4.7;
    /// Time uniform advance per canonical frame
    pub const FIRING_TIME_STEP: f32 = 0.1;
    pub const FIRING_POINT_SIZE: f32 = 5.0;
    pub const FIRING_GLOW_GAIN: f32 = 15.0;

    /// Camera
    pub const CAMERA_FOV_DEGREES: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
    pub const CAMERA_Z: f32 = 30.0;
    /// World z of the plane the pointer ray is intersected with
    pub const DEPTH_PLANE_Z: f32 = 0.0;
}

/// GLSL-style `fract`
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL-style `mod` (result has the sign of `y`)
#[inline]
pub fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fract() {
        assert!((fract(1.25) - 0.25).abs() < 1e-6);
        assert!((fract(-0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_glsl_mod() {
        assert!((glsl_mod(7.5, 5.0) - 2.5).abs() < 1e-6);
        assert!((glsl_mod(-1.0, 5.0) - 4.0).abs() < 1e-6);
    }
}
