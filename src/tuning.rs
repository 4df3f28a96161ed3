//! Dynamics tuning
//!
//! Every knob of the per-frame simulation lives here. Defaults come from
//! `consts`; overrides are loaded from JSON (LocalStorage on web, a file
//! path on native).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How a fragment outside the interaction radius is pulled home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReturnLaw {
    /// Spring proportional to the displacement from the anchor
    #[default]
    Proportional,
    /// Fixed-magnitude pull along the unit direction to the anchor
    Constant,
}

impl ReturnLaw {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnLaw::Proportional => "Proportional",
            ReturnLaw::Constant => "Constant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "proportional" | "spring" => Some(ReturnLaw::Proportional),
            "constant" | "unit" => Some(ReturnLaw::Constant),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Fragment field ===
    /// Interaction radius before the effect-strength boost
    pub base_radius: f32,
    /// Peak repulsion impulse before the effect-strength boost
    pub force_scale: f32,
    /// Return spring strength
    pub return_force: f32,
    pub return_law: ReturnLaw,
    /// Velocity retained per canonical frame, in (0, 1)
    pub damping: f32,

    // === Shells ===
    /// Smoothing factor for shell scale, in (0, 1]
    pub shell_lerp: f32,
    pub shell_max_scale: f32,
    /// Raw scroll offset at which shells reach full size
    pub shell_scroll_threshold: f32,
    /// Y rotation at full scroll (radians)
    pub scroll_rotation: f32,

    // === Firing ===
    pub firing: FiringParams,

    // === Camera ===
    pub fov_degrees: f32,
    pub camera_z: f32,
    pub depth_plane_z: f32,
}

/// Parameters of the procedural firing signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiringParams {
    pub freq_min: f32,
    pub freq_max: f32,
    pub phase_span: f32,
    pub period: f32,
    /// Firing time above which a vertex is active
    pub threshold: f32,
    /// Time uniform advance per canonical frame
    pub time_step: f32,
    pub point_size: f32,
    pub glow_gain: f32,
}

impl Default for FiringParams {
    fn default() -> Self {
        Self {
            freq_min: FIRING_FREQ_MIN,
            freq_max: FIRING_FREQ_MAX,
            phase_span: FIRING_PHASE_SPAN,
            period: FIRING_PERIOD,
            threshold: FIRING_THRESHOLD,
            time_step: FIRING_TIME_STEP,
            point_size: FIRING_POINT_SIZE,
            glow_gain: FIRING_GLOW_GAIN,
        }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_radius: BASE_RADIUS,
            force_scale: FORCE_SCALE,
            return_force: RETURN_FORCE,
            return_law: ReturnLaw::Proportional,
            damping: DAMPING,

            shell_lerp: SHELL_LERP,
            shell_max_scale: SHELL_MAX_SCALE,
            shell_scroll_threshold: SHELL_SCROLL_THRESHOLD,
            scroll_rotation: SCROLL_ROTATION,

            firing: FiringParams::default(),

            fov_degrees: CAMERA_FOV_DEGREES,
            camera_z: CAMERA_Z,
            depth_plane_z: DEPTH_PLANE_Z,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make the simulation diverge or divide by zero
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(field: &'static str, value: f32, ok: bool) -> Result<(), TuningError> {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, value })
            }
        }

        check("damping", self.damping, self.damping > 0.0 && self.damping < 1.0)?;
        check("shell_lerp", self.shell_lerp, self.shell_lerp > 0.0 && self.shell_lerp <= 1.0)?;
        check("base_radius", self.base_radius, self.base_radius > 0.0)?;
        check("force_scale", self.force_scale, self.force_scale >= 0.0)?;
        check("return_force", self.return_force, self.return_force >= 0.0)?;
        check(
            "shell_scroll_threshold",
            self.shell_scroll_threshold,
            self.shell_scroll_threshold > 0.0,
        )?;
        check("fov_degrees", self.fov_degrees, self.fov_degrees > 0.0 && self.fov_degrees < 180.0)?;
        check("firing.period", self.firing.period, self.firing.period > 0.0)?;
        check(
            "firing.freq_max",
            self.firing.freq_max,
            self.firing.freq_min > 0.0 && self.firing.freq_max >= self.firing.freq_min,
        )?;
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "scatterfield_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {e}"),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Load tuning from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| log::warn!("Cannot read tuning {}: {e}", path.display()))
            .ok()
            .and_then(|json| {
                Self::from_json(&json)
                    .map_err(|e| log::warn!("Ignoring tuning {}: {e}", path.display()))
                    .ok()
            });

        match loaded {
            Some(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            None => Self::default(),
        }
    }
}
