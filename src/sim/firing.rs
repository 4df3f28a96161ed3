//! Procedural firing signal
//!
//! A pure function of vertex position and time. Two sine hashes with
//! permuted axes give each vertex an independent frequency and phase, so
//! flashes are sparse and never line up across the mesh. No RNG, no state:
//! the same inputs always produce the same sample.

use glam::{Vec3, Vec3Swizzles};

use crate::tuning::FiringParams;
use crate::{fract, glsl_mod};

const HASH_COEFFS: Vec3 = Vec3::new(12.9898, 78.233, 45.164);
const HASH_GAIN: f32 = 43758.5453123;

/// One evaluation of the firing signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringSample {
    pub frequency: f32,
    pub phase: f32,
    /// Position inside the current period, in `[0, period)`
    pub firing_time: f32,
    /// 0 when idle, otherwise the vertex's brightness in (0, 1)
    pub activation: f32,
}

impl FiringSample {
    pub fn is_firing(&self) -> bool {
        self.activation > 0.0
    }

    /// Rendered point size for this sample
    pub fn point_size(&self, params: &FiringParams) -> f32 {
        self.activation * params.point_size
    }

    /// Mix factor toward the firing color, saturated at 1
    pub fn glow(&self, params: &FiringParams) -> f32 {
        (self.activation * params.glow_gain).clamp(0.0, 1.0)
    }
}

/// First hash: drives brightness and frequency
#[inline]
pub fn hash_a(p: Vec3) -> f32 {
    fract(p.dot(HASH_COEFFS).sin() * HASH_GAIN)
}

/// Second hash on reversed axes: drives phase.
///
/// The coefficients must stay in the same order as `hash_a`; reversing both
/// the axes and the coefficients collapses to the same dot product.
#[inline]
pub fn hash_b(p: Vec3) -> f32 {
    fract(p.zyx().dot(HASH_COEFFS).sin() * HASH_GAIN)
}

/// Evaluate the firing signal for one vertex
pub fn firing(position: Vec3, time: f32, params: &FiringParams) -> FiringSample {
    let r1 = hash_a(position);
    let r2 = hash_b(position);

    let frequency = params.freq_min + (params.freq_max - params.freq_min) * r1;
    let phase = r2 * params.phase_span;
    let firing_time = glsl_mod(time * frequency + phase, params.period);

    let activation = if firing_time >= params.threshold { r1 } else { 0.0 };

    FiringSample {
        frequency,
        phase,
        firing_time,
        activation,
    }
}

/// Fraction of `positions` firing at `time`
pub fn active_fraction(positions: &[Vec3], time: f32, params: &FiringParams) -> f32 {
    if positions.is_empty() {
        return 0.0;
    }
    let active = positions
        .iter()
        .filter(|p| firing(**p, time, params).is_firing())
        .count();
    active as f32 / positions.len() as f32
}
