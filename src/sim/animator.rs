//! Smoothed animators for non-physical objects
//!
//! Scale eases toward a scroll-derived target with exponential smoothing;
//! rotation is mapped straight from the scroll fraction with no lag.

use std::ops::{Add, Mul, Sub};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::fragment::GeometryHandle;
use super::scroll::ScrollState;
use crate::consts::{SHELL_POINTS_FACTOR, SHELL_POSITION, SHELL_SOLID_FACTOR};
use crate::tuning::Tuning;

/// One smoothing step: move `lerp_factor` of the way from `current` to `target`
#[inline]
pub fn smooth<T>(current: T, target: T, lerp_factor: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    current + (target - current) * lerp_factor
}

/// A value that chases a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Smoothed<T> {
    pub current: T,
    pub target: T,
    pub lerp_factor: f32,
}

impl<T> Smoothed<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    pub fn new(initial: T, lerp_factor: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            lerp_factor,
        }
    }

    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Advance one canonical frame and return the new value
    pub fn step(&mut self) -> T {
        self.current = smooth(self.current, self.target, self.lerp_factor);
        self.current
    }

    /// Advance by `k` canonical frames (fractional allowed)
    pub fn step_scaled(&mut self, k: f32) -> T {
        let factor = 1.0 - (1.0 - self.lerp_factor).powf(k);
        self.current = smooth(self.current, self.target, factor);
        self.current
    }
}

/// How an object's scale target is derived from scroll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScaleRule {
    /// `min(raw_offset / threshold, 1) * max`
    OffsetRamp { threshold: f32, max: f32 },
    /// `clamp(fraction, 0, 1) * max`
    FractionRamp { max: f32 },
}

impl ScaleRule {
    pub fn target(&self, scroll: &ScrollState) -> f32 {
        match *self {
            ScaleRule::OffsetRamp { threshold, max } => {
                if threshold <= 0.0 {
                    max
                } else {
                    (scroll.raw_offset / threshold).min(1.0) * max
                }
            }
            ScaleRule::FractionRamp { max } => scroll.fraction.clamp(0.0, 1.0) * max,
        }
    }
}

/// Registration data for an animated object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimatedSpec {
    pub handle: GeometryHandle,
    pub position: Vec3,
    /// Multiplier on the shared scale target
    pub scale_factor: f32,
    pub initial_scale: f32,
    pub rule: ScaleRule,
}

impl AnimatedSpec {
    /// The solid shell of the secondary model
    pub fn solid_shell(handle: GeometryHandle, tuning: &Tuning) -> Self {
        Self::shell(handle, SHELL_SOLID_FACTOR, tuning)
    }

    /// The point-cloud shell of the secondary model
    pub fn point_shell(handle: GeometryHandle, tuning: &Tuning) -> Self {
        Self::shell(handle, SHELL_POINTS_FACTOR, tuning)
    }

    fn shell(handle: GeometryHandle, scale_factor: f32, tuning: &Tuning) -> Self {
        Self {
            handle,
            position: Vec3::from_array(SHELL_POSITION),
            scale_factor,
            initial_scale: 0.0,
            rule: ScaleRule::OffsetRamp {
                threshold: tuning.shell_scroll_threshold,
                max: tuning.shell_max_scale,
            },
        }
    }
}

/// A scroll-driven object: lag-smoothed uniform scale, direct-mapped Y spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimatedObject {
    pub handle: GeometryHandle,
    pub position: Vec3,
    pub scale_factor: f32,
    pub scale: Smoothed<f32>,
    pub rotation_y: f32,
    pub rule: ScaleRule,
}

impl AnimatedObject {
    pub fn new(spec: AnimatedSpec, lerp_factor: f32) -> Self {
        Self {
            handle: spec.handle,
            position: spec.position,
            scale_factor: spec.scale_factor,
            scale: Smoothed::new(spec.initial_scale, lerp_factor),
            rotation_y: 0.0,
            rule: spec.rule,
        }
    }

    /// Retarget from scroll and advance `k` canonical frames
    pub fn update(&mut self, scroll: &ScrollState, scroll_rotation: f32, k: f32) {
        self.scale
            .set_target(self.rule.target(scroll) * self.scale_factor);
        if k == 1.0 {
            self.scale.step();
        } else {
            self.scale.step_scaled(k);
        }
        self.rotation_y = scroll.fraction * scroll_rotation;
    }

    /// Pick up new smoothing and ramp settings without resetting the
    /// current scale
    pub fn retune(&mut self, tuning: &Tuning) {
        self.scale.lerp_factor = tuning.shell_lerp;
        if let ScaleRule::OffsetRamp { threshold, max } = &mut self.rule {
            *threshold = tuning.shell_scroll_threshold;
            *max = tuning.shell_max_scale;
        }
    }

    pub fn current_scale(&self) -> f32 {
        self.scale.current
    }
}
