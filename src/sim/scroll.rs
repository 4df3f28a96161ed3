//! Scroll tracking
//!
//! Turns the raw page scroll offset into a progress fraction and the
//! proximity "effect strength" that boosts fragment repulsion.

use serde::{Deserialize, Serialize};

use crate::consts::{EFFECT_HOLD, EFFECT_HOLD_END, EFFECT_RAMP_END, EFFECT_TOP};

/// Extents at or below this are treated as "nothing to scroll"
const MIN_EXTENT: f32 = 1e-6;

/// Scroll-derived state, written once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Raw scroll offset in pixels (never negative)
    pub raw_offset: f32,
    /// Scrollable extent: document height minus viewport height
    pub extent: f32,
    /// `raw_offset / extent`, 0 when there is nothing to scroll. Not clamped.
    pub fraction: f32,
    /// Interaction boost, see [`effect_strength`]
    pub effect_strength: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            raw_offset: 0.0,
            extent: 0.0,
            fraction: 0.0,
            effect_strength: effect_strength(0.0),
        }
    }
}

impl ScrollState {
    /// Record new document/viewport heights and refresh the fraction
    pub fn set_extent(&mut self, document_height: f32, viewport_height: f32) {
        self.extent = document_height - viewport_height;
        self.fraction = scroll_fraction(self.raw_offset, self.extent);
    }

    /// Ingest a raw scroll offset
    pub fn update(&mut self, raw_offset: f32) -> ScrollState {
        // Overscroll bounce on touch devices reports negative offsets
        let raw_offset = if raw_offset.is_finite() {
            raw_offset.max(0.0)
        } else {
            0.0
        };
        self.raw_offset = raw_offset;
        self.fraction = scroll_fraction(raw_offset, self.extent);
        self.effect_strength = effect_strength(raw_offset);
        *self
    }
}

/// Progress fraction; 0 for a degenerate extent
#[inline]
pub fn scroll_fraction(raw_offset: f32, extent: f32) -> f32 {
    if extent <= MIN_EXTENT {
        0.0
    } else {
        raw_offset / extent
    }
}

/// Three-band effect strength.
///
/// Falls one unit per pixel from `EFFECT_TOP` at the top of the page,
/// reaching 0 at `EFFECT_RAMP_END`. Just past that it jumps back up to
/// `EFFECT_HOLD`, holds there, then drops to zero past `EFFECT_HOLD_END`.
/// Both band edges are hard steps.
#[inline]
pub fn effect_strength(raw_offset: f32) -> f32 {
    if raw_offset <= EFFECT_RAMP_END {
        EFFECT_TOP - raw_offset
    } else if raw_offset <= EFFECT_HOLD_END {
        EFFECT_HOLD
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_of_page() {
        let mut scroll = ScrollState::default();
        scroll.set_extent(1100.0, 1000.0);
        let s = scroll.update(0.0);
        assert_eq!(s.effect_strength, 2.0);
        assert_eq!(s.fraction, 0.0);
    }

    #[test]
    fn test_past_hold_band() {
        let mut scroll = ScrollState::default();
        scroll.set_extent(900.0, 800.0);
        let s = scroll.update(15.0);
        assert_eq!(s.effect_strength, 0.0);
        assert!((s.fraction - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_end_jumps_to_hold() {
        assert_eq!(effect_strength(2.0), 0.0);
        assert_eq!(effect_strength(2.0 + 1e-3), 1.0);
        assert!((effect_strength(2.0 - 1e-3) - 1e-3).abs() < 1e-5);
    }

    #[test]
    fn test_jump_at_hold_end() {
        assert_eq!(effect_strength(10.0), 1.0);
        assert_eq!(effect_strength(10.0 + 1e-3), 0.0);
    }

    #[test]
    fn test_ramp_drops_one_per_pixel() {
        assert_eq!(effect_strength(0.5), 1.5);
        assert_eq!(effect_strength(1.0), 1.0);
        assert_eq!(effect_strength(1.5), 0.5);
    }

    #[test]
    fn test_degenerate_extent() {
        assert_eq!(scroll_fraction(50.0, 0.0), 0.0);
        assert_eq!(scroll_fraction(50.0, -20.0), 0.0);

        let mut scroll = ScrollState::default();
        scroll.set_extent(600.0, 800.0);
        assert_eq!(scroll.update(30.0).fraction, 0.0);
    }

    #[test]
    fn test_fraction_not_clamped() {
        assert!((scroll_fraction(150.0, 100.0) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_offset_clamped() {
        let mut scroll = ScrollState::default();
        let s = scroll.update(-12.0);
        assert_eq!(s.raw_offset, 0.0);
        assert_eq!(s.effect_strength, 2.0);
    }

    #[test]
    fn test_resize_refreshes_fraction() {
        let mut scroll = ScrollState::default();
        scroll.set_extent(300.0, 100.0);
        scroll.update(50.0);
        assert!((scroll.fraction - 0.25).abs() < 1e-6);
        scroll.set_extent(200.0, 100.0);
        assert!((scroll.fraction - 0.5).abs() < 1e-6);
    }
}
