//! Per-frame tick
//!
//! Input events are buffered in an [`InputMailbox`] (latest value wins) and
//! drained at the tick boundary. [`tick`] then runs every component in a
//! fixed order. [`FrameClock`] turns variable display frames into fixed
//! steps.

use glam::Vec2;

use super::camera::Viewport;
use super::state::SceneState;
use crate::consts::{FRAME_DT, MAX_FRAME_TIME, MAX_SUBSTEPS};

/// Buffered resize event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    pub viewport: Viewport,
    /// Full document height (scrollable content)
    pub document_height: f32,
}

/// Inputs consumed by a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Latest page scroll offset
    pub scroll_offset: Option<f32>,
    /// Latest pointer position in client pixels
    pub pointer_client: Option<Vec2>,
    /// Latest resize, applied before anything else
    pub resize: Option<ResizeEvent>,
}

impl FrameInput {
    pub fn is_empty(&self) -> bool {
        self.scroll_offset.is_none() && self.pointer_client.is_none() && self.resize.is_none()
    }
}

/// Last-write-wins buffer between event handlers and the tick
#[derive(Debug, Clone, Default)]
pub struct InputMailbox {
    pending: FrameInput,
}

impl InputMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_scroll(&mut self, offset: f32) {
        self.pending.scroll_offset = Some(offset);
    }

    pub fn post_pointer(&mut self, client_x: f32, client_y: f32) {
        self.pending.pointer_client = Some(Vec2::new(client_x, client_y));
    }

    pub fn post_resize(&mut self, width: f32, height: f32, document_height: f32) {
        self.pending.resize = Some(ResizeEvent {
            viewport: Viewport::new(width, height),
            document_height,
        });
    }

    /// Drain everything posted since the last take
    pub fn take(&mut self) -> FrameInput {
        std::mem::take(&mut self.pending)
    }
}

/// Advance the scene by one step of `dt` seconds
pub fn tick(state: &mut SceneState, input: &FrameInput, dt: f32) {
    // Resize strictly before any component reads the viewport
    if let Some(resize) = input.resize {
        state.resize(resize.viewport, resize.document_height);
        // Same pointer, new aspect: re-cast so the interaction point stays under it
        if input.pointer_client.is_none() {
            state
                .pointer
                .reproject(&state.camera, state.tuning.depth_plane_z);
        }
    }

    if let Some(offset) = input.scroll_offset {
        state.scroll.update(offset);
    }

    if let Some(client) = input.pointer_client {
        state.pointer.update(
            client,
            state.viewport,
            &state.camera,
            state.tuning.depth_plane_z,
        );
    }

    let k = dt / FRAME_DT;
    let scroll = state.scroll;

    state.fragment_rotation_y = scroll.fraction * state.tuning.scroll_rotation;
    let params = state.field_params();
    state.repelled = state.fragments.step(
        &params,
        state.pointer.world,
        scroll.effect_strength,
        state.fragment_rotation_y,
        dt,
    );

    for object in &mut state.objects {
        object.update(&scroll, state.tuning.scroll_rotation, k);
    }

    state.text.update(&scroll, state.pointer.device);

    state.firing_time += state.tuning.firing.time_step * k;
    state.ticks += 1;
}

/// Fixed-step accumulator driven by display frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Total fixed steps run
    pub steps: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed steps as `frame_dt` covers. Inputs are drained
    /// once and applied on the first step. Returns the steps taken.
    pub fn advance(&mut self, state: &mut SceneState, mailbox: &mut InputMailbox, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut input = mailbox.take();
        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input, FRAME_DT);
            self.accumulator -= FRAME_DT;
            substeps += 1;
            // One-shot: later substeps see no new events
            input = FrameInput::default();
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= FRAME_DT {
            log::debug!("frame clock behind by {:.3}s, dropping", self.accumulator);
            self.accumulator = 0.0;
        }

        // Events that arrived on a frame too short to step stay queued
        if !input.is_empty() {
            let mut requeued = input;
            let newer = mailbox.take();
            requeued.scroll_offset = newer.scroll_offset.or(requeued.scroll_offset);
            requeued.pointer_client = newer.pointer_client.or(requeued.pointer_client);
            requeued.resize = newer.resize.or(requeued.resize);
            mailbox.pending = requeued;
        }

        self.steps += substeps as u64;
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animator::AnimatedSpec;
    use crate::sim::fragment::GeometryHandle;
    use crate::sim::text::TextRole;
    use glam::Vec3;

    fn scene() -> SceneState {
        let mut state = SceneState::default();
        let tuning = state.tuning.clone();
        // One fragment whose centroid sits at (1, -5, 0)
        state.register_fragment(
            GeometryHandle(0),
            &[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
            Vec3::new(0.0, -6.0, 0.0),
        );
        state.register_object(AnimatedSpec::solid_shell(GeometryHandle(1), &tuning));
        state.register_object(AnimatedSpec::point_shell(GeometryHandle(2), &tuning));
        state.register_text(GeometryHandle(3), TextRole::Headline);
        state.register_text(GeometryHandle(4), TextRole::Farewell);
        state.resize(Viewport::new(800.0, 600.0), 700.0);
        // Park the interaction point until a test moves the pointer
        state.pointer.world = Vec3::new(1000.0, 1000.0, 0.0);
        state
    }

    #[test]
    fn test_mailbox_last_write_wins() {
        let mut mailbox = InputMailbox::new();
        mailbox.post_scroll(10.0);
        mailbox.post_scroll(42.0);
        mailbox.post_pointer(1.0, 2.0);
        mailbox.post_pointer(3.0, 4.0);

        let input = mailbox.take();
        assert_eq!(input.scroll_offset, Some(42.0));
        assert_eq!(input.pointer_client, Some(Vec2::new(3.0, 4.0)));
        assert!(mailbox.take().is_empty());
    }

    #[test]
    fn test_top_of_page_rests() {
        let mut state = scene();
        let input = FrameInput {
            scroll_offset: Some(0.0),
            // Far corner: interaction point well away from the fragment
            pointer_client: Some(Vec2::new(0.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        for _ in 0..300 {
            tick(&mut state, &FrameInput::default(), FRAME_DT);
        }

        assert_eq!(state.scroll.effect_strength, 2.0);
        assert_eq!(state.scroll.fraction, 0.0);
        for (_, t) in state.object_transforms() {
            assert_eq!(t.scale, Vec3::ZERO);
            assert_eq!(t.rotation, Vec3::ZERO);
        }
        assert!(state.fragments.max_displacement() < 1e-3);
    }

    #[test]
    fn test_scroll_past_hold_band() {
        let mut state = scene();
        let input = FrameInput {
            scroll_offset: Some(15.0),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);

        assert_eq!(state.scroll.effect_strength, 0.0);
        assert!((state.scroll.fraction - 0.15).abs() < 1e-6);
        assert_eq!(
            state.field_params().max_radius(state.scroll.effect_strength),
            state.tuning.base_radius
        );
    }

    #[test]
    fn test_pointer_scatters_fragment() {
        let mut state = scene();
        // Screen center projects to the world origin, 5 units above the centroid
        let input = FrameInput {
            pointer_client: Some(Vec2::new(400.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);

        assert_eq!(state.repelled, 1);
        let fragment = state.fragments.get(0).unwrap();
        assert!(fragment.position.y < -6.0);
    }

    #[test]
    fn test_firing_clock_advances() {
        let mut state = scene();
        let before = state.firing_time();
        for _ in 0..10 {
            tick(&mut state, &FrameInput::default(), FRAME_DT);
        }
        assert!((state.firing_time() - before - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_text_tracks_inputs() {
        let mut state = scene();
        let input = FrameInput {
            scroll_offset: Some(100.0),
            pointer_client: Some(Vec2::new(800.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);

        let headline = state.text.get(TextRole::Headline).unwrap().transform;
        assert!((headline.translation.y - 3.5).abs() < 1e-5);
        assert!((headline.translation.x + 1.0).abs() < 1e-5);
        let farewell = state.text.get(TextRole::Farewell).unwrap().transform;
        assert!(farewell.translation.y > -220.0);
    }

    #[test]
    fn test_frame_clock_fixed_steps() {
        let mut state = scene();
        let mut clock = FrameClock::new();
        let mut mailbox = InputMailbox::new();

        mailbox.post_scroll(5.0);
        assert_eq!(clock.advance(&mut state, &mut mailbox, FRAME_DT * 2.5), 2);
        assert_eq!(state.scroll.raw_offset, 5.0);
        // Leftover half step carries into the next frame
        assert_eq!(clock.advance(&mut state, &mut mailbox, FRAME_DT * 0.6), 1);
    }

    #[test]
    fn test_frame_clock_caps_substeps() {
        let mut state = scene();
        let mut clock = FrameClock::new();
        let mut mailbox = InputMailbox::new();

        assert_eq!(clock.advance(&mut state, &mut mailbox, 10.0), MAX_SUBSTEPS);
        assert_eq!(clock.advance(&mut state, &mut mailbox, 0.0), 0);
    }

    #[test]
    fn test_short_frame_keeps_events() {
        let mut state = scene();
        let mut clock = FrameClock::new();
        let mut mailbox = InputMailbox::new();

        mailbox.post_scroll(8.0);
        assert_eq!(clock.advance(&mut state, &mut mailbox, FRAME_DT * 0.25), 0);
        assert_eq!(state.scroll.raw_offset, 0.0);
        clock.advance(&mut state, &mut mailbox, FRAME_DT);
        assert_eq!(state.scroll.raw_offset, 8.0);
    }

    #[test]
    fn test_resize_reprojects_pointer() {
        let mut state = scene();
        let input = FrameInput {
            pointer_client: Some(Vec2::new(700.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        let before = state.pointer.world;

        let resize = FrameInput {
            resize: Some(ResizeEvent {
                viewport: Viewport::new(1600.0, 600.0),
                document_height: 700.0,
            }),
            ..Default::default()
        };
        tick(&mut state, &resize, FRAME_DT);
        // Wider aspect pushes the same device x further out
        assert!(state.pointer.world.x > before.x);
    }
}
