//! Per-frame simulation module
//!
//! Everything with state or dynamics lives here. Components run in a fixed
//! order inside [`tick`]:
//! - Scroll tracking and pointer projection update the shared inputs
//! - The fragment field integrates repulsion / return forces
//! - Animated objects and text follow scroll and pointer
//! - The firing clock advances
//!
//! No rendering or platform dependencies.

pub mod animator;
pub mod camera;
pub mod firing;
pub mod fragment;
pub mod pointer;
pub mod scroll;
pub mod state;
pub mod text;
pub mod tick;

pub use animator::{AnimatedObject, AnimatedSpec, ScaleRule, Smoothed, smooth};
pub use camera::{Camera, Viewport};
pub use firing::{FiringSample, active_fraction, firing};
pub use fragment::{FieldParams, Fragment, FragmentField, FragmentMode, GeometryHandle};
pub use pointer::{PointerState, ProjectionOutcome, client_to_device};
pub use scroll::{ScrollState, effect_strength, scroll_fraction};
pub use state::{SceneState, Transform};
pub use text::{TextElement, TextRig, TextRole, text_transform};
pub use tick::{FrameClock, FrameInput, InputMailbox, ResizeEvent, tick};
