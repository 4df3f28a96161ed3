//! Text rig
//!
//! Headline text rides the scroll offset, the farewell line rises with
//! the scroll fraction, and everything sways slightly with the pointer.
//! Elements that were never registered (font failed to load) are skipped.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::fragment::GeometryHandle;
use super::scroll::ScrollState;
use super::state::Transform;

/// Headline z and the lower limit of its scroll-driven y
const HEADLINE_Z: f32 = -14.0;
const HEADLINE_MIN_Y: f32 = -15.0;
/// Headline rise per scrolled pixel
const HEADLINE_SCROLL_RATE: f32 = 0.035;
/// Greeting/tagline sit this far above/below the headline
const SUBTITLE_OFFSET: f32 = 10.0;
const SUBTITLE_Z: f32 = -17.0;
/// Farewell starts off-screen and ends centered at full scroll
const FAREWELL_START_Y: f32 = -220.0;
const FAREWELL_END_Y: f32 = 0.0;
/// Pointer sway
const SWAY_TRANSLATE: f32 = 1.0;
const SWAY_TILT: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextRole {
    /// The name
    Headline,
    /// Line above the headline
    Greeting,
    /// Line below the headline
    Tagline,
    /// Closing line revealed at the bottom of the page
    Farewell,
}

impl TextRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextRole::Headline => "headline",
            TextRole::Greeting => "greeting",
            TextRole::Tagline => "tagline",
            TextRole::Farewell => "farewell",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "headline" | "title" => Some(TextRole::Headline),
            "greeting" => Some(TextRole::Greeting),
            "tagline" | "subtitle" => Some(TextRole::Tagline),
            "farewell" | "thanks" => Some(TextRole::Farewell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextElement {
    pub handle: GeometryHandle,
    pub role: TextRole,
    pub transform: Transform,
}

/// Headline translation; greeting and tagline hang off it
fn headline_translation(scroll: &ScrollState, pointer: Vec2) -> Vec3 {
    Vec3::new(
        -pointer.x * SWAY_TRANSLATE,
        (scroll.raw_offset * HEADLINE_SCROLL_RATE).max(HEADLINE_MIN_Y),
        HEADLINE_Z,
    )
}

/// Transform for a role given the current inputs
pub fn text_transform(role: TextRole, scroll: &ScrollState, pointer: Vec2) -> Transform {
    let headline = headline_translation(scroll, pointer);
    let translation = match role {
        TextRole::Headline => headline,
        TextRole::Greeting => Vec3::new(headline.x, headline.y + SUBTITLE_OFFSET, SUBTITLE_Z),
        TextRole::Tagline => Vec3::new(headline.x, headline.y - SUBTITLE_OFFSET, SUBTITLE_Z),
        TextRole::Farewell => Vec3::new(
            -pointer.x * SWAY_TRANSLATE,
            FAREWELL_START_Y + scroll.fraction * (FAREWELL_END_Y - FAREWELL_START_Y),
            HEADLINE_Z,
        ),
    };

    Transform {
        translation,
        rotation: Vec3::new(pointer.y * SWAY_TILT, pointer.x * SWAY_TILT, 0.0),
        scale: Vec3::ONE,
    }
}

/// Registered text elements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRig {
    elements: Vec<TextElement>,
}

impl TextRig {
    pub fn register(&mut self, handle: GeometryHandle, role: TextRole) {
        self.elements.push(TextElement {
            handle,
            role,
            transform: Transform::default(),
        });
    }

    pub fn update(&mut self, scroll: &ScrollState, pointer: Vec2) {
        for element in &mut self.elements {
            element.transform = text_transform(element.role, scroll, pointer);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter()
    }

    pub fn get(&self, role: TextRole) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.role == role)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
