//! Fragment field
//!
//! A decomposed mesh lives here as a set of rigid fragments. Every step each
//! fragment is classified against the interaction point: inside the
//! (scroll-boosted) radius it is pushed away with a squared falloff, outside
//! it is pulled back toward its anchor. Velocity is damped after integration
//! so the field always settles once input stops.
//!
//! Classification is recomputed from geometry every step; nothing about the
//! previous mode is remembered.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::FRAME_DT;
use crate::tuning::{ReturnLaw, Tuning};

/// Opaque reference to render-owned geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryHandle(pub u32);

/// Per-step classification of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FragmentMode {
    /// Inside the interaction radius, pushed away with the given impulse
    Repelled { force: f32 },
    /// Outside the radius, springing back to the anchor
    Returning,
}

/// One rigid piece of the decomposed mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub handle: GeometryHandle,
    /// Current translation
    pub position: Vec3,
    pub velocity: Vec3,
    /// Rest translation, target of the return spring
    pub anchor: Vec3,
    /// Geometric center of the fragment's own vertices
    pub local_centroid: Vec3,
}

impl Fragment {
    pub fn new(handle: GeometryHandle, local_vertices: &[Vec3], anchor: Vec3) -> Self {
        let local_centroid = if local_vertices.is_empty() {
            Vec3::ZERO
        } else {
            local_vertices.iter().copied().sum::<Vec3>() / local_vertices.len() as f32
        };

        Self {
            handle,
            position: anchor,
            velocity: Vec3::ZERO,
            anchor,
            local_centroid,
        }
    }

    /// World-space centroid given the current spin about Y
    #[inline]
    pub fn centroid(&self, rotation_y: f32) -> Vec3 {
        self.position + Quat::from_rotation_y(rotation_y) * self.local_centroid
    }

    /// Distance from the anchor
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.anchor)
    }
}

/// Per-step force parameters, derived from [`Tuning`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    pub base_radius: f32,
    pub force_scale: f32,
    pub return_force: f32,
    pub return_law: ReturnLaw,
    pub damping: f32,
}

impl From<&Tuning> for FieldParams {
    fn from(tuning: &Tuning) -> Self {
        Self {
            base_radius: tuning.base_radius,
            force_scale: tuning.force_scale,
            return_force: tuning.return_force,
            return_law: tuning.return_law,
            damping: tuning.damping,
        }
    }
}

impl Default for FieldParams {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

impl FieldParams {
    /// Interaction radius for the given effect strength
    #[inline]
    pub fn max_radius(&self, effect_strength: f32) -> f32 {
        self.base_radius * (1.0 + effect_strength)
    }

    /// Classify a centroid against the interaction point
    pub fn classify(&self, distance: f32, effect_strength: f32) -> FragmentMode {
        let max_radius = self.max_radius(effect_strength);
        if distance < max_radius {
            let falloff = 1.0 - distance / max_radius;
            FragmentMode::Repelled {
                force: falloff * falloff * self.force_scale * (1.0 + effect_strength),
            }
        } else {
            FragmentMode::Returning
        }
    }

    fn return_impulse(&self, fragment: &Fragment) -> Vec3 {
        let to_anchor = fragment.anchor - fragment.position;
        match self.return_law {
            ReturnLaw::Proportional => to_anchor * self.return_force,
            ReturnLaw::Constant => to_anchor.normalize_or_zero() * self.return_force,
        }
    }
}

/// All registered fragments. Fragments are never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentField {
    fragments: Vec<Fragment>,
}

impl FragmentField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: GeometryHandle, local_vertices: &[Vec3], anchor: Vec3) -> usize {
        self.fragments.push(Fragment::new(handle, local_vertices, anchor));
        self.fragments.len() - 1
    }

    /// Cut a flat `xyz` position buffer into one fragment per triangle.
    ///
    /// Coordinates are scaled by `scale`; every fragment shares `anchor`.
    /// Handles are assigned sequentially from `first_handle`. Returns the
    /// number of fragments created.
    pub fn register_triangle_soup(
        &mut self,
        positions: &[f32],
        scale: f32,
        anchor: Vec3,
        first_handle: u32,
    ) -> usize {
        let triangles = positions.chunks_exact(9);
        if !triangles.remainder().is_empty() {
            log::warn!(
                "triangle soup has {} trailing floats; ignoring incomplete triangle",
                triangles.remainder().len()
            );
        }

        let mut created = 0;
        for (i, tri) in triangles.enumerate() {
            let vertices = [
                Vec3::new(tri[0], tri[1], tri[2]) * scale,
                Vec3::new(tri[3], tri[4], tri[5]) * scale,
                Vec3::new(tri[6], tri[7], tri[8]) * scale,
            ];
            self.register(GeometryHandle(first_handle + i as u32), &vertices, anchor);
            created += 1;
        }
        created
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Fragment> {
        self.fragments.get_mut(index)
    }

    /// Largest distance of any fragment from its anchor
    pub fn max_displacement(&self) -> f32 {
        self.fragments
            .iter()
            .map(Fragment::displacement)
            .fold(0.0, f32::max)
    }

    /// Advance every fragment by `dt`.
    ///
    /// Impulses are per canonical frame; `dt` is expressed against
    /// `FRAME_DT` so a 60 Hz step applies each impulse exactly once.
    /// Returns how many fragments were repelled this step.
    pub fn step(
        &mut self,
        params: &FieldParams,
        interaction: Vec3,
        effect_strength: f32,
        rotation_y: f32,
        dt: f32,
    ) -> usize {
        let k = dt / FRAME_DT;
        let damping = if k == 1.0 { params.damping } else { params.damping.powf(k) };
        let mut repelled = 0;

        for fragment in &mut self.fragments {
            let centroid = fragment.centroid(rotation_y);
            let distance = centroid.distance(interaction);

            let impulse = match params.classify(distance, effect_strength) {
                FragmentMode::Repelled { force } => {
                    repelled += 1;
                    // Zero when the pointer sits exactly on the centroid
                    (centroid - interaction).normalize_or_zero() * force
                }
                FragmentMode::Returning => params.return_impulse(fragment),
            };

            fragment.velocity += impulse * k;
            fragment.position += fragment.velocity * k;
            fragment.velocity *= damping;
        }

        repelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Far enough that no default radius reaches it
    const FAR: Vec3 = Vec3::new(1000.0, 1000.0, 0.0);

    fn triangle() -> [Vec3; 3] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        ]
    }

    fn single(anchor: Vec3) -> FragmentField {
        let mut field = FragmentField::new();
        field.register(GeometryHandle(0), &triangle(), anchor);
        field
    }

    #[test]
    fn test_centroid_is_vertex_mean() {
        let f = Fragment::new(GeometryHandle(1), &triangle(), Vec3::new(0.0, -6.0, 0.0));
        assert_eq!(f.local_centroid, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(f.centroid(0.0), Vec3::new(1.0, -5.0, 0.0));
        assert_eq!(f.velocity, Vec3::ZERO);
        assert_eq!(f.position, f.anchor);
    }

    #[test]
    fn test_centroid_follows_spin() {
        let f = Fragment::new(GeometryHandle(1), &[Vec3::new(2.0, 0.0, 0.0)], Vec3::ZERO);
        let c = f.centroid(std::f32::consts::FRAC_PI_2);
        // +90 degrees about Y takes +X to -Z
        assert!((c - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_classify_boundary() {
        let params = FieldParams::default();
        assert_eq!(params.max_radius(0.0), 12.0);
        assert_eq!(params.max_radius(2.0), 36.0);
        assert_eq!(params.classify(12.0, 0.0), FragmentMode::Returning);
        assert!(matches!(params.classify(11.9, 0.0), FragmentMode::Repelled { .. }));
    }

    #[test]
    fn test_force_falloff() {
        let params = FieldParams::default();
        // Halfway out with effect strength 1: (0.5)^2 * 4 * 2 = 2
        match params.classify(12.0, 1.0) {
            FragmentMode::Repelled { force } => assert!((force - 2.0).abs() < 1e-6),
            other => panic!("expected repulsion, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_distance_is_max_force_without_nan() {
        let params = FieldParams::default();
        let mut field = single(Vec3::ZERO);
        let centroid = field.get(0).unwrap().centroid(0.0);

        assert_eq!(
            params.classify(0.0, 1.0),
            FragmentMode::Repelled { force: params.force_scale * 2.0 }
        );

        let repelled = field.step(&params, centroid, 1.0, 0.0, FRAME_DT);
        assert_eq!(repelled, 1);
        let f = field.get(0).unwrap();
        assert!(f.position.is_finite());
        assert!(f.velocity.is_finite());
        assert_eq!(f.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_repulsion_pushes_away() {
        let params = FieldParams::default();
        let mut field = single(Vec3::ZERO);
        let pointer = Vec3::new(-2.0, 1.0, 0.0);

        field.step(&params, pointer, 0.0, 0.0, FRAME_DT);
        let f = field.get(0).unwrap();
        // Centroid (1,1,0) sits on +X of the pointer
        assert!(f.position.x > 0.0);
        assert!(f.position.y.abs() < 1e-6);
    }

    #[test]
    fn test_effect_strength_widens_radius() {
        let params = FieldParams::default();
        let pointer = Vec3::new(1.0 + 20.0, 1.0, 0.0);

        let mut calm = single(Vec3::ZERO);
        assert_eq!(calm.step(&params, pointer, 0.0, 0.0, FRAME_DT), 0);

        let mut boosted = single(Vec3::ZERO);
        assert_eq!(boosted.step(&params, pointer, 2.0, 0.0, FRAME_DT), 1);
    }

    #[test]
    fn test_returns_to_anchor() {
        let params = FieldParams::default();
        let mut field = single(Vec3::new(0.0, -6.0, 0.0));
        {
            let f = field.get_mut(0).unwrap();
            f.position = Vec3::new(5.0, 3.0, -2.0);
            f.velocity = Vec3::new(0.5, 0.0, 0.0);
        }

        for _ in 0..600 {
            field.step(&params, FAR, 0.0, 0.0, FRAME_DT);
        }
        assert!(field.max_displacement() < 1e-3);
    }

    #[test]
    fn test_constant_law_settles_near_anchor() {
        let params = FieldParams {
            return_law: ReturnLaw::Constant,
            ..FieldParams::default()
        };
        let mut field = single(Vec3::ZERO);
        field.get_mut(0).unwrap().position = Vec3::new(4.0, 0.0, 0.0);

        for _ in 0..2000 {
            field.step(&params, FAR, 0.0, 0.0, FRAME_DT);
        }
        // Fixed-magnitude pull chatters around the anchor instead of landing on it
        assert!(field.max_displacement() < 0.1);
    }

    #[test]
    fn test_degenerate_triangle_soup() {
        let mut field = FragmentField::new();
        let soup = [0.0_f32; 9 * 2 + 4];
        let created = field.register_triangle_soup(&soup, 2.8, Vec3::new(0.0, -6.0, 0.0), 10);
        assert_eq!(created, 2);
        assert_eq!(field.len(), 2);
        assert_eq!(field.get(1).unwrap().handle, GeometryHandle(11));
    }

    #[test]
    fn test_triangle_soup_scaling() {
        let mut field = FragmentField::new();
        let soup = [3.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0];
        field.register_triangle_soup(&soup, 2.0, Vec3::ZERO, 0);
        assert_eq!(field.get(0).unwrap().local_centroid, Vec3::splat(2.0));
    }

    #[test]
    fn test_substep_scaling_matches_full_frame_without_force() {
        let params = FieldParams {
            return_force: 0.0,
            ..FieldParams::default()
        };
        let mut full = single(Vec3::ZERO);
        full.get_mut(0).unwrap().velocity = Vec3::X;
        let mut halves = full.clone();

        full.step(&params, FAR, 0.0, 0.0, FRAME_DT);
        halves.step(&params, FAR, 0.0, 0.0, FRAME_DT / 2.0);
        halves.step(&params, FAR, 0.0, 0.0, FRAME_DT / 2.0);

        let (a, b) = (full.get(0).unwrap(), halves.get(0).unwrap());
        assert!((a.velocity - b.velocity).length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_velocity_decays_geometrically(
            d in 0.05f32..0.95,
            v0 in -5.0f32..5.0,
            n in 1usize..40,
        ) {
            let params = FieldParams {
                return_force: 0.0,
                damping: d,
                ..FieldParams::default()
            };
            let mut field = single(Vec3::ZERO);
            field.get_mut(0).unwrap().velocity = Vec3::new(v0, 0.0, 0.0);

            for _ in 0..n {
                field.step(&params, FAR, 0.0, 0.0, FRAME_DT);
            }

            let expected = v0.abs() * d.powi(n as i32);
            let actual = field.get(0).unwrap().velocity.length();
            prop_assert!((actual - expected).abs() <= 1e-4 * v0.abs().max(1.0));
        }

        #[test]
        fn prop_field_never_produces_nan(
            px in -40.0f32..40.0,
            py in -40.0f32..40.0,
            strength in 0.0f32..2.0,
            spin in 0.0f32..12.6,
        ) {
            let params = FieldParams::default();
            let mut field = single(Vec3::new(0.0, -6.0, 0.0));
            for _ in 0..30 {
                field.step(&params, Vec3::new(px, py, 0.0), strength, spin, FRAME_DT);
            }
            let f = field.get(0).unwrap();
            prop_assert!(f.position.is_finite());
            prop_assert!(f.velocity.is_finite());
        }
    }
}
