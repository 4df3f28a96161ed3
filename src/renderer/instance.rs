//! Upload-ready instance and uniform records
//!
//! The core never touches the GPU. These are the byte layouts the
//! rendering collaborator copies into its buffers each frame.

use bytemuck::{Pod, Zeroable};

use crate::sim::SceneState;
use crate::sim::fragment::GeometryHandle;
use crate::sim::state::Transform;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

/// Per-object model matrix
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4], // offset 0, column-major
}

impl From<&Transform> for InstanceRaw {
    fn from(t: &Transform) -> Self {
        Self {
            model: t.to_matrix().to_cols_array_2d(),
        }
    }
}

/// Uniforms for the point-cloud shell's firing shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FiringUniform {
    pub time: f32,       // offset 0
    pub point_size: f32, // offset 4
    pub glow_gain: f32,  // offset 8
    pub period: f32,     // offset 12
    pub threshold: f32,  // offset 16
    pub freq_min: f32,   // offset 20
    pub freq_max: f32,   // offset 24
    pub phase_span: f32, // offset 28
}

impl FiringUniform {
    pub fn from_scene(state: &SceneState) -> Self {
        let firing = &state.tuning.firing;
        Self {
            time: state.firing_time(),
            point_size: firing.point_size,
            glow_gain: firing.glow_gain,
            period: firing.period,
            threshold: firing.threshold,
            freq_min: firing.freq_min,
            freq_max: firing.freq_max,
            phase_span: firing.phase_span,
        }
    }

    /// The block as plain floats, in field order
    pub fn to_floats(self) -> [f32; 8] {
        bytemuck::cast(self)
    }
}

/// Instance records for every tracked object, in registration order:
/// fragments, then animated objects, then text
pub fn collect_instances(state: &SceneState) -> (Vec<GeometryHandle>, Vec<InstanceRaw>) {
    state
        .fragment_transforms()
        .chain(state.object_transforms())
        .chain(state.text_transforms())
        .map(|(handle, t)| (handle, InstanceRaw::from(&t)))
        .unzip()
}

/// Flatten instances into one float buffer (16 floats each)
pub fn instance_floats(instances: &[InstanceRaw]) -> &[f32] {
    bytemuck::cast_slice(instances)
}
