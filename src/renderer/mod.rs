//! Render hand-off module
//!
//! POD records for the external WebGL/WebGPU renderer. Drawing itself
//! happens outside this crate.

pub mod instance;

pub use instance::{FiringUniform, InstanceRaw, collect_instances, instance_floats};
