//! Kinematic model library for Marionette robots.
//!
//! Provides the in-memory representation of a robot's joint tree
//! ([`Model`]), its computation scratch buffers ([`Data`]), collision
//! geometry ([`GeomModel`] / [`GeomData`]) with axis-aligned bounding-box
//! queries, and a procedural random-humanoid generator ([`build_humanoid`]).
//!
//! # Architecture
//!
//! ```text
//! Model + GeomModel ──► Data + GeomData ──► forward kinematics ──► AABB
//! ```
//!
//! A [`Model`] is immutable kinematic structure (joints, frames, position
//! limits); a [`Data`] holds everything recomputed per configuration. The
//! [`Robot`] handle bundles the four pieces with a current configuration
//! so callers can run placement and bounding-box queries directly.

pub mod data;
pub mod error;
pub mod geometry;
pub mod joint;
pub mod model;
pub mod robot;
pub mod sample;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use data::{ComputeFlags, Data, forward_kinematics};
pub use error::ModelError;
pub use geometry::{Aabb, GeomData, GeomModel, GeomObject, GeomShape, compute_aabb, update_geometry};
pub use joint::{Joint, JointKind};
pub use model::{Frame, Model};
pub use robot::Robot;
pub use sample::{HumanoidSampleConfig, SampleRange, build_humanoid};
