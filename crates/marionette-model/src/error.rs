//! Error types for model construction, mutation, and queries.

use crate::joint::JointKind;

/// Errors that can occur while building or querying a kinematic model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A joint was appended with a parent index past the end of the tree.
    #[error("parent joint index {parent} out of range (model has {njoints} joints)")]
    ParentOutOfRange { parent: usize, njoints: usize },

    /// A non-root joint was appended without a parent.
    #[error("joint {0:?} requires a parent (only the first joint attaches to the world)")]
    MissingParent(String),

    /// A joint name is already taken.
    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// A frame name is already taken.
    #[error("duplicate frame name: {0}")]
    DuplicateFrame(String),

    /// A joint index does not exist in the model.
    #[error("joint index {index} out of range (model has {njoints} joints)")]
    JointOutOfRange { index: usize, njoints: usize },

    /// A referenced joint was not found in the model.
    #[error("missing joint: {0}")]
    MissingJoint(String),

    /// A referenced frame was not found in the model.
    #[error("missing frame: {0}")]
    MissingFrame(String),

    /// A configuration vector has the wrong length.
    #[error("configuration dimension mismatch: expected {expected}, got {got}")]
    ConfigurationDim { expected: usize, got: usize },

    /// A limit slice does not match the targeted joint's position width.
    #[error("limit dimension mismatch for joint {joint:?}: expected {expected}, got {got}")]
    LimitDim {
        joint: String,
        expected: usize,
        got: usize,
    },

    /// A lower bound exceeds its upper bound, or a bound is NaN.
    #[error("invalid bounds at dof {index}: lower={lower}, upper={upper}")]
    InvalidBounds { index: usize, lower: f32, upper: f32 },

    /// A root-specific operation was applied to the wrong kind of root joint.
    #[error("root joint is {root:?}, expected a {expected} root")]
    RootJointMismatch {
        expected: &'static str,
        root: JointKind,
    },

    /// A root-specific operation was applied to a model with no joints.
    #[error("model has no joints")]
    EmptyModel,

    /// A sampling range is inverted or non-finite.
    #[error("invalid sample range: low={low}, high={high}")]
    InvalidRange { low: f32, high: f32 },

    /// Geometry data buffers do not match the geometry model.
    #[error("geometry dimension mismatch: expected {expected} objects, got {got}")]
    GeometryDim { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
