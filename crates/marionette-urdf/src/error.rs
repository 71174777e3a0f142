//! Error types for description loading.

use std::path::PathBuf;

use marionette_model::{JointKind, ModelError};

/// Errors that can occur while loading a robot description.
#[derive(Debug, thiserror::Error)]
pub enum UrdfError {
    /// Failed to read the description file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse URDF XML content.
    #[error("URDF parse error: {0}")]
    Parse(String),

    /// A joint type the model layer cannot represent.
    #[error("unsupported joint type: {0}")]
    UnsupportedJointType(String),

    /// The requested root joint kind cannot anchor a description.
    #[error("unsupported root joint kind: {0:?}")]
    UnsupportedRootJoint(JointKind),

    /// A moving joint's axis has (near) zero length.
    #[error("invalid axis on joint: {0}")]
    InvalidJointAxis(String),

    /// The description has no root link (no link that is never a child).
    #[error("no root link found")]
    NoRootLink,

    /// A joint references a link the description does not define.
    #[error("missing link: {0}")]
    MissingLink(String),

    /// Humanoid setup could not locate a mandatory end-effector.
    #[error("missing humanoid end-effector: {0}")]
    MissingEndEffector(String),

    /// Error from the model layer while assembling the joint tree.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
