//! Error types for robot factories.

use marionette_model::ModelError;
use marionette_urdf::UrdfError;

/// Errors that can occur while constructing a fixture robot.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture name is not one of the recognized kinds.
    #[error("unknown fixture kind: {0}")]
    UnknownKind(String),

    /// The fixture's description package failed to load.
    #[error("description load error: {0}")]
    Load(#[from] UrdfError),

    /// Model construction or limit adjustment failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
