//! Humanoid-specific post-load setup.

use nalgebra::Isometry3;
use tracing::debug;

use marionette_model::Model;

use crate::error::UrdfError;

/// End-effector frames every humanoid model must expose.
const END_EFFECTOR_TAGS: [&str; 4] = ["l_wrist", "r_wrist", "l_ankle", "r_ankle"];

/// Register the standard humanoid end-effector frames.
///
/// For each of `l_wrist`, `r_wrist`, `l_ankle`, `r_ankle`: if the model
/// already exposes a frame by that name, it is kept; otherwise a frame is
/// attached to the first joint whose name contains the tag. A humanoid
/// description matching neither is rejected.
pub fn setup_humanoid(model: &mut Model) -> Result<(), UrdfError> {
    for tag in END_EFFECTOR_TAGS {
        if model.frame_index(tag).is_ok() {
            continue;
        }
        let joint = model
            .joints()
            .iter()
            .position(|j| j.name.contains(tag))
            .ok_or_else(|| UrdfError::MissingEndEffector(tag.into()))?;
        model.add_frame(tag, joint, Isometry3::identity())?;
        debug!(frame = tag, joint, "registered end-effector frame");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
