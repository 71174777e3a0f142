//! Random humanoid robot builder.

use tracing::debug;

use marionette_model::{ComputeFlags, HumanoidSampleConfig, Robot, build_humanoid};

use crate::error::FixtureError;

/// Translation bound magnitude for a free base: effectively unbounded.
const TRANSLATION_MAX: f32 = f32::MAX;

/// Quaternion component bound: slightly looser than the unit range, so a
/// configuration that drifted through renormalization still validates.
const QUATERNION_SLACK: f32 = 1.01;

/// Build a random humanoid robot with the default sampling config.
///
/// See [`humanoid_random_with`].
pub fn humanoid_random(
    name: &str,
    using_free_flyer: bool,
    flags: ComputeFlags,
) -> Result<Robot, FixtureError> {
    humanoid_random_with(name, using_free_flyer, flags, &HumanoidSampleConfig::default())
}

/// Build a random humanoid robot with an explicit sampling config.
///
/// The returned handle is query-ready: buffers are allocated for `flags`,
/// the configuration is neutral, and forward kinematics has already run.
/// With a free-flyer root, the root translation limits are widened to
/// ±[`f32::MAX`] per axis and the quaternion component limits to ±1.01;
/// without one there are no base coordinates to widen and the sampled
/// joint limits stand as-is.
pub fn humanoid_random_with(
    name: &str,
    using_free_flyer: bool,
    flags: ComputeFlags,
    config: &HumanoidSampleConfig,
) -> Result<Robot, FixtureError> {
    let (mut model, geom_model) = build_humanoid(name, using_free_flyer, config)?;

    if using_free_flyer {
        model.set_root_translation_bounds(&[-TRANSLATION_MAX; 3], &[TRANSLATION_MAX; 3])?;
        model.set_root_orientation_bounds(&[-QUATERNION_SLACK; 4], &[QUATERNION_SLACK; 4])?;
    }

    let mut robot = Robot::new(name, model, geom_model, flags);
    robot.compute_forward_kinematics()?;
    debug!(robot = name, nq = robot.model().nq(), "built random humanoid");
    Ok(robot)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
