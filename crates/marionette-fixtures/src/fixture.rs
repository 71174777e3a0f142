//! Named fixture robots: a closed set of predefined models.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use marionette_model::{ComputeFlags, JointKind, Robot};
use marionette_urdf::{load_robot_description, setup_humanoid};

use crate::builder::humanoid_random;
use crate::error::FixtureError;

// ---------------------------------------------------------------------------
// FixtureKind
// ---------------------------------------------------------------------------

/// The closed set of predefined fixture robots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// Planar-root vehicle loaded from `buggy_description`.
    CarLike,
    /// Anchored manipulator arm loaded from `arm_description`.
    ManipulatorArm2,
    /// Free-flyer humanoid loaded from `humanoid_description`, with
    /// end-effector frames registered.
    Humanoid,
    /// Procedurally generated free-flyer humanoid.
    HumanoidSimple,
}

impl FixtureKind {
    /// Every fixture kind, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::CarLike,
        Self::ManipulatorArm2,
        Self::Humanoid,
        Self::HumanoidSimple,
    ];

    const fn construction(self) -> Construction {
        match self {
            Self::CarLike => Construction::Load(&CARLIKE),
            Self::ManipulatorArm2 => Construction::Load(&ARM2),
            Self::Humanoid => Construction::Load(&HUMANOID),
            Self::HumanoidSimple => Construction::RandomHumanoid,
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CarLike => "carlike",
            Self::ManipulatorArm2 => "arm2",
            Self::Humanoid => "humanoid",
            Self::HumanoidSimple => "humanoid-simple",
        };
        f.write_str(name)
    }
}

impl FromStr for FixtureKind {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "carlike" | "car-like" => Ok(Self::CarLike),
            "arm2" | "arm" => Ok(Self::ManipulatorArm2),
            "humanoid" => Ok(Self::Humanoid),
            "humanoid-simple" | "simple-humanoid" => Ok(Self::HumanoidSimple),
            other => Err(FixtureError::UnknownKind(other.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction table
// ---------------------------------------------------------------------------

/// How a fixture kind is constructed.
enum Construction {
    /// Load a description package, then apply the descriptor's adjustments.
    Load(&'static FixtureDescriptor),
    /// Delegate to the random humanoid builder.
    RandomHumanoid,
}

/// Loader parameters and post-adjustments of one loaded fixture.
struct FixtureDescriptor {
    name: &'static str,
    root: JointKind,
    package: &'static str,
    model: &'static str,
    visual_suffix: &'static str,
    collision_suffix: &'static str,
    /// Whether the caller's path prefix reaches the loader. The car-like
    /// fixture always resolves through the default search path.
    forward_prefix: bool,
    /// Whether to register humanoid end-effector frames after loading.
    humanoid_setup: bool,
    /// Whether to clamp the root translation coordinates to [-1, 1].
    bound_root_translation: bool,
}

const CARLIKE: FixtureDescriptor = FixtureDescriptor {
    name: "carlike",
    root: JointKind::Planar,
    package: "buggy_description",
    model: "buggy",
    visual_suffix: "",
    collision_suffix: "",
    forward_prefix: false,
    humanoid_setup: false,
    bound_root_translation: true,
};

const ARM2: FixtureDescriptor = FixtureDescriptor {
    name: "arm",
    root: JointKind::Fixed,
    package: "arm_description",
    model: "arm2",
    visual_suffix: "_simple",
    collision_suffix: "_simple",
    forward_prefix: true,
    humanoid_setup: false,
    bound_root_translation: false,
};

const HUMANOID: FixtureDescriptor = FixtureDescriptor {
    name: "humanoid",
    root: JointKind::FreeFlyer,
    package: "humanoid_description",
    model: "humanoid",
    visual_suffix: "_small",
    collision_suffix: "_small",
    forward_prefix: true,
    humanoid_setup: true,
    bound_root_translation: true,
};

// ---------------------------------------------------------------------------
// make
// ---------------------------------------------------------------------------

/// Construct a predefined fixture robot.
///
/// `prefix` is the description search-path prefix; when empty, loaded
/// fixtures resolve through `ROBOT_DESCRIPTION_PATH` or the `assets`
/// directory. A failed call returns no partially adjusted handle.
pub fn make(kind: FixtureKind, prefix: &str) -> Result<Robot, FixtureError> {
    debug!(fixture = %kind, "constructing fixture robot");
    match kind.construction() {
        Construction::RandomHumanoid => {
            let mut robot = humanoid_random("simple-humanoid", true, ComputeFlags::default())?;
            bound_root_translation(&mut robot)?;
            Ok(robot)
        }
        Construction::Load(desc) => {
            let effective_prefix = if desc.forward_prefix { prefix } else { "" };
            let (mut model, geom_model) = load_robot_description(
                desc.root,
                effective_prefix,
                desc.package,
                desc.model,
                desc.visual_suffix,
                desc.collision_suffix,
            )?;
            if desc.humanoid_setup {
                setup_humanoid(&mut model)?;
            }
            let mut robot = Robot::new(desc.name, model, geom_model, ComputeFlags::default());
            if desc.bound_root_translation {
                bound_root_translation(&mut robot)?;
            }
            Ok(robot)
        }
    }
}

/// Clamp the root translation coordinates to [-1, 1], using the width the
/// root joint actually has.
fn bound_root_translation(robot: &mut Robot) -> Result<(), FixtureError> {
    let width = match robot.model().joints().first().map(|j| j.kind) {
        Some(JointKind::FreeFlyer) => 3,
        Some(JointKind::Planar) => 2,
        _ => 0,
    };
    if width > 0 {
        let lower = vec![-1.0_f32; width];
        let upper = vec![1.0_f32; width];
        robot
            .model_mut()
            .set_root_translation_bounds(&lower, &upper)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- FromStr / Display --

    #[test]
    fn names_round_trip() {
        for kind in FixtureKind::ALL {
            let parsed = FixtureKind::from_str(&kind.to_string()).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn aliases_accepted() {
        assert_eq!(
            FixtureKind::from_str("car-like").unwrap(),
            FixtureKind::CarLike
        );
        assert_eq!(
            FixtureKind::from_str("simple-humanoid").unwrap(),
            FixtureKind::HumanoidSimple
        );
    }

    #[test]
    fn unknown_name_rejected() {
        let err = FixtureKind::from_str("hexapod").unwrap_err();
        assert!(matches!(err, FixtureError::UnknownKind(name) if name == "hexapod"));
    }

    // -- HumanoidSimple (no description files needed) --

    #[test]
    fn humanoid_simple_bounds_base_translation() {
        let robot = make(FixtureKind::HumanoidSimple, "").unwrap();
        let lower = robot.model().lower_position_limit();
        let upper = robot.model().upper_position_limit();
        for k in 0..3 {
            assert_eq!(lower[k], -1.0);
            assert_eq!(upper[k], 1.0);
        }
        // The builder's quaternion slack survives the clamp
        for k in 3..7 {
            assert_eq!(lower[k], -1.01);
            assert_eq!(upper[k], 1.01);
        }
    }

    #[test]
    fn humanoid_simple_end_to_end() {
        let mut robot = make(FixtureKind::HumanoidSimple, "").unwrap();
        robot.compute_forward_kinematics().unwrap();
        let aabb = robot.compute_aabb();
        assert!(aabb.is_finite());
        // Swept by the [-1, 1] base bounds
        assert!(aabb.min.x <= -1.0);
        assert!(aabb.max.x >= 1.0);
    }
}
