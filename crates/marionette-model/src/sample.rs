//! Procedural random-humanoid generation.
//!
//! [`build_humanoid`] assembles a humanoid joint tree (torso root, neck and
//! head, two arms, two legs) with segment dimensions drawn from the
//! validated ranges of a [`HumanoidSampleConfig`]. Randomness is never
//! process-global: the configured seed drives a `ChaCha8Rng`, so the same
//! config always produces the same robot.

use nalgebra::{Isometry3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;
use crate::geometry::{GeomModel, GeomObject, GeomShape};
use crate::joint::{Joint, JointKind};
use crate::model::Model;

// ---------------------------------------------------------------------------
// SampleRange
// ---------------------------------------------------------------------------

/// A closed scalar range `[low, high]` to sample uniformly.
///
/// `low == high` is allowed and always returns that value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    /// Lower bound, inclusive.
    pub low: f32,
    /// Upper bound, inclusive.
    pub high: f32,
}

impl SampleRange {
    /// Create a validated range.
    pub fn new(low: f32, high: f32) -> Result<Self, ModelError> {
        let range = Self { low, high };
        range.validate()?;
        Ok(range)
    }

    /// Check bounds are finite and ordered.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            return Err(ModelError::InvalidRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    /// Draw a value from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.high > self.low {
            rng.gen_range(self.low..=self.high)
        } else {
            self.low
        }
    }

    /// Midpoint of the range.
    pub fn nominal(&self) -> f32 {
        (self.low + self.high) / 2.0
    }
}

// ---------------------------------------------------------------------------
// HumanoidSampleConfig
// ---------------------------------------------------------------------------

const fn range(low: f32, high: f32) -> SampleRange {
    SampleRange { low, high }
}

const fn default_torso_length() -> SampleRange {
    range(0.40, 0.60)
}
const fn default_shoulder_width() -> SampleRange {
    range(0.30, 0.44)
}
const fn default_hip_width() -> SampleRange {
    range(0.16, 0.24)
}
const fn default_neck_length() -> SampleRange {
    range(0.08, 0.14)
}
const fn default_head_radius() -> SampleRange {
    range(0.08, 0.12)
}
const fn default_upper_arm_length() -> SampleRange {
    range(0.24, 0.34)
}
const fn default_forearm_length() -> SampleRange {
    range(0.20, 0.30)
}
const fn default_thigh_length() -> SampleRange {
    range(0.34, 0.46)
}
const fn default_shin_length() -> SampleRange {
    range(0.30, 0.42)
}
const fn default_link_radius() -> SampleRange {
    range(0.04, 0.07)
}
const fn default_torso_mass() -> SampleRange {
    range(16.0, 30.0)
}
const fn default_limb_mass() -> SampleRange {
    range(1.0, 4.0)
}

/// Dimension and mass ranges for random humanoid generation.
///
/// Defaults give human-ish proportions in meters and kilograms. All
/// sampling is driven by `seed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanoidSampleConfig {
    /// Seed for the sampling RNG.
    #[serde(default)]
    pub seed: u64,

    /// Torso height, pelvis to shoulder line.
    #[serde(default = "default_torso_length")]
    pub torso_length: SampleRange,

    /// Distance between the two shoulder joints.
    #[serde(default = "default_shoulder_width")]
    pub shoulder_width: SampleRange,

    /// Distance between the two hip joints.
    #[serde(default = "default_hip_width")]
    pub hip_width: SampleRange,

    /// Shoulder line to head.
    #[serde(default = "default_neck_length")]
    pub neck_length: SampleRange,

    /// Head sphere radius.
    #[serde(default = "default_head_radius")]
    pub head_radius: SampleRange,

    /// Shoulder to elbow.
    #[serde(default = "default_upper_arm_length")]
    pub upper_arm_length: SampleRange,

    /// Elbow to wrist.
    #[serde(default = "default_forearm_length")]
    pub forearm_length: SampleRange,

    /// Hip to knee.
    #[serde(default = "default_thigh_length")]
    pub thigh_length: SampleRange,

    /// Knee to ankle.
    #[serde(default = "default_shin_length")]
    pub shin_length: SampleRange,

    /// Capsule radius of limb segments.
    #[serde(default = "default_link_radius")]
    pub link_radius: SampleRange,

    /// Torso body mass.
    #[serde(default = "default_torso_mass")]
    pub torso_mass: SampleRange,

    /// Mass of each limb segment.
    #[serde(default = "default_limb_mass")]
    pub limb_mass: SampleRange,
}

impl Default for HumanoidSampleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            torso_length: default_torso_length(),
            shoulder_width: default_shoulder_width(),
            hip_width: default_hip_width(),
            neck_length: default_neck_length(),
            head_radius: default_head_radius(),
            upper_arm_length: default_upper_arm_length(),
            forearm_length: default_forearm_length(),
            thigh_length: default_thigh_length(),
            shin_length: default_shin_length(),
            link_radius: default_link_radius(),
            torso_mass: default_torso_mass(),
            limb_mass: default_limb_mass(),
        }
    }
}

impl HumanoidSampleConfig {
    /// Validate every range. Returns the first offending range's error.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.torso_length.validate()?;
        self.shoulder_width.validate()?;
        self.hip_width.validate()?;
        self.neck_length.validate()?;
        self.head_radius.validate()?;
        self.upper_arm_length.validate()?;
        self.forearm_length.validate()?;
        self.thigh_length.validate()?;
        self.shin_length.validate()?;
        self.link_radius.validate()?;
        self.torso_mass.validate()?;
        self.limb_mass.validate()?;
        Ok(())
    }

    /// Same ranges, different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

// ---------------------------------------------------------------------------
// build_humanoid
// ---------------------------------------------------------------------------

/// Sampled dimensions shared by both body sides.
struct Dims {
    torso: f32,
    shoulder_w: f32,
    hip_w: f32,
    neck: f32,
    head_r: f32,
    upper_arm: f32,
    forearm: f32,
    thigh: f32,
    shin: f32,
    radius: f32,
}

/// Build a random humanoid model and its collision geometry.
///
/// The root carries the torso: a free-flyer joint when `free_flyer` is
/// set, a fixed world anchor otherwise. Limb segment lengths are sampled
/// once and mirrored left/right; masses are sampled per segment. Wrist
/// and ankle end-effector frames are registered as `l_wrist`, `r_wrist`,
/// `l_ankle`, `r_ankle`.
pub fn build_humanoid(
    name: &str,
    free_flyer: bool,
    config: &HumanoidSampleConfig,
) -> Result<(Model, GeomModel), ModelError> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let dims = Dims {
        torso: config.torso_length.sample(&mut rng),
        shoulder_w: config.shoulder_width.sample(&mut rng),
        hip_w: config.hip_width.sample(&mut rng),
        neck: config.neck_length.sample(&mut rng),
        head_r: config.head_radius.sample(&mut rng),
        upper_arm: config.upper_arm_length.sample(&mut rng),
        forearm: config.forearm_length.sample(&mut rng),
        thigh: config.thigh_length.sample(&mut rng),
        shin: config.shin_length.sample(&mut rng),
        radius: config.link_radius.sample(&mut rng),
    };

    let mut model = Model::new(name);
    let mut geom = GeomModel::new();

    let root_kind = if free_flyer {
        JointKind::FreeFlyer
    } else {
        JointKind::Fixed
    };
    let root = model.append_joint(
        None,
        Joint::new("root_joint", root_kind).with_inertia(
            config.torso_mass.sample(&mut rng),
            Vector3::new(0.0, 0.0, 0.5 * dims.torso),
        ),
    )?;
    geom.add_object(GeomObject::new(
        "torso",
        root,
        Isometry3::translation(0.0, 0.0, 0.5 * dims.torso),
        GeomShape::Capsule {
            radius: 1.8 * dims.radius,
            half_length: 0.5 * dims.torso,
        },
    ));

    let neck = model.append_joint(
        Some(root),
        Joint::new("neck", JointKind::Revolute)
            .with_placement(Isometry3::translation(0.0, 0.0, dims.torso))
            .with_axis(Vector3::y_axis())
            .with_inertia(
                config.limb_mass.sample(&mut rng),
                Vector3::new(0.0, 0.0, dims.neck),
            ),
    )?;
    model.set_joint_position_limits(neck, &[-0.8], &[0.8])?;
    geom.add_object(GeomObject::new(
        "head",
        neck,
        Isometry3::translation(0.0, 0.0, dims.neck + dims.head_r),
        GeomShape::Sphere {
            radius: dims.head_r,
        },
    ));

    for (side, sign) in [("l", 1.0_f32), ("r", -1.0)] {
        append_arm(&mut model, &mut geom, &mut rng, config, &dims, root, side, sign)?;
        append_leg(&mut model, &mut geom, &mut rng, config, &dims, root, side, sign)?;
    }

    debug!(
        robot = name,
        joints = model.njoints(),
        nq = model.nq(),
        "sampled random humanoid"
    );
    Ok((model, geom))
}

#[allow(clippy::too_many_arguments)]
fn append_arm<R: Rng + ?Sized>(
    model: &mut Model,
    geom: &mut GeomModel,
    rng: &mut R,
    config: &HumanoidSampleConfig,
    dims: &Dims,
    root: usize,
    side: &str,
    sign: f32,
) -> Result<(), ModelError> {
    let pitch = model.append_joint(
        Some(root),
        Joint::new(format!("{side}_shoulder_pitch"), JointKind::Revolute)
            .with_placement(Isometry3::translation(
                0.0,
                sign * 0.5 * dims.shoulder_w,
                0.92 * dims.torso,
            ))
            .with_axis(Vector3::y_axis()),
    )?;
    model.set_joint_position_limits(pitch, &[-2.6], &[2.6])?;

    let roll = model.append_joint(
        Some(pitch),
        Joint::new(format!("{side}_shoulder_roll"), JointKind::Revolute)
            .with_axis(Vector3::x_axis())
            .with_inertia(
                config.limb_mass.sample(rng),
                Vector3::new(0.0, 0.0, -0.5 * dims.upper_arm),
            ),
    )?;
    model.set_joint_position_limits(roll, &[-1.6], &[1.6])?;
    geom.add_object(GeomObject::new(
        format!("{side}_upper_arm"),
        roll,
        Isometry3::translation(0.0, 0.0, -0.5 * dims.upper_arm),
        GeomShape::Capsule {
            radius: dims.radius,
            half_length: 0.5 * dims.upper_arm,
        },
    ));

    let elbow = model.append_joint(
        Some(roll),
        Joint::new(format!("{side}_elbow"), JointKind::Revolute)
            .with_placement(Isometry3::translation(0.0, 0.0, -dims.upper_arm))
            .with_axis(Vector3::y_axis())
            .with_inertia(
                config.limb_mass.sample(rng),
                Vector3::new(0.0, 0.0, -0.5 * dims.forearm),
            ),
    )?;
    model.set_joint_position_limits(elbow, &[-2.4], &[0.0])?;
    geom.add_object(GeomObject::new(
        format!("{side}_forearm"),
        elbow,
        Isometry3::translation(0.0, 0.0, -0.5 * dims.forearm),
        GeomShape::Capsule {
            radius: 0.8 * dims.radius,
            half_length: 0.5 * dims.forearm,
        },
    ));

    let wrist = model.append_joint(
        Some(elbow),
        Joint::new(format!("{side}_wrist"), JointKind::Revolute)
            .with_placement(Isometry3::translation(0.0, 0.0, -dims.forearm))
            .with_axis(Vector3::y_axis())
            .with_inertia(0.3 * config.limb_mass.sample(rng), Vector3::zeros()),
    )?;
    model.set_joint_position_limits(wrist, &[-1.6], &[1.6])?;
    geom.add_object(GeomObject::new(
        format!("{side}_hand"),
        wrist,
        Isometry3::translation(0.0, 0.0, -dims.radius),
        GeomShape::Sphere {
            radius: 0.9 * dims.radius,
        },
    ));

    model.add_frame(format!("{side}_wrist"), wrist, Isometry3::identity())?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn append_leg<R: Rng + ?Sized>(
    model: &mut Model,
    geom: &mut GeomModel,
    rng: &mut R,
    config: &HumanoidSampleConfig,
    dims: &Dims,
    root: usize,
    side: &str,
    sign: f32,
) -> Result<(), ModelError> {
    let pitch = model.append_joint(
        Some(root),
        Joint::new(format!("{side}_hip_pitch"), JointKind::Revolute)
            .with_placement(Isometry3::translation(0.0, sign * 0.5 * dims.hip_w, 0.0))
            .with_axis(Vector3::y_axis()),
    )?;
    model.set_joint_position_limits(pitch, &[-2.0], &[2.0])?;

    let roll = model.append_joint(
        Some(pitch),
        Joint::new(format!("{side}_hip_roll"), JointKind::Revolute)
            .with_axis(Vector3::x_axis())
            .with_inertia(
                config.limb_mass.sample(rng),
                Vector3::new(0.0, 0.0, -0.5 * dims.thigh),
            ),
    )?;
    model.set_joint_position_limits(roll, &[-0.8], &[0.8])?;
    geom.add_object(GeomObject::new(
        format!("{side}_thigh"),
        roll,
        Isometry3::translation(0.0, 0.0, -0.5 * dims.thigh),
        GeomShape::Capsule {
            radius: 1.2 * dims.radius,
            half_length: 0.5 * dims.thigh,
        },
    ));

    let knee = model.append_joint(
        Some(roll),
        Joint::new(format!("{side}_knee"), JointKind::Revolute)
            .with_placement(Isometry3::translation(0.0, 0.0, -dims.thigh))
            .with_axis(Vector3::y_axis())
            .with_inertia(
                config.limb_mass.sample(rng),
                Vector3::new(0.0, 0.0, -0.5 * dims.shin),
            ),
    )?;
    model.set_joint_position_limits(knee, &[0.0], &[2.3])?;
    geom.add_object(GeomObject::new(
        format!("{side}_shin"),
        knee,
        Isometry3::translation(0.0, 0.0, -0.5 * dims.shin),
        GeomShape::Capsule {
            radius: dims.radius,
            half_length: 0.5 * dims.shin,
        },
    ));

    let ankle = model.append_joint(
        Some(knee),
        Joint::new(format!("{side}_ankle"), JointKind::Revolute)
            .with_placement(Isometry3::translation(0.0, 0.0, -dims.shin))
            .with_axis(Vector3::y_axis())
            .with_inertia(0.5 * config.limb_mass.sample(rng), Vector3::zeros()),
    )?;
    model.set_joint_position_limits(ankle, &[-0.9], &[0.9])?;
    geom.add_object(GeomObject::new(
        format!("{side}_foot"),
        ankle,
        Isometry3::translation(0.5 * dims.radius, 0.0, -0.8 * dims.radius),
        GeomShape::Box {
            half_extents: Vector3::new(1.8 * dims.radius, 0.9 * dims.radius, 0.35 * dims.radius),
        },
    ));

    model.add_frame(format!("{side}_ankle"), ankle, Isometry3::identity())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
