//! Joint kinds and the per-joint entry of the kinematic tree.

use nalgebra::{Isometry3, UnitVector3, Vector3};

// ---------------------------------------------------------------------------
// JointKind
// ---------------------------------------------------------------------------

/// Kind of a joint in the kinematic tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointKind {
    /// Unconstrained 6-DOF root: x/y/z translation plus a unit quaternion
    /// stored as (x, y, z, w).
    FreeFlyer,
    /// Planar root: x/y translation plus yaw.
    Planar,
    /// Rotation about a single axis, with position limits.
    Revolute,
    /// Unlimited rotation about a single axis.
    Continuous,
    /// Translation along an axis, with position limits.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
}

impl JointKind {
    /// Width of this joint's slice of the position vector.
    pub const fn nq(self) -> usize {
        match self {
            Self::FreeFlyer => 7,
            Self::Planar => 3,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
            Self::Fixed => 0,
        }
    }

    /// Width of this joint's slice of the velocity vector.
    pub const fn nv(self) -> usize {
        match self {
            Self::FreeFlyer => 6,
            Self::Planar => 3,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
            Self::Fixed => 0,
        }
    }

    /// Whether this joint contributes degrees of freedom.
    pub const fn is_moving(self) -> bool {
        !matches!(self, Self::Fixed)
    }
}

// ---------------------------------------------------------------------------
// Joint
// ---------------------------------------------------------------------------

/// One joint of a [`Model`](crate::Model).
///
/// The `parent`, `idx_q`, and `idx_v` fields are assigned by
/// [`Model::append_joint`](crate::Model::append_joint); constructors leave
/// them at placeholder values.
#[derive(Debug, Clone)]
pub struct Joint {
    /// Joint name, unique within the model.
    pub name: String,
    /// Joint kind.
    pub kind: JointKind,
    /// Index of the parent joint, `None` for the root.
    pub parent: Option<usize>,
    /// Placement of the joint frame in the parent joint's frame.
    pub placement: Isometry3<f32>,
    /// Motion axis in the joint's local frame (revolute/prismatic).
    pub axis: UnitVector3<f32>,
    /// Offset of this joint's slice in the position vector.
    pub idx_q: usize,
    /// Offset of this joint's slice in the velocity vector.
    pub idx_v: usize,
    /// Mass of the body carried by this joint, in kilograms.
    pub mass: f32,
    /// Center of mass of the carried body, in the joint frame.
    pub com_local: Vector3<f32>,
}

impl Joint {
    /// Create a joint with identity placement, z motion axis, and no inertia.
    pub fn new(name: impl Into<String>, kind: JointKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            placement: Isometry3::identity(),
            axis: Vector3::z_axis(),
            idx_q: 0,
            idx_v: 0,
            mass: 0.0,
            com_local: Vector3::zeros(),
        }
    }

    /// Set the placement of the joint frame in the parent frame.
    #[must_use]
    pub fn with_placement(mut self, placement: Isometry3<f32>) -> Self {
        self.placement = placement;
        self
    }

    /// Set the motion axis.
    #[must_use]
    pub fn with_axis(mut self, axis: UnitVector3<f32>) -> Self {
        self.axis = axis;
        self
    }

    /// Set the mass and local center of mass of the carried body.
    #[must_use]
    pub fn with_inertia(mut self, mass: f32, com_local: Vector3<f32>) -> Self {
        self.mass = mass;
        self.com_local = com_local;
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_widths() {
        assert_eq!(JointKind::FreeFlyer.nq(), 7);
        assert_eq!(JointKind::Planar.nq(), 3);
        assert_eq!(JointKind::Revolute.nq(), 1);
        assert_eq!(JointKind::Continuous.nq(), 1);
        assert_eq!(JointKind::Prismatic.nq(), 1);
        assert_eq!(JointKind::Fixed.nq(), 0);
    }

    #[test]
    fn velocity_widths() {
        assert_eq!(JointKind::FreeFlyer.nv(), 6);
        assert_eq!(JointKind::Planar.nv(), 3);
        assert_eq!(JointKind::Fixed.nv(), 0);
    }

    #[test]
    fn moving_kinds() {
        assert!(JointKind::FreeFlyer.is_moving());
        assert!(JointKind::Revolute.is_moving());
        assert!(!JointKind::Fixed.is_moving());
    }

    #[test]
    fn joint_builder_defaults() {
        let j = Joint::new("elbow", JointKind::Revolute);
        assert_eq!(j.name, "elbow");
        assert!(j.parent.is_none());
        assert!(j.mass.abs() < f32::EPSILON);
    }

    #[test]
    fn joint_builder_overrides() {
        let j = Joint::new("slider", JointKind::Prismatic)
            .with_axis(Vector3::x_axis())
            .with_inertia(2.5, Vector3::new(0.0, 0.0, 0.1));
        assert!((j.axis.x - 1.0).abs() < f32::EPSILON);
        assert!((j.mass - 2.5).abs() < f32::EPSILON);
    }
}
