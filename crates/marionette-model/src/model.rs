//! The kinematic model: joint tree, operational frames, position limits.
//!
//! A [`Model`] is append-only structure: joints are added root-first via
//! [`Model::append_joint`], which assigns position/velocity offsets and
//! seeds default limits for the new slice. Limits are mutated only through
//! the explicit limit-setting calls, never by positional slicing; the
//! root-bound accessors check that the root joint actually has the degrees
//! of freedom being bounded.

use std::f32::consts::PI;

use nalgebra::{DVector, Isometry3};

use crate::error::ModelError;
use crate::joint::{Joint, JointKind};

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// An operational frame: a named pose rigidly attached to a joint.
///
/// Used for end-effector registration and for links severed from the
/// moving tree by fixed joints.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame name, unique within the model.
    pub name: String,
    /// Index of the joint the frame is attached to.
    pub joint: usize,
    /// Placement of the frame in the joint's frame.
    pub placement: Isometry3<f32>,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Complete kinematic structure of one robot.
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    joints: Vec<Joint>,
    frames: Vec<Frame>,
    nq: usize,
    nv: usize,
    lower_position_limit: Vec<f32>,
    upper_position_limit: Vec<f32>,
}

impl Model {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Robot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All joints, in tree order (root first).
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Number of joints.
    pub fn njoints(&self) -> usize {
        self.joints.len()
    }

    /// Width of the position vector.
    pub const fn nq(&self) -> usize {
        self.nq
    }

    /// Width of the velocity vector.
    pub const fn nv(&self) -> usize {
        self.nv
    }

    /// Lower position limit, one entry per position coordinate.
    pub fn lower_position_limit(&self) -> &[f32] {
        &self.lower_position_limit
    }

    /// Upper position limit, one entry per position coordinate.
    pub fn upper_position_limit(&self) -> &[f32] {
        &self.upper_position_limit
    }

    /// All operational frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    // -- Tree construction --------------------------------------------------

    /// Append a joint to the tree and return its index.
    ///
    /// The first appended joint is the root and must have `parent == None`;
    /// every later joint needs an existing parent index. The new joint's
    /// position slice is seeded with kind-specific default limits:
    /// unbounded translation, ±1 quaternion components, ±π for yaw and
    /// continuous joints, unbounded otherwise.
    pub fn append_joint(
        &mut self,
        parent: Option<usize>,
        mut joint: Joint,
    ) -> Result<usize, ModelError> {
        match parent {
            None if !self.joints.is_empty() => {
                return Err(ModelError::MissingParent(joint.name));
            }
            Some(p) if p >= self.joints.len() => {
                return Err(ModelError::ParentOutOfRange {
                    parent: p,
                    njoints: self.joints.len(),
                });
            }
            _ => {}
        }
        if self.joints.iter().any(|j| j.name == joint.name) {
            return Err(ModelError::DuplicateJoint(joint.name));
        }

        joint.parent = parent;
        joint.idx_q = self.nq;
        joint.idx_v = self.nv;
        self.nq += joint.kind.nq();
        self.nv += joint.kind.nv();

        let (lower, upper) = default_limits(joint.kind);
        self.lower_position_limit.extend_from_slice(lower);
        self.upper_position_limit.extend_from_slice(upper);

        self.joints.push(joint);
        Ok(self.joints.len() - 1)
    }

    /// Look up a joint index by name.
    pub fn joint_index(&self, name: &str) -> Result<usize, ModelError> {
        self.joints
            .iter()
            .position(|j| j.name == name)
            .ok_or_else(|| ModelError::MissingJoint(name.into()))
    }

    /// Look up a joint by name.
    pub fn joint(&self, name: &str) -> Result<&Joint, ModelError> {
        self.joint_index(name).map(|i| &self.joints[i])
    }

    // -- Frames -------------------------------------------------------------

    /// Attach a named frame to a joint and return its index.
    pub fn add_frame(
        &mut self,
        name: impl Into<String>,
        joint: usize,
        placement: Isometry3<f32>,
    ) -> Result<usize, ModelError> {
        let name = name.into();
        if joint >= self.joints.len() {
            return Err(ModelError::JointOutOfRange {
                index: joint,
                njoints: self.joints.len(),
            });
        }
        if self.frames.iter().any(|f| f.name == name) {
            return Err(ModelError::DuplicateFrame(name));
        }
        self.frames.push(Frame {
            name,
            joint,
            placement,
        });
        Ok(self.frames.len() - 1)
    }

    /// Look up a frame index by name.
    pub fn frame_index(&self, name: &str) -> Result<usize, ModelError> {
        self.frames
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| ModelError::MissingFrame(name.into()))
    }

    /// Look up a frame by name.
    pub fn frame(&self, name: &str) -> Result<&Frame, ModelError> {
        self.frame_index(name).map(|i| &self.frames[i])
    }

    // -- Configurations -----------------------------------------------------

    /// The neutral configuration: zeros, with identity quaternions.
    pub fn neutral(&self) -> DVector<f32> {
        let mut q = DVector::zeros(self.nq);
        for joint in &self.joints {
            if joint.kind == JointKind::FreeFlyer {
                q[joint.idx_q + 6] = 1.0;
            }
        }
        q
    }

    // -- Limit mutation -----------------------------------------------------

    /// Set the position limits of one joint's full slice.
    pub fn set_joint_position_limits(
        &mut self,
        joint: usize,
        lower: &[f32],
        upper: &[f32],
    ) -> Result<(), ModelError> {
        let j = self
            .joints
            .get(joint)
            .ok_or(ModelError::JointOutOfRange {
                index: joint,
                njoints: self.joints.len(),
            })?;
        let width = j.kind.nq();
        if lower.len() != width || upper.len() != width {
            return Err(ModelError::LimitDim {
                joint: j.name.clone(),
                expected: width,
                got: lower.len().max(upper.len()),
            });
        }
        let idx_q = j.idx_q;
        self.write_limits(idx_q, lower, upper)
    }

    /// Bound the root joint's translation coordinates.
    ///
    /// Expects 3 values per slice for a free-flyer root and 2 for a planar
    /// root; any other root kind is an error, so a bound can never land on
    /// an unrelated degree of freedom.
    pub fn set_root_translation_bounds(
        &mut self,
        lower: &[f32],
        upper: &[f32],
    ) -> Result<(), ModelError> {
        let root = self.joints.first().ok_or(ModelError::EmptyModel)?;
        let width = match root.kind {
            JointKind::FreeFlyer => 3,
            JointKind::Planar => 2,
            kind => {
                return Err(ModelError::RootJointMismatch {
                    expected: "free-flyer or planar",
                    root: kind,
                });
            }
        };
        if lower.len() != width || upper.len() != width {
            return Err(ModelError::LimitDim {
                joint: root.name.clone(),
                expected: width,
                got: lower.len().max(upper.len()),
            });
        }
        self.write_limits(0, lower, upper)
    }

    /// Bound the root free-flyer's quaternion coordinates (4 components).
    ///
    /// Errors unless the root joint is a free-flyer.
    pub fn set_root_orientation_bounds(
        &mut self,
        lower: &[f32],
        upper: &[f32],
    ) -> Result<(), ModelError> {
        let root = self.joints.first().ok_or(ModelError::EmptyModel)?;
        if root.kind != JointKind::FreeFlyer {
            return Err(ModelError::RootJointMismatch {
                expected: "free-flyer",
                root: root.kind,
            });
        }
        if lower.len() != 4 || upper.len() != 4 {
            return Err(ModelError::LimitDim {
                joint: root.name.clone(),
                expected: 4,
                got: lower.len().max(upper.len()),
            });
        }
        self.write_limits(3, lower, upper)
    }

    fn write_limits(
        &mut self,
        offset: usize,
        lower: &[f32],
        upper: &[f32],
    ) -> Result<(), ModelError> {
        for (i, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(ModelError::InvalidBounds {
                    index: offset + i,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        self.lower_position_limit[offset..offset + lower.len()].copy_from_slice(lower);
        self.upper_position_limit[offset..offset + upper.len()].copy_from_slice(upper);
        Ok(())
    }
}

const FREE_FLYER_LOWER: [f32; 7] = [-f32::MAX, -f32::MAX, -f32::MAX, -1.0, -1.0, -1.0, -1.0];
const FREE_FLYER_UPPER: [f32; 7] = [f32::MAX, f32::MAX, f32::MAX, 1.0, 1.0, 1.0, 1.0];
const PLANAR_LOWER: [f32; 3] = [-f32::MAX, -f32::MAX, -PI];
const PLANAR_UPPER: [f32; 3] = [f32::MAX, f32::MAX, PI];
const ANGULAR_LOWER: [f32; 1] = [-PI];
const ANGULAR_UPPER: [f32; 1] = [PI];
const UNBOUNDED_LOWER: [f32; 1] = [-f32::MAX];
const UNBOUNDED_UPPER: [f32; 1] = [f32::MAX];

/// Default position limits for a freshly appended joint, per kind.
const fn default_limits(kind: JointKind) -> (&'static [f32], &'static [f32]) {
    match kind {
        JointKind::FreeFlyer => (&FREE_FLYER_LOWER, &FREE_FLYER_UPPER),
        JointKind::Planar => (&PLANAR_LOWER, &PLANAR_UPPER),
        JointKind::Continuous => (&ANGULAR_LOWER, &ANGULAR_UPPER),
        JointKind::Revolute | JointKind::Prismatic => (&UNBOUNDED_LOWER, &UNBOUNDED_UPPER),
        JointKind::Fixed => (&[], &[]),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn free_flyer_arm() -> Model {
        let mut model = Model::new("test");
        let root = model
            .append_joint(None, Joint::new("root_joint", JointKind::FreeFlyer))
            .unwrap();
        let shoulder = model
            .append_joint(
                Some(root),
                Joint::new("shoulder", JointKind::Revolute)
                    .with_placement(Isometry3::translation(0.0, 0.0, 0.3)),
            )
            .unwrap();
        model
            .append_joint(Some(shoulder), Joint::new("elbow", JointKind::Revolute))
            .unwrap();
        model
    }

    // -- Tree construction --

    #[test]
    fn offsets_partition_position_vector() {
        let model = free_flyer_arm();
        assert_eq!(model.nq(), 9);
        assert_eq!(model.nv(), 8);
        assert_eq!(model.joints()[0].idx_q, 0);
        assert_eq!(model.joints()[1].idx_q, 7);
        assert_eq!(model.joints()[2].idx_q, 8);
        assert_eq!(model.lower_position_limit().len(), model.nq());
    }

    #[test]
    fn second_root_rejected() {
        let mut model = free_flyer_arm();
        let err = model
            .append_joint(None, Joint::new("other_root", JointKind::Fixed))
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingParent(_)));
    }

    #[test]
    fn parent_out_of_range_rejected() {
        let mut model = Model::new("test");
        let err = model
            .append_joint(Some(3), Joint::new("j", JointKind::Revolute))
            .unwrap_err();
        assert!(matches!(err, ModelError::ParentOutOfRange { .. }));
    }

    #[test]
    fn duplicate_joint_name_rejected() {
        let mut model = free_flyer_arm();
        let err = model
            .append_joint(Some(0), Joint::new("elbow", JointKind::Revolute))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateJoint(_)));
    }

    #[test]
    fn joint_lookup() {
        let model = free_flyer_arm();
        assert_eq!(model.joint_index("shoulder").unwrap(), 1);
        assert!(model.joint("missing").is_err());
    }

    // -- Default limits --

    #[test]
    fn free_flyer_default_limits() {
        let model = free_flyer_arm();
        let lower = model.lower_position_limit();
        let upper = model.upper_position_limit();
        for k in 0..3 {
            assert_eq!(lower[k], -f32::MAX);
            assert_eq!(upper[k], f32::MAX);
        }
        for k in 3..7 {
            assert_eq!(lower[k], -1.0);
            assert_eq!(upper[k], 1.0);
        }
    }

    #[test]
    fn continuous_defaults_to_pi() {
        let mut model = Model::new("test");
        model
            .append_joint(None, Joint::new("wheel", JointKind::Continuous))
            .unwrap();
        assert!((model.lower_position_limit()[0] + PI).abs() < f32::EPSILON);
        assert!((model.upper_position_limit()[0] - PI).abs() < f32::EPSILON);
    }

    // -- Neutral configuration --

    #[test]
    fn neutral_has_identity_quaternion() {
        let model = free_flyer_arm();
        let q = model.neutral();
        assert_eq!(q.len(), 9);
        for k in 0..6 {
            assert!(q[k].abs() < f32::EPSILON);
        }
        assert!((q[6] - 1.0).abs() < f32::EPSILON);
        assert!(q[7].abs() < f32::EPSILON);
    }

    // -- Limit mutation --

    #[test]
    fn set_joint_position_limits() {
        let mut model = free_flyer_arm();
        model
            .set_joint_position_limits(1, &[-1.57], &[1.57])
            .unwrap();
        assert!((model.lower_position_limit()[7] + 1.57).abs() < f32::EPSILON);
        assert!((model.upper_position_limit()[7] - 1.57).abs() < f32::EPSILON);
    }

    #[test]
    fn set_joint_position_limits_wrong_width() {
        let mut model = free_flyer_arm();
        let err = model
            .set_joint_position_limits(1, &[-1.0, -1.0], &[1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, ModelError::LimitDim { expected: 1, .. }));
    }

    #[test]
    fn root_translation_bounds_free_flyer() {
        let mut model = free_flyer_arm();
        model
            .set_root_translation_bounds(&[-1.0; 3], &[1.0; 3])
            .unwrap();
        for k in 0..3 {
            assert_eq!(model.lower_position_limit()[k], -1.0);
            assert_eq!(model.upper_position_limit()[k], 1.0);
        }
        // Quaternion slice untouched
        assert_eq!(model.lower_position_limit()[3], -1.0);
        assert_eq!(model.upper_position_limit()[6], 1.0);
    }

    #[test]
    fn root_translation_bounds_planar_takes_two() {
        let mut model = Model::new("cart");
        model
            .append_joint(None, Joint::new("root_joint", JointKind::Planar))
            .unwrap();
        model
            .set_root_translation_bounds(&[-1.0, -1.0], &[1.0, 1.0])
            .unwrap();
        assert_eq!(model.lower_position_limit()[0], -1.0);
        assert_eq!(model.upper_position_limit()[1], 1.0);
        // Yaw keeps its default
        assert!((model.lower_position_limit()[2] + PI).abs() < f32::EPSILON);
    }

    #[test]
    fn root_translation_bounds_rejects_fixed_root() {
        let mut model = Model::new("anchored");
        model
            .append_joint(None, Joint::new("root_joint", JointKind::Fixed))
            .unwrap();
        let err = model
            .set_root_translation_bounds(&[-1.0; 3], &[1.0; 3])
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::RootJointMismatch {
                root: JointKind::Fixed,
                ..
            }
        ));
    }

    #[test]
    fn root_orientation_bounds() {
        let mut model = free_flyer_arm();
        model
            .set_root_orientation_bounds(&[-1.01; 4], &[1.01; 4])
            .unwrap();
        for k in 3..7 {
            assert_eq!(model.lower_position_limit()[k], -1.01);
            assert_eq!(model.upper_position_limit()[k], 1.01);
        }
        // Translation slice untouched
        assert_eq!(model.lower_position_limit()[0], -f32::MAX);
    }

    #[test]
    fn root_orientation_bounds_rejects_planar() {
        let mut model = Model::new("cart");
        model
            .append_joint(None, Joint::new("root_joint", JointKind::Planar))
            .unwrap();
        assert!(
            model
                .set_root_orientation_bounds(&[-1.01; 4], &[1.01; 4])
                .is_err()
        );
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut model = free_flyer_arm();
        let err = model
            .set_root_translation_bounds(&[1.0, 0.0, 0.0], &[-1.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidBounds { index: 0, .. }));
    }

    #[test]
    fn bounds_on_empty_model_rejected() {
        let mut model = Model::new("empty");
        assert!(matches!(
            model.set_root_translation_bounds(&[-1.0; 3], &[1.0; 3]),
            Err(ModelError::EmptyModel)
        ));
    }

    // -- Frames --

    #[test]
    fn add_and_find_frame() {
        let mut model = free_flyer_arm();
        let idx = model
            .add_frame("ee", 2, Isometry3::translation(0.0, 0.0, 0.25))
            .unwrap();
        assert_eq!(model.frame_index("ee").unwrap(), idx);
        let frame = model.frame("ee").unwrap();
        assert_eq!(frame.joint, 2);
        assert!((frame.placement.translation.z - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn duplicate_frame_rejected() {
        let mut model = free_flyer_arm();
        model.add_frame("ee", 2, Isometry3::identity()).unwrap();
        assert!(matches!(
            model.add_frame("ee", 1, Isometry3::identity()),
            Err(ModelError::DuplicateFrame(_))
        ));
    }

    #[test]
    fn frame_on_missing_joint_rejected() {
        let mut model = free_flyer_arm();
        assert!(matches!(
            model.add_frame("ee", 9, Isometry3::identity()),
            Err(ModelError::JointOutOfRange { .. })
        ));
    }

    #[test]
    fn with_inertia_kept() {
        let mut model = Model::new("test");
        model
            .append_joint(
                None,
                Joint::new("root_joint", JointKind::FreeFlyer)
                    .with_inertia(12.0, Vector3::new(0.0, 0.0, 0.2)),
            )
            .unwrap();
        assert!((model.joints()[0].mass - 12.0).abs() < f32::EPSILON);
    }
}
