//! Computation buffers and forward kinematics.
//!
//! A [`Data`] holds everything recomputed per configuration: world
//! placements of joints and frames, plus the optional derived quantities
//! selected by [`ComputeFlags`]. One `Data` belongs to one
//! [`Model`](crate::Model); buffers are sized at construction and reused
//! across [`forward_kinematics`] calls.

use nalgebra::{DVector, Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};

use crate::error::ModelError;
use crate::joint::{Joint, JointKind};
use crate::model::Model;

// ---------------------------------------------------------------------------
// ComputeFlags
// ---------------------------------------------------------------------------

/// Which derived quantities forward kinematics maintains.
///
/// Joint and frame placements are always computed; everything else is
/// opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeFlags {
    /// Maintain per-joint frame origins and world-frame axes, the inputs
    /// of geometric Jacobian columns.
    pub joint_jacobians: bool,
    /// Maintain the whole-body center of mass.
    pub center_of_mass: bool,
}

impl ComputeFlags {
    /// Placements only.
    pub const fn placements_only() -> Self {
        Self {
            joint_jacobians: false,
            center_of_mass: false,
        }
    }

    /// Every supported derived quantity.
    pub const fn all() -> Self {
        Self {
            joint_jacobians: true,
            center_of_mass: true,
        }
    }
}

impl Default for ComputeFlags {
    fn default() -> Self {
        Self::placements_only()
    }
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// Scratch buffers for one model.
#[derive(Debug, Clone)]
pub struct Data {
    /// World placement of each joint frame, in tree order.
    pub joint_placements: Vec<Isometry3<f32>>,
    /// World placement of each operational frame.
    pub frame_placements: Vec<Isometry3<f32>>,
    /// World origin of each joint frame before its motion is applied.
    /// Empty unless `joint_jacobians` is set.
    pub joint_origins: Vec<Vector3<f32>>,
    /// World direction of each joint's motion axis. Empty unless
    /// `joint_jacobians` is set.
    pub joint_axes: Vec<Vector3<f32>>,
    /// Whole-body center of mass. `None` until computed, and always `None`
    /// when `center_of_mass` is not set.
    pub com: Option<Vector3<f32>>,
    flags: ComputeFlags,
}

impl Data {
    /// Allocate buffers for `model` with the given flags.
    pub fn new(model: &Model, flags: ComputeFlags) -> Self {
        let njoints = model.njoints();
        let jac_len = if flags.joint_jacobians { njoints } else { 0 };
        Self {
            joint_placements: vec![Isometry3::identity(); njoints],
            frame_placements: vec![Isometry3::identity(); model.frames().len()],
            joint_origins: vec![Vector3::zeros(); jac_len],
            joint_axes: vec![Vector3::zeros(); jac_len],
            com: None,
            flags,
        }
    }

    /// The flags this data was allocated with.
    pub const fn flags(&self) -> ComputeFlags {
        self.flags
    }
}

// ---------------------------------------------------------------------------
// Forward kinematics
// ---------------------------------------------------------------------------

/// Propagate joint placements root-to-leaf for configuration `q`.
///
/// Also refreshes frame placements and, per `data`'s flags, joint
/// origins/axes and the center of mass. Quaternion slices are renormalized
/// on the fly, so configurations inside the slightly loosened ±1.01
/// component bounds are handled exactly.
pub fn forward_kinematics(
    model: &Model,
    data: &mut Data,
    q: &DVector<f32>,
) -> Result<(), ModelError> {
    if q.len() != model.nq() {
        return Err(ModelError::ConfigurationDim {
            expected: model.nq(),
            got: q.len(),
        });
    }

    for (i, joint) in model.joints().iter().enumerate() {
        let parent_placement = joint
            .parent
            .map_or_else(Isometry3::identity, |p| data.joint_placements[p]);
        let joint_frame = parent_placement * joint.placement;

        if data.flags.joint_jacobians {
            data.joint_origins[i] = joint_frame.translation.vector;
            data.joint_axes[i] = joint_frame.rotation * joint.axis.into_inner();
        }

        data.joint_placements[i] = joint_frame * joint_motion(joint, q);
    }

    for (k, frame) in model.frames().iter().enumerate() {
        data.frame_placements[k] = data.joint_placements[frame.joint] * frame.placement;
    }

    if data.flags.center_of_mass {
        data.com = Some(center_of_mass(model, data));
    }

    Ok(())
}

/// Transform produced by one joint at its slice of `q`.
fn joint_motion(joint: &Joint, q: &DVector<f32>) -> Isometry3<f32> {
    let b = joint.idx_q;
    match joint.kind {
        JointKind::FreeFlyer => {
            let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
                q[b + 6],
                q[b + 3],
                q[b + 4],
                q[b + 5],
            ));
            Isometry3::from_parts(Translation3::new(q[b], q[b + 1], q[b + 2]), rotation)
        }
        JointKind::Planar => Isometry3::from_parts(
            Translation3::new(q[b], q[b + 1], 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), q[b + 2]),
        ),
        JointKind::Revolute | JointKind::Continuous => Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&joint.axis, q[b]),
        ),
        JointKind::Prismatic => Isometry3::from_parts(
            Translation3::from(joint.axis.into_inner() * q[b]),
            UnitQuaternion::identity(),
        ),
        JointKind::Fixed => Isometry3::identity(),
    }
}

fn center_of_mass(model: &Model, data: &Data) -> Vector3<f32> {
    let mut weighted = Vector3::zeros();
    let mut total = 0.0_f32;
    for (i, joint) in model.joints().iter().enumerate() {
        if joint.mass > 0.0 {
            let world = data.joint_placements[i].transform_point(&Point3::from(joint.com_local));
            weighted += joint.mass * world.coords;
            total += joint.mass;
        }
    }
    if total > 0.0 {
        weighted / total
    } else {
        Vector3::zeros()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::Joint;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    /// Root-anchored two-segment arm: 0.05 base riser, 0.3 upper segment,
    /// 0.25 end-effector frame offset, all along +z.
    fn planar_arm() -> Model {
        let mut model = Model::new("arm");
        let root = model
            .append_joint(None, Joint::new("root_joint", JointKind::Fixed))
            .unwrap();
        let shoulder = model
            .append_joint(
                Some(root),
                Joint::new("shoulder", JointKind::Revolute)
                    .with_placement(Isometry3::translation(0.0, 0.0, 0.05))
                    .with_axis(Vector3::y_axis())
                    .with_inertia(2.0, Vector3::new(0.0, 0.0, 0.15)),
            )
            .unwrap();
        let elbow = model
            .append_joint(
                Some(shoulder),
                Joint::new("elbow", JointKind::Revolute)
                    .with_placement(Isometry3::translation(0.0, 0.0, 0.3))
                    .with_axis(Vector3::y_axis())
                    .with_inertia(1.0, Vector3::new(0.0, 0.0, 0.12)),
            )
            .unwrap();
        model
            .add_frame("ee", elbow, Isometry3::translation(0.0, 0.0, 0.25))
            .unwrap();
        model
    }

    // -- Placements --

    #[test]
    fn fk_zero_configuration_stacks_offsets() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::default());
        forward_kinematics(&model, &mut data, &model.neutral()).unwrap();

        assert_relative_eq!(
            data.joint_placements[2].translation.z,
            0.35,
            epsilon = 1e-6
        );
        assert_relative_eq!(data.frame_placements[0].translation.z, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn fk_shoulder_quarter_turn_swings_arm_forward() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::default());
        let mut q = model.neutral();
        q[0] = FRAC_PI_2; // shoulder pitch about +y swings +z into +x
        forward_kinematics(&model, &mut data, &q).unwrap();

        let ee = data.frame_placements[0].translation;
        assert_relative_eq!(ee.x, 0.55, epsilon = 1e-5);
        assert_relative_eq!(ee.z, 0.05, epsilon = 1e-5);
    }

    #[test]
    fn fk_dimension_mismatch() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::default());
        let err = forward_kinematics(&model, &mut data, &DVector::zeros(5)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ConfigurationDim {
                expected: 2,
                got: 5
            }
        ));
    }

    // -- Free-flyer --

    #[test]
    fn free_flyer_translation_moves_everything() {
        let mut model = Model::new("flyer");
        model
            .append_joint(None, Joint::new("root_joint", JointKind::FreeFlyer))
            .unwrap();
        let mut data = Data::new(&model, ComputeFlags::default());
        let mut q = model.neutral();
        q[0] = 1.0;
        q[2] = -2.0;
        forward_kinematics(&model, &mut data, &q).unwrap();
        assert_relative_eq!(data.joint_placements[0].translation.x, 1.0);
        assert_relative_eq!(data.joint_placements[0].translation.z, -2.0);
    }

    #[test]
    fn free_flyer_quaternion_renormalized() {
        let mut model = Model::new("flyer");
        model
            .append_joint(None, Joint::new("root_joint", JointKind::FreeFlyer))
            .unwrap();
        let mut data = Data::new(&model, ComputeFlags::default());
        let mut q = model.neutral();
        q[6] = 1.01; // slack allowed by the loosened component bounds
        forward_kinematics(&model, &mut data, &q).unwrap();
        let rot = data.joint_placements[0].rotation;
        assert_relative_eq!(rot.norm(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn planar_motion() {
        let mut model = Model::new("cart");
        model
            .append_joint(None, Joint::new("root_joint", JointKind::Planar))
            .unwrap();
        let mut data = Data::new(&model, ComputeFlags::default());
        let q = DVector::from_vec(vec![0.5, -0.25, FRAC_PI_2]);
        forward_kinematics(&model, &mut data, &q).unwrap();
        let pose = &data.joint_placements[0];
        assert_relative_eq!(pose.translation.x, 0.5);
        assert_relative_eq!(pose.translation.y, -0.25);
        let turned = pose.rotation * Vector3::x();
        assert_relative_eq!(turned.y, 1.0, epsilon = 1e-6);
    }

    // -- Flags --

    #[test]
    fn jacobian_buffers_filled_when_requested() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::all());
        forward_kinematics(&model, &mut data, &model.neutral()).unwrap();

        assert_eq!(data.joint_origins.len(), 3);
        assert_relative_eq!(data.joint_origins[2].z, 0.35, epsilon = 1e-6);
        // Both arm joints pitch about world +y at neutral
        assert_relative_eq!(data.joint_axes[1].y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(data.joint_axes[2].y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn jacobian_buffers_empty_by_default() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::default());
        forward_kinematics(&model, &mut data, &model.neutral()).unwrap();
        assert!(data.joint_origins.is_empty());
        assert!(data.joint_axes.is_empty());
    }

    #[test]
    fn center_of_mass_weighted_mean() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::all());
        forward_kinematics(&model, &mut data, &model.neutral()).unwrap();

        // shoulder body: 2 kg at z = 0.05 + 0.15; elbow body: 1 kg at 0.35 + 0.12
        let com = data.com.unwrap();
        let expected = (2.0 * 0.2 + 1.0 * 0.47) / 3.0;
        assert_relative_eq!(com.z, expected, epsilon = 1e-5);
        assert_relative_eq!(com.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn com_none_without_flag() {
        let model = planar_arm();
        let mut data = Data::new(&model, ComputeFlags::default());
        forward_kinematics(&model, &mut data, &model.neutral()).unwrap();
        assert!(data.com.is_none());
    }
}
