//! URDF XML conversion using `urdf-rs`.
//!
//! Builds a crate-native model from a description string. The caller
//! chooses how the description's root link joins the world: a free-flyer,
//! a planar joint, or a fixed anchor. Fixed description joints add
//! operational frames instead of degrees of freedom; their subtree
//! geometry folds into the nearest moving ancestor joint.

// All conversions from urdf-rs f64 to model f32 are intentional truncations.
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, UnitVector3, Vector3};
use tracing::debug;

use marionette_model::{GeomModel, GeomObject, GeomShape, Joint, JointKind, Model};

use crate::error::UrdfError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a URDF XML string into a model anchored by `root_kind`.
///
/// `root_kind` must be [`JointKind::FreeFlyer`], [`JointKind::Planar`], or
/// [`JointKind::Fixed`]. Links without collision elements contribute their
/// visual geometry instead; mesh geometry is skipped.
pub fn parse_description(
    xml: &str,
    root_kind: JointKind,
) -> Result<(Model, GeomModel), UrdfError> {
    if !matches!(
        root_kind,
        JointKind::FreeFlyer | JointKind::Planar | JointKind::Fixed
    ) {
        return Err(UrdfError::UnsupportedRootJoint(root_kind));
    }

    let robot = urdf_rs::read_from_string(xml).map_err(|e| UrdfError::Parse(e.to_string()))?;
    convert_robot(&robot, root_kind)
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn convert_robot(
    robot: &urdf_rs::Robot,
    root_kind: JointKind,
) -> Result<(Model, GeomModel), UrdfError> {
    let links: HashMap<&str, &urdf_rs::Link> = robot
        .links
        .iter()
        .map(|l| (l.name.as_str(), l))
        .collect();

    // Child joints per parent link, sorted by name for a stable tree order.
    let mut children: HashMap<&str, Vec<&urdf_rs::Joint>> = HashMap::new();
    for joint in &robot.joints {
        children
            .entry(joint.parent.link.as_str())
            .or_default()
            .push(joint);
    }
    for list in children.values_mut() {
        list.sort_unstable_by(|a, b| a.name.cmp(&b.name));
    }

    // Root link = a link that is never a child of any joint.
    let is_child: Vec<&str> = robot.joints.iter().map(|j| j.child.link.as_str()).collect();
    let root_link = robot
        .links
        .iter()
        .map(|l| l.name.as_str())
        .find(|name| !is_child.contains(name))
        .ok_or(UrdfError::NoRootLink)?;

    let mut model = Model::new(robot.name.clone());
    let mut geom = GeomModel::new();

    let root_link_data = links[root_link];
    let (mass, com) = convert_inertial(&root_link_data.inertial);
    model.append_joint(
        None,
        Joint::new("root_joint", root_kind).with_inertia(mass, com),
    )?;
    attach_link_geometry(&mut geom, root_link_data, 0, &Isometry3::identity());

    // DFS over the description tree. Each entry: the link to expand, the
    // model joint carrying it, and the fixed-transform offset from that
    // joint's frame to the link frame.
    let mut stack: Vec<(&str, usize, Isometry3<f32>)> =
        vec![(root_link, 0, Isometry3::identity())];

    while let Some((link_name, carrier, offset)) = stack.pop() {
        let Some(child_joints) = children.get(link_name) else {
            continue;
        };
        for joint in child_joints {
            let child_name = joint.child.link.as_str();
            let child_link = links
                .get(child_name)
                .ok_or_else(|| UrdfError::MissingLink(child_name.into()))?;
            let origin = origin_to_isometry(&joint.origin);
            let kind = convert_joint_type(&joint.joint_type)?;

            if kind == JointKind::Fixed {
                let frame_offset = offset * origin;
                model.add_frame(joint.name.clone(), carrier, frame_offset)?;
                attach_link_geometry(&mut geom, child_link, carrier, &frame_offset);
                stack.push((child_name, carrier, frame_offset));
                continue;
            }

            let axis = convert_axis(joint)?;
            let (mass, com) = convert_inertial(&child_link.inertial);
            let idx = model.append_joint(
                Some(carrier),
                Joint::new(joint.name.clone(), kind)
                    .with_placement(offset * origin)
                    .with_axis(axis)
                    .with_inertia(mass, com),
            )?;
            if matches!(kind, JointKind::Revolute | JointKind::Prismatic) {
                // urdf-rs defaults lower/upper to 0.0 for joints without
                // limits; both-zero means unbounded, keep the defaults.
                let limit = &joint.limit;
                if (limit.lower - limit.upper).abs() > f64::EPSILON {
                    model.set_joint_position_limits(
                        idx,
                        &[limit.lower as f32],
                        &[limit.upper as f32],
                    )?;
                }
            }
            attach_link_geometry(&mut geom, child_link, idx, &Isometry3::identity());
            stack.push((child_name, idx, Isometry3::identity()));
        }
    }

    Ok((model, geom))
}

fn convert_joint_type(jt: &urdf_rs::JointType) -> Result<JointKind, UrdfError> {
    match jt {
        urdf_rs::JointType::Revolute => Ok(JointKind::Revolute),
        urdf_rs::JointType::Continuous => Ok(JointKind::Continuous),
        urdf_rs::JointType::Prismatic => Ok(JointKind::Prismatic),
        urdf_rs::JointType::Fixed => Ok(JointKind::Fixed),
        urdf_rs::JointType::Floating => Ok(JointKind::FreeFlyer),
        urdf_rs::JointType::Planar => Ok(JointKind::Planar),
        urdf_rs::JointType::Spherical => Err(UrdfError::UnsupportedJointType("Spherical".into())),
    }
}

fn convert_axis(joint: &urdf_rs::Joint) -> Result<UnitVector3<f32>, UrdfError> {
    let xyz = &joint.axis.xyz;
    let axis = Vector3::new(xyz[0] as f32, xyz[1] as f32, xyz[2] as f32);
    if axis.norm() < 1e-6 {
        return Err(UrdfError::InvalidJointAxis(joint.name.clone()));
    }
    Ok(UnitVector3::new_normalize(axis))
}

fn convert_inertial(inertial: &urdf_rs::Inertial) -> (f32, Vector3<f32>) {
    let xyz = &inertial.origin.xyz;
    (
        inertial.mass.value as f32,
        Vector3::new(xyz[0] as f32, xyz[1] as f32, xyz[2] as f32),
    )
}

fn origin_to_isometry(pose: &urdf_rs::Pose) -> Isometry3<f32> {
    let xyz = &pose.xyz;
    let rpy = &pose.rpy;
    Isometry3::from_parts(
        Translation3::new(xyz[0] as f32, xyz[1] as f32, xyz[2] as f32),
        UnitQuaternion::from_euler_angles(rpy[0] as f32, rpy[1] as f32, rpy[2] as f32),
    )
}

/// Attach a link's collision geometry (or, when absent, its visual
/// geometry) to `carrier` with the given fixed offset.
fn attach_link_geometry(
    geom: &mut GeomModel,
    link: &urdf_rs::Link,
    carrier: usize,
    offset: &Isometry3<f32>,
) {
    let sources: Vec<(&urdf_rs::Pose, &urdf_rs::Geometry)> = if link.collision.is_empty() {
        link.visual.iter().map(|v| (&v.origin, &v.geometry)).collect()
    } else {
        link.collision
            .iter()
            .map(|c| (&c.origin, &c.geometry))
            .collect()
    };

    for (i, (origin, geometry)) in sources.iter().enumerate() {
        let Some(shape) = convert_geometry(geometry) else {
            debug!(link = %link.name, "skipping mesh geometry");
            continue;
        };
        geom.add_object(GeomObject::new(
            format!("{}_geom{}", link.name, i),
            carrier,
            offset * origin_to_isometry(origin),
            shape,
        ));
    }
}

fn convert_geometry(geometry: &urdf_rs::Geometry) -> Option<GeomShape> {
    match geometry {
        urdf_rs::Geometry::Sphere { radius } => Some(GeomShape::Sphere {
            radius: *radius as f32,
        }),
        urdf_rs::Geometry::Box { size } => Some(GeomShape::Box {
            half_extents: Vector3::new(
                size[0] as f32 / 2.0,
                size[1] as f32 / 2.0,
                size[2] as f32 / 2.0,
            ),
        }),
        urdf_rs::Geometry::Cylinder { radius, length } => Some(GeomShape::Cylinder {
            radius: *radius as f32,
            half_length: *length as f32 / 2.0,
        }),
        urdf_rs::Geometry::Capsule { radius, length } => Some(GeomShape::Capsule {
            radius: *radius as f32,
            half_length: *length as f32 / 2.0,
        }),
        urdf_rs::Geometry::Mesh { .. } => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
