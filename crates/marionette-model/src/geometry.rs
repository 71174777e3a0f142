//! Collision geometry and axis-aligned bounding boxes.
//!
//! A [`GeomModel`] lists geometry objects attached to joints of a
//! [`Model`](crate::Model); a [`GeomData`] caches their world placements,
//! refreshed by [`update_geometry`] after forward kinematics.

use nalgebra::{Isometry3, Vector3};

use crate::data::Data;
use crate::error::ModelError;
use crate::joint::JointKind;
use crate::model::Model;

// ---------------------------------------------------------------------------
// GeomShape
// ---------------------------------------------------------------------------

/// Geometric primitive used for collision queries.
#[derive(Debug, Clone)]
pub enum GeomShape {
    /// Sphere with given radius.
    Sphere { radius: f32 },
    /// Capsule along the local z axis: cylinder with hemisphere caps.
    Capsule { radius: f32, half_length: f32 },
    /// Box with half-extents per axis.
    Box { half_extents: Vector3<f32> },
    /// Cylinder along the local z axis.
    Cylinder { radius: f32, half_length: f32 },
}

impl GeomShape {
    /// Half-extents of the shape's local axis-aligned bounding box.
    pub fn local_half_extents(&self) -> Vector3<f32> {
        match *self {
            Self::Sphere { radius } => Vector3::new(radius, radius, radius),
            Self::Capsule {
                radius,
                half_length,
            } => Vector3::new(radius, radius, half_length + radius),
            Self::Box { half_extents } => half_extents,
            Self::Cylinder {
                radius,
                half_length,
            } => Vector3::new(radius, radius, half_length),
        }
    }
}

// ---------------------------------------------------------------------------
// GeomObject / GeomModel / GeomData
// ---------------------------------------------------------------------------

/// One geometry object, rigidly attached to a joint.
#[derive(Debug, Clone)]
pub struct GeomObject {
    /// Object name.
    pub name: String,
    /// Index of the joint carrying the object.
    pub parent_joint: usize,
    /// Placement of the object in the joint's frame.
    pub placement: Isometry3<f32>,
    /// The shape.
    pub shape: GeomShape,
}

impl GeomObject {
    /// Create a geometry object.
    pub fn new(
        name: impl Into<String>,
        parent_joint: usize,
        placement: Isometry3<f32>,
        shape: GeomShape,
    ) -> Self {
        Self {
            name: name.into(),
            parent_joint,
            placement,
            shape,
        }
    }
}

/// Collision geometry of one robot.
#[derive(Debug, Clone, Default)]
pub struct GeomModel {
    objects: Vec<GeomObject>,
}

impl GeomModel {
    /// Create an empty geometry model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its index.
    pub fn add_object(&mut self, object: GeomObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// All objects.
    pub fn objects(&self) -> &[GeomObject] {
        &self.objects
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the model carries no geometry.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// World placements of a [`GeomModel`]'s objects.
#[derive(Debug, Clone)]
pub struct GeomData {
    /// World placement per object, same order as the geometry model.
    pub placements: Vec<Isometry3<f32>>,
}

impl GeomData {
    /// Allocate placements for `geom_model`.
    pub fn new(geom_model: &GeomModel) -> Self {
        Self {
            placements: vec![Isometry3::identity(); geom_model.len()],
        }
    }
}

/// Refresh world placements of every geometry object from joint placements.
pub fn update_geometry(
    data: &Data,
    geom_model: &GeomModel,
    geom_data: &mut GeomData,
) -> Result<(), ModelError> {
    if geom_data.placements.len() != geom_model.len() {
        return Err(ModelError::GeometryDim {
            expected: geom_model.len(),
            got: geom_data.placements.len(),
        });
    }
    for (i, object) in geom_model.objects().iter().enumerate() {
        let joint_placement = data
            .joint_placements
            .get(object.parent_joint)
            .ok_or(ModelError::JointOutOfRange {
                index: object.parent_joint,
                njoints: data.joint_placements.len(),
            })?;
        geom_data.placements[i] = joint_placement * object.placement;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vector3<f32>,
    /// Maximum corner.
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Create from corners.
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Conservative world box of a shape at a placement: the local box's
    /// eight corners, rotated and translated, then re-axis-aligned.
    pub fn from_shape(shape: &GeomShape, placement: &Isometry3<f32>) -> Self {
        let h = shape.local_half_extents();
        let rot = placement.rotation;
        let pos = placement.translation.vector;

        let mut min = pos;
        let mut max = pos;
        for sx in [-1.0_f32, 1.0] {
            for sy in [-1.0_f32, 1.0] {
                for sz in [-1.0_f32, 1.0] {
                    let corner = pos + rot * Vector3::new(sx * h.x, sy * h.y, sz * h.z);
                    min = min.inf(&corner);
                    max = max.sup(&corner);
                }
            }
        }
        Self { min, max }
    }

    /// Grow to enclose `other`.
    pub fn merge(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Whether every corner coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Self) -> bool {
        (0..3).all(|k| self.min[k] <= other.min[k] && self.max[k] >= other.max[k])
    }

    /// Edge lengths.
    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Bounding box of all geometry at the current placements.
///
/// When the root joint translates (free-flyer or planar) and its
/// translation bounds are finite, the box is additionally swept over the
/// bounded root range, so widening root bounds widens the box
/// monotonically. Sentinel ±`f32::MAX` bounds count as unbounded and are
/// not swept. An empty geometry model yields a degenerate box at the
/// origin.
pub fn compute_aabb(model: &Model, geom_model: &GeomModel, geom_data: &GeomData) -> Aabb {
    let mut aabb: Option<Aabb> = None;
    for (object, placement) in geom_model.objects().iter().zip(&geom_data.placements) {
        let world = Aabb::from_shape(&object.shape, placement);
        match aabb.as_mut() {
            Some(total) => total.merge(&world),
            None => aabb = Some(world),
        }
    }
    let mut aabb = aabb.unwrap_or_else(|| Aabb::new(Vector3::zeros(), Vector3::zeros()));

    if let Some(root) = model.joints().first() {
        let swept_axes = match root.kind {
            JointKind::FreeFlyer => 3,
            JointKind::Planar => 2,
            _ => 0,
        };
        for k in 0..swept_axes {
            let lo = model.lower_position_limit()[k];
            let hi = model.upper_position_limit()[k];
            if is_bounded(lo) && is_bounded(hi) {
                aabb.min[k] += lo;
                aabb.max[k] += hi;
            }
        }
    }
    aabb
}

fn is_bounded(v: f32) -> bool {
    v.is_finite() && v.abs() < f32::MAX
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
