//! The robot handle: a model bundled with its computation buffers.

use nalgebra::DVector;

use crate::data::{ComputeFlags, Data, forward_kinematics};
use crate::error::ModelError;
use crate::geometry::{Aabb, GeomData, GeomModel, compute_aabb, update_geometry};
use crate::model::Model;

/// A ready-to-query robot: model, geometry, scratch buffers, and the
/// current configuration.
///
/// Each handle is fully independent; factories return a fresh one per
/// call and never share state between handles. Construction leaves the
/// robot at its neutral configuration with buffers allocated but not yet
/// computed — run [`Robot::compute_forward_kinematics`] before reading
/// placements.
#[derive(Debug, Clone)]
pub struct Robot {
    name: String,
    model: Model,
    geom_model: GeomModel,
    data: Data,
    geom_data: GeomData,
    config: DVector<f32>,
}

impl Robot {
    /// Bundle a model and its geometry into a handle with buffers for the
    /// given computation flags.
    pub fn new(
        name: impl Into<String>,
        model: Model,
        geom_model: GeomModel,
        flags: ComputeFlags,
    ) -> Self {
        let data = Data::new(&model, flags);
        let geom_data = GeomData::new(&geom_model);
        let config = model.neutral();
        Self {
            name: name.into(),
            model,
            geom_model,
            data,
            geom_data,
            config,
        }
    }

    /// Robot name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kinematic model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access to the kinematic model, for limit adjustments.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// The collision geometry model.
    pub fn geom_model(&self) -> &GeomModel {
        &self.geom_model
    }

    /// The computation buffers.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// World placements of the collision geometry.
    pub fn geom_data(&self) -> &GeomData {
        &self.geom_data
    }

    /// The current configuration.
    pub fn configuration(&self) -> &DVector<f32> {
        &self.config
    }

    /// Replace the current configuration.
    pub fn set_configuration(&mut self, q: DVector<f32>) -> Result<(), ModelError> {
        if q.len() != self.model.nq() {
            return Err(ModelError::ConfigurationDim {
                expected: self.model.nq(),
                got: q.len(),
            });
        }
        self.config = q;
        Ok(())
    }

    /// Reset to the model's neutral configuration.
    pub fn set_neutral_configuration(&mut self) {
        self.config = self.model.neutral();
    }

    /// Run forward kinematics at the current configuration and refresh
    /// geometry placements.
    pub fn compute_forward_kinematics(&mut self) -> Result<(), ModelError> {
        forward_kinematics(&self.model, &mut self.data, &self.config)?;
        update_geometry(&self.data, &self.geom_model, &mut self.geom_data)
    }

    /// Bounding box of the robot's geometry at the last computed
    /// placements, swept by any finite root translation bounds.
    pub fn compute_aabb(&self) -> Aabb {
        compute_aabb(&self.model, &self.geom_model, &self.geom_data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
