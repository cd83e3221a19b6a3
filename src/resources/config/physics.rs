use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::utils::{DEFAULT_TIMESTEP, GRAVITY, MAX_TIMESTEP, MIN_TIMESTEP};

/// Configuration for the rigid-body stand-in engine
#[derive(Resource, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    // Integration parameters
    pub max_velocity: f64,
    pub max_angular_velocity: f64,
    pub timestep: f64,

    // Force parameters
    /// World-frame gravity (NED, so positive z pulls down)
    pub gravity: Vector3<f64>,
    /// Ground plane altitude; bodies cannot sink below it. `None` disables contact.
    pub ground_level: Option<f64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_velocity: 100.0,        // m/s
            max_angular_velocity: 50.0, // rad/s
            timestep: DEFAULT_TIMESTEP,
            gravity: Vector3::new(0.0, 0.0, GRAVITY),
            ground_level: Some(0.0),
        }
    }
}

impl PhysicsConfig {
    /// Timestep clamped into the supported range.
    pub fn clamped_timestep(&self) -> f64 {
        self.timestep.clamp(MIN_TIMESTEP, MAX_TIMESTEP)
    }
}
