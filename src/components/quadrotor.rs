use bevy::prelude::*;

use crate::components::{
    AttitudeState, FlightController, InputManager, Motors, PhysicsComponent, QuadrotorConfig,
    SensorConfig, SpatialComponent,
};

/// Marks an entity as a controlled quadrotor.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Quadrotor;

/// Marks the craft whose sensor snapshot is published over the telemetry link.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TelemetrySource;

/// Everything a craft needs to sense, fly and be flown.
#[derive(Bundle)]
pub struct QuadrotorBundle {
    pub name: Name,
    pub marker: Quadrotor,
    pub spatial: SpatialComponent,
    pub physics: PhysicsComponent,
    pub sensors: SensorConfig,
    pub attitude: AttitudeState,
    pub motors: Motors,
    pub controller: FlightController,
    pub input: InputManager,
}

impl QuadrotorBundle {
    pub fn new(config: &QuadrotorConfig) -> Self {
        Self {
            name: Name::new(config.name.clone()),
            marker: Quadrotor,
            spatial: config.start.spatial(),
            physics: config.mass.physics(),
            sensors: config.sensors.clone(),
            attitude: AttitudeState::default(),
            motors: Motors::new(&config.motors),
            controller: FlightController::new(
                config.controller.clone(),
                config.calibration.clone(),
            ),
            input: InputManager::new(config.input.clone()),
        }
    }
}
