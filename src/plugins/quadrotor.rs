use bevy::prelude::*;

use crate::components::{FlightCommand, QuadrotorBundle, QuadrotorConfig, TelemetrySource};
use crate::plugins::{PhysicsSet, StartupStage};
use crate::systems::{flight_command_system, flight_control_system, motor_system, sensor_system};

/// Per-tick flight stages, run in order ahead of the physics step.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum QuadSet {
    Sensors,
    Control,
    Motors,
}

/// Spawns quadrotors and runs sensing, control and motors every fixed tick.
pub struct QuadrotorPlugin {
    configs: Vec<QuadrotorConfig>,
}

impl QuadrotorPlugin {
    pub fn new(config: QuadrotorConfig) -> Self {
        Self {
            configs: vec![config],
        }
    }

    pub fn fleet(configs: Vec<QuadrotorConfig>) -> Self {
        Self { configs }
    }

    /// Spawns one craft and returns its entity.
    pub fn spawn(commands: &mut Commands, config: &QuadrotorConfig) -> Entity {
        let mut entity = commands.spawn(QuadrotorBundle::new(config));
        if config.telemetry {
            entity.insert(TelemetrySource);
        }
        info!("Spawned quadrotor '{}'", config.name);
        entity.id()
    }

    fn setup_quadrotors(mut commands: Commands, configs: Vec<QuadrotorConfig>) {
        for config in &configs {
            Self::spawn(&mut commands, config);
        }
    }
}

impl Default for QuadrotorPlugin {
    fn default() -> Self {
        Self::new(QuadrotorConfig::default())
    }
}

impl Plugin for QuadrotorPlugin {
    fn build(&self, app: &mut App) {
        let configs = self.configs.clone();

        app.add_event::<FlightCommand>()
            .configure_sets(
                FixedUpdate,
                (QuadSet::Sensors, QuadSet::Control, QuadSet::Motors)
                    .chain()
                    .before(PhysicsSet::ForceCalculation),
            )
            .add_systems(
                Startup,
                (move |commands: Commands| Self::setup_quadrotors(commands, configs.clone()))
                    .in_set(StartupStage::BuildQuadrotors),
            )
            .add_systems(
                FixedUpdate,
                (
                    sensor_system.in_set(QuadSet::Sensors),
                    (flight_command_system, flight_control_system)
                        .chain()
                        .in_set(QuadSet::Control),
                    motor_system.in_set(QuadSet::Motors),
                ),
            );
    }
}
