use crate::resources::{GroundProbe, PhysicsConfig};
use crate::systems::physics::{force_calculator_system, physics_integrator_system};
use bevy::prelude::*;

/// Physics simulation stages
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum PhysicsSet {
    ForceCalculation,
    Integration,
}

/// Minimal rigid-body engine: gravity, applied forces and moments, semi-implicit integration
/// and an optional flat ground.
#[derive(Default)]
pub struct PhysicsPlugin {
    pub config: PhysicsConfig,
}

impl PhysicsPlugin {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }
}

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(Time::<Fixed>::from_seconds(self.config.clamped_timestep()));

        // Rangefinders see the ground plane unless the scene provides its own geometry.
        if let Some(level) = self.config.ground_level {
            if !app.world().contains_resource::<GroundProbe>() {
                app.insert_resource(GroundProbe::flat(level));
            }
        }

        app.configure_sets(
            FixedUpdate,
            (PhysicsSet::ForceCalculation, PhysicsSet::Integration).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                force_calculator_system.in_set(PhysicsSet::ForceCalculation),
                physics_integrator_system.in_set(PhysicsSet::Integration),
            ),
        );
    }
}
