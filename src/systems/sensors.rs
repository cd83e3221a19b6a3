use bevy::prelude::*;

use crate::{
    components::{AttitudeState, PhysicsComponent, SensorConfig, SpatialComponent},
    resources::GroundProbe,
};

/// Refreshes every craft's `AttitudeState` from the rigid-body state.
pub fn sensor_system(
    mut query: Query<(
        &SpatialComponent,
        Option<&PhysicsComponent>,
        &SensorConfig,
        &mut AttitudeState,
    )>,
    ground: Option<Res<GroundProbe>>,
) {
    let ground = ground.as_deref();
    for (spatial, physics, config, mut state) in query.iter_mut() {
        *state = AttitudeState::measure(spatial, physics.is_some(), config, ground);
    }
}
