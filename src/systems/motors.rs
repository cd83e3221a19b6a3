use bevy::prelude::*;

use crate::components::{Motors, PhysicsComponent};

/// Advances every rotor's thrust lag and applies the resulting forces.
///
/// Without a rigid body the rotors still spin up, their forces just go nowhere.
pub fn motor_system(
    time: Res<Time>,
    mut query: Query<(&mut Motors, Option<&mut PhysicsComponent>)>,
) {
    let dt = time.delta_secs_f64();

    for (mut motors, mut physics) in query.iter_mut() {
        for motor in motors.iter_mut() {
            let Some(force) = motor.advance(dt) else {
                continue;
            };
            if let Some(physics) = physics.as_mut() {
                physics.add_force(force);
            }
        }
    }
}
