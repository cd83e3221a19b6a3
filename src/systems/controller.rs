use bevy::prelude::*;
use nalgebra::Vector3;

use crate::components::{
    AttitudeState, FlightCommand, FlightController, FlightRequest, ForceCategory, Moment, Motors,
    PhysicsComponent, ReferenceFrame,
};

/// Applies operator requests before the control law runs.
pub fn flight_command_system(
    mut events: EventReader<FlightCommand>,
    mut query: Query<(&mut FlightController, &mut Motors)>,
) {
    for event in events.read() {
        let Ok((mut controller, mut motors)) = query.get_mut(event.entity) else {
            warn!("Flight command for unknown craft {:?}", event.entity);
            continue;
        };

        match event.request {
            FlightRequest::StartCalibration => {
                if controller.start_calibration() {
                    let hover = controller.config.hover_thrust;
                    motors.set_calibration_offsets(&[0.0; 4]);
                    for motor in motors.iter_mut() {
                        motor.set_thrust(hover);
                    }
                }
            }
            FlightRequest::ToggleStabilization => controller.toggle_stabilization(),
        }
    }
}

/// Runs the control law and hands the result to the motors and the rigid body.
pub fn flight_control_system(
    time: Res<Time>,
    mut query: Query<(
        &AttitudeState,
        &mut FlightController,
        &mut Motors,
        Option<&mut PhysicsComponent>,
    )>,
) {
    let dt = time.delta_secs_f64();

    for (attitude, mut controller, mut motors, physics) in query.iter_mut() {
        let output = controller.update(attitude, dt);

        if let Some(offsets) = output.calibration_offsets {
            motors.set_calibration_offsets(&offsets);
        }

        for (motor, thrust) in motors.iter_mut().zip(output.motor_thrusts) {
            let normalized = if motor.max_thrust > 0.0 {
                thrust / motor.max_thrust
            } else {
                0.0
            };
            motor.set_normalized_thrust(normalized);
        }

        if output.yaw_torque != 0.0 {
            if let Some(mut physics) = physics {
                physics.add_moment(Moment {
                    vector: Vector3::new(0.0, 0.0, output.yaw_torque),
                    frame: ReferenceFrame::Body,
                    category: ForceCategory::Control,
                });
            }
        }
    }
}
