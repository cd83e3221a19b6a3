use approx::assert_relative_eq;
use nalgebra::{UnitQuaternion, Vector3};
use quadflyer::components::{AttitudeState, Motors, PhysicsComponent, SpatialComponent};

/// Assert that a spatial component's state is valid
#[track_caller]
pub fn assert_spatial_valid(spatial: &SpatialComponent) {
    assert!(
        spatial.position.iter().all(|x| x.is_finite()),
        "Position is not finite"
    );
    assert!(
        spatial.velocity.iter().all(|x| x.is_finite()),
        "Velocity is not finite"
    );
    assert!(
        spatial.angular_velocity.iter().all(|x| x.is_finite()),
        "Angular velocity is not finite"
    );
}

/// Assert that a physics component's state is valid
#[track_caller]
pub fn assert_physics_valid(physics: &PhysicsComponent) {
    assert!(physics.mass > 0.0, "Mass must be positive");
    assert!(physics.mass.is_finite(), "Mass must be finite");
    assert!(
        physics.inertia.iter().all(|x| x.is_finite()),
        "Inertia matrix contains non-finite values"
    );
    assert!(
        physics.inertia_inv.iter().all(|x| x.is_finite()),
        "Inverse inertia matrix contains non-finite values"
    );
}

/// Assert that every motor sits inside its thrust envelope
#[track_caller]
pub fn assert_motors_valid(motors: &Motors) {
    for motor in motors.iter() {
        assert!(
            (0.0..=motor.max_thrust).contains(&motor.target_thrust()),
            "Target thrust {} outside [0, {}]",
            motor.target_thrust(),
            motor.max_thrust
        );
        assert!(
            (0.0..=motor.max_thrust).contains(&motor.current_thrust()),
            "Current thrust {} outside [0, {}]",
            motor.current_thrust(),
            motor.max_thrust
        );
    }
}

/// Assert that the sensor readout is usable by the controller
#[track_caller]
pub fn assert_attitude_state_valid(state: &AttitudeState) {
    for angle in [state.pitch, state.roll, state.yaw] {
        assert!(
            angle > -180.0 && angle <= 180.0,
            "Angle {} outside (-180, 180]",
            angle
        );
    }
    assert!(state.ground_distance >= 0.0, "Negative ground distance");
    assert!(state.total_speed >= 0.0, "Negative speed");
}

/// Assert that two positions are approximately equal
#[track_caller]
pub fn assert_position_eq(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

/// Assert that two attitudes are approximately equal
#[track_caller]
pub fn assert_attitude_eq(
    actual: &UnitQuaternion<f64>,
    expected: &UnitQuaternion<f64>,
    epsilon: f64,
) {
    let angle = (actual.inverse() * expected).angle();
    assert!(
        angle < epsilon,
        "Attitude difference {} exceeds epsilon {}",
        angle,
        epsilon
    );
}

/// Assert that the craft is level and not rotating
#[track_caller]
pub fn assert_level(spatial: &SpatialComponent, epsilon: f64) {
    assert_attitude_eq(&spatial.attitude, &UnitQuaternion::identity(), epsilon);
    assert!(
        spatial.angular_velocity.norm() < epsilon,
        "Craft is rotating at {:?}",
        spatial.angular_velocity
    );
}
