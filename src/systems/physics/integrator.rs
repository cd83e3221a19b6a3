use crate::components::{PhysicsComponent, SpatialComponent};
use crate::resources::PhysicsConfig;
use bevy::prelude::*;
use nalgebra::UnitQuaternion;

/// Advances every rigid body by one fixed step, then clears the forces applied this step.
pub fn physics_integrator_system(
    mut query: Query<(&mut PhysicsComponent, &mut SpatialComponent)>,
    config: Res<PhysicsConfig>,
) {
    let dt = config.clamped_timestep();

    for (mut physics, mut spatial) in query.iter_mut() {
        integrate_state(&physics, &mut spatial, dt);
        apply_velocity_limits(
            &mut spatial,
            config.max_velocity,
            config.max_angular_velocity,
        );
        if let Some(ground) = config.ground_level {
            apply_ground_contact(&mut spatial, ground);
        }
        physics.clear_forces();
    }
}

/// Semi-implicit Euler step: velocities first, then pose from the new velocities.
fn integrate_state(physics: &PhysicsComponent, spatial: &mut SpatialComponent, dt: f64) {
    let acceleration = physics.net_force / physics.mass;
    spatial.velocity += acceleration * dt;
    spatial.position += spatial.velocity * dt;

    let omega = spatial.angular_velocity;
    let gyro_term = omega.cross(&(physics.inertia * omega));
    let angular_acceleration = physics.inertia_inv * (physics.net_moment - gyro_term);
    spatial.angular_velocity += angular_acceleration * dt;

    // Body rates compose on the right.
    let rotation = UnitQuaternion::from_scaled_axis(spatial.angular_velocity * dt);
    spatial.attitude =
        UnitQuaternion::from_quaternion((spatial.attitude * rotation).into_inner().normalize());
}

fn apply_velocity_limits(
    spatial: &mut SpatialComponent,
    max_velocity: f64,
    max_angular_velocity: f64,
) {
    let velocity_norm = spatial.velocity.norm();
    if velocity_norm > max_velocity {
        spatial.velocity *= max_velocity / velocity_norm;
    }

    let angular_velocity_norm = spatial.angular_velocity.norm();
    if angular_velocity_norm > max_angular_velocity {
        spatial.angular_velocity *= max_angular_velocity / angular_velocity_norm;
    }
}

/// Keeps the body at or above the ground plane.
fn apply_ground_contact(spatial: &mut SpatialComponent, ground_level: f64) {
    if spatial.altitude() < ground_level {
        spatial.position.z = -ground_level;
        if spatial.velocity.z > 0.0 {
            spatial.velocity.z = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};

    fn body(mass: f64) -> PhysicsComponent {
        PhysicsComponent::new(mass, Matrix3::identity() * 0.01)
    }

    #[test]
    fn test_free_fall() {
        let mut physics = body(1.0);
        physics.net_force = Vector3::new(0.0, 0.0, 9.81);
        let mut spatial = SpatialComponent::at_altitude(100.0);

        let dt = 0.001;
        for _ in 0..1000 {
            integrate_state(&physics, &mut spatial, dt);
        }

        assert_relative_eq!(spatial.velocity.z, 9.81, epsilon = 1e-9);
        // 0.5 g t^2 with a first-order error of g t dt / 2.
        assert_relative_eq!(spatial.altitude(), 100.0 - 4.905, epsilon = 0.01);
    }

    #[test]
    fn test_body_rate_rotation() {
        let physics = body(1.0);
        let mut spatial = SpatialComponent::default();
        spatial.angular_velocity = Vector3::new(0.1, 0.0, 0.0);

        for _ in 0..100 {
            integrate_state(&physics, &mut spatial, 0.01);
        }
        let (roll, pitch, yaw) = spatial.attitude.euler_angles();
        assert_relative_eq!(roll, 0.1, epsilon = 1e-9);
        assert_relative_eq!(pitch, 0.0, epsilon = 1e-9);
        assert_relative_eq!(yaw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pitch_rate_about_heading() {
        // Facing east, a pure body pitch rate must not change heading.
        let physics = body(1.0);
        let mut spatial = SpatialComponent::default().with_euler_degrees(0.0, 0.0, 90.0);
        spatial.angular_velocity = Vector3::new(0.0, 0.2, 0.0);

        for _ in 0..100 {
            integrate_state(&physics, &mut spatial, 0.01);
        }
        let (roll, pitch, yaw) = spatial.attitude.euler_angles();
        assert_relative_eq!(roll, 0.0, epsilon = 1e-9);
        assert_relative_eq!(pitch, 0.2, epsilon = 1e-9);
        assert_relative_eq!(yaw, std::f64::consts::FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_velocity_limits() {
        let mut spatial = SpatialComponent::default();
        spatial.velocity = Vector3::new(300.0, 400.0, 0.0);
        spatial.angular_velocity = Vector3::new(0.0, 0.0, -80.0);
        apply_velocity_limits(&mut spatial, 100.0, 50.0);
        assert_relative_eq!(spatial.velocity, Vector3::new(60.0, 80.0, 0.0));
        assert_relative_eq!(spatial.angular_velocity, Vector3::new(0.0, 0.0, -50.0));
    }

    #[test]
    fn test_ground_contact() {
        let mut spatial = SpatialComponent::at_altitude(-0.5);
        spatial.velocity = Vector3::new(1.0, 0.0, 3.0);
        apply_ground_contact(&mut spatial, 0.0);
        assert_relative_eq!(spatial.altitude(), 0.0);
        assert_eq!(spatial.velocity, Vector3::new(1.0, 0.0, 0.0));

        // Climbing away from the ground is untouched.
        let mut climbing = SpatialComponent::at_altitude(2.0);
        climbing.velocity = Vector3::new(0.0, 0.0, -1.0);
        apply_ground_contact(&mut climbing, 0.0);
        assert_eq!(climbing.velocity.z, -1.0);
    }
}
