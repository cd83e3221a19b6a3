use crate::components::{PhysicsComponent, ReferenceFrame, SpatialComponent};
use crate::resources::PhysicsConfig;
use bevy::prelude::*;
use nalgebra::Vector3;

/// Sums gravity, applied forces and applied moments into the net force (world frame) and
/// net moment (body frame) of every rigid body.
pub fn force_calculator_system(
    mut query: Query<(&mut PhysicsComponent, &SpatialComponent)>,
    config: Res<PhysicsConfig>,
) {
    for (mut physics, spatial) in query.iter_mut() {
        let (force, moment) = calculate_net_forces_moments(&physics, spatial, &config.gravity);
        physics.net_force = force;
        physics.net_moment = moment;
    }
}

/// Net world-frame force and body-frame moment acting on a body.
pub fn calculate_net_forces_moments(
    physics: &PhysicsComponent,
    spatial: &SpatialComponent,
    gravity: &Vector3<f64>,
) -> (Vector3<f64>, Vector3<f64>) {
    let mut net_force = gravity * physics.mass;
    let mut net_moment = Vector3::zeros();

    for force in &physics.forces {
        let force_body = match force.frame {
            ReferenceFrame::Body => force.vector,
            ReferenceFrame::Inertial => spatial.attitude.inverse_transform_vector(&force.vector),
        };
        net_force += spatial.attitude * force_body;

        // Offset application points produce a moment about the centre of mass.
        if let Some(point) = force.point {
            net_moment += point.cross(&force_body);
        }
    }

    for moment in &physics.moments {
        net_moment += match moment.frame {
            ReferenceFrame::Body => moment.vector,
            ReferenceFrame::Inertial => spatial.attitude.inverse_transform_vector(&moment.vector),
        };
    }

    (net_force, net_moment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Force, ForceCategory, Moment};
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    fn body() -> PhysicsComponent {
        PhysicsComponent::new(2.0, Matrix3::identity())
    }

    fn thrust(at: Vector3<f64>, magnitude: f64) -> Force {
        Force {
            vector: Vector3::new(0.0, 0.0, -magnitude),
            point: Some(at),
            frame: ReferenceFrame::Body,
            category: ForceCategory::Propulsive,
        }
    }

    #[test]
    fn test_gravity_only() {
        let physics = body();
        let (force, moment) = calculate_net_forces_moments(
            &physics,
            &SpatialComponent::default(),
            &Vector3::new(0.0, 0.0, 9.81),
        );
        assert_relative_eq!(force, Vector3::new(0.0, 0.0, 19.62));
        assert_relative_eq!(moment, Vector3::zeros());
    }

    #[test]
    fn test_offset_thrust_moments() {
        let mut physics = body();
        // More thrust on the front: nose up (positive pitch moment).
        physics.add_force(thrust(Vector3::new(1.0, 0.0, 0.0), 2.0));
        physics.add_force(thrust(Vector3::new(-1.0, 0.0, 0.0), 1.0));
        // More thrust on the left: right side drops (positive body x moment).
        physics.add_force(thrust(Vector3::new(0.0, -1.0, 0.0), 1.0));

        let (force, moment) =
            calculate_net_forces_moments(&physics, &SpatialComponent::default(), &Vector3::zeros());
        assert_relative_eq!(force, Vector3::new(0.0, 0.0, -4.0));
        assert_relative_eq!(moment.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(moment.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_body_force_rotated_to_world() {
        let mut physics = body();
        physics.add_force(thrust(Vector3::zeros(), 1.0));
        physics.add_moment(Moment {
            vector: Vector3::new(0.0, 0.0, 3.0),
            frame: ReferenceFrame::Body,
            category: ForceCategory::Control,
        });

        let spatial = SpatialComponent::default().with_euler_degrees(90.0, 0.0, 0.0);
        let (force, moment) = calculate_net_forces_moments(&physics, &spatial, &Vector3::zeros());
        // Rolled onto the right side, body up points east.
        assert_relative_eq!(force, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(moment, Vector3::new(0.0, 0.0, 3.0));
    }
}
