use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Rigid-body pose and rates, owned by the physics engine.
///
/// World frame is NED, body frame is FRD.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpatialComponent {
    /// Position in world space [m]
    pub position: Vector3<f64>,

    /// Linear velocity in world space [m/s]
    pub velocity: Vector3<f64>,

    /// Attitude quaternion (rotation from body to world frame)
    pub attitude: UnitQuaternion<f64>,

    /// Angular velocity in body frame [rad/s]
    pub angular_velocity: Vector3<f64>,
}

impl Default for SpatialComponent {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl SpatialComponent {
    /// Create a new spatial component with initial values
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            angular_velocity,
        }
    }

    /// Create a new spatial component at a specific position
    pub fn at_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Level, stationary body at the given altitude above the world origin.
    pub fn at_altitude(altitude: f64) -> Self {
        Self::at_position(Vector3::new(0.0, 0.0, -altitude))
    }

    /// Attitude built from aviation Euler angles in degrees.
    pub fn with_euler_degrees(mut self, roll: f64, pitch: f64, yaw: f64) -> Self {
        self.attitude = UnitQuaternion::from_euler_angles(
            roll.to_radians(),
            pitch.to_radians(),
            yaw.to_radians(),
        );
        self
    }

    /// Height above the world origin (positive up).
    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    /// Body "up" axis expressed in the world frame.
    pub fn up(&self) -> Vector3<f64> {
        self.attitude * Vector3::new(0.0, 0.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_altitude_is_negative_down() {
        let spatial = SpatialComponent::at_altitude(12.5);
        assert_relative_eq!(spatial.position.z, -12.5);
        assert_relative_eq!(spatial.altitude(), 12.5);
    }

    #[test]
    fn test_level_up_axis() {
        let spatial = SpatialComponent::default();
        assert_relative_eq!(spatial.up(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_euler_roundtrip() {
        let spatial = SpatialComponent::default().with_euler_degrees(10.0, -5.0, 30.0);
        let (roll, pitch, yaw) = spatial.attitude.euler_angles();
        assert_relative_eq!(roll.to_degrees(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(pitch.to_degrees(), -5.0, epsilon = 1e-9);
        assert_relative_eq!(yaw.to_degrees(), 30.0, epsilon = 1e-9);
    }
}
