use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    components::SpatialComponent,
    resources::GroundProbe,
    utils::{normalize_angle, rad_to_deg},
};

/// Configuration of the on-board sensor unit.
#[derive(Component, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    /// Measure ground clearance with a downward ray instead of reporting altitude
    pub use_ground_raycast: bool,
    /// Maximum range of the rangefinder [m]
    pub raycast_distance: f64,
    /// Ray origin relative to the body centre, body frame [m]
    pub raycast_offset: Vector3<f64>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            use_ground_raycast: true,
            raycast_distance: 100.0,
            raycast_offset: Vector3::zeros(),
        }
    }
}

/// Flight-relevant quantities derived from the rigid-body state once per tick.
///
/// Only the sensor system writes this component.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeState {
    /// Height above the world origin [m]
    pub altitude: f64,
    /// Pitch, positive nose up [deg, (-180, 180]]
    pub pitch: f64,
    /// Roll, positive left side down [deg, (-180, 180]]
    pub roll: f64,
    /// Yaw, positive nose right [deg, (-180, 180]]
    pub yaw: f64,
    /// Body angular velocity (roll, pitch, yaw rates) [rad/s]
    pub angular_velocity: Vector3<f64>,
    /// Velocity in the world frame [m/s]
    pub world_velocity: Vector3<f64>,
    /// Velocity in the body frame [m/s]
    pub local_velocity: Vector3<f64>,
    pub forward_speed: f64,
    pub right_speed: f64,
    /// Vertical body-frame speed, positive up [m/s]
    pub vertical_speed: f64,
    /// Magnitude of the forward and right components [m/s]
    pub total_speed: f64,
    /// Rangefinder reading, never above the configured range [m]
    pub ground_distance: f64,
    /// Surface normal under the craft, world up when nothing was hit
    pub ground_normal: Vector3<f64>,
}

impl Default for AttitudeState {
    fn default() -> Self {
        Self {
            altitude: 0.0,
            pitch: 0.0,
            roll: 0.0,
            yaw: 0.0,
            angular_velocity: Vector3::zeros(),
            world_velocity: Vector3::zeros(),
            local_velocity: Vector3::zeros(),
            forward_speed: 0.0,
            right_speed: 0.0,
            vertical_speed: 0.0,
            total_speed: 0.0,
            ground_distance: 0.0,
            ground_normal: WORLD_UP,
        }
    }
}

const WORLD_UP: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);

impl AttitudeState {
    /// Derives a fresh reading from the engine state.
    ///
    /// `has_body` is false when no rigid body is attached; velocity-derived fields then read
    /// zero while altitude and ground distance still come from the pose.
    pub fn measure(
        spatial: &SpatialComponent,
        has_body: bool,
        config: &SensorConfig,
        ground: Option<&GroundProbe>,
    ) -> Self {
        let mut state = Self {
            altitude: spatial.altitude(),
            ..Default::default()
        };

        let (roll, pitch, yaw) = spatial.attitude.euler_angles();
        state.roll = normalize_angle(-rad_to_deg(roll));
        state.pitch = normalize_angle(rad_to_deg(pitch));
        state.yaw = normalize_angle(rad_to_deg(yaw));

        if has_body {
            state.world_velocity = spatial.velocity;
            state.local_velocity = spatial.attitude.inverse_transform_vector(&spatial.velocity);
            state.angular_velocity = spatial.angular_velocity;

            state.forward_speed = state.local_velocity.x;
            state.right_speed = state.local_velocity.y;
            state.vertical_speed = -state.local_velocity.z;
            state.total_speed = state.forward_speed.hypot(state.right_speed);
        }

        state.update_ground_distance(spatial, config, ground);
        state
    }

    fn update_ground_distance(
        &mut self,
        spatial: &SpatialComponent,
        config: &SensorConfig,
        ground: Option<&GroundProbe>,
    ) {
        if !config.use_ground_raycast {
            self.ground_distance = self.altitude;
            self.ground_normal = WORLD_UP;
            return;
        }

        let origin = spatial.position + spatial.attitude * config.raycast_offset;
        let direction = -spatial.up();

        match ground.and_then(|g| g.cast(&origin, &direction, config.raycast_distance)) {
            Some(hit) => {
                self.ground_distance = hit.distance.min(config.raycast_distance);
                self.ground_normal = hit.normal;
            }
            None => {
                self.ground_distance = config.raycast_distance;
                self.ground_normal = WORLD_UP;
            }
        }
    }

    /// Roll, pitch and yaw in degrees.
    pub fn attitude(&self) -> Vector3<f64> {
        Vector3::new(self.roll, self.pitch, self.yaw)
    }

    pub fn is_grounded(&self, threshold: f64) -> bool {
        self.ground_distance <= threshold
    }

    /// Body-frame speed along an arbitrary body direction.
    pub fn speed_in_direction(&self, local_direction: &Vector3<f64>) -> f64 {
        match local_direction.try_normalize(f64::EPSILON) {
            Some(dir) => self.local_velocity.dot(&dir),
            None => 0.0,
        }
    }
}
