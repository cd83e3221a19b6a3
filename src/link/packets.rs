use serde::{Deserialize, Serialize};

use crate::{
    components::{AttitudeState, ControlCommand},
    utils::{clamp01, clamp_axis, LinkError},
};

/// Inbound command datagram. Thrust arrives in [0, 1], the other axes in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandPacket {
    pub thrust: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl CommandPacket {
    pub fn parse(bytes: &[u8]) -> Result<Self, LinkError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Converts to the controller convention: thrust rescaled to [-1, 1] and roll mirrored.
    pub fn to_command(&self) -> ControlCommand {
        ControlCommand {
            thrust: clamp01(self.thrust) * 2.0 - 1.0,
            pitch: clamp_axis(self.pitch),
            roll: -clamp_axis(self.roll),
            yaw: clamp_axis(self.yaw),
        }
    }
}

/// Outbound sensor snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPacket {
    pub altitude: f64,
    pub ground_distance: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub speed: f64,
    /// Forward body speed
    pub velocity_x: f64,
    /// Vertical body speed
    pub velocity_y: f64,
    /// Right body speed
    pub velocity_z: f64,
}

impl SensorPacket {
    pub fn to_bytes(&self) -> Result<Vec<u8>, LinkError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl From<&AttitudeState> for SensorPacket {
    fn from(state: &AttitudeState) -> Self {
        Self {
            altitude: state.altitude,
            ground_distance: state.ground_distance,
            pitch: state.pitch,
            roll: state.roll,
            yaw: state.yaw,
            speed: state.total_speed,
            velocity_x: state.forward_speed,
            velocity_y: state.vertical_speed,
            velocity_z: state.right_speed,
        }
    }
}
