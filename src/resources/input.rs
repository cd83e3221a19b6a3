use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{components::ControlCommand, utils::clamp_axis};

/// One on-screen stick. Values live inside the unit circle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualJoystick {
    pub snap_x: bool,
    pub snap_y: bool,
    horizontal: f64,
    vertical: f64,
}

impl VirtualJoystick {
    pub fn with_snapping(snap_x: bool, snap_y: bool) -> Self {
        Self {
            snap_x,
            snap_y,
            ..Default::default()
        }
    }

    /// Moves the stick, clamping the deflection to unit length. Snapped axes below half
    /// deflection fall back to zero.
    pub fn set_value(&mut self, horizontal: f64, vertical: f64) {
        let (mut x, mut y) = (
            if horizontal.is_finite() { horizontal } else { 0.0 },
            if vertical.is_finite() { vertical } else { 0.0 },
        );
        let magnitude = x.hypot(y);
        if magnitude > 1.0 {
            x /= magnitude;
            y /= magnitude;
        }
        if self.snap_x && x.abs() < 0.5 {
            x = 0.0;
        }
        if self.snap_y && y.abs() < 0.5 {
            y = 0.0;
        }
        self.horizontal = x;
        self.vertical = y;
    }

    /// Releases the stick back to centre.
    pub fn reset(&mut self) {
        self.horizontal = 0.0;
        self.vertical = 0.0;
    }

    pub fn horizontal(&self) -> f64 {
        self.horizontal
    }

    pub fn vertical(&self) -> f64 {
        self.vertical
    }

    pub fn magnitude(&self) -> f64 {
        self.horizontal.hypot(self.vertical)
    }
}

/// Touch-screen sticks, written by the UI layer.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct VirtualJoysticks {
    /// Thrust (vertical) and yaw (horizontal)
    pub left: VirtualJoystick,
    /// Pitch (vertical) and roll (horizontal)
    pub right: VirtualJoystick,
}

impl VirtualJoysticks {
    pub fn command(&self) -> ControlCommand {
        ControlCommand {
            thrust: self.left.vertical(),
            pitch: self.right.vertical(),
            roll: -self.right.horizontal(),
            yaw: self.left.horizontal(),
        }
    }
}

/// Latest action emitted by an autopilot or learned policy.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub command: ControlCommand,
}

impl AgentAction {
    /// Builds an action from a policy output laid out as thrust, pitch, yaw, roll. Missing
    /// entries read as zero.
    pub fn from_actions(actions: &[f64]) -> Self {
        let at = |i: usize| clamp_axis(actions.get(i).copied().unwrap_or(0.0));
        Self {
            command: ControlCommand {
                thrust: at(0),
                pitch: at(1),
                yaw: at(2),
                roll: at(3),
            },
        }
    }
}
