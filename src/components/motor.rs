use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

use crate::{
    components::{Force, ForceCategory, ReferenceFrame},
    utils::{clamp01, lerp},
};

/// Parameters shared by the four rotors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotorConfig {
    /// Maximum thrust of a single rotor [N]
    pub max_thrust: f64,
    /// First-order lag time constant [s]
    pub response_time: f64,
    /// Distance from the centre of mass to each rotor hub [m]
    pub arm_length: f64,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            max_thrust: 50.0,
            response_time: 0.1,
            arm_length: 0.25,
        }
    }
}

/// Rotor slot in the quad-X layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorPosition {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl MotorPosition {
    /// Mixing order used throughout the controller.
    pub const ALL: [MotorPosition; 4] = [
        MotorPosition::FrontLeft,
        MotorPosition::FrontRight,
        MotorPosition::RearLeft,
        MotorPosition::RearRight,
    ];

    pub fn index(self) -> usize {
        match self {
            MotorPosition::FrontLeft => 0,
            MotorPosition::FrontRight => 1,
            MotorPosition::RearLeft => 2,
            MotorPosition::RearRight => 3,
        }
    }

    /// Hub position in the body frame (FRD) for a given arm length.
    pub fn mount(self, arm_length: f64) -> Vector3<f64> {
        let a = arm_length * FRAC_1_SQRT_2;
        match self {
            MotorPosition::FrontLeft => Vector3::new(a, -a, 0.0),
            MotorPosition::FrontRight => Vector3::new(a, a, 0.0),
            MotorPosition::RearLeft => Vector3::new(-a, -a, 0.0),
            MotorPosition::RearRight => Vector3::new(-a, a, 0.0),
        }
    }
}

/// A single rotor: smoothed thrust plus a persistent calibration bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motor {
    pub position: MotorPosition,
    /// Hub position in the body frame [m]
    pub mount: Vector3<f64>,
    /// Thrust direction in the body frame (unit length)
    pub up: Vector3<f64>,
    pub max_thrust: f64,
    pub response_time: f64,
    target_thrust: f64,
    current_thrust: f64,
    calibration_offset: f64,
}

impl Motor {
    pub fn new(position: MotorPosition, config: &MotorConfig) -> Self {
        Self {
            position,
            mount: position.mount(config.arm_length),
            up: Vector3::new(0.0, 0.0, -1.0),
            max_thrust: config.max_thrust.max(0.0),
            response_time: config.response_time,
            target_thrust: 0.0,
            current_thrust: 0.0,
            calibration_offset: 0.0,
        }
    }

    /// Sets the target thrust, clamped to `[0, max_thrust]`. NaN stops the rotor.
    pub fn set_thrust(&mut self, target: f64) {
        self.target_thrust = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, self.max_thrust)
        };
    }

    /// Sets the target as a fraction of `max_thrust`.
    pub fn set_normalized_thrust(&mut self, fraction: f64) {
        self.set_thrust(clamp01(fraction) * self.max_thrust);
    }

    pub fn set_calibration_offset(&mut self, offset: f64) {
        self.calibration_offset = if offset.is_finite() { offset } else { 0.0 };
    }

    /// Advances the lag by one tick and returns the body-frame force to apply, if any.
    pub fn advance(&mut self, dt: f64) -> Option<Force> {
        let factor = if self.response_time > 0.0 {
            dt / self.response_time
        } else {
            1.0
        };
        self.current_thrust = lerp(self.current_thrust, self.target_thrust, factor);

        let adjusted = self.adjusted_thrust();
        if adjusted <= 0.0 {
            return None;
        }

        Some(Force {
            vector: self.up * adjusted,
            point: Some(self.mount),
            frame: ReferenceFrame::Body,
            category: ForceCategory::Propulsive,
        })
    }

    /// Current thrust plus calibration offset, capped at `max_thrust`.
    pub fn adjusted_thrust(&self) -> f64 {
        (self.current_thrust + self.calibration_offset).min(self.max_thrust)
    }

    pub fn current_thrust(&self) -> f64 {
        self.current_thrust
    }

    pub fn current_thrust_normalized(&self) -> f64 {
        if self.max_thrust > 0.0 {
            self.current_thrust / self.max_thrust
        } else {
            0.0
        }
    }

    pub fn target_thrust(&self) -> f64 {
        self.target_thrust
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration_offset
    }
}

/// The four rotors of a quadrotor, in `MotorPosition::ALL` order.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motors {
    motors: [Motor; 4],
}

impl Motors {
    pub fn new(config: &MotorConfig) -> Self {
        Self {
            motors: MotorPosition::ALL.map(|position| Motor::new(position, config)),
        }
    }

    pub fn get(&self, position: MotorPosition) -> &Motor {
        &self.motors[position.index()]
    }

    pub fn get_mut(&mut self, position: MotorPosition) -> &mut Motor {
        &mut self.motors[position.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Motor> {
        self.motors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Motor> {
        self.motors.iter_mut()
    }

    /// Issues normalized commands in mixing order.
    pub fn set_normalized(&mut self, commands: &[f64; 4]) {
        for (motor, &command) in self.motors.iter_mut().zip(commands) {
            motor.set_normalized_thrust(command);
        }
    }

    pub fn set_calibration_offsets(&mut self, offsets: &[f64; 4]) {
        for (motor, &offset) in self.motors.iter_mut().zip(offsets) {
            motor.set_calibration_offset(offset);
        }
    }

    pub fn calibration_offsets(&self) -> [f64; 4] {
        self.motors.each_ref().map(Motor::calibration_offset)
    }

    pub fn target_thrusts(&self) -> [f64; 4] {
        self.motors.each_ref().map(Motor::target_thrust)
    }

    pub fn current_thrusts(&self) -> [f64; 4] {
        self.motors.each_ref().map(Motor::current_thrust)
    }
}

impl Default for Motors {
    fn default() -> Self {
        Self::new(&MotorConfig::default())
    }
}
