use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    components::{AttitudeState, CalibrationConfig, CalibrationRoutine},
    utils::{clamp_axis, lerp_vec, normalize_angle, rad_to_deg},
};

/// Gains and limits of the stabilization loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Per-motor thrust at zero thrust command [N]
    pub hover_thrust: f64,
    pub thrust_sensitivity: f64,
    pub pitch_roll_sensitivity: f64,
    /// Scales the yaw command before it becomes torque.
    pub yaw_sensitivity: f64,
    pub kp: f64,
    pub kd: f64,
    /// Extra angular-rate damping on top of the PD term
    pub kv: f64,
    /// Torque per unit yaw command [N·m]
    pub yaw_torque: f64,
    /// Attitude reached at full pitch/roll command [deg]
    pub max_tilt_angle: f64,
    /// Weight of the previous filtered rate, in [0, 1)
    pub filter_strength: f64,
    /// Below this base thrust every motor is stopped [N]
    pub min_motor_thrust: f64,
    /// Correction limit as a fraction of base thrust
    pub correction_limit: f64,
    /// Open-loop correction as a fraction of base thrust
    pub open_loop_factor: f64,
    pub shift_epsilon: f64,
    pub stabilization: bool,
    pub auto_calibrate: bool,
    /// Log the loop state every tick at debug level
    pub debug_log: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            hover_thrust: 0.5,
            thrust_sensitivity: 1.0,
            pitch_roll_sensitivity: 1.0,
            yaw_sensitivity: 1.0,
            kp: 1.5,
            kd: 0.8,
            kv: 0.3,
            yaw_torque: 10.0,
            max_tilt_angle: 25.0,
            filter_strength: 0.9,
            min_motor_thrust: 0.05,
            correction_limit: 0.5,
            open_loop_factor: 0.3,
            shift_epsilon: 0.01,
            stabilization: true,
            auto_calibrate: true,
            debug_log: false,
        }
    }
}

/// Normalized pilot command, every axis in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlCommand {
    pub thrust: f64,
    pub pitch: f64,
    /// Positive rolls left side down
    pub roll: f64,
    pub yaw: f64,
}

impl ControlCommand {
    pub fn new(thrust: f64, pitch: f64, roll: f64, yaw: f64) -> Self {
        Self {
            thrust,
            pitch,
            roll,
            yaw,
        }
    }

    /// Every axis clamped to [-1, 1], NaN treated as centred.
    pub fn clamped(self) -> Self {
        Self {
            thrust: clamp_axis(self.thrust),
            pitch: clamp_axis(self.pitch),
            roll: clamp_axis(self.roll),
            yaw: clamp_axis(self.yaw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightState {
    Calibrating,
    Ready,
}

/// Intermediate terms of one control tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorMix {
    pub base_thrust: f64,
    /// Extra thrust on the front pair, removed from the rear pair [N]
    pub pitch_correction: f64,
    /// Extra thrust on the right pair, removed from the left pair [N]
    pub roll_correction: f64,
}

/// What the controller wants applied this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    /// Per-motor thrust in mixing order [N]
    pub motor_thrusts: [f64; 4],
    /// Torque about the body yaw axis [N·m]
    pub yaw_torque: f64,
    /// `None` while calibrating
    pub mix: Option<MotorMix>,
    /// Set on the tick a calibration session completes
    pub calibration_offsets: Option<[f64; 4]>,
}

/// Operator requests addressed to a single craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightRequest {
    StartCalibration,
    ToggleStabilization,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct FlightCommand {
    pub entity: Entity,
    pub request: FlightRequest,
}

/// Quad-X mixing: front gets `+pitch`, rear `-pitch`, left `-roll`, right `+roll`.
pub fn mix_motors(base: f64, pitch_correction: f64, roll_correction: f64) -> [f64; 4] {
    [
        base + pitch_correction - roll_correction,
        base + pitch_correction + roll_correction,
        base - pitch_correction - roll_correction,
        base - pitch_correction + roll_correction,
    ]
}

/// Lifts all four values by the same amount so none is negative.
pub fn shift_non_negative(values: [f64; 4], epsilon: f64) -> [f64; 4] {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if min >= 0.0 {
        return values;
    }
    let shift = min.abs() + epsilon;
    values.map(|v| v + shift)
}

#[derive(Component, Debug, Clone)]
pub struct FlightController {
    pub config: ControllerConfig,
    pub calibration_config: CalibrationConfig,
    stabilization: bool,
    command: ControlCommand,
    target_pitch: f64,
    target_roll: f64,
    filtered_rate: Vector3<f64>,
    calibration: CalibrationRoutine,
    current_angles: Vector3<f64>,
    last_output: Option<ControlOutput>,
}

impl FlightController {
    /// New controller; calibrating straight away when auto-calibration is on.
    pub fn new(config: ControllerConfig, calibration_config: CalibrationConfig) -> Self {
        let mut controller = Self {
            stabilization: config.stabilization,
            config,
            calibration_config,
            command: ControlCommand::default(),
            target_pitch: 0.0,
            target_roll: 0.0,
            filtered_rate: Vector3::zeros(),
            calibration: CalibrationRoutine::Idle,
            current_angles: Vector3::zeros(),
            last_output: None,
        };
        if controller.config.auto_calibrate {
            controller.calibration.start();
        }
        controller
    }

    pub fn state(&self) -> FlightState {
        if self.calibration.is_active() {
            FlightState::Calibrating
        } else {
            FlightState::Ready
        }
    }

    pub fn calibration(&self) -> &CalibrationRoutine {
        &self.calibration
    }

    pub fn is_stabilizing(&self) -> bool {
        self.stabilization
    }

    pub fn command(&self) -> ControlCommand {
        self.command
    }

    /// Stores the pilot command for the next tick.
    pub fn set_control_inputs(&mut self, command: ControlCommand) {
        self.command = command.clamped();
        if self.stabilization {
            self.target_pitch = self.command.pitch * self.config.max_tilt_angle;
            self.target_roll = self.command.roll * self.config.max_tilt_angle;
        }
    }

    /// Starts a calibration session. Returns false when one is already running.
    ///
    /// The caller is responsible for zeroing the motor offsets when this returns true.
    pub fn start_calibration(&mut self) -> bool {
        let started = self.calibration.start();
        if started {
            info!("Calibration started");
        } else {
            debug!("Calibration already in progress, request ignored");
        }
        started
    }

    pub fn toggle_stabilization(&mut self) {
        self.stabilization = !self.stabilization;
        if self.stabilization {
            self.target_pitch = 0.0;
            self.target_roll = 0.0;
        }
        info!(
            "Stabilization {}",
            if self.stabilization { "enabled" } else { "disabled" }
        );
    }

    /// Runs one control tick.
    pub fn update(&mut self, attitude: &AttitudeState, dt: f64) -> ControlOutput {
        self.current_angles = Vector3::new(attitude.pitch, attitude.roll, attitude.yaw);

        let output = if self.calibration.is_active() {
            self.calibration_tick(attitude, dt)
        } else {
            self.control_tick(attitude)
        };

        if self.config.debug_log {
            debug!("{}", self.describe(&output));
        }
        self.last_output = Some(output);
        output
    }

    fn calibration_tick(&mut self, attitude: &AttitudeState, dt: f64) -> ControlOutput {
        let offsets =
            self.calibration
                .tick(dt, &attitude.angular_velocity, &self.calibration_config);
        if let Some(offsets) = offsets {
            info!(
                "Calibration complete, offsets FL {:.4} FR {:.4} RL {:.4} RR {:.4}",
                offsets[0], offsets[1], offsets[2], offsets[3]
            );
        }

        ControlOutput {
            motor_thrusts: [self.config.hover_thrust; 4],
            yaw_torque: 0.0,
            mix: None,
            calibration_offsets: offsets,
        }
    }

    fn control_tick(&mut self, attitude: &AttitudeState) -> ControlOutput {
        let cfg = &self.config;

        self.filtered_rate = lerp_vec(
            &self.filtered_rate,
            &attitude.angular_velocity,
            1.0 - cfg.filter_strength,
        );

        let yaw_torque = self.command.yaw * cfg.yaw_sensitivity * cfg.yaw_torque;
        let base_thrust = cfg.hover_thrust + self.command.thrust * cfg.thrust_sensitivity;

        let (pitch_correction, roll_correction) = if self.stabilization {
            let limit = (cfg.correction_limit * base_thrust).abs();
            let pitch_rate = rad_to_deg(self.filtered_rate.y);
            // Body x-rate is positive right side down, roll angles are positive left side down.
            let roll_rate = -rad_to_deg(self.filtered_rate.x);

            let pitch_error = normalize_angle(self.target_pitch - attitude.pitch);
            let roll_error = normalize_angle(self.target_roll - attitude.roll);

            let pitch = cfg.kp * pitch_error - cfg.kd * pitch_rate - cfg.kv * pitch_rate;
            let roll = cfg.kp * roll_error - cfg.kd * roll_rate - cfg.kv * roll_rate;

            (pitch.clamp(-limit, limit), roll.clamp(-limit, limit))
        } else {
            let scale = cfg.pitch_roll_sensitivity * base_thrust * cfg.open_loop_factor;
            (self.command.pitch * scale, self.command.roll * scale)
        };

        let mix = MotorMix {
            base_thrust,
            pitch_correction,
            roll_correction,
        };

        let motor_thrusts = if base_thrust < cfg.min_motor_thrust {
            [0.0; 4]
        } else {
            shift_non_negative(
                mix_motors(base_thrust, pitch_correction, roll_correction),
                cfg.shift_epsilon,
            )
        };

        ControlOutput {
            motor_thrusts,
            yaw_torque,
            mix: Some(mix),
            calibration_offsets: None,
        }
    }

    /// Measured pitch, roll and yaw at the last tick [deg].
    pub fn current_angles(&self) -> Vector3<f64> {
        self.current_angles
    }

    /// Target pitch and roll [deg].
    pub fn target_angles(&self) -> (f64, f64) {
        (self.target_pitch, self.target_roll)
    }

    pub fn filtered_rate(&self) -> Vector3<f64> {
        self.filtered_rate
    }

    pub fn last_output(&self) -> Option<&ControlOutput> {
        self.last_output.as_ref()
    }

    /// One-line status summary for overlays and logs.
    pub fn diagnostics(&self) -> String {
        match &self.last_output {
            Some(output) => self.describe(output),
            None => format!("{:?} | no control output yet", self.state()),
        }
    }

    fn describe(&self, output: &ControlOutput) -> String {
        let m = output.motor_thrusts;
        format!(
            "{:?} stab={} | P {:.1}/{:.1} R {:.1}/{:.1} Y {:.1} | FL {:.3} FR {:.3} RL {:.3} RR {:.3}",
            self.state(),
            self.stabilization,
            self.current_angles.x,
            self.target_pitch,
            self.current_angles.y,
            self.target_roll,
            self.current_angles.z,
            m[0],
            m[1],
            m[2],
            m[3],
        )
    }
}

impl Default for FlightController {
    fn default() -> Self {
        Self::new(ControllerConfig::default(), CalibrationConfig::default())
    }
}
