mod calibration;
mod config;
mod controller;
mod input;
mod motor;
mod physics;
mod quadrotor;
mod sensors;
mod spatial;

pub use calibration::{calibration_offsets, CalibrationConfig, CalibrationRoutine};
pub use config::{MassModel, QuadrotorConfig, StartConfig};
pub use controller::{
    mix_motors, shift_non_negative, ControlCommand, ControlOutput, ControllerConfig,
    FlightCommand, FlightController, FlightRequest, FlightState, MotorMix,
};
pub use input::{
    GamepadAxes, Hotkeys, InputConfig, InputManager, InputMode, InputSource, KeyboardBindings,
    SourceContext,
};
pub use motor::{Motor, MotorConfig, MotorPosition, Motors};
pub use physics::{Force, ForceCategory, Moment, PhysicsComponent, ReferenceFrame};
pub use quadrotor::{Quadrotor, QuadrotorBundle, TelemetrySource};
pub use sensors::{AttitudeState, SensorConfig};
pub use spatial::SpatialComponent;
