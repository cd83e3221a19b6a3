mod controller;
mod input;
mod motors;
pub mod physics;
mod sensors;
mod telemetry;

pub use controller::{flight_command_system, flight_control_system};
pub use input::{hotkey_system, input_system};
pub use motors::motor_system;
pub use physics::{force_calculator_system, physics_integrator_system};
pub use sensors::sensor_system;
pub use telemetry::{sensor_stream_system, stream_settings_system, video_stream_system};
