//! Quadrotor flight-control core.
//!
//! Sensing, stabilization, motor mixing and drift calibration run on Bevy's fixed-step
//! schedule; pilot input is merged once per frame; a UDP link streams telemetry out and takes
//! remote commands in.

pub mod components;
pub mod link;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod utils;
