pub const GRAVITY: f64 = 9.80665; // m/s^2

pub const DEFAULT_TIMESTEP: f64 = 1.0 / 120.0; // Fixed control/physics rate
pub const MAX_TIMESTEP: f64 = 1.0 / 30.0; // Maximum physics timestep
pub const MIN_TIMESTEP: f64 = 1.0 / 1000.0; // Minimum physics timestep

// Network
pub const DEFAULT_COMMAND_PORT: u16 = 5005;
pub const DEFAULT_VIDEO_PORT: u16 = 5006;
pub const DEFAULT_SENSORS_PORT: u16 = 5007;
pub const MAX_UDP_PAYLOAD: usize = 65_507; // IPv4 datagram payload limit
