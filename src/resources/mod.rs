pub mod config;
mod ground;
mod input;

pub use config::physics::PhysicsConfig;
pub use ground::{FlatGround, GroundProbe, RayHit, Raycast};
pub use input::{AgentAction, VirtualJoystick, VirtualJoysticks};
