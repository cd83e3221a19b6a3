mod input;
mod link;
mod physics;
mod quadrotor;
mod staging;

pub use input::{PilotInputPlugin, PilotInputSet};
pub use link::LinkPlugin;
pub use physics::{PhysicsPlugin, PhysicsSet};
pub use quadrotor::{QuadSet, QuadrotorPlugin};
pub use staging::{StartupSequencePlugin, StartupStage};
