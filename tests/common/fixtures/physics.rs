use nalgebra::Vector3;
use quadflyer::resources::PhysicsConfig;

/// Physics configurations for different test scenarios
pub mod physics_configs {
    use super::*;

    /// Free space: no gravity and no ground.
    pub fn free_space() -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vector3::zeros(),
            ground_level: None,
            ..Default::default()
        }
    }

    pub fn earth() -> PhysicsConfig {
        PhysicsConfig::default()
    }
}
