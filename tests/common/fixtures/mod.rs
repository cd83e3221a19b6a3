mod components;
mod physics;

// Re-export test fixtures
#[allow(unused_imports)]
pub use components::*;
#[allow(unused_imports)]
pub use physics::*;
