mod assertions;
mod fixtures;
mod helpers;
mod test_app;

// Re-export
#[allow(unused_imports)]
pub use assertions::{
    assert_attitude_eq, assert_attitude_state_valid, assert_level, assert_motors_valid,
    assert_physics_valid, assert_position_eq, assert_spatial_valid,
};

#[allow(unused_imports)]
pub use helpers::*;

#[allow(unused_imports)]
pub use fixtures::*;
pub use test_app::{TestApp, TestAppBuilder};
