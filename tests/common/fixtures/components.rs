use nalgebra::{UnitQuaternion, Vector3};
use quadflyer::components::{
    CalibrationConfig, ControllerConfig, InputConfig, InputMode, QuadrotorConfig,
    SpatialComponent, StartConfig,
};

/// Level, stationary craft one metre up.
pub fn hover_spatial() -> SpatialComponent {
    SpatialComponent {
        position: Vector3::new(0.0, 0.0, -1.0),
        velocity: Vector3::zeros(),
        attitude: UnitQuaternion::identity(),
        angular_velocity: Vector3::zeros(),
    }
}

/// Craft rolled right by `roll_deg` and drifting in roll at `roll_rate` rad/s.
pub fn rolled_spatial(roll_deg: f64, roll_rate: f64) -> SpatialComponent {
    SpatialComponent {
        attitude: UnitQuaternion::from_euler_angles(roll_deg.to_radians(), 0.0, 0.0),
        angular_velocity: Vector3::new(roll_rate, 0.0, 0.0),
        ..hover_spatial()
    }
}

/// Test craft configurations for different scenarios
pub mod quadrotor_configs {
    use super::*;

    /// Stabilized craft that skips the start-up calibration.
    pub fn ready() -> QuadrotorConfig {
        QuadrotorConfig {
            name: "test_ready".to_string(),
            controller: ControllerConfig {
                auto_calibrate: false,
                ..Default::default()
            },
            start: StartConfig {
                position: Vector3::new(0.0, 0.0, -10.0),
                heading: 0.0,
            },
            ..Default::default()
        }
    }

    /// Craft that calibrates on spawn over a short window.
    pub fn quick_calibration() -> QuadrotorConfig {
        QuadrotorConfig {
            name: "test_calibrating".to_string(),
            calibration: CalibrationConfig {
                settle_delay: 0.1,
                measurement_window: 0.2,
                ..Default::default()
            },
            start: StartConfig {
                position: Vector3::new(0.0, 0.0, -10.0),
                heading: 0.0,
            },
            ..Default::default()
        }
    }

    /// Ready craft flown from the given source, without input smoothing.
    pub fn flown_by(mode: InputMode) -> QuadrotorConfig {
        let mut config = ready();
        config.name = format!("test_{}", mode.name().to_lowercase());
        config.input = InputConfig {
            mode,
            smoothing: 0.0,
            ..Default::default()
        };
        config
    }
}
