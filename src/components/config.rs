use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    components::{
        CalibrationConfig, ControllerConfig, InputConfig, MotorConfig, PhysicsComponent,
        SensorConfig, SpatialComponent,
    },
    utils::ConfigError,
};

/// Rigid-body mass properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MassModel {
    /// Total mass (kg).
    pub mass: f64,
    /// Principal moments of inertia about the body axes (kg·m²).
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
}

impl MassModel {
    pub fn new(mass: f64, ixx: f64, iyy: f64, izz: f64) -> Self {
        Self {
            mass,
            ixx,
            iyy,
            izz,
        }
    }

    pub fn inertia(&self) -> Matrix3<f64> {
        Matrix3::from_diagonal(&Vector3::new(self.ixx, self.iyy, self.izz))
    }

    pub fn physics(&self) -> PhysicsComponent {
        PhysicsComponent::new(self.mass, self.inertia())
    }
}

impl Default for MassModel {
    /// Small indoor quad, hovering near half a newton per rotor.
    fn default() -> Self {
        Self::new(0.2, 0.01, 0.01, 0.02)
    }
}

/// Initial pose of a spawned craft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StartConfig {
    /// Position in the world frame (NED) [m]
    pub position: Vector3<f64>,
    /// Heading [deg]
    pub heading: f64,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, -1.0),
            heading: 0.0,
        }
    }
}

impl StartConfig {
    pub fn spatial(&self) -> SpatialComponent {
        SpatialComponent::at_position(self.position).with_euler_degrees(0.0, 0.0, self.heading)
    }
}

/// Complete description of one quadrotor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuadrotorConfig {
    pub name: String,
    pub mass: MassModel,
    pub motors: MotorConfig,
    pub controller: ControllerConfig,
    pub calibration: CalibrationConfig,
    pub sensors: SensorConfig,
    pub input: InputConfig,
    pub start: StartConfig,
    /// Publish this craft's sensor snapshot over the telemetry link
    pub telemetry: bool,
}

impl Default for QuadrotorConfig {
    fn default() -> Self {
        Self {
            name: "quadrotor".to_string(),
            mass: MassModel::default(),
            motors: MotorConfig::default(),
            controller: ControllerConfig::default(),
            calibration: CalibrationConfig::default(),
            sensors: SensorConfig::default(),
            input: InputConfig::default(),
            start: StartConfig::default(),
            telemetry: true,
        }
    }
}

impl QuadrotorConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(name, format!("must be positive, got {}", value)))
            }
        };

        positive("mass.mass", self.mass.mass)?;
        positive("mass.ixx", self.mass.ixx)?;
        positive("mass.iyy", self.mass.iyy)?;
        positive("mass.izz", self.mass.izz)?;
        positive("motors.max_thrust", self.motors.max_thrust)?;
        positive("motors.arm_length", self.motors.arm_length)?;
        positive("sensors.raycast_distance", self.sensors.raycast_distance)?;
        positive("calibration.measurement_window", self.calibration.measurement_window)?;

        if !(0.0..1.0).contains(&self.controller.filter_strength) {
            return Err(ConfigError::invalid(
                "controller.filter_strength",
                "must be in [0, 1)",
            ));
        }
        if !(0.1..=3.0).contains(&self.input.sensitivity) {
            return Err(ConfigError::invalid("input.sensitivity", "must be in [0.1, 3]"));
        }
        if self.motors.response_time < 0.0 || self.input.smoothing < 0.0 {
            return Err(ConfigError::invalid(
                "time constants",
                "motor response time and input smoothing must not be negative",
            ));
        }
        if self.controller.hover_thrust > self.motors.max_thrust {
            return Err(ConfigError::invalid(
                "controller.hover_thrust",
                "exceeds motors.max_thrust",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::InputMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        assert!(QuadrotorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
name: test_quad
controller:
  kp: 2.0
  auto_calibrate: false
input:
  mode: Network
"#;
        let config = QuadrotorConfig::from_yaml(yaml).expect("valid config");
        assert_eq!(config.name, "test_quad");
        assert_eq!(config.controller.kp, 2.0);
        assert_eq!(config.controller.kd, 0.8);
        assert!(!config.controller.auto_calibrate);
        assert_eq!(config.input.mode, InputMode::Network);
        assert_eq!(config.motors, MotorConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let yaml = "input:\n  sensitivity: 5.0\n";
        match QuadrotorConfig::from_yaml(yaml) {
            Err(ConfigError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "input.sensitivity")
            }
            other => panic!("expected invalid parameter, got {:?}", other),
        }

        let mut config = QuadrotorConfig::default();
        config.mass.mass = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        let yaml = QuadrotorConfig::default().to_yaml().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = QuadrotorConfig::load(file.path()).unwrap();
        assert_eq!(loaded, QuadrotorConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let result = QuadrotorConfig::load("/nonexistent/quad.yaml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }
}
