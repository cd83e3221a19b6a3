use std::io;
use thiserror::Error;

/// Errors raised while loading or validating a quadrotor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileError(#[from] io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by the telemetry/command link. None of these reach the control schedule.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Could not resolve address '{0}'")]
    Resolve(String),

    #[error("Malformed packet: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_yaml::Error),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Frame buffer size {actual} does not match {width}x{height} RGBA")]
    FrameSize {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("Datagram of {0} bytes exceeds the UDP payload limit")]
    Oversized(usize),
}
