use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::utils::{LinkError, DEFAULT_SENSORS_PORT, DEFAULT_VIDEO_PORT};

/// Runtime-adjustable parameters of the outbound telemetry stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1..=100
    pub quality: u8,
    /// Destination host for both streams
    pub address: String,
    pub video_port: u16,
    pub sensors_port: u16,
    /// Sensor snapshots per second
    pub sensors_rate: f64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            quality: 50,
            address: "192.168.0.101".to_string(),
            video_port: DEFAULT_VIDEO_PORT,
            sensors_port: DEFAULT_SENSORS_PORT,
            sensors_rate: 30.0,
        }
    }
}

impl StreamSettings {
    /// Whether moving from `self` to `other` requires rebuilding the transport.
    pub fn needs_restart(&self, other: &StreamSettings) -> bool {
        self.width != other.width
            || self.height != other.height
            || self.quality != other.quality
            || self.address != other.address
            || self.video_port != other.video_port
            || self.sensors_port != other.sensors_port
            || (self.sensors_rate - other.sensors_rate).abs() > 0.1
    }

    /// Seconds between sensor snapshots. A non-positive rate disables them.
    pub fn sensors_interval(&self) -> Option<f64> {
        if self.sensors_rate.is_finite() && self.sensors_rate > 0.0 {
            Some(1.0 / self.sensors_rate)
        } else {
            None
        }
    }

    pub fn to_yaml(&self) -> Result<String, LinkError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, LinkError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads settings from a store, falling back to defaults when nothing usable is stored.
    pub fn load_from(store: &dyn SettingsStore) -> Self {
        match store.load() {
            Some(yaml) => Self::from_yaml(&yaml).unwrap_or_else(|e| {
                warn!("Stored stream settings are invalid, using defaults: {}", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn save_to(&self, store: &dyn SettingsStore) -> Result<(), LinkError> {
        store.save(&self.to_yaml()?)
    }
}

/// Where stream settings persist between runs.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, contents: &str) -> Result<(), LinkError>;
}

/// Settings kept in a YAML file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<config dir>/quadflyer/stream.yaml`, when the platform has a config directory.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("quadflyer").join("stream.yaml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn save(&self, contents: &str) -> Result<(), LinkError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-process store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Arc<Mutex<Option<String>>>,
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    fn save(&self, contents: &str) -> Result<(), LinkError> {
        if let Ok(mut slot) = self.contents.lock() {
            *slot = Some(contents.to_string());
        }
        Ok(())
    }
}

/// Store the link plugin persists settings changes to.
#[derive(Resource, Clone)]
pub struct SettingsStorage(pub Arc<dyn SettingsStore>);

/// Runtime settings change requested by a control panel.
#[derive(Event, Debug, Clone)]
pub struct StreamSettingsChanged(pub StreamSettings);
