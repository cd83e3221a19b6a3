use bevy::prelude::*;
use std::sync::Arc;

use crate::link::{
    CommandReceiver, FileStore, SettingsStorage, SettingsStore, StreamSettings,
    StreamSettingsChanged, TelemetryStreamer,
};
use crate::systems::{sensor_stream_system, stream_settings_system, video_stream_system};
use crate::utils::DEFAULT_COMMAND_PORT;

/// UDP telemetry out, commands in.
///
/// Network faults are logged and never stop the app: a failed bind or an unreachable
/// destination simply leaves that half of the link inactive.
pub struct LinkPlugin {
    /// Explicit settings; otherwise loaded from `store`, otherwise defaults
    pub settings: Option<StreamSettings>,
    pub store: Option<Arc<dyn SettingsStore>>,
    /// Port for inbound commands; `None` disables the listener
    pub command_port: Option<u16>,
    pub stream: bool,
}

impl Default for LinkPlugin {
    fn default() -> Self {
        Self {
            settings: None,
            store: FileStore::default_location()
                .map(|store| Arc::new(store) as Arc<dyn SettingsStore>),
            command_port: Some(DEFAULT_COMMAND_PORT),
            stream: true,
        }
    }
}

impl LinkPlugin {
    pub fn with_settings(mut self, settings: StreamSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn with_command_port(mut self, port: Option<u16>) -> Self {
        self.command_port = port;
        self
    }

    pub fn without_stream(mut self) -> Self {
        self.stream = false;
        self
    }

    fn resolve_settings(&self) -> StreamSettings {
        match (&self.settings, &self.store) {
            (Some(settings), _) => settings.clone(),
            (None, Some(store)) => StreamSettings::load_from(store.as_ref()),
            (None, None) => StreamSettings::default(),
        }
    }
}

impl Plugin for LinkPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StreamSettingsChanged>();

        if let Some(store) = &self.store {
            app.insert_resource(SettingsStorage(Arc::clone(store)));
        }

        let settings = self.resolve_settings();
        let streamer = if self.stream {
            TelemetryStreamer::new(settings)
        } else {
            TelemetryStreamer::inactive(settings)
        };
        app.insert_resource(streamer);

        if let Some(port) = self.command_port {
            match CommandReceiver::bind(port) {
                Ok(receiver) => {
                    app.insert_resource(receiver);
                }
                Err(e) => error!("Command listener on port {} unavailable: {}", port, e),
            }
        }

        app.add_systems(
            Last,
            (
                stream_settings_system,
                video_stream_system,
                sensor_stream_system,
            )
                .chain(),
        );
    }
}
