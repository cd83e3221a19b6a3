use bevy::prelude::*;

use crate::{
    components::{AttitudeState, TelemetrySource},
    link::{LatestFrame, SensorPacket, SettingsStorage, StreamSettingsChanged, TelemetryStreamer},
};

/// Sends the newest rendered frame, once per frame the renderer produced.
pub fn video_stream_system(
    streamer: Option<Res<TelemetryStreamer>>,
    frame: Option<Res<LatestFrame>>,
) {
    let (Some(streamer), Some(frame)) = (streamer, frame) else {
        return;
    };
    if frame.is_changed() {
        streamer.send_frame(&frame);
    }
}

/// Sends a sensor snapshot at the configured rate.
pub fn sensor_stream_system(
    time: Res<Time>,
    mut since_last: Local<f64>,
    streamer: Option<Res<TelemetryStreamer>>,
    query: Query<&AttitudeState, With<TelemetrySource>>,
) {
    let Some(streamer) = streamer else {
        return;
    };
    let Some(interval) = streamer.settings().sensors_interval() else {
        return;
    };

    *since_last += time.delta_secs_f64();
    if *since_last < interval {
        return;
    }

    if let Some(state) = query.iter().next() {
        streamer.send_sensors(SensorPacket::from(state));
    }
    *since_last = 0.0;
}

/// Applies runtime settings changes and persists them.
pub fn stream_settings_system(
    mut events: EventReader<StreamSettingsChanged>,
    streamer: Option<ResMut<TelemetryStreamer>>,
    storage: Option<Res<SettingsStorage>>,
) {
    // Only the newest request matters.
    let Some(StreamSettingsChanged(settings)) = events.read().last().cloned() else {
        return;
    };

    if let Some(mut streamer) = streamer {
        if let Err(e) = streamer.apply(settings.clone()) {
            error!("Failed to apply stream settings: {}", e);
        }
    }

    if let Some(storage) = storage {
        if let Err(e) = settings.save_to(storage.0.as_ref()) {
            warn!("Failed to persist stream settings: {}", e);
        }
    }
}
