//! UDP telemetry and command link.
//!
//! Outbound, rendered frames and sensor snapshots go to a configurable endpoint as single
//! datagrams. Inbound, a background listener keeps the latest command packet.

mod packets;
mod receiver;
mod settings;
mod streamer;

pub use packets::{CommandPacket, SensorPacket};
pub use receiver::{CommandReceiver, ReceivedCommand};
pub use settings::{
    FileStore, MemoryStore, SettingsStorage, SettingsStore, StreamSettings, StreamSettingsChanged,
};
pub use streamer::{encode_jpeg, LatestFrame, TelemetryStreamer};
