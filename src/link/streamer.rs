use bevy::prelude::*;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use image::{codecs::jpeg::JpegEncoder, imageops, ColorType, DynamicImage, RgbaImage};
use std::{
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    thread::{self, JoinHandle},
};

use crate::{
    link::{SensorPacket, StreamSettings},
    utils::{LinkError, MAX_UDP_PAYLOAD},
};

const QUEUE_DEPTH: usize = 4;

/// Most recent render of the onboard camera, RGBA8, written by the renderer.
#[derive(Resource, Default, Debug, Clone)]
pub struct LatestFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl LatestFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: Vec::new(),
            width,
            height,
        }
    }

    pub fn update(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

enum Outbound {
    Frame {
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
    Sensors(SensorPacket),
}

/// Socket, endpoints and worker thread for one set of settings.
struct Transport {
    sender: Option<Sender<Outbound>>,
    handle: Option<JoinHandle<()>>,
}

impl Transport {
    fn open(settings: &StreamSettings) -> Result<Self, LinkError> {
        let video = resolve(&settings.address, settings.video_port)?;
        let sensors = resolve(&settings.address, settings.sensors_port)?;
        let bind_addr = if video.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)?;

        let (sender, receiver) = bounded(QUEUE_DEPTH);
        let worker = Worker {
            socket,
            video,
            sensors,
            width: settings.width,
            height: settings.height,
            quality: settings.quality,
        };
        let handle = thread::Builder::new()
            .name("telemetry-streamer".to_string())
            .spawn(move || worker.run(receiver))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    fn try_send(&self, item: Outbound) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.try_send(item) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Telemetry queue full, dropping datagram");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Telemetry worker has stopped");
                false
            }
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Telemetry worker panicked");
            }
        }
    }
}

fn resolve(address: &str, port: u16) -> Result<SocketAddr, LinkError> {
    (address, port)
        .to_socket_addrs()
        .map_err(|_| LinkError::Resolve(address.to_string()))?
        .next()
        .ok_or_else(|| LinkError::Resolve(address.to_string()))
}

struct Worker {
    socket: UdpSocket,
    video: SocketAddr,
    sensors: SocketAddr,
    width: u32,
    height: u32,
    quality: u8,
}

impl Worker {
    fn run(self, receiver: Receiver<Outbound>) {
        for item in receiver.iter() {
            let result = match item {
                Outbound::Frame {
                    data,
                    width,
                    height,
                } => encode_jpeg(&data, width, height, self.width, self.height, self.quality)
                    .and_then(|jpeg| self.send(&jpeg, self.video)),
                Outbound::Sensors(packet) => packet
                    .to_bytes()
                    .and_then(|bytes| self.send(&bytes, self.sensors)),
            };
            if let Err(e) = result {
                debug!("Telemetry datagram dropped: {}", e);
            }
        }
    }

    fn send(&self, payload: &[u8], to: SocketAddr) -> Result<(), LinkError> {
        if payload.len() > MAX_UDP_PAYLOAD {
            return Err(LinkError::Oversized(payload.len()));
        }
        self.socket.send_to(payload, to)?;
        Ok(())
    }
}

/// Encodes an RGBA8 buffer as JPEG at the target resolution.
pub fn encode_jpeg(
    rgba: &[u8],
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
    quality: u8,
) -> Result<Vec<u8>, LinkError> {
    let size_error = || LinkError::FrameSize {
        width,
        height,
        actual: rgba.len(),
    };
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(size_error)?;
    if expected == 0 || rgba.len() != expected {
        return Err(size_error());
    }

    let mut image = RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(size_error)?;
    if (width, height) != (target_width, target_height) && target_width > 0 && target_height > 0
    {
        image = imageops::resize(
            &image,
            target_width,
            target_height,
            imageops::FilterType::Triangle,
        );
    }

    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(out)
}

/// Outbound video and sensor stream.
///
/// All sends are fire-and-forget: a full queue or a dead transport drops the datagram.
#[derive(Resource)]
pub struct TelemetryStreamer {
    settings: StreamSettings,
    transport: Option<Transport>,
}

impl TelemetryStreamer {
    /// Creates a streamer and opens its transport. Failure leaves it inactive.
    pub fn new(settings: StreamSettings) -> Self {
        let mut streamer = Self {
            settings: settings.clone(),
            transport: None,
        };
        if let Err(e) = streamer.reconfigure(settings) {
            error!("Telemetry stream inactive: {}", e);
        }
        streamer
    }

    /// A streamer that never opens a transport.
    pub fn inactive(settings: StreamSettings) -> Self {
        Self {
            settings,
            transport: None,
        }
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.transport.is_some()
    }

    /// Replaces the transport with one built for `settings`.
    ///
    /// The new transport is fully built before it replaces the old one; if building fails the
    /// streamer goes inactive instead of keeping a half-applied configuration.
    pub fn reconfigure(&mut self, settings: StreamSettings) -> Result<(), LinkError> {
        let opened = Transport::open(&settings);
        self.settings = settings;
        match opened {
            Ok(transport) => {
                self.transport = Some(transport);
                info!(
                    "Telemetry streaming to {} (video {}, sensors {}) at {}x{}",
                    self.settings.address,
                    self.settings.video_port,
                    self.settings.sensors_port,
                    self.settings.width,
                    self.settings.height
                );
                Ok(())
            }
            Err(e) => {
                self.transport = None;
                Err(e)
            }
        }
    }

    /// Applies new settings, rebuilding the transport only when required.
    pub fn apply(&mut self, settings: StreamSettings) -> Result<(), LinkError> {
        if self.settings.needs_restart(&settings) || !self.is_active() {
            self.reconfigure(settings)
        } else {
            self.settings = settings;
            Ok(())
        }
    }

    /// Queues a rendered frame for encoding and sending.
    pub fn send_frame(&self, frame: &LatestFrame) -> bool {
        let Some(transport) = &self.transport else {
            return false;
        };
        if frame.is_empty() {
            return false;
        }
        transport.try_send(Outbound::Frame {
            data: frame.data.clone(),
            width: frame.width,
            height: frame.height,
        })
    }

    pub fn send_sensors(&self, packet: SensorPacket) -> bool {
        match &self.transport {
            Some(transport) => transport.try_send(Outbound::Sensors(packet)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_magic() {
        let rgba = vec![128u8; 32 * 24 * 4];
        let jpeg = encode_jpeg(&rgba, 32, 24, 32, 24, 50).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_jpeg_resizes() {
        let rgba = vec![200u8; 64 * 48 * 4];
        let jpeg = encode_jpeg(&rgba, 64, 48, 16, 12, 90).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_jpeg_rejects_bad_buffer() {
        let result = encode_jpeg(&[0u8; 10], 4, 4, 4, 4, 50);
        assert!(matches!(result, Err(LinkError::FrameSize { actual: 10, .. })));
        assert!(encode_jpeg(&[], 0, 0, 4, 4, 50).is_err());
    }

    #[test]
    fn test_bad_address_leaves_inactive() {
        let mut streamer = TelemetryStreamer::inactive(StreamSettings::default());
        let bad = StreamSettings {
            address: "not an address".to_string(),
            ..Default::default()
        };
        assert!(streamer.reconfigure(bad.clone()).is_err());
        assert!(!streamer.is_active());
        assert_eq!(streamer.settings(), &bad);
        assert!(!streamer.send_sensors(SensorPacket::default()));
    }
}
