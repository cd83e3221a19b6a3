use bevy::prelude::*;
use std::{
    net::UdpSocket,
    time::{Duration, Instant},
};

use crate::common::TestApp;

/// Runs frames until `condition` holds, up to `max_steps`
pub fn wait_for_condition<F>(test_app: &mut TestApp, condition: F, max_steps: usize) -> bool
where
    F: Fn(&mut App) -> bool,
{
    for _ in 0..max_steps {
        if condition(&mut test_app.app) {
            return true;
        }
        test_app.run_frame();
    }
    false
}

/// Polls `condition` in wall-clock time, for state written by background threads
pub fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Loopback socket on a free port, with a read timeout for receiving telemetry
pub fn local_listener() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind loopback socket");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set read timeout");
    let port = socket.local_addr().expect("local address").port();
    (socket, port)
}

/// Sends one JSON command datagram to a local command port
pub fn send_command_json(port: u16, json: &str) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind sender socket");
    socket
        .send_to(json.as_bytes(), ("127.0.0.1", port))
        .expect("send command datagram");
}
