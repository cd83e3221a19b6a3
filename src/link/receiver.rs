use bevy::prelude::*;
use std::{
    io::{self, ErrorKind},
    net::UdpSocket,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{
    components::ControlCommand,
    link::CommandPacket,
    utils::{LinkError, DEFAULT_COMMAND_PORT},
};

const READ_TIMEOUT: Duration = Duration::from_millis(100);
const RECV_BUFFER: usize = 2048;

/// Most recent command received, swapped in as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReceivedCommand {
    pub command: ControlCommand,
    /// Incremented on every accepted datagram; 0 means nothing received yet
    pub sequence: u64,
}

/// Background UDP listener for remote commands.
///
/// Dropping the resource stops and joins the listener thread.
#[derive(Resource)]
pub struct CommandReceiver {
    latest: Arc<Mutex<ReceivedCommand>>,
    running: Arc<AtomicBool>,
    port: u16,
    handle: Option<JoinHandle<()>>,
}

impl CommandReceiver {
    /// Binds `0.0.0.0:port` and starts listening. Port 0 picks a free port.
    pub fn bind(port: u16) -> Result<Self, LinkError> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_read_timeout(Some(READ_TIMEOUT))?;
        let port = socket.local_addr()?.port();

        let latest = Arc::new(Mutex::new(ReceivedCommand::default()));
        let running = Arc::new(AtomicBool::new(true));

        let handle = thread::Builder::new()
            .name("command-receiver".to_string())
            .spawn({
                let latest = Arc::clone(&latest);
                let running = Arc::clone(&running);
                move || listen(socket, latest, running)
            })?;

        info!("Listening for commands on UDP port {}", port);
        Ok(Self {
            latest,
            running,
            port,
            handle: Some(handle),
        })
    }

    pub fn bind_default() -> Result<Self, LinkError> {
        Self::bind(DEFAULT_COMMAND_PORT)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn latest(&self) -> ReceivedCommand {
        match self.latest.lock() {
            Ok(latest) => *latest,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Latest command, or `None` before the first valid datagram.
    pub fn command(&self) -> Option<ControlCommand> {
        let latest = self.latest();
        (latest.sequence > 0).then_some(latest.command)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Drop for CommandReceiver {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Command receiver thread panicked");
            }
        }
    }
}

/// Tracks consecutive socket faults. Only the first of a run is logged as a warning.
#[derive(Debug, Default)]
struct FaultBackoff {
    consecutive: u32,
}

impl FaultBackoff {
    /// Records a failed read and returns how long to wait before the next one.
    /// Read timeouts are idle polls and return zero.
    fn record(&mut self, e: &io::Error) -> Duration {
        if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) {
            return Duration::ZERO;
        }
        if self.consecutive == 0 {
            warn!("Command socket error: {}", e);
        } else {
            debug!("Command socket error ({} in a row): {}", self.consecutive + 1, e);
        }
        self.consecutive = self.consecutive.saturating_add(1);
        READ_TIMEOUT
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }
}

fn listen(socket: UdpSocket, latest: Arc<Mutex<ReceivedCommand>>, running: Arc<AtomicBool>) {
    let mut buf = [0u8; RECV_BUFFER];
    let mut backoff = FaultBackoff::default();
    while running.load(Ordering::Relaxed) {
        let len = match socket.recv_from(&mut buf) {
            Ok((len, _)) => {
                backoff.reset();
                len
            }
            Err(e) => {
                let wait = backoff.record(&e);
                if !wait.is_zero() {
                    thread::sleep(wait);
                }
                continue;
            }
        };

        match CommandPacket::parse(&buf[..len]) {
            Ok(packet) => {
                let command = packet.to_command();
                if let Ok(mut slot) = latest.lock() {
                    *slot = ReceivedCommand {
                        command,
                        sequence: slot.sequence + 1,
                    };
                }
            }
            Err(e) => debug!("Discarding malformed command datagram: {}", e),
        }
    }
    debug!("Command receiver stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_reads_do_not_back_off() {
        let mut backoff = FaultBackoff::default();
        for kind in [ErrorKind::WouldBlock, ErrorKind::TimedOut] {
            assert_eq!(backoff.record(&io::Error::from(kind)), Duration::ZERO);
        }
        assert_eq!(backoff.consecutive, 0);
    }

    #[test]
    fn test_persistent_fault_sleeps_between_reads() {
        let mut backoff = FaultBackoff::default();
        for _ in 0..3 {
            let wait = backoff.record(&io::Error::from(ErrorKind::ConnectionReset));
            assert_eq!(wait, READ_TIMEOUT);
        }
        assert_eq!(backoff.consecutive, 3);

        backoff.reset();
        assert_eq!(backoff.consecutive, 0);
    }
}
