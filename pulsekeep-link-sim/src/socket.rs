use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pulsekeep_domain::StreamSocket;

// ---------------------------------------------------------------------------
// WritePolicy
// ---------------------------------------------------------------------------

/// What the next write attempts should return.
pub enum WritePolicy {
    // ---
    /// Every write accepted in full — a healthy, fast reader.
    AcceptAll,

    /// Every write returns zero — a completely stalled reader.
    RejectAll,

    /// Each write pops the next byte count from the script (capped at the
    /// requested length). An exhausted script falls back to accepting.
    Scripted(VecDeque<usize>),

    /// Each write is dropped (zero) with the given probability, from a
    /// seeded RNG so runs reproduce exactly.
    Flaky { drop_percent: f64, rng: StdRng },
}

// ---

impl WritePolicy {
    // ---
    /// Seeded flaky policy. Same seed, same drop sequence.
    pub fn flaky(drop_percent: f64, seed: u64) -> Self {
        // ---
        WritePolicy::Flaky {
            drop_percent,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // ---

    fn accepts(&mut self, wanted: usize) -> usize {
        // ---
        match self {
            WritePolicy::AcceptAll => wanted,
            WritePolicy::RejectAll => 0,
            WritePolicy::Scripted(script) => script.pop_front().unwrap_or(wanted).min(wanted),
            WritePolicy::Flaky { drop_percent, rng } => {
                if rng.gen_bool((*drop_percent).clamp(0.0, 1.0)) {
                    0
                } else {
                    wanted
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SimSocket
// ---------------------------------------------------------------------------

struct SocketState {
    // ---
    policy: WritePolicy,
    connected: bool,
    closed: bool,
    /// Bytes the "transport" accepted, in order.
    written: Vec<u8>,
}

// ---

/// Mock client connection.
///
/// The service end owns the [`SimSocket`] (as a `StreamSocketPtr`); the
/// test keeps the [`SimSocketHandle`] to script outcomes and inspect what
/// was delivered.
pub struct SimSocket {
    state: Arc<Mutex<SocketState>>,
}

/// Test-side handle to a [`SimSocket`].
#[derive(Clone)]
pub struct SimSocketHandle {
    state: Arc<Mutex<SocketState>>,
}

// ---

impl SimSocket {
    // ---
    /// Create a connected socket under the given policy, plus its handle.
    pub fn pair(policy: WritePolicy) -> (Self, SimSocketHandle) {
        // ---
        let state = Arc::new(Mutex::new(SocketState {
            policy,
            connected: true,
            closed: false,
            written: Vec::new(),
        }));

        (
            Self {
                state: Arc::clone(&state),
            },
            SimSocketHandle { state },
        )
    }
}

// ---

impl StreamSocket for SimSocket {
    // ---
    fn write(&mut self, buf: &[u8]) -> usize {
        // ---
        let mut state = self.state.lock().unwrap();
        if !state.connected || state.closed {
            return 0;
        }

        let accepted = state.policy.accepts(buf.len());
        state.written.extend_from_slice(&buf[..accepted]);
        accepted
    }

    fn is_connected(&mut self) -> bool {
        // ---
        let state = self.state.lock().unwrap();
        state.connected && !state.closed
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        // ---
        let state = self.state.lock().unwrap();
        if state.connected && !state.closed {
            Some(([127, 0, 0, 1], 49152).into())
        } else {
            None
        }
    }

    fn close(self: Box<Self>) {
        // ---
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        state.connected = false;
    }
}

// ---

impl SimSocketHandle {
    // ---
    /// Swap the write policy mid-test (e.g. healthy → stalled → healthy).
    pub fn set_policy(&self, policy: WritePolicy) {
        self.state.lock().unwrap().policy = policy;
    }

    /// Simulate the peer closing the connection.
    pub fn disconnect(&self) {
        self.state.lock().unwrap().connected = false;
    }

    /// Whether the service closed its end.
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    /// Everything the transport accepted so far.
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().unwrap().written.clone()
    }

    /// Accepted bytes split into text lines, for cadence assertions.
    pub fn written_lines(&self) -> Vec<String> {
        // ---
        let written = self.state.lock().unwrap();
        String::from_utf8_lossy(&written.written)
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use std::collections::VecDeque;

    use pulsekeep_domain::StreamSocket;

    use super::{SimSocket, WritePolicy};

    // ---

    #[test]
    fn scripted_policy_controls_each_write() {
        // ---
        let script = VecDeque::from([0, 3, usize::MAX]);
        let (mut sock, handle) = SimSocket::pair(WritePolicy::Scripted(script));

        assert_eq!(sock.write(b"alive\r\n"), 0);
        assert_eq!(sock.write(b"alive\r\n"), 3, "script caps at requested len");
        assert_eq!(sock.write(b"alive\r\n"), 7);

        // Exhausted script falls back to accepting.
        assert_eq!(sock.write(b"alive\r\n"), 7);
        assert_eq!(handle.written(), b"alialive\r\nalive\r\n");
    }

    #[test]
    fn disconnected_socket_takes_nothing() {
        // ---
        let (mut sock, handle) = SimSocket::pair(WritePolicy::AcceptAll);

        handle.disconnect();
        assert_eq!(sock.write(b"alive\r\n"), 0);
        assert!(!sock.is_connected());
        assert_eq!(sock.peer_addr(), None);
    }

    #[test]
    fn close_is_visible_to_the_test_handle() {
        // ---
        let (sock, handle) = SimSocket::pair(WritePolicy::AcceptAll);

        assert!(!handle.is_closed());
        Box::new(sock).close();
        assert!(handle.is_closed());
    }

    #[test]
    fn flaky_policy_is_deterministic_per_seed() {
        // ---
        let outcomes = |seed: u64| -> Vec<usize> {
            let (mut sock, _handle) = SimSocket::pair(WritePolicy::flaky(0.5, seed));
            (0..32).map(|_| sock.write(b"alive\r\n")).collect()
        };

        assert_eq!(outcomes(7), outcomes(7), "same seed must reproduce");
        assert_ne!(outcomes(7), outcomes(8), "different seeds should diverge");
    }

    #[test]
    fn written_lines_splits_on_crlf() {
        // ---
        let (mut sock, handle) = SimSocket::pair(WritePolicy::AcceptAll);

        sock.write(b"pulsekeep heartbeat service ready\r\n");
        sock.write(b"alive\r\n");
        sock.write(b"alive\r\n");

        assert_eq!(
            handle.written_lines(),
            vec!["pulsekeep heartbeat service ready", "alive", "alive"]
        );
    }
}
