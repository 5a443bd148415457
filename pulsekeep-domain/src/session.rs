//! [`ClientSession`] — one accepted connection's lifecycle.
//!
//! # State machine
//!
//! ```text
//! (no session) --accept--> BannerPending --full banner write--> Streaming
//!       ^                       |                                   |
//!       |                 short write: retry                 cadence elapsed:
//!       |                 every tick                         one write attempt
//!       |                       |                                   |
//!       +---- congestion threshold / peer disconnect / link down ---+
//! ```
//!
//! The absence of a session is the `Empty` state; the service loop holds
//! `Option<ClientSession>` so that dropping a session discards every
//! timestamp with it — "closing resets all timestamps" holds by
//! construction, not by bookkeeping.

use tracing::{debug, info};
use uuid::Uuid;

use tokio::time::Instant;

use super::config::ServiceConfig;
use super::congestion::CongestionTracker;
use super::probe::{self, WriteOutcome};
use super::transport::StreamSocketPtr;

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Where a live session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    // ---
    /// Client accepted; greeting not yet confirmed delivered.
    BannerPending,

    /// Greeting delivered; liveness lines cadenced from that moment.
    Streaming,
}

// ---------------------------------------------------------------------------
// DropReason
// ---------------------------------------------------------------------------

/// Why a session was torn down. Logged on every close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    // ---
    /// Congestion threshold exceeded — every write stalled for too long.
    WriteStalled,

    /// Peer closed the connection (observed passively).
    ClientDisconnected,

    /// The network link went down; pre-empts any session state.
    LinkDropped,

    /// A newly accepted client replaced this session (single-client policy).
    Superseded,
}

// ---

impl DropReason {
    // ---
    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            DropReason::WriteStalled => "write stalled",
            DropReason::ClientDisconnected => "client disconnected",
            DropReason::LinkDropped => "link dropped",
            DropReason::Superseded => "superseded by new client",
        }
    }
}

// ---------------------------------------------------------------------------
// StepVerdict
// ---------------------------------------------------------------------------

/// Result of driving one session step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    // ---
    /// Session stays. Covers idle ticks, deliveries, and tolerated stalls.
    Kept,

    /// Stall reached the eviction threshold; the caller must close the
    /// session with [`DropReason::WriteStalled`].
    Evict,
}

// ---------------------------------------------------------------------------
// ClientSession
// ---------------------------------------------------------------------------

/// Owns one accepted connection: banner delivery, heartbeat cadence,
/// congestion response. Teardown is the caller's move ([`Self::close`]),
/// driven by the verdicts this type returns.
pub struct ClientSession {
    // ---
    /// Stable id for log correlation across this session's lifetime.
    id: Uuid,

    /// Exclusively owned transport handle.
    socket: StreamSocketPtr,

    phase: SessionPhase,

    /// Last confirmed heartbeat delivery. `None` until the banner lands —
    /// the cadence anchors to banner delivery, not to accept time.
    last_heartbeat: Option<Instant>,

    congestion: CongestionTracker,
}

// ---

impl ClientSession {
    // ---
    /// Install a freshly accepted socket as a `BannerPending` session.
    /// All timestamps start cleared.
    pub fn new(socket: StreamSocketPtr, cfg: &ServiceConfig) -> Self {
        // ---
        let id = Uuid::new_v4();
        info!(session = %id, peer = ?socket.peer_addr(), "client accepted");

        Self {
            id,
            socket,
            phase: SessionPhase::BannerPending,
            last_heartbeat: None,
            congestion: CongestionTracker::new(cfg.eviction_threshold),
        }
    }

    // ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Last confirmed heartbeat delivery (banner counts as the first).
    pub fn last_heartbeat(&self) -> Option<Instant> {
        self.last_heartbeat
    }

    /// Whether the peer still looks reachable. Delegates to the socket;
    /// the service loop checks this once per tick after the session step.
    pub fn is_peer_connected(&mut self) -> bool {
        self.socket.is_connected()
    }

    // ---

    /// Drive exactly one banner-or-heartbeat step at `now`.
    ///
    /// At most one write attempt happens per call. The heartbeat timer is
    /// deliberately NOT advanced on a failed write, so the next tick
    /// retries immediately instead of waiting out a full cadence period.
    pub fn step(&mut self, now: Instant, cfg: &ServiceConfig) -> StepVerdict {
        // ---
        match self.phase {
            SessionPhase::BannerPending => self.step_banner(now, cfg),
            SessionPhase::Streaming => self.step_heartbeat(now, cfg),
        }
    }

    // ---

    /// Banner not yet delivered: retry it this tick. The congestion rule
    /// is the same as for heartbeats, anchored to repeated banner failures.
    fn step_banner(&mut self, now: Instant, cfg: &ServiceConfig) -> StepVerdict {
        // ---
        match probe::attempt(self.socket.as_mut(), cfg.banner.as_bytes()) {
            WriteOutcome::Delivered => {
                debug!(session = %self.id, "banner delivered, streaming");
                self.phase = SessionPhase::Streaming;
                self.last_heartbeat = Some(now);
                self.congestion.on_success();
                StepVerdict::Kept
            }
            WriteOutcome::Backpressure => {
                if self.congestion.on_failure(now) {
                    StepVerdict::Evict
                } else {
                    StepVerdict::Kept
                }
            }
        }
    }

    // ---

    fn step_heartbeat(&mut self, now: Instant, cfg: &ServiceConfig) -> StepVerdict {
        // ---
        let due = match self.last_heartbeat {
            Some(at) => now.duration_since(at) >= cfg.heartbeat_period,
            None => true,
        };
        if !due {
            return StepVerdict::Kept;
        }

        match probe::attempt(self.socket.as_mut(), cfg.heartbeat_line.as_bytes()) {
            WriteOutcome::Delivered => {
                self.last_heartbeat = Some(now);
                self.congestion.on_success();
                StepVerdict::Kept
            }
            WriteOutcome::Backpressure => {
                // last_heartbeat stays put: the very next tick retries.
                if self.congestion.on_failure(now) {
                    StepVerdict::Evict
                } else {
                    StepVerdict::Kept
                }
            }
        }
    }

    // ---

    /// Tear the session down, logging the reason and consuming the socket.
    pub fn close(self, reason: DropReason) {
        // ---
        info!(session = %self.id, reason = reason.as_str(), "session closed");
        self.socket.close();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
