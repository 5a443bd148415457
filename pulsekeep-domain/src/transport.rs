use std::net::SocketAddr;

use async_trait::async_trait;

use super::error::Result;

// ---------------------------------------------------------------------------
// StreamSocket
// ---------------------------------------------------------------------------

/// One accepted client connection.
///
/// Exclusively owned by the session that accepted it; created on accept,
/// consumed by [`StreamSocket::close`] on teardown. Every operation returns
/// an explicit outcome the state machine inspects — there is no error path
/// that aborts the owning task.
///
/// All methods must be non-blocking. If the host platform's write can
/// block, the implementation must wrap it to poll instead.
pub trait StreamSocket: Send {
    // ---
    /// Attempt to write `buf` without blocking.
    ///
    /// Returns the byte count the transport actually accepted. Zero is a
    /// valid, expected outcome meaning transient backpressure (or a dead
    /// transport — hard errors latch the socket so [`Self::is_connected`]
    /// reports them on the next check).
    fn write(&mut self, buf: &[u8]) -> usize;

    /// Whether the peer is still reachable.
    ///
    /// `&mut self` because implementations may need to drain inbound bytes
    /// to observe EOF; Pulsekeep never interprets client input, so drained
    /// bytes are discarded.
    fn is_connected(&mut self) -> bool;

    /// Remote address, for logging. `None` once the transport is dead.
    fn peer_addr(&self) -> Option<SocketAddr>;

    /// Tear the connection down, consuming the socket.
    fn close(self: Box<Self>);
}

// ---

/// Convenience type alias for a heap-allocated [`StreamSocket`].
pub type StreamSocketPtr = Box<dyn StreamSocket>;

/// Convenience type alias for a heap-allocated [`StreamListener`].
pub type StreamListenerPtr = Box<dyn StreamListener>;

// ---------------------------------------------------------------------------
// StreamListener
// ---------------------------------------------------------------------------

/// Accept side of the transport.
///
/// `#[async_trait]` so `accept_if_any` is dyn-compatible, allowing
/// `StreamListenerPtr = Box<dyn StreamListener>` to compile.
///
/// Implementations: `pulsekeep_tcp::TcpServiceListener`,
/// `pulsekeep_link_sim::SimListener`.
#[async_trait]
pub trait StreamListener: Send {
    // ---
    /// Poll for a pending inbound connection.
    ///
    /// Returns `Ok(None)` when nothing is waiting. Must not park the caller
    /// waiting for a client — the service loop calls this once per tick.
    async fn accept_if_any(&mut self) -> Result<Option<StreamSocketPtr>>;
}

// ---------------------------------------------------------------------------
// DiscoveryAdvertiser
// ---------------------------------------------------------------------------

/// Name-service advertisement collaborator.
///
/// Fire-and-forget: invoked once per link-up transition. Best-effort —
/// implementations log failures and never surface them to the service loop.
#[async_trait]
pub trait DiscoveryAdvertiser: Send {
    // ---
    async fn announce(&mut self, service_name: &str, port: u16);
}

// ---

/// Convenience type alias for a heap-allocated [`DiscoveryAdvertiser`].
pub type DiscoveryAdvertiserPtr = Box<dyn DiscoveryAdvertiser>;
