use std::io;
use std::net::SocketAddr;

use tokio::net::TcpStream;
use tracing::{debug, trace};

use pulsekeep_domain::StreamSocket;

// ---------------------------------------------------------------------------
// TcpStreamSocket
// ---------------------------------------------------------------------------

/// One accepted TCP client.
///
/// Writes go through `try_write`: a full kernel send buffer reads as a
/// zero-byte outcome rather than blocking the service tick. Hard transport
/// errors latch `dead` so [`StreamSocket::is_connected`] reports them on
/// the next tick instead of surfacing an error mid-write.
pub struct TcpStreamSocket {
    // ---
    inner: TcpStream,
    peer: SocketAddr,

    /// Latched on EOF or any hard transport error.
    dead: bool,
}

// ---

impl TcpStreamSocket {
    // ---
    pub(crate) fn new(inner: TcpStream, peer: SocketAddr) -> Self {
        // ---
        Self {
            inner,
            peer,
            dead: false,
        }
    }
}

// ---

impl StreamSocket for TcpStreamSocket {
    // ---
    fn write(&mut self, buf: &[u8]) -> usize {
        // ---
        if self.dead {
            return 0;
        }

        match self.inner.try_write(buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => 0,
            Err(e) => {
                debug!(peer = %self.peer, error = %e, "write error, marking socket dead");
                self.dead = true;
                0
            }
        }
    }

    // ---

    /// Drain and discard any inbound bytes while looking for EOF.
    ///
    /// Pulsekeep never interprets client input (telnet negotiation bytes
    /// included), but reading is the only passive way to observe a peer
    /// close on a write-mostly connection.
    fn is_connected(&mut self) -> bool {
        // ---
        if self.dead {
            return false;
        }

        let mut scratch = [0u8; 512];
        loop {
            match self.inner.try_read(&mut scratch) {
                Ok(0) => {
                    self.dead = true;
                    return false;
                }
                Ok(n) => {
                    trace!(peer = %self.peer, discarded = n, "discarding client input");
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return true,
                Err(e) => {
                    debug!(peer = %self.peer, error = %e, "read error, marking socket dead");
                    self.dead = true;
                    return false;
                }
            }
        }
    }

    // ---

    fn peer_addr(&self) -> Option<SocketAddr> {
        if self.dead {
            None
        } else {
            Some(self.peer)
        }
    }

    // ---

    fn close(self: Box<Self>) {
        // Dropping the tokio stream closes the fd.
        trace!(peer = %self.peer, "closing client socket");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
