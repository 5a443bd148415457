use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{info, warn};

use pulsekeep_domain::{PulseKeepError, Result, StreamListener, StreamSocketPtr};

use super::socket::TcpStreamSocket;

// ---------------------------------------------------------------------------
// TcpServiceListener
// ---------------------------------------------------------------------------

/// Bound TCP listening socket.
///
/// Bind failure is fatal to the service and surfaces as
/// [`PulseKeepError::Bind`]; accept failures after a successful bind are
/// transient (file-descriptor pressure, peer aborts) and yield `None` for
/// that tick.
pub struct TcpServiceListener {
    // ---
    inner: TcpListener,
    local: SocketAddr,
}

// ---

impl TcpServiceListener {
    // ---
    /// Bind the service port. The one fatal setup step of the transport.
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        // ---
        let inner = TcpListener::bind(addr)
            .await
            .map_err(|source| PulseKeepError::Bind { addr, source })?;

        let local = inner.local_addr()?;
        info!(%local, "listener bound");

        Ok(Self { inner, local })
    }

    // ---

    /// Actual bound address — distinct from the requested one when the
    /// caller asked for port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }
}

// ---

#[async_trait]
impl StreamListener for TcpServiceListener {
    // ---
    /// Zero-timeout accept poll.
    ///
    /// `accept()` on a tokio listener parks until a client arrives; the
    /// service loop must not park here, so the future gets exactly one
    /// poll via a zero deadline. A pending accept reads as "no client
    /// this tick".
    async fn accept_if_any(&mut self) -> Result<Option<StreamSocketPtr>> {
        // ---
        match timeout(Duration::ZERO, self.inner.accept()).await {
            Err(_elapsed) => Ok(None),
            Ok(Ok((stream, peer))) => {
                // Liveness lines are tiny; let the kernel flush each one
                // without Nagle delay.
                if let Err(e) = stream.set_nodelay(true) {
                    warn!(%peer, error = %e, "set_nodelay failed");
                }
                Ok(Some(Box::new(TcpStreamSocket::new(stream, peer))))
            }
            Ok(Err(e)) => {
                warn!(error = %e, "accept failed, retrying next tick");
                Ok(None)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use std::time::Duration;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpStream;

    use pulsekeep_domain::StreamListener;

    use super::TcpServiceListener;

    // ---

    #[tokio::test]
    async fn accept_if_any_is_none_when_nobody_is_waiting() {
        // ---
        let mut listener = TcpServiceListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .expect("bind");

        let got = listener.accept_if_any().await.expect("poll");
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn accept_if_any_returns_a_pending_client() {
        // ---
        let mut listener = TcpServiceListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .expect("bind");
        let addr = listener.local_addr();

        let mut client = TcpStream::connect(addr).await.expect("connect");
        // Let the connection land in the accept queue.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut sock = listener
            .accept_if_any()
            .await
            .expect("poll")
            .expect("client should be pending");

        assert!(sock.peer_addr().is_some());

        // The accepted socket is live end-to-end.
        let line = b"alive\r\n";
        assert_eq!(sock.write(line), line.len());
        let mut got = vec![0u8; line.len()];
        client.read_exact(&mut got).await.expect("read");
        assert_eq!(&got, line);
    }

    #[tokio::test]
    async fn bind_failure_is_fatal() {
        // ---
        let first = TcpServiceListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .expect("bind");

        let err = TcpServiceListener::bind(first.local_addr()).await;
        assert!(err.is_err(), "double bind must surface an error");
    }
}
