use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pulsekeep_domain::{Result, StreamListener, StreamSocketPtr};

// ---------------------------------------------------------------------------
// SimListener
// ---------------------------------------------------------------------------

/// Mock accept queue.
///
/// The test pushes connections in via [`SimListenerHandle::push_client`];
/// the service loop pops them out one per [`StreamListener::accept_if_any`]
/// poll, just like a real accept backlog.
pub struct SimListener {
    pending: Arc<Mutex<VecDeque<StreamSocketPtr>>>,
}

/// Test-side handle feeding a [`SimListener`].
#[derive(Clone)]
pub struct SimListenerHandle {
    pending: Arc<Mutex<VecDeque<StreamSocketPtr>>>,
}

// ---

impl SimListener {
    // ---
    pub fn new() -> (Self, SimListenerHandle) {
        // ---
        let pending = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                pending: Arc::clone(&pending),
            },
            SimListenerHandle { pending },
        )
    }
}

// ---

impl SimListenerHandle {
    // ---
    /// Queue a connection for the service to accept on its next poll.
    pub fn push_client(&self, socket: StreamSocketPtr) {
        self.pending.lock().unwrap().push_back(socket);
    }
}

// ---

#[async_trait]
impl StreamListener for SimListener {
    // ---
    async fn accept_if_any(&mut self) -> Result<Option<StreamSocketPtr>> {
        Ok(self.pending.lock().unwrap().pop_front())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use pulsekeep_domain::StreamListener;

    use super::super::socket::{SimSocket, WritePolicy};
    use super::SimListener;

    // ---

    #[tokio::test]
    async fn accept_drains_the_queue_in_order() {
        // ---
        let (mut listener, handle) = SimListener::new();

        assert!(listener.accept_if_any().await.unwrap().is_none());

        let (first, _h1) = SimSocket::pair(WritePolicy::AcceptAll);
        let (second, _h2) = SimSocket::pair(WritePolicy::RejectAll);
        handle.push_client(Box::new(first));
        handle.push_client(Box::new(second));

        let mut a = listener.accept_if_any().await.unwrap().expect("first");
        assert_eq!(a.write(b"x"), 1, "first queued socket accepts");

        let mut b = listener.accept_if_any().await.unwrap().expect("second");
        assert_eq!(b.write(b"x"), 0, "second queued socket rejects");

        assert!(listener.accept_if_any().await.unwrap().is_none());
    }
}
