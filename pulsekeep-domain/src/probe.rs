//! Single non-blocking write attempt.
//!
//! The probe is the sole truth source for backpressure. Congestion is
//! detected from the observed outcome of real write attempts, never from
//! transport send-buffer headroom queries — headroom reads are unreliable
//! on some stacks (may read as exhausted even when a write would succeed).

use super::transport::StreamSocket;

// ---------------------------------------------------------------------------
// WriteOutcome
// ---------------------------------------------------------------------------

/// Outcome of one write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    // ---
    /// The transport accepted the full line.
    Delivered,

    /// The transport accepted fewer bytes than the line (usually zero).
    /// Not a fault — the caller retries the same line next opportunity.
    Backpressure,
}

// ---

/// Attempt to deliver `line` in one non-blocking write.
///
/// Only a count equal to `line.len()` is a confirmed delivery. A partial
/// short write counts as failure-to-deliver for this fixed-line protocol;
/// the same line is retried on the next tick.
pub fn attempt(socket: &mut dyn StreamSocket, line: &[u8]) -> WriteOutcome {
    // ---
    let written = socket.write(line);
    if written == line.len() {
        WriteOutcome::Delivered
    } else {
        if written > 0 {
            tracing::trace!(written, needed = line.len(), "partial write, will retry line");
        }
        WriteOutcome::Backpressure
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
