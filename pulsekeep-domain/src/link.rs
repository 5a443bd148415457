// ---------------------------------------------------------------------------
// LinkState
// ---------------------------------------------------------------------------

/// Observable state of the underlying network attachment.
///
/// Pulsekeep never manages the link itself — association, credentials, and
/// address acquisition belong to the platform. The service only reads this
/// up/down signal and reacts:
///
/// - `Down → Up` triggers the one-time post-connect actions (info surface,
///   discovery announce).
/// - `Up → Down` forces the live session to empty unconditionally,
///   regardless of its current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    // ---
    /// Link is not usable. The service loop parks until it recovers.
    Down,

    /// Link is up; accept and heartbeat paths run normally.
    Up,
}

// ---------------------------------------------------------------------------
// NetworkLink
// ---------------------------------------------------------------------------

/// Boundary trait over the external link collaborator.
///
/// Implementations must answer without blocking; the service loop consults
/// this once per tick and polls it while parked waiting for recovery.
///
/// Implementations: `pulsekeep_tcp::HostLink`, `pulsekeep_link_sim::SimLink`.
pub trait NetworkLink: Send {
    // ---
    fn is_up(&self) -> bool;
}

// ---

/// Convenience type alias for a heap-allocated [`NetworkLink`].
pub type NetworkLinkPtr = Box<dyn NetworkLink>;
