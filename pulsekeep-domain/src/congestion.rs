use std::time::Duration;

use tokio::time::Instant;

// ---------------------------------------------------------------------------
// CongestionTracker
// ---------------------------------------------------------------------------

/// Decides when a stalled session must be evicted.
///
/// The tracker accumulates elapsed time since the first of an unbroken run
/// of failed writes. It is fed observed write outcomes only — see
/// [`crate::probe`] for why buffer-occupancy queries are not trusted.
///
/// Rules:
/// - The first failure after a success (or after accept, before any
///   success) records `stalled_since`.
/// - Every subsequent failure checks `now - stalled_since` against the
///   threshold and signals eviction once it is reached.
/// - Any success clears the stall.
///
/// Eviction is what bounds retries: even against a permanently stalled
/// peer the session makes forward progress to teardown.
#[derive(Debug)]
pub struct CongestionTracker {
    // ---
    /// Stall duration that forces a disconnect.
    threshold: Duration,

    /// Time of the first consecutive failed write since the last success.
    /// `None` while healthy.
    stalled_since: Option<Instant>,
}

// ---

impl CongestionTracker {
    // ---
    pub fn new(threshold: Duration) -> Self {
        // ---
        Self {
            threshold,
            stalled_since: None,
        }
    }

    // ---

    /// Record a confirmed delivery. Clears any stall in progress.
    pub fn on_success(&mut self) {
        self.stalled_since = None;
    }

    // ---

    /// Record a failed write attempt at `now`.
    ///
    /// Returns `true` once the stall has lasted at least the configured
    /// threshold — the caller must then evict the session.
    pub fn on_failure(&mut self, now: Instant) -> bool {
        // ---
        let since = *self.stalled_since.get_or_insert(now);
        now.duration_since(since) >= self.threshold
    }

    // ---

    /// Start of the current stall, if one is in progress.
    pub fn stalled_since(&self) -> Option<Instant> {
        self.stalled_since
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use std::time::Duration;

    use tokio::time::Instant;

    use super::CongestionTracker;

    const THRESHOLD: Duration = Duration::from_millis(5000);

    // ---

    #[test]
    fn first_failure_does_not_evict() {
        // ---
        let mut tracker = CongestionTracker::new(THRESHOLD);
        let t0 = Instant::now();

        assert!(!tracker.on_failure(t0), "stall of zero must not evict");
        assert_eq!(tracker.stalled_since(), Some(t0));
    }

    #[test]
    fn eviction_fires_exactly_at_threshold_not_before() {
        // ---
        let mut tracker = CongestionTracker::new(THRESHOLD);
        let t0 = Instant::now();

        assert!(!tracker.on_failure(t0));
        assert!(!tracker.on_failure(t0 + THRESHOLD - Duration::from_millis(1)));
        assert!(tracker.on_failure(t0 + THRESHOLD));
    }

    #[test]
    fn success_clears_the_stall() {
        // ---
        let mut tracker = CongestionTracker::new(THRESHOLD);
        let t0 = Instant::now();

        assert!(!tracker.on_failure(t0));
        tracker.on_success();
        assert_eq!(tracker.stalled_since(), None);

        // A later failure starts a fresh stall window anchored at its own
        // time, not the old one.
        let t1 = t0 + Duration::from_millis(3000);
        assert!(!tracker.on_failure(t1));
        assert!(!tracker.on_failure(t1 + THRESHOLD - Duration::from_millis(1)));
        assert!(tracker.on_failure(t1 + THRESHOLD));
    }

    #[test]
    fn zero_threshold_evicts_on_first_failure() {
        // ---
        let mut tracker = CongestionTracker::new(Duration::ZERO);
        assert!(tracker.on_failure(Instant::now()));
    }
}
