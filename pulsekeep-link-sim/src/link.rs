use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pulsekeep_domain::NetworkLink;

// ---------------------------------------------------------------------------
// SimLink
// ---------------------------------------------------------------------------

/// Scriptable [`NetworkLink`].
///
/// Clone one handle into the service and keep another in the test; flips
/// are visible to the service loop on its next link check.
#[derive(Clone, Debug)]
pub struct SimLink {
    up: Arc<AtomicBool>,
}

// ---

impl SimLink {
    // ---
    pub fn new(initially_up: bool) -> Self {
        // ---
        Self {
            up: Arc::new(AtomicBool::new(initially_up)),
        }
    }

    // ---

    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }
}

// ---

impl NetworkLink for SimLink {
    // ---
    fn is_up(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }
}
