use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pulsekeep_domain::DiscoveryAdvertiser;

// ---------------------------------------------------------------------------
// RecordingAdvertiser
// ---------------------------------------------------------------------------

/// [`DiscoveryAdvertiser`] that records every announce.
///
/// Used to assert the "one announce per link-up transition" contract.
pub struct RecordingAdvertiser {
    calls: Arc<Mutex<Vec<(String, u16)>>>,
}

/// Test-side view of a [`RecordingAdvertiser`]'s call history.
#[derive(Clone)]
pub struct AdvertiserLog {
    calls: Arc<Mutex<Vec<(String, u16)>>>,
}

// ---

impl RecordingAdvertiser {
    // ---
    pub fn new() -> (Self, AdvertiserLog) {
        // ---
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            AdvertiserLog { calls },
        )
    }
}

// ---

impl AdvertiserLog {
    // ---
    pub fn announcements(&self) -> Vec<(String, u16)> {
        self.calls.lock().unwrap().clone()
    }
}

// ---

#[async_trait]
impl DiscoveryAdvertiser for RecordingAdvertiser {
    // ---
    async fn announce(&mut self, service_name: &str, port: u16) {
        self.calls
            .lock()
            .unwrap()
            .push((service_name.to_string(), port));
    }
}
