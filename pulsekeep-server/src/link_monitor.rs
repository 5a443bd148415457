//! [`LinkMonitor`] — thin boundary over the link and discovery collaborators.
//!
//! The service loop consults [`LinkMonitor::state`] once per tick and parks
//! in [`LinkMonitor::wait_until_up`] whenever the link is down. Each return
//! from the wait runs the one-time post-connect actions: the reachability
//! info surface and the discovery announce. Calling the wait once at
//! startup makes initial bring-up indistinguishable from a reconnect.

use std::time::Duration;

use tracing::info;

use pulsekeep_domain::{DiscoveryAdvertiserPtr, LinkState, NetworkLinkPtr};

// ---------------------------------------------------------------------------
// LinkMonitor
// ---------------------------------------------------------------------------

pub struct LinkMonitor {
    // ---
    link: NetworkLinkPtr,
    advertiser: DiscoveryAdvertiserPtr,
    service_name: String,
    port: u16,
}

// ---

impl LinkMonitor {
    // ---
    pub fn new(
        link: NetworkLinkPtr,
        advertiser: DiscoveryAdvertiserPtr,
        service_name: impl Into<String>,
        port: u16,
    ) -> Self {
        // ---
        Self {
            link,
            advertiser,
            service_name: service_name.into(),
            port,
        }
    }

    // ---

    /// Snapshot of the link collaborator. Non-blocking.
    pub fn state(&self) -> LinkState {
        // ---
        if self.link.is_up() {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }

    // ---

    /// Park until the link reports up, polling every `poll`, then run the
    /// one-time post-connect actions.
    ///
    /// The announce is best-effort — advertiser implementations log their
    /// own failures and nothing propagates here.
    pub async fn wait_until_up(&mut self, poll: Duration) {
        // ---
        if !self.link.is_up() {
            info!("link down, waiting for recovery");
            while !self.link.is_up() {
                tokio::time::sleep(poll).await;
            }
        }

        info!(
            service = %self.service_name,
            port = self.port,
            "link up, service reachable"
        );
        self.advertiser.announce(&self.service_name, self.port).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
