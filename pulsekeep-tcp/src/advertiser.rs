use async_trait::async_trait;
use tracing::info;

use pulsekeep_domain::DiscoveryAdvertiser;

// ---------------------------------------------------------------------------
// LogAdvertiser
// ---------------------------------------------------------------------------

/// Log-only [`DiscoveryAdvertiser`].
///
/// Name-service advertisement is an external collaborator; this
/// implementation surfaces the announce on the log so operators (and
/// supervisors scraping logs) can see each link-up transition. A real
/// registrar (mDNS, service registry) slots in behind the same trait
/// without touching the service loop.
#[derive(Debug, Default)]
pub struct LogAdvertiser;

// ---

impl LogAdvertiser {
    // ---
    pub fn new() -> Self {
        Self
    }
}

// ---

#[async_trait]
impl DiscoveryAdvertiser for LogAdvertiser {
    // ---
    async fn announce(&mut self, service_name: &str, port: u16) {
        info!(service = service_name, port, "announcing service");
    }
}
