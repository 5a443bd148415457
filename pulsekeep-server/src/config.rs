//! CLI configuration for `pulsekeep-server`.
//!
//! Run modes:
//!   pulsekeep-server [--bind 0.0.0.0:23]
//!   pulsekeep-server --bind 0.0.0.0:2323 --heartbeat-ms 500 --eviction-ms 3000

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use pulsekeep_domain::ServiceConfig;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "pulsekeep-server", about = "Pulsekeep heartbeat service daemon")]
pub struct Config {
    // ---
    /// TCP address to serve on. Port 23 needs privileges on most hosts;
    /// use a high port (e.g. 2323) for unprivileged runs.
    #[arg(long, default_value = "0.0.0.0:23")]
    pub bind: SocketAddr,

    /// Interval between liveness lines while a client is streaming.
    #[arg(long, default_value_t = 1000)]
    pub heartbeat_ms: u64,

    /// How long every write may stall before the client is evicted.
    #[arg(long, default_value_t = 5000)]
    pub eviction_ms: u64,

    /// Service loop tick.
    #[arg(long, default_value_t = 20)]
    pub tick_ms: u64,

    /// Poll interval while waiting for the link to come up.
    #[arg(long, default_value_t = 250)]
    pub link_poll_ms: u64,

    /// Name announced to the discovery collaborator on each link-up.
    #[arg(long, default_value = "pulsekeep")]
    pub service_name: String,

    /// Greeting text, sent once per accepted connection.
    /// CRLF termination is appended automatically.
    #[arg(long, default_value = "pulsekeep heartbeat service ready")]
    pub banner: String,

    /// Recurring liveness text. CRLF termination is appended automatically.
    #[arg(long, default_value = "alive")]
    pub heartbeat_text: String,
}

// ---

impl Config {
    // ---
    /// Map the CLI surface onto the domain [`ServiceConfig`].
    pub fn service_config(&self) -> ServiceConfig {
        // ---
        ServiceConfig {
            heartbeat_period: Duration::from_millis(self.heartbeat_ms),
            eviction_threshold: Duration::from_millis(self.eviction_ms),
            tick_interval: Duration::from_millis(self.tick_ms),
            link_poll_interval: Duration::from_millis(self.link_poll_ms),
            banner: terminated(&self.banner),
            heartbeat_line: terminated(&self.heartbeat_text),
            service_name: self.service_name.clone(),
        }
    }
}

// ---

/// Ensure a payload line carries its CRLF terminator exactly once.
fn terminated(text: &str) -> String {
    // ---
    let mut line = text.trim_end_matches(['\r', '\n']).to_string();
    line.push_str("\r\n");
    line
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
