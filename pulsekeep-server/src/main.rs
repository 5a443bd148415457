//! Pulsekeep heartbeat service daemon.
//!
//! Serves one telnet-style client at a time: a greeting on connect, then a
//! liveness line at a fixed cadence, with congestion eviction for stalled
//! readers and unconditional teardown on link loss.
//!
//! Usage:
//!   pulsekeep-server --bind 0.0.0.0:2323
//!   pulsekeep-server --bind 0.0.0.0:2323 --heartbeat-ms 500 --eviction-ms 3000

use clap::Parser;
use tracing::info;

// ---

use pulsekeep_tcp::{HostLink, LogAdvertiser, TcpServiceListener};

// ---

mod config;
mod link_monitor;
mod service_loop;

// ---

use config::Config;
use link_monitor::LinkMonitor;
use service_loop::ServiceLoop;

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ---

    let cfg = Config::parse();

    let no_color = std::env::var("EMACS").is_ok()
        || std::env::var("NO_COLOR").is_ok()
        || std::env::var("CARGO_TERM_COLOR").as_deref() == Ok("never")
        || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(!no_color)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %cfg.bind,
        "pulsekeep-server starting",
    );

    // Bind is the one fatal setup step; everything past it recovers
    // locally. Restart-on-bind-failure belongs to the host supervisor.
    let listener = TcpServiceListener::bind(cfg.bind).await?;
    let port = listener.local_addr().port();

    let monitor = LinkMonitor::new(
        Box::new(HostLink::new()),
        Box::new(LogAdvertiser::new()),
        cfg.service_name.clone(),
        port,
    );

    let service = ServiceLoop::new(cfg.service_config(), Box::new(listener), monitor);
    tokio::spawn(service.run());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    Ok(())
}
