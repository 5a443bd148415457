//! Pulsekeep example — heartbeat watcher and deliberate slow reader.
//!
//! * Default mode connects and prints every line the service sends,
//!   stamped with the time since connect.
//!
//! * `--stall` connects and then never reads. Once the kernel receive
//!   window fills, the service's writes start returning short and the
//!   congestion tracker evicts this client — watch the server logs for
//!   the "write stalled" close.
//!
//! Run with:
//!   cargo run -p pulsekeep-example -- --connect 127.0.0.1:2323
//!   cargo run -p pulsekeep-example -- --connect 127.0.0.1:2323 --stall

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "pulsekeep-example",
    about = "Pulsekeep demo client: watch heartbeats or stall on purpose"
)]
struct Config {
    // ---
    /// Address of a running pulsekeep-server.
    #[arg(long, default_value = "127.0.0.1:2323")]
    connect: SocketAddr,

    /// Connect but never read, to demonstrate congestion eviction.
    #[arg(long)]
    stall: bool,

    /// How long to stay connected before exiting.
    #[arg(long, default_value_t = 30)]
    duration_secs: u64,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ---

    let cfg = Config::parse();

    let stream = TcpStream::connect(cfg.connect).await?;
    println!("connected to {}", cfg.connect);

    let deadline = Duration::from_secs(cfg.duration_secs);

    if cfg.stall {
        // ---
        // Hold the connection open without ever reading. The service keeps
        // attempting heartbeats until its congestion threshold fires.
        println!("stalling — not reading; expect the server to evict this client");
        tokio::time::sleep(deadline).await;
        return Ok(());
    }

    // ---

    let started = Instant::now();
    let mut lines = BufReader::new(stream).lines();

    loop {
        let remaining = deadline.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            println!("done after {}s", cfg.duration_secs);
            return Ok(());
        }

        match tokio::time::timeout(remaining, lines.next_line()).await {
            Err(_elapsed) => {
                println!("done after {}s", cfg.duration_secs);
                return Ok(());
            }
            Ok(Ok(Some(line))) => {
                println!("[{:6.1}s] {line}", started.elapsed().as_secs_f64());
            }
            Ok(Ok(None)) => {
                println!("server closed the connection");
                return Ok(());
            }
            Ok(Err(e)) => {
                println!("read error: {e}");
                return Ok(());
            }
        }
    }
}
