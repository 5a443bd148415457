use std::net::SocketAddr;

use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum PulseKeepError {
    // ---
    /// The listening socket could not be bound. Fatal: the service cannot
    /// run without it. Restart policy belongs to the host supervisor.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// ---

pub type Result<T> = std::result::Result<T, PulseKeepError>;
