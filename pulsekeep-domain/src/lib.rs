//! Core traits, types, and session state machine for the Pulsekeep
//! heartbeat service.
//!
//! This crate defines the vocabulary of the system. All other crates depend
//! on `pulsekeep-domain` and speak its types. No sockets live here.
//!
//! # Structure
//!
//! - [`error`]      — [`PulseKeepError`] and [`Result<T>`] alias
//! - [`config`]     — [`ServiceConfig`] cadence / threshold / payload knobs
//! - [`link`]       — [`LinkState`] and the [`NetworkLink`] boundary trait
//! - [`transport`]  — [`StreamListener`], [`StreamSocket`], [`DiscoveryAdvertiser`] traits
//! - [`probe`]      — single non-blocking write attempt, [`WriteOutcome`]
//! - [`congestion`] — [`CongestionTracker`] stall detection and eviction timing
//! - [`session`]    — [`ClientSession`] banner/heartbeat state machine

mod config;
mod congestion;
mod error;
mod link;
pub mod probe;
mod session;
mod transport;

// --- error
pub use error::{PulseKeepError, Result};

// --- config
pub use config::ServiceConfig;

// --- link
pub use link::{LinkState, NetworkLink, NetworkLinkPtr};

// --- transport
pub use transport::{
    // ---
    DiscoveryAdvertiser,
    DiscoveryAdvertiserPtr,
    StreamListener,
    StreamListenerPtr,
    StreamSocket,
    StreamSocketPtr,
};

// --- probe
pub use probe::WriteOutcome;

// --- congestion
pub use congestion::CongestionTracker;

// --- session
pub use session::{ClientSession, DropReason, SessionPhase, StepVerdict};
