//! In-process mock transport for Pulsekeep unit and integration testing.
//!
//! Everything here implements the `pulsekeep_domain` capability traits
//! without real sockets, with test handles for scripting and inspection:
//!
//! - [`SimLink`] — link the test flips up and down
//! - [`SimListener`] / [`SimListenerHandle`] — accept queue the test feeds
//! - [`SimSocket`] / [`SimSocketHandle`] — per-write outcome control
//!   ([`WritePolicy`]), written-byte capture, peer-disconnect injection
//! - [`RecordingAdvertiser`] / [`AdvertiserLog`] — records announce calls
//!
//! # Quick start
//!
//! ```rust
//! use pulsekeep_link_sim::{SimSocket, WritePolicy};
//!
//! let (socket, handle) = SimSocket::pair(WritePolicy::AcceptAll);
//! // hand `socket` to the service, script and inspect via `handle`
//! handle.set_policy(WritePolicy::RejectAll);
//! ```

mod advertiser;
mod link;
mod listener;
mod socket;

// --- public API
pub use advertiser::{AdvertiserLog, RecordingAdvertiser};
pub use link::SimLink;
pub use listener::{SimListener, SimListenerHandle};
pub use socket::{SimSocket, SimSocketHandle, WritePolicy};
