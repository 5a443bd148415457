use std::time::Duration;

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Cadence, eviction, and payload knobs for the heartbeat service.
///
/// Passed explicitly at construction — there is no ambient global state.
/// Defaults match the shipped service: 1 s heartbeat, 5 s congestion
/// eviction, 20 ms service tick, 250 ms link poll while parked.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    // ---
    /// Interval between liveness lines while a session is `Streaming`.
    /// The cadence anchors to banner delivery, not to accept time.
    pub heartbeat_period: Duration,

    /// How long a session may stall (every write attempt returning short)
    /// before it is evicted.
    pub eviction_threshold: Duration,

    /// Fixed tick of the service loop. One session step per tick.
    pub tick_interval: Duration,

    /// Poll interval while parked waiting for the link to come up.
    pub link_poll_interval: Duration,

    /// Greeting line, sent exactly once per accepted connection.
    /// Must be newline-terminated; Pulsekeep sends it verbatim.
    pub banner: String,

    /// Recurring liveness line. Must be newline-terminated.
    pub heartbeat_line: String,

    /// Name announced to the discovery collaborator on each link-up.
    pub service_name: String,
}

// ---

impl Default for ServiceConfig {
    fn default() -> Self {
        // ---
        Self {
            heartbeat_period: Duration::from_millis(1000),
            eviction_threshold: Duration::from_millis(5000),
            tick_interval: Duration::from_millis(20),
            link_poll_interval: Duration::from_millis(250),
            banner: "pulsekeep heartbeat service ready\r\n".to_string(),
            heartbeat_line: "alive\r\n".to_string(),
            service_name: "pulsekeep".to_string(),
        }
    }
}
