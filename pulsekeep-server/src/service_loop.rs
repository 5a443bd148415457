//! [`ServiceLoop`] — the polling driver.
//!
//! One cooperative loop on one task; no locks, because there is exactly
//! one mutable session and one thread of control over it. Per tick, in
//! order:
//!
//! 1. Link veto — a down link drops the session unconditionally and parks
//!    the loop until recovery (the only unbounded wait besides the tick).
//! 2. Accept poll — a newcomer supersedes the current client.
//! 3. Exactly one session step (banner or heartbeat).
//! 4. Passive peer-close check.
//! 5. Yield the remainder of the tick.
//!
//! The ordering is a contract: a newly accepted client is never serviced
//! before the link-down path has had a chance to veto it.

use tokio::time::{Instant, MissedTickBehavior};
use tracing::warn;

use pulsekeep_domain::{
    //
    ClientSession,
    DropReason,
    LinkState,
    ServiceConfig,
    StepVerdict,
    StreamListenerPtr,
};

use super::link_monitor::LinkMonitor;

// ---------------------------------------------------------------------------
// ServiceLoop
// ---------------------------------------------------------------------------

pub struct ServiceLoop {
    // ---
    cfg: ServiceConfig,
    listener: StreamListenerPtr,
    monitor: LinkMonitor,

    /// The single live client, or `None` (the empty state).
    session: Option<ClientSession>,
}

// ---

impl ServiceLoop {
    // ---
    pub fn new(cfg: ServiceConfig, listener: StreamListenerPtr, monitor: LinkMonitor) -> Self {
        // ---
        Self {
            cfg,
            listener,
            monitor,
            session: None,
        }
    }

    // ---

    /// Drive the service for the process lifetime. Spawn with `tokio::spawn`.
    pub async fn run(mut self) {
        // ---
        // Initial bring-up runs the same post-connect actions as a
        // reconnect (info surface + announce).
        self.monitor.wait_until_up(self.cfg.link_poll_interval).await;

        let mut ticker = tokio::time::interval(self.cfg.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    // ---

    /// One service tick. See the module docs for the ordering contract.
    async fn tick(&mut self) {
        // ---
        // 1. Link veto.
        if self.monitor.state() == LinkState::Down {
            self.drop_session(DropReason::LinkDropped);
            self.monitor.wait_until_up(self.cfg.link_poll_interval).await;
        }

        // 2. Accept poll. Single-client policy: the prior session closes
        //    before the newcomer is installed.
        match self.listener.accept_if_any().await {
            Ok(Some(socket)) => {
                self.drop_session(DropReason::Superseded);
                self.session = Some(ClientSession::new(socket, &self.cfg));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "accept poll failed"),
        }

        // 3. One session step.
        let now = Instant::now();
        if let Some(StepVerdict::Evict) = self.session.as_mut().map(|s| s.step(now, &self.cfg)) {
            self.drop_session(DropReason::WriteStalled);
        }

        // 4. Passive peer-close check.
        if let Some(false) = self.session.as_mut().map(|s| s.is_peer_connected()) {
            self.drop_session(DropReason::ClientDisconnected);
        }
    }

    // ---

    fn drop_session(&mut self, reason: DropReason) {
        // ---
        if let Some(session) = self.session.take() {
            session.close(reason);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use std::time::Duration;

    use tokio::time::sleep;

    use pulsekeep_domain::{ServiceConfig, SessionPhase};
    use pulsekeep_link_sim::{
        //
        AdvertiserLog,
        RecordingAdvertiser,
        SimLink,
        SimListener,
        SimListenerHandle,
        SimSocket,
        SimSocketHandle,
        WritePolicy,
    };

    use super::super::link_monitor::LinkMonitor;
    use super::ServiceLoop;

    const TICK: Duration = Duration::from_millis(20);

    // ---

    struct Rig {
        service: ServiceLoop,
        listener: SimListenerHandle,
        link: SimLink,
        announces: AdvertiserLog,
    }

    fn rig() -> Rig {
        // ---
        let cfg = ServiceConfig::default();
        let (listener, listener_handle) = SimListener::new();
        let link = SimLink::new(true);
        let (advertiser, announces) = RecordingAdvertiser::new();
        let monitor = LinkMonitor::new(Box::new(link.clone()), Box::new(advertiser), "pulsekeep", 23);

        Rig {
            service: ServiceLoop::new(cfg, Box::new(listener), monitor),
            listener: listener_handle,
            link,
            announces,
        }
    }

    /// Queue a client connection under `policy`, returning its test handle.
    fn connect(rig: &Rig, policy: WritePolicy) -> SimSocketHandle {
        // ---
        let (socket, handle) = SimSocket::pair(policy);
        rig.listener.push_client(Box::new(socket));
        handle
    }

    /// Drive `n` ticks at the configured cadence under paused time.
    async fn run_ticks(rig: &mut Rig, n: usize) {
        // ---
        for _ in 0..n {
            rig.service.tick().await;
            sleep(TICK).await;
        }
    }

    fn phase(rig: &Rig) -> Option<SessionPhase> {
        rig.service.session.as_ref().map(|s| s.phase())
    }

    // ---

    #[tokio::test(start_paused = true)]
    async fn banner_delivery_enters_streaming() {
        // ---
        let mut rig = rig();
        let client = connect(&rig, WritePolicy::AcceptAll);

        run_ticks(&mut rig, 1).await;

        assert_eq!(phase(&rig), Some(SessionPhase::Streaming));
        assert_eq!(
            client.written_lines(),
            vec!["pulsekeep heartbeat service ready"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeats_fire_at_cadence_never_faster() {
        // ---
        let mut rig = rig();
        let client = connect(&rig, WritePolicy::AcceptAll);

        // Banner at t=0, then 3.5 s of ticks: heartbeats land at exactly
        // t=1000, 2000, 3000 — three lines, no more.
        run_ticks(&mut rig, 176).await;

        assert_eq!(
            client.written_lines(),
            vec![
                "pulsekeep heartbeat service ready",
                "alive",
                "alive",
                "alive",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_banner_evicts_exactly_at_threshold() {
        // ---
        let mut rig = rig();
        let client = connect(&rig, WritePolicy::RejectAll);

        // First failed write at t=0 anchors the stall. Ticks through
        // t=4980 are all tolerated.
        run_ticks(&mut rig, 250).await;
        assert_eq!(phase(&rig), Some(SessionPhase::BannerPending));
        assert!(!client.is_closed());

        // The tick at t=5000 reaches the threshold: evicted, socket
        // closed, loop back to empty.
        run_ticks(&mut rig, 1).await;
        assert_eq!(phase(&rig), None);
        assert!(client.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_stall_recovers_without_eviction() {
        // ---
        let mut rig = rig();
        let client = connect(&rig, WritePolicy::AcceptAll);

        // Banner at t=0; stall the reader before the first heartbeat.
        run_ticks(&mut rig, 1).await;
        client.set_policy(WritePolicy::RejectAll);

        // Failures from t=1000 through t=4000 — a 3 s stall, under the
        // 5 s threshold. The timer must not advance on failures, so every
        // tick in between retries.
        run_ticks(&mut rig, 200).await;
        assert_eq!(phase(&rig), Some(SessionPhase::Streaming));

        // Reader drains; the very next tick delivers.
        client.set_policy(WritePolicy::AcceptAll);
        run_ticks(&mut rig, 1).await;

        assert_eq!(
            client.written_lines(),
            vec!["pulsekeep heartbeat service ready", "alive"]
        );

        // Congestion cleared and cadence re-anchored: the session outlives
        // the old stall window by more than the threshold.
        run_ticks(&mut rig, 300).await;
        assert_eq!(phase(&rig), Some(SessionPhase::Streaming));
    }

    #[tokio::test(start_paused = true)]
    async fn new_accept_supersedes_the_live_session() {
        // ---
        let mut rig = rig();
        let first = connect(&rig, WritePolicy::AcceptAll);
        run_ticks(&mut rig, 1).await;

        let second = connect(&rig, WritePolicy::AcceptAll);
        run_ticks(&mut rig, 1).await;

        assert!(first.is_closed(), "prior session must close first");
        assert!(!second.is_closed());
        assert_eq!(phase(&rig), Some(SessionPhase::Streaming));
        assert_eq!(
            second.written_lines(),
            vec!["pulsekeep heartbeat service ready"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn peer_close_empties_the_session() {
        // ---
        let mut rig = rig();
        let client = connect(&rig, WritePolicy::AcceptAll);
        run_ticks(&mut rig, 1).await;

        client.disconnect();
        run_ticks(&mut rig, 1).await;

        assert_eq!(phase(&rig), None);
        assert!(client.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn link_down_overrides_any_session_state() {
        // ---
        let mut rig = rig();

        // Mid-banner client — not even Streaming yet.
        let client = connect(&rig, WritePolicy::RejectAll);
        run_ticks(&mut rig, 1).await;
        assert_eq!(phase(&rig), Some(SessionPhase::BannerPending));

        rig.link.set_up(false);
        let flipper = rig.link.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(600)).await;
            flipper.set_up(true);
        });

        // The next tick drops the session before parking, then parks
        // until the link recovers and announces exactly once.
        run_ticks(&mut rig, 1).await;

        assert_eq!(phase(&rig), None);
        assert!(client.is_closed());
        assert_eq!(rig.announces.announcements().len(), 1);

        // Recovered loop accepts fresh clients as usual.
        let next = connect(&rig, WritePolicy::AcceptAll);
        run_ticks(&mut rig, 1).await;
        assert_eq!(phase(&rig), Some(SessionPhase::Streaming));
        assert!(!next.is_closed());
    }
}
