//! The poll-cycle state machine.

use std::sync::Arc;
use std::time::Duration;

use beacon_broadcast::Broadcaster;
use beacon_protocol::{
    PlayerRecord, Snapshot, parse_coordinates, parse_dimension,
    parse_player_list,
};
use beacon_rcon::{RconEndpoint, RconSession};
use beacon_transport::Connection;
use tokio::sync::Mutex;

use crate::{CycleError, PollScheduler};

/// Consecutive failed cycles tolerated before the session is reset.
///
/// The gate admits one attempt past the threshold so the crossing failure
/// itself can trigger the reset: the sixth consecutive failure resets.
pub const ERROR_THRESHOLD: u32 = 5;

/// Owns the remote-console session and produces one snapshot per cycle.
///
/// Exactly one poller task exists; it issues every remote-console request
/// the bridge makes, sequentially, so a cycle's traffic can never overlap
/// another's.
pub struct Poller<E: RconEndpoint, C: Connection> {
    session: RconSession<E>,
    broadcaster: Arc<Mutex<Broadcaster<C>>>,
    scheduler: PollScheduler,
    /// Explicit overlap guard. The inline `run` loop already serializes
    /// cycles; this keeps the skip observable if a cycle is ever driven
    /// from elsewhere.
    cycle_in_progress: bool,
}

impl<E: RconEndpoint, C: Connection> Poller<E, C> {
    /// Creates a poller around an unconnected session.
    pub fn new(
        session: RconSession<E>,
        broadcaster: Arc<Mutex<Broadcaster<C>>>,
        interval: Duration,
    ) -> Self {
        Self {
            session,
            broadcaster,
            scheduler: PollScheduler::new(interval),
            cycle_in_progress: false,
        }
    }

    /// Runs the poll loop forever. Never returns and never panics the
    /// task — every failure feeds back into the retry/reset machinery.
    pub async fn run(mut self) {
        // First connection attempt happens eagerly; later attempts go
        // through the armed retry.
        self.session.connect().await;

        loop {
            self.scheduler.wait_for_tick().await;
            self.run_cycle().await;
        }
    }

    /// Executes one poll cycle. Skips entirely if a cycle is already in
    /// progress.
    pub async fn run_cycle(&mut self) {
        if self.cycle_in_progress {
            tracing::debug!("previous poll cycle still running, skipping");
            return;
        }
        self.cycle_in_progress = true;
        self.cycle().await;
        self.cycle_in_progress = false;
    }

    async fn cycle(&mut self) {
        // Reconnect path: arm the retry once, fire it when due. This
        // guarantees progress without a busy-retry loop.
        if !self.session.is_authenticated() {
            if !self.session.retry_armed() {
                self.session.arm_retry();
            } else if self.session.retry_due() {
                self.session.connect().await;
            }
        }

        // Cycle preconditions: an authenticated session, somebody
        // listening, and the error budget not exhausted. Anything false
        // makes this cycle a no-op with zero protocol traffic.
        let subscribers = self.broadcaster.lock().await.subscriber_count();
        if !self.session.is_authenticated()
            || subscribers == 0
            || self.session.consecutive_errors() > ERROR_THRESHOLD
        {
            return;
        }

        match self.collect_snapshot().await {
            Ok(snapshot) => {
                self.session.clear_errors();
                // Hand-off is fire-and-forget: no delivery ack exists,
                // and per-subscriber failures are the broadcaster's
                // problem.
                let mut broadcaster = self.broadcaster.lock().await;
                if let Err(e) = broadcaster.publish(snapshot).await {
                    tracing::error!(error = %e, "failed to publish snapshot");
                }
            }
            Err(e) => {
                let failures = self.session.record_failure();
                tracing::warn!(
                    error = %e,
                    consecutive = failures,
                    "poll cycle failed"
                );
                if failures > ERROR_THRESHOLD {
                    self.session.reset().await;
                }
            }
        }
    }

    /// Issues the cycle's request batch and assembles the snapshot.
    ///
    /// An empty player list short-circuits to an empty snapshot. Any
    /// failure — including a player disconnecting between `list` and its
    /// per-player requests — discards the whole batch.
    async fn collect_snapshot(&mut self) -> Result<Snapshot, CycleError> {
        let list_response = self.session.send("list").await?;
        let names = parse_player_list(&list_response)?;

        let mut snapshot = Snapshot::empty();
        for name in names {
            let pos_response = self
                .session
                .send(&format!("data get entity {name} Pos"))
                .await?;
            let (x, y, z) = parse_coordinates(&pos_response)?;

            let dim_response = self
                .session
                .send(&format!("data get entity {name} Dimension"))
                .await?;
            let dimension = parse_dimension(&dim_response)?;

            snapshot.insert(PlayerRecord {
                name,
                x,
                y,
                z,
                dimension,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_rcon::RconError;
    use beacon_transport::{ConnectionId, TransportError};
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    // -- Mock remote-console endpoint -------------------------------------

    /// The mock's scripted inputs and recorded calls, held behind a
    /// shared handle so tests keep access after the endpoint moves into
    /// the session.
    #[derive(Default)]
    struct EndpointState {
        commands: Vec<String>,
        connects: u32,
        disconnects: u32,
        connect_results: VecDeque<Result<(), RconError>>,
        send_results: VecDeque<Result<String, RconError>>,
        fail_all_sends: bool,
    }

    struct MockEndpoint {
        state: Arc<StdMutex<EndpointState>>,
    }

    impl MockEndpoint {
        fn new() -> (Self, Arc<StdMutex<EndpointState>>) {
            let state = Arc::new(StdMutex::new(EndpointState::default()));
            (
                Self {
                    state: Arc::clone(&state),
                },
                state,
            )
        }

        fn script_sends(
            self,
            responses: impl IntoIterator<Item = &'static str>,
        ) -> Self {
            self.state
                .lock()
                .unwrap()
                .send_results
                .extend(responses.into_iter().map(|r| Ok(r.to_string())));
            self
        }
    }

    impl RconEndpoint for MockEndpoint {
        async fn connect(&mut self) -> Result<(), RconError> {
            let mut state = self.state.lock().unwrap();
            state.connects += 1;
            state.connect_results.pop_front().unwrap_or(Ok(()))
        }

        async fn send(&mut self, command: &str) -> Result<String, RconError> {
            let mut state = self.state.lock().unwrap();
            state.commands.push(command.to_string());
            if state.fail_all_sends {
                return Err(RconError::SendFailed(std::io::Error::other("boom")));
            }
            state
                .send_results
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }

        async fn disconnect(&mut self) -> Result<(), RconError> {
            self.state.lock().unwrap().disconnects += 1;
            Ok(())
        }
    }

    // -- Mock subscriber connection ---------------------------------------

    struct MockConnection {
        id: ConnectionId,
        sent: StdMutex<Vec<String>>,
    }

    impl MockConnection {
        fn new(id: u64) -> Arc<Self> {
            Arc::new(Self {
                id: ConnectionId::new(id),
                sent: StdMutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Connection for MockConnection {
        async fn send_text(&self, payload: &str) -> Result<(), TransportError> {
            self.sent.lock().unwrap().push(payload.to_string());
            Ok(())
        }

        async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
            Ok(None)
        }

        async fn close(&self) -> Result<(), TransportError> {
            Ok(())
        }

        fn id(&self) -> ConnectionId {
            self.id
        }
    }

    // -- Helpers -----------------------------------------------------------

    const INTERVAL: Duration = Duration::from_millis(1000);
    const RETRY_DELAY: Duration = Duration::from_secs(3);

    fn poller_with(
        endpoint: MockEndpoint,
    ) -> (
        Poller<MockEndpoint, MockConnection>,
        Arc<Mutex<Broadcaster<MockConnection>>>,
    ) {
        let session = RconSession::new(endpoint, RETRY_DELAY);
        let broadcaster = Arc::new(Mutex::new(Broadcaster::new()));
        let poller = Poller::new(session, Arc::clone(&broadcaster), INTERVAL);
        (poller, broadcaster)
    }

    async fn add_subscriber(
        broadcaster: &Arc<Mutex<Broadcaster<MockConnection>>>,
        id: u64,
    ) -> Arc<MockConnection> {
        let conn = MockConnection::new(id);
        broadcaster.lock().await.on_join(Arc::clone(&conn)).await;
        conn
    }

    // =====================================================================
    // Preconditions
    // =====================================================================

    #[tokio::test]
    async fn test_cycle_with_zero_subscribers_issues_no_requests() {
        let (endpoint, log) = MockEndpoint::new();
        let (mut poller, _broadcaster) = poller_with(endpoint);
        poller.session.connect().await;

        poller.run_cycle().await;

        assert!(
            log.lock().unwrap().commands.is_empty(),
            "nobody listening — no protocol traffic"
        );
    }

    #[tokio::test]
    async fn test_cycle_unauthenticated_arms_retry_without_requests() {
        let (endpoint, log) = MockEndpoint::new();
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;

        poller.run_cycle().await;

        assert!(poller.session.retry_armed());
        let log = log.lock().unwrap();
        assert_eq!(log.connects, 0, "arming must not connect synchronously");
        assert!(log.commands.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_fires_connect_after_delay() {
        let (endpoint, log) = MockEndpoint::new();
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;

        poller.run_cycle().await; // arms the retry
        poller.run_cycle().await; // not due yet
        assert_eq!(log.lock().unwrap().connects, 0);

        tokio::time::advance(RETRY_DELAY).await;
        poller.run_cycle().await; // due — connects, then polls

        assert_eq!(log.lock().unwrap().connects, 1);
        assert!(poller.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_cycle_skipped_while_in_progress() {
        let (endpoint, log) = MockEndpoint::new();
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        poller.cycle_in_progress = true;
        poller.run_cycle().await;

        assert!(log.lock().unwrap().commands.is_empty());
    }

    // =====================================================================
    // Snapshot collection
    // =====================================================================

    #[tokio::test]
    async fn test_empty_player_list_publishes_empty_snapshot() {
        let (endpoint, log) = MockEndpoint::new();
        let endpoint = endpoint
            .script_sends(["There are 0 of a max of 20 players online:"]);
        let (mut poller, broadcaster) = poller_with(endpoint);
        let conn = add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        poller.run_cycle().await;

        // Only `list` went out — no per-player requests for nobody.
        assert_eq!(log.lock().unwrap().commands, vec!["list"]);
        // Join replay plus the published empty snapshot.
        assert_eq!(conn.sent(), vec!["{}".to_string(), "{}".to_string()]);
    }

    #[tokio::test]
    async fn test_two_player_cycle_broadcasts_expected_payload() {
        let (endpoint, log) = MockEndpoint::new();
        let endpoint = endpoint.script_sends([
            "There are 2 of a max of 20 players online: Alice, Bob",
            "Alice has the following entity data: [1.0d, 2.0d, 3.0d]",
            "Alice has the following entity data: the_end",
            "Bob has the following entity data: [4.5d, 64.0d, -12.0d]",
            "Bob has the following entity data: overworld",
        ]);
        let (mut poller, broadcaster) = poller_with(endpoint);
        let conn = add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        poller.run_cycle().await;

        // Commands go out verbatim, position before dimension per player.
        assert_eq!(
            log.lock().unwrap().commands,
            vec![
                "list",
                "data get entity Alice Pos",
                "data get entity Alice Dimension",
                "data get entity Bob Pos",
                "data get entity Bob Dimension",
            ]
        );

        let sent = conn.sent();
        assert_eq!(sent.len(), 2, "replay plus one published snapshot");
        let payload: serde_json::Value = serde_json::from_str(&sent[1]).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "Alice": {
                    "name": "Alice", "x": 1.0, "y": 2.0, "z": 3.0,
                    "dimension": "the_end"
                },
                "Bob": {
                    "name": "Bob", "x": 4.5, "y": 64.0, "z": -12.0,
                    "dimension": "overworld"
                },
            })
        );
    }

    #[tokio::test]
    async fn test_mid_batch_failure_discards_whole_snapshot() {
        // Bob vanished between `list` and his position request: the
        // entire cycle is discarded, nothing partial is published.
        let (endpoint, state) = MockEndpoint::new();
        let endpoint = endpoint.script_sends([
            "There are 2 of a max of 20 players online: Alice, Bob",
            "Alice has the following entity data: [1.0d, 2.0d, 3.0d]",
            "Alice has the following entity data: the_end",
        ]);
        state.lock().unwrap().send_results.push_back(Err(
            RconError::SendFailed(std::io::Error::other("no entity found")),
        ));
        let (mut poller, broadcaster) = poller_with(endpoint);
        let conn = add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        poller.run_cycle().await;

        assert_eq!(conn.sent().len(), 1, "only the join replay was sent");
        assert_eq!(poller.session.consecutive_errors(), 1);
        assert!(broadcaster.lock().await.last_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_counts_as_cycle_failure() {
        let (endpoint, _log) = MockEndpoint::new();
        let endpoint = endpoint.script_sends(["nonsense with no count"]);
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        poller.run_cycle().await;

        assert_eq!(poller.session.consecutive_errors(), 1);
    }

    // =====================================================================
    // Error threshold and reset
    // =====================================================================

    #[tokio::test]
    async fn test_five_failures_do_not_reset() {
        let (endpoint, log) = MockEndpoint::new();
        log.lock().unwrap().fail_all_sends = true;
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        for _ in 0..5 {
            poller.run_cycle().await;
        }

        assert_eq!(poller.session.consecutive_errors(), 5);
        assert_eq!(log.lock().unwrap().disconnects, 0, "threshold not crossed yet");
    }

    #[tokio::test]
    async fn test_sixth_failure_resets_session_exactly_once() {
        let (endpoint, log) = MockEndpoint::new();
        log.lock().unwrap().fail_all_sends = true;
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        for _ in 0..6 {
            poller.run_cycle().await;
        }

        let log = log.lock().unwrap();
        assert_eq!(log.disconnects, 1, "reset fires on the sixth failure only");
        assert_eq!(log.connects, 2, "initial connect plus the reset reconnect");
    }

    #[tokio::test]
    async fn test_error_counter_zero_after_next_successful_cycle() {
        let (endpoint, state) = MockEndpoint::new();
        state.lock().unwrap().fail_all_sends = true;
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        for _ in 0..6 {
            poller.run_cycle().await;
        }

        // The reset reconnected; let the next cycle succeed.
        {
            let mut state = state.lock().unwrap();
            state.fail_all_sends = false;
            state
                .send_results
                .push_back(Ok("There are 0 of a max of 20 players online:".into()));
        }
        poller.run_cycle().await;

        assert_eq!(poller.session.consecutive_errors(), 0);
    }

    #[tokio::test]
    async fn test_cycle_noop_while_error_budget_exhausted_and_unrecovered() {
        // Reset's reconnect fails: the counter stays above the threshold
        // and the gate stops all traffic until the retry reconnects.
        let (endpoint, log) = MockEndpoint::new();
        {
            let mut state = log.lock().unwrap();
            state.fail_all_sends = true;
            state.connect_results.push_back(Ok(())); // initial connect
            state.connect_results.push_back(Err(RconError::ConnectFailed(
                std::io::Error::other("down"),
            )));
        }
        let (mut poller, broadcaster) = poller_with(endpoint);
        add_subscriber(&broadcaster, 1).await;
        poller.session.connect().await;

        for _ in 0..6 {
            poller.run_cycle().await;
        }
        let commands_after_reset = log.lock().unwrap().commands.len();

        poller.run_cycle().await;

        assert_eq!(
            log.lock().unwrap().commands.len(),
            commands_after_reset,
            "no traffic while unauthenticated and over budget"
        );
    }
}
