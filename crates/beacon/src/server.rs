//! Bridge wiring: poller task, subscriber accept loop.

use std::sync::Arc;
use std::time::Duration;

use beacon_broadcast::Broadcaster;
use beacon_poll::Poller;
use beacon_rcon::{RconClient, RconSession};
use beacon_transport::{Transport, WebSocketConnection, WebSocketTransport};
use tokio::sync::Mutex;

use crate::Config;
use crate::handler::serve_subscriber;

/// Delay before a failed remote-console connect is retried.
const RECONNECT_RETRY_DELAY: Duration = Duration::from_millis(3000);

/// Delay between attempts to bind the subscriber listen port.
const BIND_RETRY_DELAY: Duration = Duration::from_secs(3);

/// The assembled bridge: one poller task feeding one broadcaster, and an
/// accept loop feeding it subscribers.
pub struct Bridge {
    config: Config,
}

impl Bridge {
    /// Creates a bridge from the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the bridge forever.
    ///
    /// Nothing here is fatal: a failed remote-console connection leaves
    /// the poller retrying on its armed timer, and a failed listen-port
    /// bind is retried until it succeeds. Subscribers simply see no
    /// fresh snapshots while the remote side is down.
    pub async fn run(self) {
        let broadcaster = Arc::new(Mutex::new(Broadcaster::new()));

        let client = RconClient::new(
            &self.config.rcon_host,
            self.config.rcon_port,
            &self.config.rcon_password,
            self.config.rcon_timeout,
        );
        let session = RconSession::new(client, RECONNECT_RETRY_DELAY);
        let poller = Poller::new(
            session,
            Arc::clone(&broadcaster),
            self.config.poll_interval,
        );
        tokio::spawn(poller.run());

        let addr = format!("0.0.0.0:{}", self.config.listen_port);
        let mut transport = loop {
            match WebSocketTransport::bind(&addr).await {
                Ok(transport) => break transport,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        %addr,
                        "failed to bind subscriber transport, retrying"
                    );
                    tokio::time::sleep(BIND_RETRY_DELAY).await;
                }
            }
        };

        accept_loop(&mut transport, broadcaster).await;
    }
}

/// Accepts subscribers forever, spawning one handler task per connection.
///
/// Accept failures are logged and the loop continues — a transient
/// listener error must not take the bridge down.
pub async fn accept_loop(
    transport: &mut WebSocketTransport,
    broadcaster: Arc<Mutex<Broadcaster<WebSocketConnection>>>,
) {
    loop {
        match transport.accept().await {
            Ok(conn) => {
                let broadcaster = Arc::clone(&broadcaster);
                tokio::spawn(async move {
                    if let Err(e) = serve_subscriber(conn, broadcaster).await {
                        tracing::debug!(
                            error = %e,
                            "subscriber connection ended with error"
                        );
                    }
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
            }
        }
    }
}
