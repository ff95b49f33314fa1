//! Per-subscriber connection handler.

use std::sync::Arc;

use beacon_broadcast::Broadcaster;
use beacon_transport::Connection;
use tokio::sync::Mutex;

use crate::BridgeError;

/// Serves one subscriber from accept to close.
///
/// Joins the broadcaster (which replays the last snapshot immediately),
/// then drains inbound frames until the subscriber hangs up. Subscribers
/// are listeners — inbound content is discarded; the read loop exists
/// only to observe the close. The subscriber is deregistered on every
/// exit path.
pub async fn serve_subscriber<C: Connection>(
    conn: C,
    broadcaster: Arc<Mutex<Broadcaster<C>>>,
) -> Result<(), BridgeError> {
    let conn = Arc::new(conn);
    let id = conn.id();

    broadcaster.lock().await.on_join(Arc::clone(&conn)).await;

    let result = loop {
        match conn.recv().await {
            Ok(Some(_)) => continue,
            Ok(None) => break Ok(()),
            Err(e) => break Err(BridgeError::Transport(e)),
        }
    };

    broadcaster.lock().await.on_leave(id);
    result
}
