//! Background WebSocket connection loop with fixed-delay auto-reconnect.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::feed::NotificationFeed;
use crate::types::{ConnectionState, StreamConfig};

/// Why a connected session ended.
enum SessionEnd {
    Shutdown,
    Disconnected(String),
}

/// Background task owning the WebSocket connection.
///
/// Cycles `Connecting -> Open -> Closed` with a fixed delay between
/// attempts, forever. Each cycle drops the previous socket before dialing a
/// new one. Shutdown interrupts both an active session and a pending
/// reconnect delay, so no connection attempt can fire after teardown;
/// dropping the client handle closes the shutdown channel and has the same
/// effect.
pub(crate) async fn connection_loop(
    config: StreamConfig,
    feed: Arc<NotificationFeed>,
    state_tx: watch::Sender<ConnectionState>,
    mut outbound_rx: mpsc::Receiver<serde_json::Value>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    loop {
        state_tx.send_replace(ConnectionState::Connecting);
        info!(url = %config.url, "Connecting to notification stream");

        match tokio::time::timeout(
            config.connect_timeout,
            tokio_tungstenite::connect_async(&config.url),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                state_tx.send_replace(ConnectionState::Open);
                info!("Notification stream connected");

                let end = session(ws_stream, &feed, &mut outbound_rx, &mut shutdown_rx).await;
                state_tx.send_replace(ConnectionState::Closed);

                match end {
                    SessionEnd::Shutdown => {
                        info!("Notification stream shut down");
                        return;
                    }
                    SessionEnd::Disconnected(reason) => {
                        warn!(reason = %reason, "Notification stream lost");
                    }
                }
            }
            Ok(Err(e)) => {
                state_tx.send_replace(ConnectionState::Closed);
                warn!(error = %e, "Failed to connect to notification stream");
            }
            Err(_elapsed) => {
                state_tx.send_replace(ConnectionState::Closed);
                warn!(
                    timeout_secs = config.connect_timeout.as_secs(),
                    "Connection attempt timed out"
                );
            }
        }

        debug!(
            delay_ms = config.reconnect_delay.as_millis() as u64,
            "Scheduling reconnect"
        );
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown_rx.recv() => {
                info!("Shutdown requested during reconnect delay");
                return;
            }
        }
    }
}

/// Run a single connected session until the transport fails, the server
/// closes, or shutdown is requested.
async fn session(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    feed: &NotificationFeed,
    outbound_rx: &mut mpsc::Receiver<serde_json::Value>,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> SessionEnd {
    let (mut sink, mut stream) = ws_stream.split();

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => feed.ingest(&text),
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = sink.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    return SessionEnd::Disconnected("server closed connection".into());
                }
                Some(Ok(_)) => {
                    debug!("Ignoring non-text frame");
                }
                Some(Err(e)) => {
                    return SessionEnd::Disconnected(format!("ws error: {e}"));
                }
            },

            payload = outbound_rx.recv() => match payload {
                Some(value) => match serde_json::to_string(&value) {
                    Ok(json) => {
                        if sink.send(WsMessage::Text(json.into())).await.is_err() {
                            return SessionEnd::Disconnected("send failed".into());
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize outbound message"),
                },
                // Client handle dropped; treat as teardown.
                None => {
                    let _ = sink.close().await;
                    return SessionEnd::Shutdown;
                }
            },

            _ = shutdown_rx.recv() => {
                let _ = sink.close().await;
                return SessionEnd::Shutdown;
            }
        }
    }
}
