//! WebSocket upgrade handler.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use poker_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws: WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    if state.realtime.is_shutting_down() {
        return Err(AppError::service_unavailable("Server is shutting down").into());
    }
    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, Some(peer.ip()), socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, address: Option<IpAddr>, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let engine = state.realtime.clone();

    let (handle, mut outbound_rx) = engine.connect(address);
    let conn_id = handle.id;

    // Forward queued frames; once the connection is closed, flush what is
    // left and send a close frame.
    let closer = handle.closer();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                frame = outbound_rx.recv() => match frame {
                    Some(frame) => {
                        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                            return;
                        }
                    }
                    None => break,
                },
                _ = closer.cancelled() => {
                    while let Ok(frame) = outbound_rx.try_recv() {
                        if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                            return;
                        }
                    }
                    break;
                }
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    let closer = handle.closer();
    loop {
        tokio::select! {
            _ = closer.cancelled() => {
                debug!(conn_id = %conn_id, "Connection closed by server");
                break;
            }
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Err(e) = engine.handle_inbound(conn_id, text.as_str()).await {
                        warn!(conn_id = %conn_id, error = %e, "Dropping connection");
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Binary(_))) => {
                    debug!(conn_id = %conn_id, "Ignoring binary frame");
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    engine.disconnect(conn_id).await;
    handle.close();

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
