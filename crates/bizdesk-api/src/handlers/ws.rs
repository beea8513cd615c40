//! WebSocket upgrade handler.
//!
//! Browsers cannot set an `Authorization` header on a websocket
//! handshake, so the token rides in the `Sec-WebSocket-Protocol` list
//! (second value, after the `bizdesk` protocol name) or, failing that,
//! in a `?token=` query parameter. The protocol header wins.

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::SEC_WEBSOCKET_PROTOCOL;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use bizdesk_auth::session::SessionError;
use bizdesk_realtime::message::OutboundMessage;

use crate::state::AppState;

/// Subprotocol name clients put first in `Sec-WebSocket-Protocol`.
const PROTOCOL_NAME: &str = "bizdesk";

/// Close codes for handshake-time authentication failures.
const CLOSE_MISSING_TOKEN: u16 = 4001;
const CLOSE_INVALID_TOKEN: u16 = 4002;
const CLOSE_USER_NOT_FOUND: u16 = 4003;
const CLOSE_BUSINESS_INACTIVE: u16 = 4004;
const CLOSE_USER_INACTIVE: u16 = 4005;
/// The server evicted this connection in favour of a newer one.
const CLOSE_REPLACED: u16 = 4006;

/// Query parameters for the websocket handshake.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// Refresh token, fallback to the protocol header.
    pub token: Option<String>,
}

/// GET /ws — websocket upgrade.
///
/// The upgrade always succeeds; authentication failures surface as a
/// close frame with a distinct code so clients can tell them apart.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    Query(query): Query<WsQuery>,
) -> Response {
    let token = protocol_token(&headers).or(query.token);

    ws.protocols([PROTOCOL_NAME])
        .on_upgrade(move |socket| handle_connection(state, socket, token))
}

/// Extracts the token from the `Sec-WebSocket-Protocol` header.
fn protocol_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(SEC_WEBSOCKET_PROTOCOL)?.to_str().ok()?;
    let mut parts = raw.split(',').map(str::trim);
    if parts.next() != Some(PROTOCOL_NAME) {
        return None;
    }
    parts.next().filter(|t| !t.is_empty()).map(str::to_string)
}

/// Maps a handshake failure to its close code.
fn close_code(err: &SessionError) -> u16 {
    match err {
        SessionError::MissingToken => CLOSE_MISSING_TOKEN,
        SessionError::InvalidToken => CLOSE_INVALID_TOKEN,
        SessionError::UserNotFound => CLOSE_USER_NOT_FOUND,
        SessionError::BusinessInactive => CLOSE_BUSINESS_INACTIVE,
        SessionError::UserInactive => CLOSE_USER_INACTIVE,
        SessionError::Internal(_) => 1011,
    }
}

async fn handle_connection(state: AppState, mut socket: WebSocket, token: Option<String>) {
    // The long-lived socket authenticates with the refresh token class.
    let session = match state
        .session_resolver
        .resolve_refresh(token.as_deref())
        .await
    {
        Ok(session) => session,
        Err(err) => {
            let code = close_code(&err);
            debug!(close_code = code, "WebSocket handshake rejected");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code,
                    reason: err.to_string().into(),
                })))
                .await;
            return;
        }
    };

    let (handle, mut outbound_rx) = state
        .realtime
        .register(session.user_id, session.business_id);
    let conn_id = handle.id;
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Forward queued outbound messages to the wire.
    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            if matches!(msg, OutboundMessage::Close) {
                let _ = ws_tx
                    .send(Message::Close(Some(CloseFrame {
                        code: CLOSE_REPLACED,
                        reason: "Connection replaced".into(),
                    })))
                    .await;
                break;
            }
            let text = match msg.to_text() {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                // Heartbeat echo; everything else inbound is ignored.
                if text.as_str() == "ping" {
                    handle.send(OutboundMessage::Pong);
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(connection_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer.abort();
    state.realtime.unregister(&conn_id);
}
