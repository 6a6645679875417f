//! WebSocket implementation of the `SocketConnection` contract.
//!
//! A background task owns the socket. Callers reach it through an
//! unbounded command channel; each request is correlated back to its
//! caller by numeric request id over a `oneshot` — the one-promise-per-
//! call contract the provider layer builds on. Inbound push frames are
//! classified and fanned out to the listener table the provider wires
//! through `register_event_listeners`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tokio_tungstenite::tungstenite::Message;

use sockrpc_core::connection::{
    HandlerTag, InboundChannel, ListenerTable, NotificationCallback, SocketConnection,
};
use sockrpc_core::error::TransportError;
use sockrpc_core::wire::{JsonRpcNotification, JsonRpcRequest, RpcId};

type PendingMap = HashMap<u64, oneshot::Sender<Result<Value, TransportError>>>;

/// Configuration for the WebSocket connection.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Reconnect backoff starting duration.
    pub reconnect_initial: Duration,
    /// Maximum reconnect backoff.
    pub reconnect_max: Duration,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            reconnect_initial: Duration::from_millis(500),
            reconnect_max: Duration::from_secs(60),
        }
    }
}

/// Command sent from callers to the background WS task.
enum WsCommand {
    Send {
        req: JsonRpcRequest,
        tx: oneshot::Sender<Result<Value, TransportError>>,
    },
    Close,
}

/// A persistent WebSocket connection to an Ethereum node.
///
/// Reconnects with capped exponential backoff, firing the `close`
/// channel on disconnect and the `connect` channel on every
/// (re-)establishment.
pub struct WsConnection {
    url: String,
    cmd_tx: mpsc::UnboundedSender<WsCommand>,
    listeners: ListenerTable,
    req_id: AtomicU64,
}

impl WsConnection {
    /// Connect to `url` and start the background task.
    pub async fn connect(url: impl Into<String>, config: WsConfig) -> Result<Self, TransportError> {
        let url = url.into();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<WsCommand>();
        let listeners = ListenerTable::new();
        let listeners_clone = listeners.clone();
        let url_clone = url.clone();

        tokio::spawn(async move {
            ws_task(url_clone, cmd_rx, listeners_clone, config).await;
        });

        Ok(Self {
            url,
            cmd_tx,
            listeners,
            req_id: AtomicU64::new(1),
        })
    }

    /// Connect with default configuration.
    pub async fn connect_default(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::connect(url, WsConfig::default()).await
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(WsCommand::Close);
    }
}

#[async_trait]
impl SocketConnection for WsConnection {
    fn on(&self, channel: InboundChannel, handler: HandlerTag, callback: NotificationCallback) {
        self.listeners.insert(channel, handler, callback);
    }

    fn remove_listener(&self, channel: InboundChannel, handler: HandlerTag) {
        self.listeners.remove(channel, handler);
    }

    async fn send(&self, method: &str, parameters: Vec<Value>) -> Result<Value, TransportError> {
        let id = self.req_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, parameters);

        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(WsCommand::Send { req, tx })
            .map_err(|_| TransportError::Closed("WS task closed".into()))?;
        rx.await
            .map_err(|_| TransportError::Closed("WS response dropped".into()))?
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// One classified inbound frame.
#[derive(Debug, Clone, PartialEq)]
enum InboundFrame {
    /// A push notification for one of the listener channels.
    Channel(InboundChannel, Value),
    /// An id-correlated response to an outbound request.
    Response { id: u64, raw: Value },
    /// Anything this layer does not route.
    Ignored,
}

/// Classify a raw text frame from the node.
///
/// Frames with a `method` member are notifications: `eth_subscription`
/// traffic lands on the notification channel with the full `params`
/// object (carrying `subscription` and `result`); `networkChanged` /
/// `accountsChanged` land on their own channels. Frames with a numeric
/// `id` are responses, passed through raw — validation is the provider's
/// job.
fn classify_frame(text: &str) -> InboundFrame {
    let Ok(val) = serde_json::from_str::<Value>(text) else {
        return InboundFrame::Ignored;
    };

    if val.get("method").is_some() {
        let Ok(notif) = serde_json::from_value::<JsonRpcNotification>(val) else {
            return InboundFrame::Ignored;
        };
        let channel = match notif.method.as_str() {
            "eth_subscription" => InboundChannel::Notification,
            "networkChanged" => InboundChannel::NetworkChanged,
            "accountsChanged" => InboundChannel::AccountsChanged,
            _ => return InboundFrame::Ignored,
        };
        return InboundFrame::Channel(channel, notif.params);
    }

    match val.get("id").map(|id| serde_json::from_value::<RpcId>(id.clone())) {
        Some(Ok(RpcId::Number(id))) => InboundFrame::Response { id, raw: val },
        _ => InboundFrame::Ignored,
    }
}

/// Background task that owns the WebSocket connection.
async fn ws_task(
    url: String,
    mut cmd_rx: mpsc::UnboundedReceiver<WsCommand>,
    listeners: ListenerTable,
    config: WsConfig,
) {
    let mut pending: PendingMap = HashMap::new();
    let mut backoff = config.reconnect_initial;

    loop {
        tracing::info!(url = %url, "connecting via WebSocket");

        let conn = tokio_tungstenite::connect_async(&url).await;

        match conn {
            Err(e) => {
                tracing::warn!(error = %e, "WS connect failed, retrying in {backoff:?}");
                time::sleep(backoff).await;
                backoff = (backoff * 2).min(config.reconnect_max);
                continue;
            }
            Ok((ws_stream, _)) => {
                backoff = config.reconnect_initial; // reset on success
                let (mut sink, mut stream) = ws_stream.split();

                listeners.dispatch(InboundChannel::Connect, Value::Null);

                // Main dispatch loop
                let close_reason: String = loop {
                    tokio::select! {
                        // Outbound requests from callers
                        cmd = cmd_rx.recv() => {
                            match cmd {
                                None | Some(WsCommand::Close) => return,
                                Some(WsCommand::Send { req, tx }) => {
                                    let id = match &req.id { RpcId::Number(n) => *n, _ => 0 };
                                    pending.insert(id, tx);
                                    match serde_json::to_string(&req) {
                                        Ok(msg) => {
                                            if sink.send(Message::Text(msg.into())).await.is_err() {
                                                break "send failed".into();
                                            }
                                        }
                                        Err(e) => {
                                            if let Some(tx) = pending.remove(&id) {
                                                let _ = tx.send(Err(e.into()));
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        // Inbound frames from the node
                        msg = stream.next() => {
                            match msg {
                                None => break "stream closed".into(),
                                Some(Err(e)) => {
                                    tracing::warn!(error = %e, "WS receive error");
                                    break e.to_string();
                                }
                                Some(Ok(Message::Text(text))) => {
                                    handle_frame(text.as_str(), &mut pending, &listeners);
                                }
                                Some(Ok(Message::Close(_))) => break "close frame".into(),
                                _ => {}
                            }
                        }
                    }
                };

                // In-flight calls cannot complete on a dead socket
                for (_, tx) in pending.drain() {
                    let _ = tx.send(Err(TransportError::Closed(close_reason.clone())));
                }
                listeners.dispatch(InboundChannel::Close, Value::String(close_reason));

                tracing::warn!(url = %url, "WS disconnected, reconnecting in {backoff:?}");
                time::sleep(backoff).await;
                backoff = (backoff * 2).min(config.reconnect_max);
            }
        }
    }
}

fn handle_frame(text: &str, pending: &mut PendingMap, listeners: &ListenerTable) {
    match classify_frame(text) {
        InboundFrame::Channel(channel, payload) => {
            tracing::debug!(channel = channel.name(), "push frame dispatched");
            listeners.dispatch(channel, payload);
        }
        InboundFrame::Response { id, raw } => {
            if let Some(tx) = pending.remove(&id) {
                let _ = tx.send(Ok(raw));
            } else {
                tracing::debug!(id, "response for unknown request id");
            }
        }
        InboundFrame::Ignored => {
            tracing::debug!("unroutable WS frame ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subscription_frames_land_on_the_notification_channel() {
        let text = r#"{
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": {"subscription": "0xcd0c", "result": {"number": "0x1"}}
        }"#;
        assert_eq!(
            classify_frame(text),
            InboundFrame::Channel(
                InboundChannel::Notification,
                json!({"subscription": "0xcd0c", "result": {"number": "0x1"}})
            )
        );
    }

    #[test]
    fn push_channels_are_routed_by_method() {
        let net = r#"{"jsonrpc":"2.0","method":"networkChanged","params":"0x5"}"#;
        let acc = r#"{"jsonrpc":"2.0","method":"accountsChanged","params":["0xaa"]}"#;

        assert_eq!(
            classify_frame(net),
            InboundFrame::Channel(InboundChannel::NetworkChanged, json!("0x5"))
        );
        assert_eq!(
            classify_frame(acc),
            InboundFrame::Channel(InboundChannel::AccountsChanged, json!(["0xaa"]))
        );
    }

    #[test]
    fn responses_are_correlated_by_numeric_id() {
        let text = r#"{"jsonrpc":"2.0","id":7,"result":"0x10"}"#;
        match classify_frame(text) {
            InboundFrame::Response { id, raw } => {
                assert_eq!(id, 7);
                assert_eq!(raw["result"], json!("0x10"));
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn error_responses_still_correlate() {
        // A node error is a response too — the provider's validator
        // decides what to do with it.
        let text = r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32000,"message":"oops"}}"#;
        assert!(matches!(
            classify_frame(text),
            InboundFrame::Response { id: 3, .. }
        ));
    }

    #[test]
    fn unroutable_frames_are_ignored() {
        assert_eq!(classify_frame("not json"), InboundFrame::Ignored);
        assert_eq!(classify_frame(r#"{"jsonrpc":"2.0"}"#), InboundFrame::Ignored);
        assert_eq!(
            classify_frame(r#"{"jsonrpc":"2.0","method":"unknown_push","params":[]}"#),
            InboundFrame::Ignored
        );
        assert_eq!(
            classify_frame(r#"{"jsonrpc":"2.0","id":"string-id","result":true}"#),
            InboundFrame::Ignored
        );
    }
}
