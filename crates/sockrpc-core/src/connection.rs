//! The `SocketConnection` trait — the contract between a persistent
//! socket transport and the provider layer built on top of it.
//!
//! A connection does three things: it pushes named inbound events to
//! registered listeners, it lets those listeners be removed one at a
//! time, and it carries request/response round trips whose correlation
//! is the transport's own concern (one resolved future per call — the
//! provider never keeps a message-id table).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

/// Inbound event channels a socket transport can fire.
///
/// These are the transport-facing names; the provider re-emits them under
/// its own externally visible vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundChannel {
    /// A server push (subscription traffic).
    Notification,
    /// The connection was (re-)established.
    Connect,
    /// The connection went down, cleanly or not.
    Close,
    /// The node switched networks.
    NetworkChanged,
    /// The exposed account set changed.
    AccountsChanged,
}

impl InboundChannel {
    /// The wire-level channel name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Notification => "notification",
            Self::Connect => "connect",
            Self::Close => "close",
            Self::NetworkChanged => "networkChanged",
            Self::AccountsChanged => "accountsChanged",
        }
    }
}

/// Identity of a provider-side handler.
///
/// Listener removal is addressed by `(channel, tag)` pair, so two handlers
/// bound to the same channel (e.g. `OnClose` and `OnError`, both on
/// [`InboundChannel::Close`]) can be unregistered independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerTag {
    OnMessage,
    OnConnect,
    OnClose,
    OnReady,
    OnError,
    OnNetworkChanged,
    OnAccountsChanged,
}

/// Callback invoked with the payload of an inbound channel event.
///
/// Callbacks run synchronously inside the transport's dispatch turn and
/// must not block.
pub type NotificationCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// A persistent, event-pushing socket transport.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn SocketConnection>`.
#[async_trait]
pub trait SocketConnection: Send + Sync + 'static {
    /// Register `callback` for events on `channel`, identified by `handler`.
    ///
    /// Registering the same `(channel, handler)` pair twice replaces the
    /// earlier callback.
    fn on(&self, channel: InboundChannel, handler: HandlerTag, callback: NotificationCallback);

    /// Remove the listener registered under `(channel, handler)`.
    ///
    /// Removing a pair that was never registered is a no-op; other
    /// registrations on the same channel are untouched.
    fn remove_listener(&self, channel: InboundChannel, handler: HandlerTag);

    /// Send one RPC call and resolve with the raw, unvalidated response.
    async fn send(&self, method: &str, parameters: Vec<Value>) -> Result<Value, TransportError>;

    /// The transport's identifier (URL or name).
    fn url(&self) -> &str;
}

/// Listener registry shared between a transport and its dispatch task.
///
/// Keyed by `(channel, tag)`; one callback per key. [`dispatch`] fires
/// every callback registered on a channel, regardless of tag, in an
/// unspecified order.
///
/// [`dispatch`]: ListenerTable::dispatch
#[derive(Clone, Default)]
pub struct ListenerTable {
    entries: Arc<Mutex<HashMap<(InboundChannel, HandlerTag), NotificationCallback>>>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the callback for `(channel, tag)`.
    pub fn insert(&self, channel: InboundChannel, tag: HandlerTag, callback: NotificationCallback) {
        self.entries
            .lock()
            .unwrap()
            .insert((channel, tag), callback);
    }

    /// Remove exactly the `(channel, tag)` registration.
    pub fn remove(&self, channel: InboundChannel, tag: HandlerTag) {
        self.entries.lock().unwrap().remove(&(channel, tag));
    }

    /// Invoke every callback registered on `channel` with a clone of
    /// `payload`.
    ///
    /// Callbacks are collected under the lock and invoked outside it, so a
    /// callback may re-enter the table.
    pub fn dispatch(&self, channel: InboundChannel, payload: Value) {
        let callbacks: Vec<NotificationCallback> = {
            let entries = self.entries.lock().unwrap();
            entries
                .iter()
                .filter(|((ch, _), _)| *ch == channel)
                .map(|(_, cb)| Arc::clone(cb))
                .collect()
        };
        for callback in callbacks {
            callback(payload.clone());
        }
    }

    /// Number of registered listeners across all channels.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
