//! The Ethereum socket provider.
//!
//! [`EthereumProvider`] sits between application code and a
//! [`SocketConnection`]. Outbound, it dispatches RPC calls and validates
//! every raw response before resolving the caller. Inbound, it translates
//! transport channel events into its own event vocabulary: lifecycle
//! channels re-emit under fixed names, subscription notifications re-emit
//! under the subscription identifier itself, so a caller watching one
//! on-chain stream never sees another stream's payloads.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use serde_json::Value;
use tokio::sync::mpsc;

use sockrpc_core::{
    default_validator, HandlerTag, InboundChannel, ModuleContext, ResponseValidator, RpcMethod,
    SocketConnection,
};

use crate::emitter::EventEmitter;
use crate::error::ProviderError;
use crate::events::SocketEvent;
use crate::subscriptions::SubscriptionTable;

/// The five inbound registrations `register_event_listeners` wires.
const LISTENER_BINDINGS: [(InboundChannel, HandlerTag); 5] = [
    (InboundChannel::Notification, HandlerTag::OnMessage),
    (InboundChannel::Connect, HandlerTag::OnConnect),
    (InboundChannel::Close, HandlerTag::OnClose),
    (InboundChannel::NetworkChanged, HandlerTag::OnNetworkChanged),
    (InboundChannel::AccountsChanged, HandlerTag::OnAccountsChanged),
];

/// The socket-provider capability surface.
///
/// Any provider over a persistent socket exposes this: listener wiring
/// onto its connection, listener rebinding by external `socket_*` name,
/// and a subscribable event surface.
pub trait SocketProvider {
    /// Attach the provider's handlers to the connection.
    ///
    /// Side effect only. Calling it twice re-registers the same
    /// `(channel, handler)` pairs; avoiding double wiring is the
    /// caller's responsibility.
    fn register_event_listeners(&self);

    /// Remove the one connection listener addressed by the external
    /// `socket_*` event name.
    fn remove_all_listeners(&self, event: &str) -> Result<(), ProviderError>;

    /// Listen for a provider-emitted event (`connect`, `close`,
    /// `networkChanged`, a subscription identifier, ...).
    fn on(&self, event: &str) -> mpsc::UnboundedReceiver<Value>;
}

/// State shared between the provider handle and the connection callbacks.
struct ProviderShared {
    emitter: EventEmitter,
    subscriptions: SubscriptionTable,
}

impl ProviderShared {
    /// Route one inbound channel payload through the handler identified
    /// by `tag`. Runs synchronously inside the connection's dispatch
    /// turn; never panics on unexpected payloads.
    fn handle(&self, tag: HandlerTag, payload: Value) {
        match tag {
            HandlerTag::OnMessage => self.on_message(payload),
            HandlerTag::OnConnect => {
                self.emitter.emit("connect", payload);
            }
            HandlerTag::OnReady => {
                self.emitter.emit("ready", payload);
            }
            HandlerTag::OnClose => {
                self.emitter.emit("close", payload);
            }
            HandlerTag::OnError => {
                self.emitter.emit("error", payload);
            }
            HandlerTag::OnNetworkChanged => {
                self.emitter.emit("networkChanged", payload);
            }
            HandlerTag::OnAccountsChanged => {
                self.emitter.emit("accountsChanged", payload);
            }
        }
    }

    /// Subscription routing: re-emit the payload under its subscription
    /// identifier when the table marks that identifier active. Unknown or
    /// inactive identifiers are dropped here — no listener is registered
    /// under their name, and filtering stays the subscription manager's
    /// concern.
    fn on_message(&self, payload: Value) {
        let Some(id) = payload.get("subscription").and_then(Value::as_str) else {
            tracing::debug!("inbound notification without subscription id ignored");
            return;
        };
        if self.subscriptions.is_active(id) {
            let event = id.to_string();
            self.emitter.emit(&event, payload);
        } else {
            tracing::trace!(subscription = %id, "notification for inactive subscription dropped");
        }
    }
}

/// Ethereum provider over a persistent socket connection.
///
/// Composed from the connection, an injected response validator and the
/// shared subscription table. The connection's lifecycle is owned by the
/// transport; the provider only observes it.
pub struct EthereumProvider<C: SocketConnection> {
    connection: Arc<C>,
    timeout: Option<Duration>,
    validator: ResponseValidator,
    shared: Arc<ProviderShared>,
}

impl<C: SocketConnection> EthereumProvider<C> {
    /// Wrap `connection`. No timeout is configured and the stock JSON-RPC
    /// shape validator is used.
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            connection,
            timeout: None,
            validator: default_validator(),
            shared: Arc::new(ProviderShared {
                emitter: EventEmitter::new(),
                subscriptions: SubscriptionTable::new(),
            }),
        }
    }

    /// Record a timeout. Stored configuration only; enforcement belongs
    /// to the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the response validator.
    pub fn with_validator(mut self, validator: ResponseValidator) -> Self {
        self.validator = validator;
        self
    }

    /// The wrapped connection.
    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Handle to the subscription table, for subscription-management code
    /// to populate.
    pub fn subscriptions(&self) -> SubscriptionTable {
        self.shared.subscriptions.clone()
    }

    /// Send one RPC call and validate the raw response before resolving.
    ///
    /// A validation failure rejects the call with the validator's error,
    /// message intact, even though the transport round trip succeeded.
    /// Transport failures propagate unwrapped.
    pub async fn send(&self, method: &str, parameters: Vec<Value>) -> Result<Value, ProviderError> {
        let raw = self.connection.send(method, parameters).await?;
        (self.validator)(&raw)?;
        Ok(raw)
    }

    /// Dispatch a batch of method descriptors and resolve with their
    /// results in descriptor order.
    ///
    /// Every descriptor's `before_execution` hook runs synchronously
    /// first (parameters are snapshotted afterwards), then all calls are
    /// awaited together; the first failure rejects the whole batch.
    pub async fn send_batch(
        &self,
        methods: &mut [Box<dyn RpcMethod>],
        module: &ModuleContext,
    ) -> Result<Vec<Value>, ProviderError> {
        let mut calls = Vec::with_capacity(methods.len());
        for method in methods.iter_mut() {
            method.before_execution(module);
            calls.push((method.rpc_method().to_string(), method.parameters()));
        }

        future::try_join_all(
            calls
                .iter()
                .map(|(method, parameters)| self.send(method, parameters.clone())),
        )
        .await
    }

    /// Inbound handler for the `notification` channel.
    pub fn on_message(&self, payload: Value) {
        self.shared.on_message(payload);
    }

    /// Inbound handler for the `connect` channel; re-emits `connect`.
    pub fn on_connect(&self, payload: Value) {
        self.shared.handle(HandlerTag::OnConnect, payload);
    }

    /// Re-emits `ready` once the connection is usable.
    pub fn on_ready(&self, payload: Value) {
        self.shared.handle(HandlerTag::OnReady, payload);
    }

    /// Inbound handler for the `close` channel; re-emits `close`.
    pub fn on_close(&self, payload: Value) {
        self.shared.handle(HandlerTag::OnClose, payload);
    }

    /// Error-flavored close handling; re-emits `error`.
    pub fn on_error(&self, payload: Value) {
        self.shared.handle(HandlerTag::OnError, payload);
    }

    /// Re-emits `networkChanged` with the new network id unchanged.
    pub fn on_network_changed(&self, id: Value) {
        self.shared.handle(HandlerTag::OnNetworkChanged, id);
    }

    /// Re-emits `accountsChanged` with the account list unchanged.
    pub fn on_accounts_changed(&self, accounts: Value) {
        self.shared.handle(HandlerTag::OnAccountsChanged, accounts);
    }
}

impl<C: SocketConnection> SocketProvider for EthereumProvider<C> {
    fn register_event_listeners(&self) {
        for (channel, tag) in LISTENER_BINDINGS {
            let shared = Arc::clone(&self.shared);
            self.connection.on(
                channel,
                tag,
                Arc::new(move |payload| shared.handle(tag, payload)),
            );
        }
    }

    fn remove_all_listeners(&self, event: &str) -> Result<(), ProviderError> {
        let socket_event = SocketEvent::parse(event)
            .ok_or_else(|| ProviderError::UnknownSocketEvent(event.to_string()))?;
        let (channel, tag) = socket_event.binding();
        self.connection.remove_listener(channel, tag);
        Ok(())
    }

    fn on(&self, event: &str) -> mpsc::UnboundedReceiver<Value> {
        self.shared.emitter.on(event)
    }
}
