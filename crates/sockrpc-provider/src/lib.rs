//! sockrpc-provider — the Ethereum socket provider layer.
//!
//! # Overview
//!
//! Built on `sockrpc-core`'s [`SocketConnection`](sockrpc_core::SocketConnection)
//! contract, this crate provides:
//!
//! - [`EthereumProvider`] — send / batch-send orchestration with response
//!   validation, plus subscription-to-event-name routing
//! - [`SocketProvider`] — the capability trait any socket-backed provider
//!   conforms to (listener wiring and the `socket_*` rebinding protocol)
//! - [`EventEmitter`] — the generic publish/subscribe core
//! - [`SocketEvent`] — the external `socket_*` event-name table
//! - [`SubscriptionTable`] — active subscription identifiers, populated by
//!   subscription-management code and consulted by the dispatcher
//!
//! # Quick start
//! ```rust,no_run
//! use std::sync::Arc;
//! use sockrpc_core::SocketConnection;
//! use sockrpc_provider::{EthereumProvider, SocketProvider};
//!
//! # async fn example<C: SocketConnection>(connection: Arc<C>) {
//! let provider = EthereumProvider::new(connection);
//! provider.register_event_listeners();
//!
//! let block = provider.send("eth_blockNumber", vec![]).await.unwrap();
//! # let _ = block;
//! # }
//! ```

pub mod emitter;
pub mod error;
pub mod events;
pub mod provider;
pub mod subscriptions;

pub use emitter::EventEmitter;
pub use error::ProviderError;
pub use events::{SocketEvent, ALL_SOCKET_EVENTS};
pub use provider::{EthereumProvider, SocketProvider};
pub use subscriptions::SubscriptionTable;
