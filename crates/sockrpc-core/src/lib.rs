//! sockrpc-core — foundation traits and types for SockRPC.
//!
//! # Overview
//!
//! SockRPC is a provider layer for talking to an Ethereum node over a
//! persistent, message-oriented socket (WebSocket, IPC). The core crate
//! defines the contracts the provider is composed from:
//!
//! - [`SocketConnection`] — the transport trait (listener registration,
//!   listener removal, one-promise-per-call `send`)
//! - [`InboundChannel`] / [`HandlerTag`] / [`ListenerTable`] — the tagged
//!   listener vocabulary shared by transports and the provider
//! - [`JsonRpcRequest`] / [`JsonRpcNotification`] — wire envelopes
//! - [`validator`] — raw response shape validation
//! - [`RpcMethod`] / [`ModuleContext`] — method descriptors for batch
//!   dispatch
//! - [`TransportError`] — structured transport error type

pub mod connection;
pub mod error;
pub mod method;
pub mod validator;
pub mod wire;

pub use connection::{
    HandlerTag, InboundChannel, ListenerTable, NotificationCallback, SocketConnection,
};
pub use error::TransportError;
pub use method::{ModuleContext, RpcCall, RpcMethod};
pub use validator::{default_validator, validate, ResponseValidator, ValidationError};
pub use wire::{JsonRpcNotification, JsonRpcRequest, RpcId};
