//! sockrpc-ws — WebSocket `SocketConnection` with auto-reconnect.
//!
//! # Features
//! - Auto-reconnect on disconnect (capped exponential backoff)
//! - Request/response correlation by request id (one future per call)
//! - Push-frame classification onto the provider's inbound channels
//! - `connect` / `close` channel events on every (re-)establishment

pub mod client;

pub use client::{WsConfig, WsConnection};
