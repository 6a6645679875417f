//! Externally visible `socket_*` event names and their bindings.
//!
//! Consumers address provider listeners with a stable `socket_`-prefixed
//! vocabulary, decoupled from the transport's own channel names (which
//! can differ between transport kinds). Each external name maps to
//! exactly one `(channel, handler)` registration on the connection.

use sockrpc_core::{HandlerTag, InboundChannel};

/// The seven externally addressable socket events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketEvent {
    NetworkChanged,
    AccountsChanged,
    Message,
    Ready,
    Close,
    Error,
    Connect,
}

/// Every external event, in table order.
pub const ALL_SOCKET_EVENTS: [SocketEvent; 7] = [
    SocketEvent::NetworkChanged,
    SocketEvent::AccountsChanged,
    SocketEvent::Message,
    SocketEvent::Ready,
    SocketEvent::Close,
    SocketEvent::Error,
    SocketEvent::Connect,
];

impl SocketEvent {
    /// The external name consumers use.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NetworkChanged => "socket_networkChanged",
            Self::AccountsChanged => "socket_accountsChanged",
            Self::Message => "socket_message",
            Self::Ready => "socket_ready",
            Self::Close => "socket_close",
            Self::Error => "socket_error",
            Self::Connect => "socket_connect",
        }
    }

    /// The `(channel, handler)` registration this external name stands
    /// for on the underlying connection.
    ///
    /// `Close` and `Error` deliberately share the transport's close
    /// channel: a close frame can mean a clean shutdown or a failure, and
    /// each concern unregisters its own handler without disturbing the
    /// other's.
    pub const fn binding(self) -> (InboundChannel, HandlerTag) {
        match self {
            Self::NetworkChanged => (InboundChannel::NetworkChanged, HandlerTag::OnNetworkChanged),
            Self::AccountsChanged => (InboundChannel::AccountsChanged, HandlerTag::OnAccountsChanged),
            Self::Message => (InboundChannel::Notification, HandlerTag::OnMessage),
            Self::Ready => (InboundChannel::Connect, HandlerTag::OnReady),
            Self::Close => (InboundChannel::Close, HandlerTag::OnClose),
            Self::Error => (InboundChannel::Close, HandlerTag::OnError),
            Self::Connect => (InboundChannel::Connect, HandlerTag::OnConnect),
        }
    }

    /// Parse an external event name. Returns `None` for anything outside
    /// the table.
    pub fn parse(name: &str) -> Option<Self> {
        ALL_SOCKET_EVENTS.into_iter().find(|e| e.name() == name)
    }
}

impl std::fmt::Display for SocketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SocketEvent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}
