//! JSON-RPC 2.0 wire envelopes for socket transports.
//!
//! Responses and notification payloads are deliberately kept as raw
//! [`serde_json::Value`]s: the provider layer validates their shape with
//! [`crate::validator`] instead of failing during deserialization, so a
//! malformed node response surfaces as a validation error rather than a
//! decode error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request ID — string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(u64),
    String(String),
    Null,
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<Value>,
    pub id: RpcId,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: RpcId::Number(id),
        }
    }
}

/// A JSON-RPC 2.0 notification — a server push with a `method` and no `id`.
///
/// Socket transports receive these for subscription traffic
/// (`eth_subscription`) and for provider push channels such as
/// `networkChanged` / `accountsChanged`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcNotification {
    /// The subscription identifier carried in `params.subscription`,
    /// if this is a subscription notification.
    pub fn subscription_id(&self) -> Option<&str> {
        self.params.get("subscription").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serialization() {
        let req = JsonRpcRequest::new(1, "eth_blockNumber", vec![]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"method\":\"eth_blockNumber\""));
        assert!(json.contains("\"id\":1"));
    }

    #[test]
    fn notification_subscription_id() {
        let raw = json!({
            "jsonrpc": "2.0",
            "method": "eth_subscription",
            "params": {"subscription": "0xcd0c3e8af590364c09d0fa6a1210faf5", "result": {}}
        });
        let notif: JsonRpcNotification = serde_json::from_value(raw).unwrap();
        assert_eq!(
            notif.subscription_id(),
            Some("0xcd0c3e8af590364c09d0fa6a1210faf5")
        );
    }

    #[test]
    fn notification_without_subscription() {
        let raw = json!({
            "jsonrpc": "2.0",
            "method": "networkChanged",
            "params": "0x1"
        });
        let notif: JsonRpcNotification = serde_json::from_value(raw).unwrap();
        assert_eq!(notif.subscription_id(), None);
    }

    #[test]
    fn rpc_id_display() {
        assert_eq!(RpcId::Number(7).to_string(), "7");
        assert_eq!(RpcId::String("abc".into()).to_string(), "abc");
        assert_eq!(RpcId::Null.to_string(), "null");
    }
}
