//! Method descriptors — value objects describing one RPC call.
//!
//! A descriptor carries the RPC method name and its ordered parameters,
//! plus a pre-dispatch hook that lets it finalize those parameters
//! against the calling module's state (fill in a default account, a
//! default block tag) right before the call goes out.

use serde_json::Value;

/// State of the calling module that descriptors may consult in
/// [`RpcMethod::before_execution`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleContext {
    /// Account used when a call omits `from`.
    pub default_account: Option<String>,
    /// Block tag used when a call omits one (e.g. `"latest"`).
    pub default_block: Option<String>,
}

/// One RPC call: name, parameters, and a pre-dispatch hook.
pub trait RpcMethod: Send {
    /// The JSON-RPC method name (e.g. `eth_getBalance`).
    fn rpc_method(&self) -> &str;

    /// The ordered parameter list, as it stands right now.
    fn parameters(&self) -> Vec<Value>;

    /// Hook run once, synchronously, before the call is dispatched.
    /// May mutate the descriptor's parameters; the dispatcher reads
    /// [`parameters`](Self::parameters) again afterwards.
    fn before_execution(&mut self, _module: &ModuleContext) {}
}

/// A plain (method, parameters) descriptor with no pre-dispatch logic.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    method: String,
    parameters: Vec<Value>,
}

impl RpcCall {
    pub fn new(method: impl Into<String>, parameters: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            parameters,
        }
    }
}

impl RpcMethod for RpcCall {
    fn rpc_method(&self) -> &str {
        &self.method
    }

    fn parameters(&self) -> Vec<Value> {
        self.parameters.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rpc_call_exposes_method_and_parameters() {
        let call = RpcCall::new("eth_getBalance", vec![json!("0xabc"), json!("latest")]);
        assert_eq!(call.rpc_method(), "eth_getBalance");
        assert_eq!(call.parameters(), vec![json!("0xabc"), json!("latest")]);
    }

    #[test]
    fn before_execution_defaults_to_noop() {
        let mut call = RpcCall::new("eth_blockNumber", vec![]);
        let before = call.parameters();
        call.before_execution(&ModuleContext::default());
        assert_eq!(call.parameters(), before);
    }

    #[test]
    fn descriptor_hook_can_rewrite_parameters() {
        struct BalanceOfDefaultAccount {
            parameters: Vec<Value>,
        }
        impl RpcMethod for BalanceOfDefaultAccount {
            fn rpc_method(&self) -> &str {
                "eth_getBalance"
            }
            fn parameters(&self) -> Vec<Value> {
                self.parameters.clone()
            }
            fn before_execution(&mut self, module: &ModuleContext) {
                if self.parameters.is_empty() {
                    if let Some(account) = &module.default_account {
                        self.parameters = vec![json!(account), json!("latest")];
                    }
                }
            }
        }

        let module = ModuleContext {
            default_account: Some("0xfeed".into()),
            default_block: None,
        };
        let mut descriptor = BalanceOfDefaultAccount { parameters: vec![] };
        descriptor.before_execution(&module);
        assert_eq!(descriptor.parameters(), vec![json!("0xfeed"), json!("latest")]);
    }
}
