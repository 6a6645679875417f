//! JSON-RPC response validation.
//!
//! [`validate`] judges a raw response *after* the transport has resolved:
//! a node can complete the round trip and still hand back garbage, or a
//! well-formed error object. The provider runs every `send` result through
//! a validator before resolving the caller.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// A raw RPC response failed shape validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The response is not a JSON object at all.
    #[error("response is not a JSON-RPC object: {0}")]
    NotAnObject(String),

    /// The node returned a JSON-RPC error object. The message is the
    /// node's own, passed through verbatim.
    #[error("{message}")]
    Node { code: i64, message: String },

    /// The response carries neither a `result` nor an `error` member.
    #[error("response has no result and no error")]
    MissingResult,
}

/// Validator capability consumed by the provider.
///
/// Injected so callers can tighten or relax the policy; defaults to
/// [`validate`].
pub type ResponseValidator = Arc<dyn Fn(&Value) -> Result<(), ValidationError> + Send + Sync>;

/// The stock validator wrapped for injection.
pub fn default_validator() -> ResponseValidator {
    Arc::new(validate)
}

/// Validate the shape of a raw JSON-RPC response.
///
/// Accepts any object carrying a `result` member; rejects objects
/// carrying an `error` member with the node's error message preserved;
/// rejects everything else as malformed.
pub fn validate(response: &Value) -> Result<(), ValidationError> {
    let Some(object) = response.as_object() else {
        return Err(ValidationError::NotAnObject(type_name(response).into()));
    };

    if let Some(error) = object.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| error.to_string());
        return Err(ValidationError::Node { code, message });
    }

    if object.contains_key("result") {
        Ok(())
    } else {
        Err(ValidationError::MissingResult)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_result_response() {
        let resp = json!({"jsonrpc": "2.0", "id": 1, "result": "0x12345"});
        assert_eq!(validate(&resp), Ok(()));
    }

    #[test]
    fn accepts_null_result() {
        let resp = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        assert_eq!(validate(&resp), Ok(()));
    }

    #[test]
    fn node_error_message_preserved_verbatim() {
        let resp = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "execution reverted"}
        });
        let err = validate(&resp).unwrap_err();
        assert_eq!(err.to_string(), "execution reverted");
        assert_eq!(
            err,
            ValidationError::Node {
                code: -32000,
                message: "execution reverted".into()
            }
        );
    }

    #[test]
    fn error_without_message_falls_back_to_raw() {
        let resp = json!({"jsonrpc": "2.0", "id": 1, "error": "boom"});
        let err = validate(&resp).unwrap_err();
        assert_eq!(err.to_string(), "\"boom\"");
    }

    #[test]
    fn rejects_non_object() {
        assert_eq!(
            validate(&json!(true)),
            Err(ValidationError::NotAnObject("boolean".into()))
        );
        assert_eq!(
            validate(&json!(["a"])),
            Err(ValidationError::NotAnObject("array".into()))
        );
    }

    #[test]
    fn rejects_missing_result() {
        let resp = json!({"jsonrpc": "2.0", "id": 1});
        assert_eq!(validate(&resp), Err(ValidationError::MissingResult));
    }
}
