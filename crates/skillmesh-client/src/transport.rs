//! Transport seam between the typed client and the mesh
//!
//! Both paths deliver the same [`RegistryRequest`] and must yield the
//! identical handler payload, so callers can never tell which one served
//! their query.

use async_trait::async_trait;
use serde_json::Value;

use skillmesh_types::RegistryRequest;

use crate::error::TransportError;

/// One way of getting a request to the registry process
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver the request and return the handler's JSON payload
    async fn query(&self, request: &RegistryRequest) -> Result<Value, TransportError>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Unwrap a process reply envelope into the handler payload
///
/// Both the gateway and the messenger wrap handler output the same way:
/// `{"messages": [{"data": "<JSON-encoded payload>"}]}`.
pub(crate) fn unwrap_process_reply(body: &Value) -> Result<Value, TransportError> {
    let data = body
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.first())
        .and_then(|message| message.get("data"))
        .and_then(Value::as_str)
        .ok_or_else(|| TransportError::Parse("reply carried no message data".to_string()))?;

    serde_json::from_str(data)
        .map_err(|e| TransportError::Parse(format!("message data is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_valid_reply() {
        let body = json!({"messages": [{"data": "{\"status\":\"success\"}"}]});
        let payload = unwrap_process_reply(&body).unwrap();
        assert_eq!(payload["status"], "success");
    }

    #[test]
    fn test_unwrap_empty_messages_is_parse_error() {
        let body = json!({"messages": []});
        let err = unwrap_process_reply(&body).unwrap_err();
        assert!(matches!(err, TransportError::Parse(_)));
    }

    #[test]
    fn test_unwrap_non_json_data_is_parse_error() {
        let body = json!({"messages": [{"data": "not json at all"}]});
        let err = unwrap_process_reply(&body).unwrap_err();
        assert!(matches!(err, TransportError::Parse(_)));
    }
}
