//! JSON-RPC envelope types
//!
//! Used by node backends and diagnostics. The call bridge itself never parses
//! payloads; it forwards text untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(Value),
    Error(JsonRpcError),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Value::from(id),
            method: method.to_string(),
            params,
        }
    }
}

impl JsonRpcResponse {
    /// Successful response mirroring the request's version tag and id.
    pub fn result(request: &JsonRpcRequest, result: Value) -> Self {
        Self {
            jsonrpc: request.jsonrpc.clone(),
            id: request.id.clone(),
            outcome: RpcOutcome::Result(result),
        }
    }

    pub fn error(jsonrpc: Option<String>, id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc,
            id,
            outcome: RpcOutcome::Error(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, RpcOutcome::Error(_))
    }

    /// Serialize to the wire text. Infallible for these types.
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| serialization_failed())
    }
}

/// Serialize a batch of responses to one JSON array.
pub fn batch_to_text(responses: &[JsonRpcResponse]) -> String {
    serde_json::to_string(responses).unwrap_or_else(|_| serialization_failed())
}

fn serialization_failed() -> String {
    format!(
        r#"{{"id":null,"error":{{"code":{},"message":"response serialization failed"}}}}"#,
        INTERNAL_ERROR
    )
}
