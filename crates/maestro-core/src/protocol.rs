//! Wire types for the agent protocol
//!
//! Two surfaces, both JSON:
//! - the agent card served at `GET /.well-known/agent.json`
//! - the JSON-RPC 2.0 capability-invocation envelope at `POST /rpc`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known path at which every agent publishes its card.
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// RPC endpoint path for capability invocation.
pub const RPC_PATH: &str = "/rpc";

/// Protocol version advertised in agent cards.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Agent card
// ============================================================================

/// A single capability advertised on an agent card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDecl {
    /// Capability name, unique within one agent's list
    pub name: String,
    /// One-line human-readable description
    #[serde(default)]
    pub description: String,
}

impl CapabilityDecl {
    /// Create a new capability declaration.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The parsed fields of an agent card.
///
/// Any fields beyond these are preserved opaquely by the registry in the raw
/// document; this struct only models what the orchestrator reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    /// Display name
    #[serde(default = "default_agent_name")]
    pub name: String,
    /// Agent description
    #[serde(default)]
    pub description: String,
    /// Self-reported base URL
    #[serde(default)]
    pub url: String,
    /// Advertised capabilities (wire name: "skills")
    #[serde(rename = "skills", default)]
    pub capabilities: Vec<CapabilityDecl>,
}

fn default_agent_name() -> String {
    "Unknown Agent".to_string()
}

// ============================================================================
// JSON-RPC 2.0 envelope
// ============================================================================

/// JSON-RPC request version tag.
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC error code: malformed request.
pub const RPC_INVALID_REQUEST: i64 = -32600;
/// Standard JSON-RPC error code: unknown method (capability).
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;
/// Standard JSON-RPC error code: handler failure.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Version tag, must be "2.0"
    pub jsonrpc: String,
    /// Capability name to invoke
    #[serde(default)]
    pub method: Option<String>,
    /// Named arguments for the capability
    #[serde(default)]
    pub params: Value,
    /// Request correlation id
    #[serde(default)]
    pub id: Value,
}

impl RpcRequest {
    /// Build an invocation request for a capability with named arguments.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: Some(method.into()),
            params,
            id: Value::from(1),
        }
    }
}

/// A JSON-RPC 2.0 response: either `result` or `error` is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Version tag
    pub jsonrpc: String,
    /// Successful result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload; a populated error is a remote failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Request correlation id
    #[serde(default)]
    pub id: Value,
}

impl RpcResponse {
    /// Build a success response.
    pub fn success(result: Value, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Build an error response.
    pub fn failure(code: i64, message: impl Into<String>, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}

/// A JSON-RPC error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
}
