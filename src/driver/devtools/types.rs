//! CDP (Chrome DevTools Protocol) type definitions
//!
//! Only the messages the DevTools driver exchanges are modelled.

use serde::{Deserialize, Serialize};

/// CDP JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest {
    /// Request ID
    pub id: u64,
    /// Method name (e.g., "Page.navigate")
    pub method: String,
    /// Method parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// CDP JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct CdpRpcResponse {
    /// Response ID (matches request ID)
    pub id: u64,
    /// Response result
    #[serde(default)]
    pub result: serde_json::Value,
    /// Error if any
    #[serde(default)]
    pub error: Option<CdpErrorDetail>,
}

/// CDP error detail
#[derive(Debug, Clone, Deserialize)]
pub struct CdpErrorDetail {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Page navigation parameters
#[derive(Debug, Clone, Serialize)]
pub struct NavigateParams {
    /// URL to navigate to
    pub url: String,
}

/// Page reload parameters
#[derive(Debug, Clone, Serialize)]
pub struct ReloadParams {
    /// Reload bypassing the cache
    #[serde(rename = "ignoreCache")]
    pub ignore_cache: bool,
}

/// JavaScript evaluation parameters
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateParams {
    /// JavaScript expression to evaluate
    pub expression: String,
    /// Whether to return as value
    #[serde(rename = "returnByValue")]
    pub return_by_value: bool,
}

/// Remote object returned by `Runtime.evaluate`
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteObject {
    /// Object type
    #[serde(rename = "type")]
    pub r#type: String,
    /// Primitive value or JSON value
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
}

/// `Runtime.evaluate` result
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResult {
    /// Evaluated object
    pub result: RemoteObject,
    /// Exception details if the script threw
    #[serde(rename = "exceptionDetails", default)]
    pub exception_details: Option<serde_json::Value>,
}

/// Target entry returned by the `/json/new` HTTP endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TargetDescriptor {
    /// Target ID
    pub id: String,
    /// Target type
    #[serde(rename = "type", default)]
    pub target_type: String,
    /// Target URL
    #[serde(default)]
    pub url: String,
    /// WebSocket debugger URL
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}
