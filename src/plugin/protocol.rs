//! External command protocol types
//!
//! One JSON request line on stdin, one JSON response line on stdout.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operation name sent for every command invocation
pub const RUN_OPERATION: &str = "run";

/// A message sent to an external command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRequest {
    /// The operation to perform
    pub operation: String,

    /// Operation-specific parameters
    pub params: Value,
}

impl PluginRequest {
    pub fn new(operation: impl Into<String>, params: impl Into<Value>) -> Self {
        Self {
            operation: operation.into(),
            params: params.into(),
        }
    }

    /// Request for running `command` with its positional arguments and options
    pub fn run(command: &str, args: &[String], options: Map<String, Value>) -> Self {
        Self::new(
            RUN_OPERATION,
            serde_json::json!({
                "command": command,
                "args": args,
                "options": options,
            }),
        )
    }
}

/// A response from an external command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Result data (if success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Error message (if failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PluginResponse {
    /// Text to print for a successful response
    pub fn display_data(&self) -> Option<String> {
        match &self.data {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string())),
        }
    }
}
