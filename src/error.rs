use serde_json::{json, Value};
use thiserror::Error;

/// JSON-RPC error codes used by the MCP endpoint
pub const INVALID_PARAMS: i64 = -32602;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const STORAGE_FAILURE: i64 = -32002;

/// Errors raised by the individual utility tools.
///
/// Every variant is a user-facing validation error except `Storage`, which
/// wraps a persistence failure of the search store.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Missing '{0}' argument")]
    MissingArgument(String),

    #[error("Invalid '{name}' argument: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("Invalid character '{digit}' for base {base} (allowed: {alphabet})")]
    InvalidDigit {
        digit: char,
        base: u32,
        alphabet: String,
    },

    #[error("Value {value} is out of range ({min}-{max})")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("Malformed input: {0}")]
    Malformed(String),

    #[error("Tool not found: {0}")]
    UnknownTool(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ToolError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ToolError::UnknownTool(_) => METHOD_NOT_FOUND,
            ToolError::Storage(_) => STORAGE_FAILURE,
            _ => INVALID_PARAMS,
        }
    }

    /// Render as a JSON-RPC error object
    pub fn to_rpc(&self) -> Value {
        json!({
            "code": self.code(),
            "message": self.to_string()
        })
    }
}

/// Errors from the search history persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_invalid_params() {
        let err = ToolError::InvalidDigit {
            digit: 'g',
            base: 16,
            alphabet: "0-9, a-f".to_string(),
        };
        let rpc = err.to_rpc();
        assert_eq!(rpc["code"], INVALID_PARAMS);
        assert_eq!(
            rpc["message"],
            "Invalid character 'g' for base 16 (allowed: 0-9, a-f)"
        );
    }

    #[test]
    fn storage_and_unknown_tool_codes() {
        let storage = ToolError::from(StoreError::Backend("disk full".into()));
        assert_eq!(storage.code(), STORAGE_FAILURE);
        assert_eq!(ToolError::UnknownTool("nope".into()).code(), METHOD_NOT_FOUND);
    }
}
