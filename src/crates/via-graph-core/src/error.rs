//! Error types and error handling for graph operations
//!
//! This module defines the errors that can occur during agent execution,
//! state management, and persistence. All errors implement `std::error::Error`
//! via the `thiserror` crate.
//!
//! # Error Hierarchy
//!
//! ```text
//! GraphError
//! ├── Validation         - Structural/config errors
//! ├── NodeExecution       - Node/agent execution failures
//! ├── Execution           - General execution errors
//! ├── StateError          - State management errors
//! ├── Checkpoint          - Persistence errors
//! ├── Serialization       - JSON errors
//! ├── Io                  - Filesystem/network errors
//! ├── Configuration       - Configuration errors
//! ├── Timeout             - Operation timeouts
//! └── Custom              - Application-defined errors
//! ```
//!
//! # Examples
//!
//! ```rust
//! use via_graph_core::error::{GraphError, Result};
//!
//! fn validate_input(data: &str) -> Result<()> {
//!     if data.is_empty() {
//!         return Err(GraphError::Validation("input cannot be empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Convenience result type using [`GraphError`]
pub type Result<T> = std::result::Result<T, GraphError>;

/// Comprehensive error type for agent and graph operations.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Structural or configuration validation failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A node (agent or tool) failed during execution.
    #[error("node '{node}' execution failed: {error}")]
    NodeExecution {
        /// Name of the node that failed
        node: String,
        /// Error message from node execution
        error: String,
    },

    /// Generic execution error without specific node context.
    #[error("execution failed: {0}")]
    Execution(String),

    /// State management error with optional node context.
    #[error("state error{}: {error}", node.as_ref().map(|n| format!(" in node '{}'", n)).unwrap_or_default())]
    StateError {
        /// Optional node context where error occurred
        node: Option<String>,
        /// Error description
        error: String,
    },

    /// Generic state error without node context.
    #[error("state error: {0}")]
    State(String),

    /// Checkpoint persistence error.
    ///
    /// Wraps errors from `via_checkpoint::CheckpointError`.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] via_checkpoint::CheckpointError),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Operation exceeded its time limit.
    #[error("operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Custom application-defined error.
    #[error("{0}")]
    Custom(String),
}

impl GraphError {
    /// Create a node execution error with context.
    pub fn node_execution(node: impl Into<String>, error: impl Into<String>) -> Self {
        Self::NodeExecution {
            node: node.into(),
            error: error.into(),
        }
    }

    /// Create a state error with optional node context.
    pub fn state_error(node: Option<impl Into<String>>, error: impl Into<String>) -> Self {
        Self::StateError {
            node: node.map(|n| n.into()),
            error: error.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_execution_display() {
        let err = GraphError::node_execution("llm_call", "API timeout");
        assert_eq!(format!("{}", err), "node 'llm_call' execution failed: API timeout");
    }

    #[test]
    fn test_state_error_with_node() {
        let err = GraphError::state_error(Some("process"), "missing field");
        assert_eq!(format!("{}", err), "state error in node 'process': missing field");
    }

    #[test]
    fn test_state_error_without_node() {
        let err = GraphError::state_error(None::<String>, "missing field");
        assert_eq!(format!("{}", err), "state error: missing field");
    }

    #[test]
    fn test_timeout_display() {
        let err = GraphError::timeout("embedding call", 5000);
        assert_eq!(format!("{}", err), "operation timed out after 5000ms: embedding call");
    }

    #[test]
    fn test_serialization_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json}").unwrap_err();
        let err: GraphError = json_err.into();
        assert!(matches!(err, GraphError::Serialization(_)));
    }
}
