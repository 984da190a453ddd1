//! Error types for znode-util
//!
//! Two layers, matching the crate boundary:
//! - `ClientError` is what the namespace client reports for a single
//!   round-trip to the store.
//! - `TreeError` is what the subtree algorithms report to their callers.
//!
//! Asynchronous completions never carry these types directly; they carry a
//! [`ResultCode`](crate::client::ResultCode), which maps one-to-one onto
//! `ClientError`.

use thiserror::Error;

/// Failure of a single namespace operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The addressed node does not exist
    #[error("no node: {path}")]
    NoNode { path: String },

    /// A version-checked operation observed a different data version
    #[error("version mismatch for {path}: expected {expected}, actual {actual}")]
    BadVersion {
        path: String,
        expected: i32,
        actual: i32,
    },

    /// The connection to the store was lost mid-operation
    #[error("connection to the coordination store lost")]
    ConnectionLoss,

    /// Any other store-side failure
    #[error("{message}")]
    Unknown { message: String },
}

impl ClientError {
    /// True when the failure is the node simply not being there.
    ///
    /// On a namespace mutated by other clients this is usually a race, not a
    /// bug; the subtree visitor tolerates it everywhere below the requested
    /// root.
    pub fn is_no_node(&self) -> bool {
        matches!(self, ClientError::NoNode { .. })
    }
}

/// Failure of a subtree operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The namespace client failed a round-trip
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// Caller-supplied path violates the namespace path grammar
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl TreeError {
    /// True when the underlying failure is a missing node.
    pub fn is_no_node(&self) -> bool {
        matches!(self, TreeError::Client(e) if e.is_no_node())
    }
}

/// Result type alias for subtree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Result type alias for namespace client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;
