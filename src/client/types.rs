//! Result codes and version sentinels shared across the client boundary

use crate::error::ClientError;

/// Outcome of a single namespace operation, as delivered to callbacks.
///
/// The subtree algorithms only ever branch on [`is_ok`](ResultCode::is_ok);
/// every other distinction is forwarded to the caller unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// Operation succeeded
    Ok,
    /// The addressed node does not exist
    NoNode,
    /// A version-checked operation observed a different data version
    BadVersion,
    /// The connection to the store was lost
    ConnectionLoss,
    /// Any other failure
    Unknown,
}

impl ResultCode {
    /// True for a successful completion.
    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

impl From<&ClientError> for ResultCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::NoNode { .. } => ResultCode::NoNode,
            ClientError::BadVersion { .. } => ResultCode::BadVersion,
            ClientError::ConnectionLoss => ResultCode::ConnectionLoss,
            ClientError::Unknown { .. } => ResultCode::Unknown,
        }
    }
}

/// Expected data version for a versioned operation.
///
/// `Any` is the wildcard sentinel: the operation applies no matter what the
/// node's current data version is. The recursive deleter always passes `Any`;
/// checked versions exist for callers that want compare-and-delete semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Apply regardless of the node's data version
    Any,
    /// Apply only if the node's data version matches
    Exact(i32),
}

impl Version {
    /// Whether this expectation is satisfied by a node's actual version.
    pub fn matches(self, actual: i32) -> bool {
        match self {
            Version::Any => true,
            Version::Exact(expected) => expected == actual,
        }
    }
}

/// Completion callback for an asynchronous delete.
///
/// Invoked exactly once, with the result code and the path that was
/// submitted, on whatever thread the client runs completions on.
pub type DeleteCallback = Box<dyn FnOnce(ResultCode, &str) + Send + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_code_from_error() {
        let err = ClientError::NoNode { path: "/a".into() };
        assert_eq!(ResultCode::from(&err), ResultCode::NoNode);
        assert_eq!(
            ResultCode::from(&ClientError::ConnectionLoss),
            ResultCode::ConnectionLoss
        );
        assert!(!ResultCode::NoNode.is_ok());
        assert!(ResultCode::Ok.is_ok());
    }

    #[test]
    fn test_version_matching() {
        assert!(Version::Any.matches(0));
        assert!(Version::Any.matches(41));
        assert!(Version::Exact(2).matches(2));
        assert!(!Version::Exact(2).matches(3));
    }
}
