//! Namespace client boundary
//!
//! Everything that touches the network lives behind [`NamespaceClient`]:
//! node identity, children listing, versioned deletion. The subtree
//! algorithms in [`crate::tree`] are written purely against this trait, so
//! they never see connections, sessions, watches, or the wire protocol.
//!
//! [`memory::InMemoryNamespace`] is an in-process implementation used by the
//! test suite and for local experimentation; a production client wraps a
//! real coordination-store session instead.

pub mod memory;
mod types;

pub use memory::InMemoryNamespace;
pub use types::{DeleteCallback, ResultCode, Version};

use crate::error::ClientResult;

/// Operations the subtree algorithms need from the coordination store.
///
/// Implementations are shared across threads. The asynchronous delete may
/// invoke its callback on an arbitrary worker thread owned by the client,
/// never necessarily on the submitting thread.
pub trait NamespaceClient: Send + Sync {
    /// List the names (not paths) of a node's children, ordered by name.
    ///
    /// Fails with `NoNode` when the node does not exist.
    fn list_children(&self, path: &str) -> ClientResult<Vec<String>>;

    /// Whether a node currently exists.
    fn exists(&self, path: &str) -> ClientResult<bool>;

    /// Delete a node, optionally checking its data version.
    ///
    /// Fails with `NoNode` when the node is absent and `BadVersion` on a
    /// checked-version mismatch. Deleting a node that still has children is
    /// a store-side failure surfaced as `Unknown`.
    fn delete(&self, path: &str, version: Version) -> ClientResult<()>;

    /// Submit a delete whose outcome arrives later via `callback`.
    ///
    /// Returns as soon as the delete is queued; `callback` is invoked
    /// exactly once with the result code and the submitted path.
    fn delete_async(&self, path: &str, version: Version, callback: DeleteCallback);
}
