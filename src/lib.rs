//! znode-util - Subtree utilities for a hierarchical coordination store
//!
//! Client-side algorithms for a versioned, slash-delimited namespace served
//! by a remote coordination store: recursive subtree deletion (blocking and
//! callback-driven), depth-first subtree enumeration (blocking and
//! callback-driven), and command-line tokenization for the interactive
//! shell layered on top.
//!
//! The store itself is reached through the [`client::NamespaceClient`]
//! trait; connection management, sessions, watches, and the wire protocol
//! live behind that boundary and are not part of this crate.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Coordination Store                       │
//! │            (remote, versioned, hierarchical nodes)           │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │ NamespaceClient
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  tree::delete             tree::visit             cmd        │
//! │  - post-order delete      - pre-order DFS         - shell    │
//! │  - async fan-out joined   - per-node callback       line     │
//! │    by a countdown                                   tokens   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use znode_util::client::memory::InMemoryNamespace;
//! use znode_util::{delete_recursive, list_subtree, NamespaceClient};
//!
//! let ns = InMemoryNamespace::new();
//! ns.create("/app", b"").unwrap();
//! ns.create("/app/locks", b"").unwrap();
//!
//! assert_eq!(list_subtree(&ns, "/app").unwrap(), vec!["/app", "/app/locks"]);
//!
//! delete_recursive(&ns, "/app").unwrap();
//! assert!(!ns.exists("/app").unwrap());
//! ```

pub mod client;
pub mod cmd;
pub mod error;
pub mod path;
pub mod tree;

pub use client::{DeleteCallback, NamespaceClient, ResultCode, Version};
pub use cmd::CommandLine;
pub use error::{ClientError, ClientResult, Result, TreeError};
pub use tree::{
    delete_recursive, delete_recursive_async, list_subtree, visit_subtree_dfs,
    visit_subtree_dfs_async,
};
