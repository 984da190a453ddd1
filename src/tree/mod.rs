//! Subtree algorithms over the namespace client
//!
//! [`visit`] enumerates a subtree depth-first, each node before its
//! descendants; [`delete`] removes one bottom-up, children before parent.
//! Both come in a blocking form and a callback-driven form. Neither
//! snapshots, retries, or rolls back: a namespace mutated concurrently by
//! other clients shows through, and a failed delete leaves whatever had
//! already been deleted.

pub mod delete;
pub mod visit;

pub use delete::{delete_recursive, delete_recursive_async};
pub use visit::{list_subtree, visit_subtree_dfs, visit_subtree_dfs_async};
