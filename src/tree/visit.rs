//! Pre-order subtree traversal
//!
//! The namespace is never snapshotted: children are listed level by level
//! while other clients may be mutating the tree. Nodes created after their
//! parent was listed are missed, and nodes deleted after listing may still
//! be reported; both are inherent to traversing a live namespace.

use crate::client::{NamespaceClient, ResultCode};
use crate::error::{ClientError, Result, TreeError};
use crate::path;
use tracing::{debug, trace};

/// Visit `root` and every descendant, each node before its children.
///
/// Children are visited in the order the namespace lists them, each child's
/// subtree completely before the next sibling. Fails with `NoNode` when
/// `root` itself is absent. A descendant that vanishes between its parent's
/// listing and its own visit is still reported (it was part of the listing)
/// but contributes no further entries.
pub fn visit_subtree_dfs<C, F>(client: &C, root: &str, mut visit: F) -> Result<()>
where
    C: NamespaceClient + ?Sized,
    F: FnMut(&str),
{
    path::validate(root)?;
    if !client.exists(root)? {
        return Err(TreeError::Client(ClientError::NoNode {
            path: root.to_string(),
        }));
    }
    visit(root);
    visit_children(client, root, &mut visit)
}

fn visit_children<C, F>(client: &C, parent: &str, visit: &mut F) -> Result<()>
where
    C: NamespaceClient + ?Sized,
    F: FnMut(&str),
{
    let children = match client.list_children(parent) {
        Ok(children) => children,
        // Deleted out from under us after being listed; its subtree simply
        // contributes nothing further
        Err(ref e) if e.is_no_node() => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    trace!(parent = %parent, children = children.len(), "descending");
    for name in &children {
        let child = path::join(parent, name);
        visit(&child);
        visit_children(client, &child, visit)?;
    }
    Ok(())
}

/// Visit `root` and every descendant, invoking `callback` with a result
/// code, the node's path, and the caller's context.
///
/// Traversal order is identical to [`visit_subtree_dfs`] and happens
/// entirely on the calling thread; only the callback's own side effects
/// need whatever synchronization the caller's context demands.
pub fn visit_subtree_dfs_async<C, Ctx, F>(
    client: &C,
    root: &str,
    mut callback: F,
    ctx: &Ctx,
) -> Result<()>
where
    C: NamespaceClient + ?Sized,
    F: FnMut(ResultCode, &str, &Ctx),
{
    visit_subtree_dfs(client, root, |node| callback(ResultCode::Ok, node, ctx))
}

/// Collect the subtree under `root` in pre-order.
pub fn list_subtree<C>(client: &C, root: &str) -> Result<Vec<String>>
where
    C: NamespaceClient + ?Sized,
{
    let mut paths = Vec::new();
    visit_subtree_dfs(client, root, |node| paths.push(node.to_string()))?;
    debug!(root = %root, nodes = paths.len(), "subtree listed");
    Ok(paths)
}
