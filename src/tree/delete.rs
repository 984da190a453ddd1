//! Recursive subtree deletion
//!
//! The store has no delete-subtree primitive, so a subtree comes down
//! bottom-up, one node per round-trip: children first, the node itself
//! last. The blocking form recurses and fails fast. The asynchronous form
//! lists synchronously while it sets up the fan-out, then issues every
//! delete through the client's asynchronous delete; each level joins its
//! children's completions with a countdown tracker whose final decrement
//! submits the parent's own delete.
//!
//! Neither form retries or rolls back: a failure leaves the namespace in
//! whatever partially deleted state it had reached, and that state is the
//! caller's to observe.

use crate::client::{DeleteCallback, NamespaceClient, ResultCode, Version};
use crate::error::Result;
use crate::path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Delete `root` and every descendant, blocking until done.
///
/// Children are deleted in listing order, each child's subtree completely
/// before the child itself. The first failure aborts the whole operation
/// and propagates; everything deleted up to that point stays deleted.
/// Fails with `NoNode` when `root` does not exist.
pub fn delete_recursive<C>(client: &C, root: &str) -> Result<()>
where
    C: NamespaceClient + ?Sized,
{
    path::validate(root)?;
    delete_subtree(client, root)
}

fn delete_subtree<C>(client: &C, node: &str) -> Result<()>
where
    C: NamespaceClient + ?Sized,
{
    for name in client.list_children(node)? {
        delete_subtree(client, &path::join(node, &name))?;
    }
    debug!(path = %node, "deleting node");
    client.delete(node, Version::Any)?;
    Ok(())
}

/// Delete `root` and every descendant without blocking on the deletes.
///
/// Returns `Err` only when `root` violates the path grammar. Every other
/// outcome -- `root` not existing included -- arrives through
/// `on_complete`, which is invoked exactly once with the terminal result
/// code, the root path, and `ctx` unchanged. The code is the root's own
/// delete result when every descendant came down cleanly; otherwise it is
/// the first failure recorded anywhere in the subtree, and the root is
/// left in place (it still has children, so its delete could not succeed).
///
/// Children listings happen on the calling thread while the fan-out is set
/// up; the deletes themselves complete on whatever threads the client runs
/// its callbacks on. There is no cancellation: once submitted, the subtree
/// deletion runs to its terminal callback.
pub fn delete_recursive_async<C, Ctx, F>(
    client: &Arc<C>,
    root: &str,
    on_complete: F,
    ctx: Ctx,
) -> Result<()>
where
    C: NamespaceClient + ?Sized + 'static,
    Ctx: Send + 'static,
    F: FnOnce(ResultCode, &str, Ctx) + Send + 'static,
{
    path::validate(root)?;
    let done: DeleteCallback = Box::new(move |code, node| on_complete(code, node, ctx));
    delete_subtree_async(client, root.to_string(), done);
    Ok(())
}

fn delete_subtree_async<C>(client: &Arc<C>, node: String, done: DeleteCallback)
where
    C: NamespaceClient + ?Sized + 'static,
{
    let children = match client.list_children(&node) {
        Ok(children) => children,
        Err(ref e) => {
            warn!(path = %node, error = %e, "listing failed, abandoning subtree");
            done(ResultCode::from(e), &node);
            return;
        }
    };

    if children.is_empty() {
        client.delete_async(&node, Version::Any, done);
        return;
    }

    debug!(path = %node, children = children.len(), "fanning out child deletes");
    let tracker = Arc::new(CompletionTracker::new(
        Arc::clone(client),
        node.clone(),
        children.len(),
        done,
    ));
    for name in children {
        let child = path::join(&node, &name);
        let tracker = Arc::clone(&tracker);
        delete_subtree_async(
            client,
            child,
            Box::new(move |code, _child| tracker.child_done(code)),
        );
    }
}

/// Fan-in point for one node's child deletions.
///
/// Scoped to a single level of one `delete_recursive_async` call and
/// dropped once the parent's own delete has been submitted. `remaining`
/// starts at the child count, never goes below zero, and exactly one
/// decrement observes it reach zero.
struct CompletionTracker<C: ?Sized> {
    client: Arc<C>,
    node: String,
    remaining: AtomicUsize,

    /// First recorded child failure; it becomes the terminal code
    failure: Mutex<Option<ResultCode>>,

    /// Continuation for the parent; taken exactly once by the last child
    done: Mutex<Option<DeleteCallback>>,
}

impl<C> CompletionTracker<C>
where
    C: NamespaceClient + ?Sized + 'static,
{
    fn new(client: Arc<C>, node: String, children: usize, done: DeleteCallback) -> Self {
        Self {
            client,
            node,
            remaining: AtomicUsize::new(children),
            failure: Mutex::new(None),
            done: Mutex::new(Some(done)),
        }
    }

    /// Record one child subtree's outcome; the final call finishes the parent.
    fn child_done(&self, code: ResultCode) {
        if !code.is_ok() {
            let mut failure = self.failure.lock().expect("tracker lock poisoned");
            if failure.is_none() {
                *failure = Some(code);
            }
        }

        // The decrement that takes the counter to zero wins the right to
        // finish the parent; sibling callbacks racing here observe > 1.
        // Failures are recorded before the decrement, so the winner sees
        // every one of them.
        if self.remaining.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        let done = self
            .done
            .lock()
            .expect("tracker lock poisoned")
            .take()
            .expect("parent continuation already taken");

        let failure = *self.failure.lock().expect("tracker lock poisoned");
        match failure {
            Some(code) => {
                warn!(path = %self.node, code = ?code, "child delete failed, leaving node in place");
                done(code, &self.node);
            }
            None => self.client.delete_async(&self.node, Version::Any, done),
        }
    }
}
