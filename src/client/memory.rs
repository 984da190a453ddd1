//! In-process namespace for tests and local experimentation
//!
//! `InMemoryNamespace` keeps the whole tree in one ordered map guarded by a
//! mutex, so every operation observes a point-in-time state exactly like a
//! round-trip to a real store would. Asynchronous deletes are executed by a
//! small pool of dispatcher threads and their callbacks run on those
//! threads, never on the submitting thread -- the same
//! callback-on-foreign-thread behavior a production client exhibits.
//!
//! Two failure hooks make partial-failure paths testable: a connection-lost
//! switch that fails every subsequent operation, and per-path delete
//! poisoning that fails one node's deletion with a chosen error.

use crate::client::{DeleteCallback, NamespaceClient, ResultCode, Version};
use crate::error::{ClientError, ClientResult};
use crate::path::{self, ROOT};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Default number of dispatcher threads executing asynchronous deletes
pub const DEFAULT_DISPATCHERS: usize = 4;

/// A single node: opaque payload plus a monotonically increasing data version
#[derive(Debug, Clone)]
struct NodeRecord {
    data: Vec<u8>,
    version: i32,
}

/// State shared between the client facade and its dispatcher threads
#[derive(Default)]
struct Shared {
    /// path -> record; the ordered map keeps children listings sorted for free
    nodes: Mutex<BTreeMap<String, NodeRecord>>,

    /// Paths whose delete always fails with the given error (test hook)
    poisoned: Mutex<HashMap<String, ClientError>>,

    /// When set, every operation fails with `ConnectionLoss`
    disconnected: AtomicBool,
}

impl Shared {
    fn nodes(&self) -> MutexGuard<'_, BTreeMap<String, NodeRecord>> {
        self.nodes.lock().expect("namespace lock poisoned")
    }

    fn check_connected(&self) -> ClientResult<()> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(ClientError::ConnectionLoss);
        }
        Ok(())
    }
}

/// An asynchronous delete waiting for a dispatcher thread
struct AsyncDelete {
    path: String,
    version: Version,
    callback: DeleteCallback,
}

/// Thread-safe in-process implementation of [`NamespaceClient`]
pub struct InMemoryNamespace {
    shared: Arc<Shared>,
    ops_tx: Option<Sender<AsyncDelete>>,
    dispatchers: Vec<JoinHandle<()>>,
}

impl InMemoryNamespace {
    /// Create a namespace holding only the root node.
    pub fn new() -> Self {
        Self::with_dispatchers(DEFAULT_DISPATCHERS)
    }

    /// Create a namespace with a specific dispatcher pool size.
    pub fn with_dispatchers(count: usize) -> Self {
        let shared = Arc::new(Shared::default());
        shared.nodes().insert(
            ROOT.to_string(),
            NodeRecord {
                data: Vec::new(),
                version: 0,
            },
        );

        let (ops_tx, ops_rx) = unbounded::<AsyncDelete>();
        let mut dispatchers = Vec::with_capacity(count);
        for id in 0..count {
            let shared = Arc::clone(&shared);
            let ops_rx = ops_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("ns-dispatch-{}", id))
                .spawn(move || dispatcher_loop(shared, ops_rx))
                .expect("failed to spawn dispatcher thread");
            dispatchers.push(handle);
        }

        Self {
            shared,
            ops_tx: Some(ops_tx),
            dispatchers,
        }
    }

    /// Create a node under an existing parent.
    ///
    /// The new node starts at data version 0.
    pub fn create(&self, path: &str, data: &[u8]) -> ClientResult<()> {
        self.shared.check_connected()?;
        let mut nodes = self.shared.nodes();
        if nodes.contains_key(path) {
            return Err(ClientError::Unknown {
                message: format!("node {} already exists", path),
            });
        }
        let parent = path::parent(path).unwrap_or(ROOT);
        if !nodes.contains_key(parent) {
            return Err(ClientError::NoNode {
                path: parent.to_string(),
            });
        }
        nodes.insert(
            path.to_string(),
            NodeRecord {
                data: data.to_vec(),
                version: 0,
            },
        );
        Ok(())
    }

    /// Replace a node's payload, bumping its data version.
    pub fn set_data(&self, path: &str, data: &[u8], version: Version) -> ClientResult<()> {
        self.shared.check_connected()?;
        let mut nodes = self.shared.nodes();
        let record = nodes.get_mut(path).ok_or_else(|| ClientError::NoNode {
            path: path.to_string(),
        })?;
        if let Version::Exact(expected) = version {
            if expected != record.version {
                return Err(ClientError::BadVersion {
                    path: path.to_string(),
                    expected,
                    actual: record.version,
                });
            }
        }
        record.data = data.to_vec();
        record.version += 1;
        Ok(())
    }

    /// Number of nodes currently in the namespace, the root included.
    pub fn node_count(&self) -> usize {
        self.shared.nodes().len()
    }

    /// Fail every subsequent operation with `ConnectionLoss`.
    pub fn disconnect(&self) {
        self.shared.disconnected.store(true, Ordering::SeqCst);
    }

    /// Undo [`disconnect`](Self::disconnect).
    pub fn reconnect(&self) {
        self.shared.disconnected.store(false, Ordering::SeqCst);
    }

    /// Make every delete of `path` fail with `error` (test hook).
    pub fn inject_delete_error(&self, path: &str, error: ClientError) {
        self.shared
            .poisoned
            .lock()
            .expect("namespace lock poisoned")
            .insert(path.to_string(), error);
    }
}

impl Default for InMemoryNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceClient for InMemoryNamespace {
    fn list_children(&self, path: &str) -> ClientResult<Vec<String>> {
        self.shared.check_connected()?;
        let nodes = self.shared.nodes();
        if !nodes.contains_key(path) {
            return Err(ClientError::NoNode {
                path: path.to_string(),
            });
        }
        Ok(children_locked(&nodes, path))
    }

    fn exists(&self, path: &str) -> ClientResult<bool> {
        self.shared.check_connected()?;
        Ok(self.shared.nodes().contains_key(path))
    }

    fn delete(&self, path: &str, version: Version) -> ClientResult<()> {
        delete_node(&self.shared, path, version)
    }

    fn delete_async(&self, path: &str, version: Version, callback: DeleteCallback) {
        let op = AsyncDelete {
            path: path.to_string(),
            version,
            callback,
        };
        match &self.ops_tx {
            Some(tx) => {
                if let Err(err) = tx.send(op) {
                    let op = err.into_inner();
                    (op.callback)(ResultCode::ConnectionLoss, &op.path);
                }
            }
            None => (op.callback)(ResultCode::ConnectionLoss, &op.path),
        }
    }
}

impl Drop for InMemoryNamespace {
    fn drop(&mut self) {
        // Closing the channel lets dispatchers drain pending deletes and exit
        self.ops_tx.take();
        let current = thread::current().id();
        for handle in self.dispatchers.drain(..) {
            // A completion callback can drop the last handle to this
            // namespace on a dispatcher thread; never join ourselves
            if handle.thread().id() == current {
                continue;
            }
            let _ = handle.join();
        }
    }
}

/// Dispatcher thread body: execute queued deletes and run their callbacks
fn dispatcher_loop(shared: Arc<Shared>, ops_rx: Receiver<AsyncDelete>) {
    while let Ok(op) = ops_rx.recv() {
        let AsyncDelete {
            path,
            version,
            callback,
        } = op;
        let code = match delete_node(&shared, &path, version) {
            Ok(()) => ResultCode::Ok,
            Err(ref err) => ResultCode::from(err),
        };
        debug!(path = %path, code = ?code, "async delete completed");
        callback(code, &path);
    }
}

fn delete_node(shared: &Shared, path: &str, version: Version) -> ClientResult<()> {
    shared.check_connected()?;
    if let Some(err) = shared
        .poisoned
        .lock()
        .expect("namespace lock poisoned")
        .get(path)
    {
        return Err(err.clone());
    }

    let mut nodes = shared.nodes();
    if path == ROOT {
        return Err(ClientError::Unknown {
            message: "cannot delete the namespace root".to_string(),
        });
    }
    let record = nodes.get(path).ok_or_else(|| ClientError::NoNode {
        path: path.to_string(),
    })?;
    if let Version::Exact(expected) = version {
        if expected != record.version {
            return Err(ClientError::BadVersion {
                path: path.to_string(),
                expected,
                actual: record.version,
            });
        }
    }
    if has_children_locked(&nodes, path) {
        return Err(ClientError::Unknown {
            message: format!("node {} still has children", path),
        });
    }
    nodes.remove(path);
    Ok(())
}

fn child_prefix(path: &str) -> String {
    if path == ROOT {
        ROOT.to_string()
    } else {
        format!("{}/", path)
    }
}

fn children_locked(nodes: &BTreeMap<String, NodeRecord>, path: &str) -> Vec<String> {
    // The root key "/" is its own prefix; the length guard keeps a node
    // from ever being listed as its own child
    let prefix = child_prefix(path);
    nodes
        .range(prefix.clone()..)
        .take_while(|(p, _)| p.starts_with(&prefix))
        .filter(|(p, _)| p.len() > prefix.len() && !p[prefix.len()..].contains('/'))
        .map(|(p, _)| p[prefix.len()..].to_string())
        .collect()
}

fn has_children_locked(nodes: &BTreeMap<String, NodeRecord>, path: &str) -> bool {
    let prefix = child_prefix(path);
    nodes
        .range(prefix.clone()..)
        .take_while(|(p, _)| p.starts_with(&prefix))
        .any(|(p, _)| p.len() > prefix.len())
}
