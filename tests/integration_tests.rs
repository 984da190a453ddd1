//! Integration tests for znode-util
//!
//! Everything here drives the public API against `InMemoryNamespace`, whose
//! asynchronous deletes complete on dispatcher threads exactly as a real
//! client's would. Asynchronous completions are awaited on channels, never
//! slept on.

use crossbeam_channel::{bounded, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use znode_util::client::memory::InMemoryNamespace;
use znode_util::{
    delete_recursive, delete_recursive_async, list_subtree, visit_subtree_dfs_async, ClientError,
    NamespaceClient, ResultCode, Version,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_tree(ns: &InMemoryNamespace, paths: &[&str]) {
    for path in paths {
        ns.create(path, b"some").unwrap();
    }
}

#[test]
fn test_delete_recursive() {
    init_logging();
    let ns = InMemoryNamespace::new();
    ns.set_data("/", b"some", Version::Any).unwrap();
    build_tree(&ns, &["/a", "/a/b", "/a/b/v", "/a/b/v/1", "/a/c", "/a/c/v"]);

    let children = ns.list_children("/a").unwrap();
    assert_eq!(children.len(), 2);
    assert!(children.contains(&"b".to_string()));
    assert!(children.contains(&"c".to_string()));

    delete_recursive(&ns, "/a").unwrap();
    assert!(!ns.exists("/a").unwrap());
    assert!(!ns.exists("/a/b/v/1").unwrap());
    assert!(!ns.exists("/a/c/v").unwrap());
    assert!(ns.exists("/").unwrap());
}

#[test]
fn test_delete_recursive_async() {
    init_logging();
    let ns = Arc::new(InMemoryNamespace::new());
    ns.set_data("/", b"some", Version::Any).unwrap();
    build_tree(&ns, &["/a", "/a/b", "/a/b/v", "/a/b/v/1", "/a/c", "/a/c/v"]);
    for i in 0..50 {
        ns.create(&format!("/a/c/{}", i), b"some").unwrap();
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_cb = Arc::clone(&calls);
    let (done_tx, done_rx) = bounded(64);
    delete_recursive_async(
        &ns,
        "/a",
        move |code, root, tx: Sender<ResultCode>| {
            calls_in_cb.fetch_add(1, Ordering::SeqCst);
            assert_eq!(root, "/a");
            tx.send(code).unwrap();
        },
        done_tx,
    )
    .unwrap();

    let code = done_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(code, ResultCode::Ok);
    assert!(!ns.exists("/a").unwrap());
    assert!(!ns.exists("/a/c/17").unwrap());

    // The terminal callback observed exactly once, no matter how the 50+
    // child deletions interleaved across dispatcher threads
    assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_delete_recursive_async_aggregates_child_failure() {
    init_logging();
    let ns = Arc::new(InMemoryNamespace::new());
    build_tree(&ns, &["/a", "/a/b", "/a/b/v", "/a/b/v/1", "/a/c", "/a/c/v"]);
    ns.inject_delete_error("/a/b/v/1", ClientError::ConnectionLoss);

    let (done_tx, done_rx) = bounded(16);
    delete_recursive_async(
        &ns,
        "/a",
        move |code, root, tx: Sender<(ResultCode, String)>| {
            tx.send((code, root.to_string())).unwrap();
        },
        done_tx,
    )
    .unwrap();

    let (code, root) = done_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(code, ResultCode::ConnectionLoss);
    assert_eq!(root, "/a");

    // The failed branch still stands; the healthy sibling subtree is gone
    assert!(ns.exists("/a").unwrap());
    assert!(ns.exists("/a/b/v/1").unwrap());
    assert!(!ns.exists("/a/c").unwrap());
    assert!(done_rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_delete_nonexistent_root() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/a"]);
    assert!(!ns.exists("/missing").unwrap());
    let before = ns.node_count();

    let err = delete_recursive(&ns, "/missing").unwrap_err();
    assert!(err.is_no_node());
    assert_eq!(ns.node_count(), before);
}

#[test]
fn test_lsr_subtree() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/a", "/a/b", "/a/c", "/a/f", "/a/b/d", "/a/c/e"]);

    let actual = list_subtree(&ns, "/a").unwrap();
    assert_eq!(actual, ["/a", "/a/b", "/a/b/d", "/a/c", "/a/c/e", "/a/f"]);
}

#[test]
fn test_lsr_root() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/b", "/b/c"]);

    let actual = list_subtree(&ns, "/").unwrap();
    assert_eq!(actual, ["/", "/b", "/b/c"]);
}

#[test]
fn test_lsr_leaf() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/b", "/b/c"]);
    assert_eq!(list_subtree(&ns, "/b/c").unwrap(), ["/b/c"]);
}

#[test]
fn test_lsr_nonexistent_node() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/b", "/b/c"]);

    let err = list_subtree(&ns, "/b/c/d").unwrap_err();
    assert!(err.is_no_node());
    assert!(err.to_string().contains("/b/c/d"));
}

#[test]
fn test_async_visitor_counts_every_node() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/a", "/a/b", "/a/c", "/a/b/d"]);

    let visited = AtomicUsize::new(0);
    visit_subtree_dfs_async(
        &ns,
        "/a",
        |code, _node, counter: &AtomicUsize| {
            assert!(code.is_ok());
            counter.fetch_add(1, Ordering::SeqCst);
        },
        &visited,
    )
    .unwrap();

    assert_eq!(visited.load(Ordering::SeqCst), 4);
}

#[test]
fn test_visitor_then_delete_round() {
    init_logging();
    let ns = InMemoryNamespace::new();
    build_tree(&ns, &["/app", "/app/locks", "/app/locks/0", "/app/cfg"]);

    let before = list_subtree(&ns, "/app").unwrap();
    assert_eq!(before.len(), 4);

    delete_recursive(&ns, "/app").unwrap();
    for path in &before {
        assert!(!ns.exists(path).unwrap(), "{} survived deletion", path);
    }
    assert_eq!(ns.node_count(), 1);
}
