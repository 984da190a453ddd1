//! Path grammar for the namespace
//!
//! Paths are opaque slash-delimited strings; the root is the single
//! character "/". Parent/child relationships are purely positional (prefix
//! plus one segment). Validation mirrors what the store enforces at its own
//! boundary, so a malformed path fails locally before any round-trip.

use crate::error::{Result, TreeError};

/// The namespace root
pub const ROOT: &str = "/";

fn invalid(path: &str, reason: &str) -> TreeError {
    TreeError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate a caller-supplied path.
///
/// Accepts absolute slash-delimited paths with non-empty segments and no
/// relative components. The bare root "/" is valid.
pub fn validate(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(path, "path is empty"));
    }
    if !path.starts_with('/') {
        return Err(invalid(path, "path must start with '/'"));
    }
    if path == ROOT {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err(invalid(path, "path must not end with '/'"));
    }
    for segment in path[1..].split('/') {
        match segment {
            "" => return Err(invalid(path, "empty path segment")),
            "." | ".." => return Err(invalid(path, "relative path segment")),
            _ => {}
        }
    }
    Ok(())
}

/// Join a child name onto a parent path.
///
/// The root is the only parent that already ends in a slash.
pub fn join(parent: &str, child: &str) -> String {
    if parent == ROOT {
        format!("/{}", child)
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Parent of a path, or `None` for the root itself.
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}
