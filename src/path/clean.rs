//! Request path normalization.
//!
//! # Responsibilities
//! - Guarantee exactly one leading `/`
//! - Collapse duplicate slashes, `.` and `..` segments
//! - Keep a trailing `/` that the caller supplied

use super::ROOT_PATH;

/// Prefix `path` with `/` unless it already starts with one. Empty input
/// becomes the root path.
pub fn ensure_root_slash(path: &str) -> String {
    if path.is_empty() {
        return ROOT_PATH.to_string();
    }
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Normalize a path for routing.
///
/// `..` never climbs above the root. A trailing slash in the input survives
/// unless the result is the root itself.
pub fn normalize(path: &str) -> String {
    let rooted = ensure_root_slash(path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in rooted.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(rooted.len());
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        return ROOT_PATH.to_string();
    }
    if rooted.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}
