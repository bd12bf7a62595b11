//! Field paths over a parameter tree.
//!
//! A path is a dot-separated list of segments. Each segment is a map key,
//! a non-negative index into a sequence, or the wildcard `*`. Resolving a
//! path never fails: a path that does not fit the tree's shape is simply
//! absent.
//!
//! ```
//! use serde_json::json;
//! use sieve_validator::foundation::path;
//!
//! let tree = json!({ "documents": [{ "name": "a" }, { "name": "b" }] });
//! assert_eq!(path::resolve(&tree, "documents.1.name"), Some(&json!("b")));
//! assert_eq!(path::resolve(&tree, "documents.7.name"), None);
//! assert_eq!(path::resolve(&tree, "documents.name"), None);
//! ```

use serde_json::Value;

use crate::foundation::CompileError;

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Wildcard segment matching every index of a sequence.
pub const WILDCARD: &str = "*";

/// Iterates the segments of a path. The empty path has no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(move |_| !path.is_empty())
}

/// Resolves `path` against `tree`.
///
/// Maps are indexed by key, sequences by position. Anything else along the
/// way (a scalar, a non-numeric segment on a sequence, an out-of-range
/// index) yields `None`. The empty path resolves to the tree itself.
pub fn resolve<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(tree, step)
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Parses a sequence index. Only plain ASCII digits are accepted.
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Joins two path fragments, skipping empty ones.
pub fn join(prefix: &str, rest: &str) -> String {
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_owned(),
        (_, true) => prefix.to_owned(),
        _ => format!("{prefix}{SEPARATOR}{rest}"),
    }
}

/// Returns `true` if any segment is the wildcard.
pub fn is_pattern(path: &str) -> bool {
    segments(path).any(|segment| segment == WILDCARD)
}

/// Checks that a declared path is non-empty and has no empty segments.
pub fn validate(path: &str) -> Result<(), CompileError> {
    if path.is_empty() || path.split(SEPARATOR).any(str::is_empty) {
        return Err(CompileError::InvalidPath {
            path: path.to_owned(),
        });
    }
    Ok(())
}

/// Splits a pattern at its first wildcard segment.
///
/// Returns the head before the wildcard and the tail after it, both without
/// the separating dots. `None` if the path is concrete.
///
/// ```
/// use sieve_validator::foundation::path::split_wildcard;
///
/// assert_eq!(split_wildcard("a.*.b.*.c"), Some(("a", "b.*.c")));
/// assert_eq!(split_wildcard("tags.*"), Some(("tags", "")));
/// assert_eq!(split_wildcard("*.name"), Some(("", "name")));
/// assert_eq!(split_wildcard("a.b"), None);
/// ```
pub fn split_wildcard(path: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for segment in path.split(SEPARATOR) {
        if segment == WILDCARD {
            let head = path[..offset]
                .strip_suffix(SEPARATOR)
                .unwrap_or(&path[..offset]);
            let rest = &path[offset + WILDCARD.len()..];
            let tail = rest.strip_prefix(SEPARATOR).unwrap_or(rest);
            return Some((head, tail));
        }
        offset += segment.len() + SEPARATOR.len_utf8();
    }
    None
}

/// Segment-wise match of a pattern against a concrete path.
///
/// `*` matches exactly one segment. Both paths must have the same depth.
pub fn matches(pattern: &str, concrete: &str) -> bool {
    let pattern: Vec<&str> = segments(pattern).collect();
    let concrete: Vec<&str> = segments(concrete).collect();
    pattern.len() == concrete.len() && segments_match(&pattern, &concrete)
}

/// Compares segment lists position by position up to the shorter length.
pub(crate) fn segments_match(pattern: &[&str], concrete: &[&str]) -> bool {
    pattern
        .iter()
        .zip(concrete)
        .all(|(p, c)| *p == WILDCARD || p == c)
}

/// Lists every leaf path of the tree in document order.
///
/// Leaves are scalars, empty maps and empty sequences. Sequence positions
/// appear as index segments. A scalar root has no fields.
///
/// ```
/// use serde_json::json;
/// use sieve_validator::foundation::path::flatten;
///
/// let tree = json!({ "a": { "b": 1 }, "tags": ["x", "y"], "empty": [] });
/// assert_eq!(flatten(&tree), ["a.b", "tags.0", "tags.1", "empty"]);
/// ```
pub fn flatten(tree: &Value) -> Vec<String> {
    let mut leaves = Vec::new();
    match tree {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, key, &mut leaves);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &index.to_string(), &mut leaves);
            }
        }
        _ => {}
    }
    leaves
}

fn walk(node: &Value, prefix: &str, leaves: &mut Vec<String>) {
    match node {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                walk(child, &join(prefix, key), leaves);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &join(prefix, &index.to_string()), leaves);
            }
        }
        _ => leaves.push(prefix.to_owned()),
    }
}
