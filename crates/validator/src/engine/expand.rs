//! Wildcard expansion.
//!
//! Rewrites every pattern key of a rule map into concrete per-index keys
//! against one tree. A key is split at its first `*`; the head must resolve
//! to a sequence, and each element index replaces the wildcard. The tail is
//! expanded again while it still holds a wildcard, so `a.*.b.*.c` works.
//! A head that is absent, empty or not a sequence yields no keys.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::path;
use crate::schema::{FieldRules, RuleMap};

/// Expands `rules` against `tree`.
///
/// Returns the map unchanged (borrowed) when no key is a pattern. Nested
/// and array blocks are not entered; their own keys are expanded against
/// their subtree when the collector reaches them.
///
/// ```
/// use serde_json::json;
/// use sieve_validator::{RuleMap, RuleRegistry};
/// use sieve_validator::engine::expand;
///
/// let rules = RuleMap::compile([("documents.*.tags.0", "string")], RuleRegistry::builtin()).unwrap();
/// let tree = json!({ "documents": [{ "tags": [1, 2] }, { "tags": ["a"] }] });
///
/// let expanded = expand(&rules, &tree);
/// assert_eq!(
///     expanded.keys().collect::<Vec<_>>(),
///     ["documents.0.tags.0", "documents.1.tags.0"]
/// );
/// ```
pub fn expand<'a>(rules: &'a RuleMap, tree: &Value) -> Cow<'a, RuleMap> {
    if !rules.keys().any(path::is_pattern) {
        return Cow::Borrowed(rules);
    }

    let mut expanded = RuleMap::new();
    for (key, entry) in rules.iter() {
        expand_key(key, entry, tree, &mut expanded);
    }
    Cow::Owned(expanded)
}

fn expand_key(key: &str, entry: &FieldRules, tree: &Value, out: &mut RuleMap) {
    let Some((head, tail)) = path::split_wildcard(key) else {
        out.merge_entry(key.to_owned(), entry.clone());
        return;
    };

    let elements = match path::resolve(tree, head) {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    };
    tracing::trace!(pattern = key, head, elements, "expanding wildcard");

    for index in 0..elements {
        let concrete = path::join(&path::join(head, &index.to_string()), tail);
        expand_key(&concrete, entry, tree, out);
    }
}
