//! Unknown-field detection for strict mode.
//!
//! A leaf path of the tree is *known* when either
//!
//! - a chain is declared for the path or one of its ancestors (the chain
//!   owns the whole value below it), or
//! - the path is an ancestor of, or equal to, some declared path.
//!
//! Declared paths are the full paths of every entry, with nested blocks
//! contributing `parent.inner` and array blocks `parent.*.inner`. Keys may
//! be patterns; `*` matches any one segment.

use serde_json::Value;

use crate::foundation::{ErrorReport, path};
use crate::schema::{FieldRules, RuleMap};

/// Message recorded for every unknown field.
pub const UNKNOWN_FIELD: &str = "This field is unknown.";

struct Declared {
    segments: Vec<String>,
    owns_subtree: bool,
}

/// Reports every leaf of `tree` the rule map does not cover.
pub fn unknown_fields(rules: &RuleMap, tree: &Value) -> ErrorReport {
    let mut declared = Vec::new();
    collect_declared(rules, "", &mut declared);

    let mut report = ErrorReport::new();
    for leaf in path::flatten(tree) {
        if !is_known(&leaf, &declared) {
            tracing::trace!(field = %leaf, "unknown field");
            report.add(leaf, UNKNOWN_FIELD);
        }
    }
    report
}

fn collect_declared(rules: &RuleMap, prefix: &str, out: &mut Vec<Declared>) {
    for (key, entry) in rules.iter() {
        let full = path::join(prefix, key);
        let segments = path::segments(&full).map(str::to_owned).collect();
        match entry {
            FieldRules::Chain(_) => out.push(Declared {
                segments,
                owns_subtree: true,
            }),
            FieldRules::Nested { rules, .. } => {
                out.push(Declared {
                    segments,
                    owns_subtree: false,
                });
                collect_declared(rules, &full, out);
            }
            FieldRules::Array(rules) => {
                out.push(Declared {
                    segments,
                    owns_subtree: false,
                });
                collect_declared(rules, &path::join(&full, path::WILDCARD), out);
            }
        }
    }
}

fn is_known(leaf: &str, declared: &[Declared]) -> bool {
    let leaf: Vec<&str> = path::segments(leaf).collect();
    declared.iter().any(|entry| {
        let pattern: Vec<&str> = entry.segments.iter().map(String::as_str).collect();
        let covers_leaf = entry.owns_subtree && pattern.len() <= leaf.len();
        let leads_to_declared = leaf.len() <= pattern.len();
        (covers_leaf || leads_to_declared) && path::segments_match(&pattern, &leaf)
    })
}
