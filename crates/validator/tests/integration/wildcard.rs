//! Wildcard patterns in rule maps.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use sieve_validator::engine::expand;
use sieve_validator::prelude::*;

fn failing_fields(rules: &RuleMap, tree: &Value) -> Vec<String> {
    match rules.validate(tree) {
        Ok(()) => Vec::new(),
        Err(error) => error
            .report()
            .map(|report| report.fields().map(str::to_owned).collect())
            .unwrap_or_default(),
    }
}

#[test]
fn indexed_tail_flags_only_the_bad_element() {
    let rules = RuleMap::compile([("documents.*.tags.0", "string")], RuleRegistry::builtin())
        .unwrap();
    let tree = json!({ "documents": [{ "tags": [1, 2] }, { "tags": ["a"] }] });
    assert_eq!(failing_fields(&rules, &tree), ["documents.0.tags.0"]);
}

#[rstest]
#[case(json!({ "xs": [] }))]
#[case(json!({}))]
#[case(json!({ "xs": null }))]
#[case(json!({ "xs": "scalar" }))]
fn empty_or_missing_sequences_expand_to_nothing(#[case] tree: Value) {
    let rules = RuleMap::compile([("xs.*.y", "required|string")], RuleRegistry::builtin())
        .unwrap();
    assert!(expand(&rules, &tree).is_empty());
    assert!(rules.validate(&tree).is_ok());
}

#[test]
fn collection_presence_is_declared_on_the_parent() {
    let rules = RuleMap::compile(
        [("xs", "required|array"), ("xs.*.y", "required")],
        RuleRegistry::builtin(),
    )
    .unwrap();
    assert_eq!(failing_fields(&rules, &json!({ "xs": [] })), ["xs"]);
    assert_eq!(failing_fields(&rules, &json!({ "xs": [{}, { "y": 1 }] })), ["xs.0.y"]);
}

#[test]
fn multi_level_patterns_follow_the_tree() {
    let rules = RuleMap::compile([("groups.*.members.*.email", "required|email")], RuleRegistry::builtin())
        .unwrap();
    let tree = json!({
        "groups": [
            { "members": [{ "email": "a@example.com" }, { "email": "bad" }] },
            { "members": [] },
            { "members": [{}] },
        ],
    });
    assert_eq!(
        failing_fields(&rules, &tree),
        ["groups.0.members.1.email", "groups.2.members.0.email"]
    );
}

#[test]
fn wildcards_inside_array_blocks_expand_per_element() {
    let rules = RuleMap::builder(RuleRegistry::builtin())
        .array("orders", |order| order.rules("lines.*.qty", "integer|min:1"))
        .build()
        .unwrap();
    let tree = json!({
        "orders": [
            { "lines": [{ "qty": 1 }, { "qty": 0 }] },
            { "lines": [{ "qty": 2.5 }] },
        ],
    });
    assert_eq!(
        failing_fields(&rules, &tree),
        ["orders.0.lines.1.qty", "orders.1.lines.0.qty"]
    );
}

#[test]
fn explicit_index_and_pattern_merge() {
    let rules = RuleMap::compile(
        [("tags.0", "required"), ("tags.*", "string|max:3")],
        RuleRegistry::builtin(),
    )
    .unwrap();
    let tree = json!({ "tags": [12345, "ok"] });

    let report = rules.validate(&tree).unwrap_err().into_report().unwrap();
    assert_eq!(report.fields().collect::<Vec<_>>(), ["tags.0"]);
    assert_eq!(
        report.get("tags.0").unwrap(),
        ["This field must be a string.", "This field must be at most 3."]
    );
}
