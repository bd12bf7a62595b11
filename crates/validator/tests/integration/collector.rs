//! End-to-end collection over rule maps.

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use sieve_validator::prelude::*;

fn messages(report: &ErrorReport, field: &str) -> Vec<String> {
    report.get(field).map(<[String]>::to_vec).unwrap_or_default()
}

fn report_of(rules: &RuleMap, tree: Value) -> ErrorReport {
    rules
        .validate(&tree)
        .err()
        .and_then(ValidateError::into_report)
        .unwrap_or_default()
}

#[fixture]
fn person() -> RuleMap {
    RuleMap::compile(
        [("name", "required|string"), ("age", "required|numeric|min:2|max:32")],
        RuleRegistry::builtin(),
    )
    .unwrap()
}

// ============================================================================
// WORKED EXAMPLES
// ============================================================================

#[rstest]
fn empty_input_reports_both_required(person: RuleMap) {
    let report = report_of(&person, json!({}));
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "name": ["This field is required."],
            "age": ["This field is required."],
        })
    );
}

#[rstest]
fn valid_input_passes(person: RuleMap) {
    assert!(person.validate(&json!({ "name": "john", "age": 31 })).is_ok());
}

#[rstest]
fn age_over_limit(person: RuleMap) {
    let report = report_of(&person, json!({ "name": "john", "age": 50 }));
    assert_eq!(report.fields().collect::<Vec<_>>(), ["age"]);
    assert_eq!(messages(&report, "age"), ["This field must be at most 32."]);
}

#[rstest]
fn collect_all_reports_every_failure(person: RuleMap) {
    let report = report_of(&person, json!({ "name": 7, "age": "x" }));
    assert_eq!(messages(&report, "name"), ["This field must be a string."]);
    assert_eq!(
        messages(&report, "age"),
        [
            "This field must be a number.",
            "This field must be at least 2 characters.",
        ]
    );
}

// ============================================================================
// CHAIN MODES
// ============================================================================

#[test]
fn bail_keeps_first_failure_only() {
    let rules = RuleMap::compile([("email", "bail|string|min:5|email")], RuleRegistry::builtin())
        .unwrap();
    let report = report_of(&rules, json!({ "email": "a@" }));
    assert_eq!(messages(&report, "email"), ["This field must be at least 5 characters."]);
}

#[test]
fn optional_fields_skip_non_implicit_rules() {
    let rules = RuleMap::compile(
        [("nickname", "string|min:3"), ("website", "regex:^https://")],
        RuleRegistry::builtin(),
    )
    .unwrap();
    assert!(rules.validate(&json!({})).is_ok());
}

#[test]
fn nullable_chain_accepts_null() {
    let rules = RuleMap::compile(
        [("middle_name", "nullable|string|min:2"), ("last_name", "string")],
        RuleRegistry::builtin(),
    )
    .unwrap();
    let report = report_of(&rules, json!({ "middle_name": null, "last_name": null }));
    assert_eq!(report.fields().collect::<Vec<_>>(), ["last_name"]);
}

#[rstest]
#[case(json!(false), true)]
#[case(json!(true), true)]
#[case(json!(0), true)]
#[case(json!(""), false)]
#[case(json!("   "), false)]
#[case(json!([]), false)]
#[case(json!({}), false)]
#[case(json!(null), false)]
fn required_semantics(#[case] value: Value, #[case] ok: bool) {
    let rules = RuleMap::compile([("flag", "required")], RuleRegistry::builtin()).unwrap();
    assert_eq!(rules.validate(&json!({ "flag": value })).is_ok(), ok);
}

#[test]
fn required_with_uses_the_whole_tree() {
    let rules = RuleMap::compile(
        [("password_confirmation", "required_with:password|same:password")],
        RuleRegistry::builtin(),
    )
    .unwrap();

    assert!(rules.validate(&json!({})).is_ok());
    assert!(rules
        .validate(&json!({ "password": "x", "password_confirmation": "x" }))
        .is_ok());

    let report = report_of(&rules, json!({ "password": "x" }));
    assert_eq!(
        messages(&report, "password_confirmation"),
        ["This field is required when password is present."]
    );
}

// ============================================================================
// NESTED AND ARRAY BLOCKS
// ============================================================================

#[fixture]
fn order() -> RuleMap {
    RuleMap::builder(RuleRegistry::builtin())
        .rules("id", "required|integer")
        .nested("address", |address| {
            address
                .rules("line1", "required|string")
                .rules("zip", "string|size:5")
        })
        .nullable_nested("gift", |gift| gift.rules("message", "required|max:140"))
        .array("documents", |document| {
            document
                .rules("name", "required|string")
                .rules("tags.*", "string")
        })
        .build()
        .unwrap()
}

#[rstest]
fn nested_and_array_rekeying(order: RuleMap) {
    let tree = json!({
        "id": 1,
        "address": { "zip": "123" },
        "documents": [
            { "name": "a" },
            { "name": "b", "tags": ["x", 3] },
            { "tags": [] },
        ],
    });

    let report = report_of(&order, tree);
    assert_eq!(
        report.fields().collect::<Vec<_>>(),
        [
            "address.line1",
            "address.zip",
            "documents.1.tags.1",
            "documents.2.name",
        ]
    );
    assert_eq!(messages(&report, "address.zip"), ["This field must be exactly 5 characters."]);
}

#[rstest]
fn shape_mismatches_are_field_errors(order: RuleMap) {
    let report = report_of(
        &order,
        json!({ "id": 1, "address": ["x"], "gift": "card", "documents": { "name": "a" } }),
    );
    assert_eq!(messages(&report, "address"), ["This field must be an object."]);
    assert_eq!(messages(&report, "gift"), ["This field must be an object."]);
    assert_eq!(messages(&report, "documents"), ["This field must be an array."]);
}

#[rstest]
fn nullable_block_accepts_absence(order: RuleMap) {
    let tree = json!({ "id": 1, "address": { "line1": "x" }, "gift": null, "documents": [] });
    assert!(order.validate(&tree).is_ok());
}

#[test]
fn non_object_elements_resolve_nothing() {
    let rules = RuleMap::builder(RuleRegistry::builtin())
        .array("items", |item| item.rules("sku", "required"))
        .build()
        .unwrap();
    let report = report_of(&rules, json!({ "items": ["loose", { "sku": "a" }] }));
    assert_eq!(report.fields().collect::<Vec<_>>(), ["items.0.sku"]);
}

// ============================================================================
// REPORT SHAPE
// ============================================================================

#[rstest]
fn response_body(person: RuleMap) {
    let report = report_of(&person, json!({ "name": 1 }));
    let body = ValidationResponse::from(report);
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({
            "message": "This field must be a string. (and 1 more error)",
            "errors": {
                "name": ["This field must be a string."],
                "age": ["This field is required."],
            },
        })
    );
}

#[rstest]
fn error_display(person: RuleMap) {
    let error = person.validate(&json!({ "name": "x" })).unwrap_err();
    assert_eq!(
        error.to_string(),
        "validation failed: 1 invalid field(s); age: This field is required."
    );
}

#[test]
fn validation_is_repeatable_across_threads() {
    let rules = std::sync::Arc::new(
        RuleMap::compile([("n", "required|integer|between:1,10")], RuleRegistry::builtin())
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let rules = std::sync::Arc::clone(&rules);
            std::thread::spawn(move || rules.validate(&json!({ "n": n * 5 })).is_ok())
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, [false, true, true, false]);
}
