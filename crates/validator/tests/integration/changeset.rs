//! Delegating validation to an external changeset.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sieve_validator::changeset::interpolate;
use sieve_validator::prelude::*;

/// Stand-in for a foreign validator: errors keyed by field, each a
/// `%{}`-templated message with its bindings.
struct Signup;

type NativeErrors = BTreeMap<&'static str, Vec<(&'static str, Vec<(&'static str, String)>)>>;

impl Changeset for Signup {
    type Errors = NativeErrors;

    fn run(&self, tree: &Value) -> NativeErrors {
        let mut errors = NativeErrors::new();
        match tree.get("username").and_then(Value::as_str) {
            None => errors.entry("username").or_default().push(("can't be blank", vec![])),
            Some(name) if name.chars().count() < 3 => errors.entry("username").or_default().push((
                "should be at least %{count} character(s)",
                vec![("count", "3".to_owned())],
            )),
            Some(_) => {}
        }
        if tree.get("terms").and_then(Value::as_bool) != Some(true) {
            errors.entry("terms").or_default().push(("must be accepted", vec![]));
        }
        errors
    }

    fn flatten(&self, errors: NativeErrors) -> ErrorReport {
        errors
            .into_iter()
            .map(|(field, messages)| {
                let messages: Vec<String> = messages
                    .into_iter()
                    .map(|(template, params)| interpolate(template, &params))
                    .collect();
                (field, messages)
            })
            .collect()
    }
}

#[test]
fn native_errors_are_flattened() {
    let schema = ChangesetSchema::new(Signup);
    let report = validate(&json!({ "username": "jo" }), &schema, &ValidateOptions::default())
        .unwrap_err()
        .into_report()
        .unwrap();

    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "terms": ["must be accepted"],
            "username": ["should be at least 3 character(s)"],
        })
    );
}

#[test]
fn valid_changeset_is_ok() {
    let schema = ChangesetSchema::new(Signup);
    let tree = json!({ "username": "john", "terms": true, "unexpected": 1 });
    assert!(validate(&tree, &schema, &ValidateOptions::new().strict()).is_ok());
}

#[test]
fn schemas_are_interchangeable_behind_the_trait() {
    let rules = RuleMap::compile([("username", "required|min:3")], RuleRegistry::builtin()).unwrap();
    let changeset = ChangesetSchema::new(Signup);
    let schemas: [&dyn Schema; 2] = [&rules, &changeset];

    let tree = json!({ "username": "jo", "terms": true });
    for schema in schemas {
        let report = validate(&tree, schema, &ValidateOptions::default())
            .unwrap_err()
            .into_report()
            .unwrap();
        assert_eq!(report.fields().collect::<Vec<_>>(), ["username"]);
    }
}
