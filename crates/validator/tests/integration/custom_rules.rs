//! Caller-defined rules: registration, messages and faults.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sieve_validator::dsl::{self, Arg};
use sieve_validator::prelude::*;

/// A lookup store that can be switched off to simulate an outage.
#[derive(Default)]
struct Usernames {
    taken: HashSet<String>,
    offline: bool,
}

fn unique_username(store: Arc<Mutex<Usernames>>) -> Rule {
    Rule::new("unique", move |_, value, _| {
        let Some(name) = value.and_then(Value::as_str) else {
            return Ok(());
        };
        let store = store.lock().map_err(|_| RuleError::fault("store lock poisoned"))?;
        if store.offline {
            return Err(RuleError::fault("username store offline"));
        }
        if store.taken.contains(name) {
            return Err(ValidationError::new("unique", "This username is taken.").into());
        }
        Ok(())
    })
}

fn registry_with(store: &Arc<Mutex<Usernames>>) -> RuleRegistry {
    let store = Arc::clone(store);
    RuleRegistry::default()
        .with_rule("unique", move |args| {
            if !args.is_empty() {
                return Err(CompileError::invalid_argument("unique", "takes no arguments"));
            }
            Ok(unique_username(Arc::clone(&store)))
        })
        .with_rule("multiple_of", |args| match args.first().and_then(Arg::as_i64) {
            Some(step) if step > 0 && args.len() == 1 => {
                Ok(Rule::for_value("multiple_of", move |value| {
                    match value.as_i64() {
                        Some(n) if n % step == 0 => Ok(()),
                        _ => Err(ValidationError::new(
                            "multiple_of",
                            format!("This field must be a multiple of {step}."),
                        )
                        .with_param("step", step.to_string())),
                    }
                }))
            }
            _ => Err(CompileError::invalid_argument(
                "multiple_of",
                "expected one positive integer",
            )),
        })
}

#[test]
fn registered_rules_compile_from_the_dsl() {
    let store = Arc::new(Mutex::new(Usernames::default()));
    store.lock().unwrap().taken.insert("admin".into());
    let registry = registry_with(&store);

    let rules = RuleMap::compile(
        [("username", "required|string|unique"), ("seats", "integer|multiple_of:4")],
        &registry,
    )
    .unwrap();

    let report = rules
        .validate(&json!({ "username": "admin", "seats": 6 }))
        .unwrap_err()
        .into_report()
        .unwrap();
    assert_eq!(report.get("username").unwrap(), ["This username is taken."]);
    assert_eq!(report.get("seats").unwrap(), ["This field must be a multiple of 4."]);

    assert!(rules.validate(&json!({ "username": "alice", "seats": 8 })).is_ok());
}

#[test]
fn custom_rules_are_not_global() {
    let store = Arc::new(Mutex::new(Usernames::default()));
    let _ = registry_with(&store);
    assert!(matches!(
        dsl::compile("unique", RuleRegistry::builtin()),
        Err(CompileError::UnknownRule { .. })
    ));
}

#[test]
fn constructor_argument_errors_surface_at_compile_time() {
    let store = Arc::new(Mutex::new(Usernames::default()));
    let registry = registry_with(&store);

    let error = RuleMap::compile([("seats", "multiple_of:0")], &registry).unwrap_err();
    assert_eq!(
        error.to_string(),
        "field `seats`: invalid arguments for rule `multiple_of`: expected one positive integer"
    );
    assert!(matches!(error.root(), CompileError::InvalidArgument { .. }));
}

#[test]
fn faults_abort_validation() {
    let store = Arc::new(Mutex::new(Usernames {
        offline: true,
        ..Usernames::default()
    }));
    let registry = registry_with(&store);
    let rules = RuleMap::compile(
        [("email", "required"), ("username", "unique"), ("age", "required")],
        &registry,
    )
    .unwrap();

    let error = rules.validate(&json!({ "username": "alice" })).unwrap_err();
    assert!(error.report().is_none());
    match error {
        ValidateError::RuleFault { field, rule, source } => {
            assert_eq!(field, "username");
            assert_eq!(rule, "unique");
            assert_eq!(source.to_string(), "username store offline");
        }
        ValidateError::Invalid(report) => panic!("expected a fault, got {report}"),
    }
}

#[test]
fn message_templates_render_params() {
    let rules = RuleMap::new()
        .with(
            "user.age",
            vec![
                required().with_message("{field} is missing"),
                max(32.0).with_message("{field} must be {max} or less (got {actual})"),
            ],
        )
        .unwrap();

    let report = rules
        .validate(&json!({ "user": { "age": 40 } }))
        .unwrap_err()
        .into_report()
        .unwrap();
    assert_eq!(report.get("user.age").unwrap(), ["user.age must be 32 or less (got 40)"]);

    let report = rules.validate(&json!({})).unwrap_err().into_report().unwrap();
    assert_eq!(report.get("user.age").unwrap(), ["user.age is missing"]);
}

#[test]
fn implicit_custom_rule_sees_absent_fields() {
    let either = Rule::implicit("email_or_phone", |_, value, tree| {
        if value.is_some() || tree.get("phone").is_some() {
            Ok(())
        } else {
            Err(ValidationError::new("email_or_phone", "Provide an email or a phone.").into())
        }
    });
    let rules = RuleMap::new().with("email", vec![either]).unwrap();

    assert!(rules.validate(&json!({ "phone": "555" })).is_ok());
    assert!(rules.validate(&json!({ "email": "a@b.c" })).is_ok());
    assert!(rules.validate(&json!({})).is_err());
}
