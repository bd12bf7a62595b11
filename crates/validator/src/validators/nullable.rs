//! Presence rules
//!
//! These decide whether a field counts as "there". `required`,
//! `required_with` and `present` are implicit: they run even when the field
//! is absent from the tree.
//!
//! A value is *empty* when it is `null`, a blank string, an empty sequence
//! or an empty map. Numbers and booleans are never empty, so `false`
//! satisfies `required`.

use serde_json::Value;

use crate::dsl::RuleRegistry;
use crate::foundation::{Rule, ValidationError, path};
use crate::validators::{no_args, some_texts};

/// Returns `true` for `null`, blank strings, empty sequences and empty maps.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn is_filled(value: Option<&Value>) -> bool {
    value.is_some_and(|value| !is_empty_value(value))
}

/// The field must be present and not empty.
#[must_use]
pub fn required() -> Rule {
    Rule::implicit("required", |_, value, _| {
        if is_filled(value) {
            Ok(())
        } else {
            Err(ValidationError::required().into())
        }
    })
}

/// The field is required when any of `others` (paths in the same tree) is
/// present and not empty.
#[must_use]
pub fn required_with(others: Vec<String>) -> Rule {
    let listed = others.join(" / ");
    Rule::implicit("required_with", move |_, value, tree| {
        let triggered = others
            .iter()
            .any(|other| is_filled(path::resolve(tree, other)));
        if !triggered || is_filled(value) {
            return Ok(());
        }
        Err(ValidationError::new(
            "required_with",
            format!("This field is required when {listed} is present."),
        )
        .with_param("values", listed.clone())
        .into())
    })
}

/// The field must exist in the tree; any value, even empty, is accepted.
#[must_use]
pub fn present() -> Rule {
    Rule::implicit("present", |_, value, _| match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("present", "This field must be present.").into()),
    })
}

/// When present, the field must not be empty.
#[must_use]
pub fn filled() -> Rule {
    Rule::for_value("filled", |value| {
        if is_empty_value(value) {
            Err(ValidationError::new("filled", "This field must not be empty."))
        } else {
            Ok(())
        }
    })
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry
        .register("required", |args| {
            no_args("required", args)?;
            Ok(required())
        })
        .register("required_with", |args| {
            Ok(required_with(some_texts("required_with", args)?))
        })
        .register("present", |args| {
            no_args("present", args)?;
            Ok(present())
        })
        .register("filled", |args| {
            no_args("filled", args)?;
            Ok(filled())
        });
}
