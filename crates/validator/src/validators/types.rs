//! Type rules
//!
//! The parameter tree arrives already decoded, so these check the JSON
//! type of the value rather than parsing text.

use serde_json::Value;

use crate::dsl::RuleRegistry;
use crate::foundation::{Rule, ValidationError};
use crate::validators::no_args;

fn type_rule(name: &'static str, expected: &'static str, accepts: fn(&Value) -> bool) -> Rule {
    Rule::for_value(name, move |value| {
        if accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::type_mismatch(name, expected))
        }
    })
}

/// The value must be a string.
#[must_use]
pub fn string() -> Rule {
    type_rule("string", "a string", Value::is_string)
}

/// The value must be a number.
#[must_use]
pub fn numeric() -> Rule {
    type_rule("numeric", "a number", Value::is_number)
}

/// The value must be a whole number.
#[must_use]
pub fn integer() -> Rule {
    type_rule("integer", "an integer", |value| match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    })
}

/// The value must be a sequence.
#[must_use]
pub fn array() -> Rule {
    type_rule("array", "an array", Value::is_array)
}

/// The value must be a map.
#[must_use]
pub fn map() -> Rule {
    type_rule("map", "an object", Value::is_object)
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    let simple: [(&'static str, fn() -> Rule); 5] = [
        ("string", string),
        ("numeric", numeric),
        ("integer", integer),
        ("array", array),
        ("map", map),
    ];
    for (name, factory) in simple {
        registry.register(name, move |args| {
            no_args(name, args)?;
            Ok(factory())
        });
    }
}
