//! Size rules
//!
//! `min`, `max`, `between` and `size` measure a value before comparing it:
//! numbers by value, strings by character count, sequences by length and
//! maps by key count. Other values (`null`, booleans) cannot be measured
//! and fail the rule.

use serde_json::Value;

use crate::dsl::RuleRegistry;
use crate::foundation::{Rule, ValidationError};
use crate::validators::{one_number, two_numbers};

/// A measured value together with the unit used in messages.
fn measure(value: &Value) -> Option<(f64, &'static str)> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| (n, "")),
        Value::String(s) => Some((s.chars().count() as f64, " characters")),
        Value::Array(items) => Some((items.len() as f64, " items")),
        Value::Object(map) => Some((map.len() as f64, " keys")),
        Value::Null | Value::Bool(_) => None,
    }
}

fn unmeasurable(code: &'static str) -> ValidationError {
    ValidationError::new(
        code,
        "This field must be a number, string, array or object.",
    )
}

fn size_rule<F, M>(name: &'static str, accepts: F, message: M) -> Rule
where
    F: Fn(f64) -> bool + Send + Sync + 'static,
    M: Fn(&str) -> ValidationError + Send + Sync + 'static,
{
    Rule::for_value(name, move |value| {
        let (size, unit) = measure(value).ok_or_else(|| unmeasurable(name))?;
        if accepts(size) {
            Ok(())
        } else {
            Err(message(unit).with_param("actual", size.to_string()))
        }
    })
}

/// The measured value must be at least `min`.
#[must_use]
pub fn min(min: f64) -> Rule {
    size_rule(
        "min",
        move |size| size >= min,
        move |unit| {
            ValidationError::new("min", format!("This field must be at least {min}{unit}."))
                .with_param("min", min.to_string())
        },
    )
}

/// The measured value must be at most `max`.
#[must_use]
pub fn max(max: f64) -> Rule {
    size_rule(
        "max",
        move |size| size <= max,
        move |unit| {
            ValidationError::new("max", format!("This field must be at most {max}{unit}."))
                .with_param("max", max.to_string())
        },
    )
}

/// The measured value must lie within `min..=max`.
#[must_use]
pub fn between(min: f64, max: f64) -> Rule {
    size_rule(
        "between",
        move |size| size >= min && size <= max,
        move |unit| {
            ValidationError::new(
                "between",
                format!("This field must be between {min} and {max}{unit}."),
            )
            .with_param("min", min.to_string())
            .with_param("max", max.to_string())
        },
    )
}

/// The measured value must equal `size` exactly.
#[must_use]
pub fn size(size: f64) -> Rule {
    size_rule(
        "size",
        move |actual| actual == size,
        move |unit| {
            ValidationError::new("size", format!("This field must be exactly {size}{unit}."))
                .with_param("size", size.to_string())
        },
    )
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry
        .register("min", |args| Ok(min(one_number("min", args)?)))
        .register("max", |args| Ok(max(one_number("max", args)?)))
        .register("between", |args| {
            let (low, high) = two_numbers("between", args)?;
            Ok(between(low, high))
        })
        .register("size", |args| Ok(size(one_number("size", args)?)));
}
