//! Boolean rules

use serde_json::Value;

use crate::dsl::RuleRegistry;
use crate::foundation::{Rule, ValidationError};
use crate::validators::no_args;

const TRUTHY: &[&str] = &["1", "true", "yes", "on"];
const FALSY: &[&str] = &["0", "false", "no", "off"];

fn is_one_of(value: &Value, words: &[&str], flag: bool) -> bool {
    match value {
        Value::Bool(b) => *b == flag,
        Value::Number(n) => n.as_i64() == Some(i64::from(flag)),
        Value::String(s) => words.contains(&s.as_str()),
        _ => false,
    }
}

/// The value must be `true`, `false`, `0`, `1`, `"0"` or `"1"`.
#[must_use]
pub fn boolean() -> Rule {
    Rule::for_value("boolean", |value| {
        let accepted = match value {
            Value::Bool(_) => true,
            Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
            Value::String(s) => matches!(s.as_str(), "0" | "1"),
            _ => false,
        };
        if accepted {
            Ok(())
        } else {
            Err(ValidationError::new("boolean", "This field must be true or false."))
        }
    })
}

/// The field must be present and affirmative (`true`, `1`, `"yes"`, `"on"`...).
#[must_use]
pub fn accepted() -> Rule {
    Rule::implicit("accepted", |_, value, _| {
        if value.is_some_and(|value| is_one_of(value, TRUTHY, true)) {
            Ok(())
        } else {
            Err(ValidationError::new("accepted", "This field must be accepted.").into())
        }
    })
}

/// The field must be present and negative (`false`, `0`, `"no"`, `"off"`...).
#[must_use]
pub fn declined() -> Rule {
    Rule::implicit("declined", |_, value, _| {
        if value.is_some_and(|value| is_one_of(value, FALSY, false)) {
            Ok(())
        } else {
            Err(ValidationError::new("declined", "This field must be declined.").into())
        }
    })
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry
        .register("boolean", |args| {
            no_args("boolean", args)?;
            Ok(boolean())
        })
        .register("accepted", |args| {
            no_args("accepted", args)?;
            Ok(accepted())
        })
        .register("declined", |args| {
            no_args("declined", args)?;
            Ok(declined())
        });
}
