//! Content rules
//!
//! Rules that look at what a scalar value says: membership in an allowed
//! list, e-mail format, regular expressions.

use std::sync::LazyLock;

use serde_json::Value;

use crate::dsl::RuleRegistry;
use crate::foundation::{CompileError, Rule, ValidationError};
use crate::validators::{no_args, one_text, some_texts};

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("email pattern is a valid regex")
});

/// Text form of a scalar, used for list membership.
///
/// Strings as-is, numbers and booleans in their JSON spelling. Containers
/// and `null` have no text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// MEMBERSHIP
// ============================================================================

/// The value must be one of `allowed`.
#[must_use]
pub fn in_list(allowed: Vec<String>) -> Rule {
    let listed = allowed.join(", ");
    Rule::for_value("in_list", move |value| {
        let member = scalar_text(value).is_some_and(|text| allowed.contains(&text));
        if member {
            Ok(())
        } else {
            Err(
                ValidationError::new("in_list", format!("This field must be one of: {listed}."))
                    .with_param("values", listed.clone()),
            )
        }
    })
}

/// The value must not be one of `denied`.
#[must_use]
pub fn not_in(denied: Vec<String>) -> Rule {
    let listed = denied.join(", ");
    Rule::for_value("not_in", move |value| {
        let member = scalar_text(value).is_some_and(|text| denied.contains(&text));
        if member {
            Err(
                ValidationError::new("not_in", format!("This field must not be one of: {listed}."))
                    .with_param("values", listed.clone()),
            )
        } else {
            Ok(())
        }
    })
}

// ============================================================================
// FORMAT
// ============================================================================

/// The value must be a string shaped like an e-mail address.
#[must_use]
pub fn email() -> Rule {
    Rule::for_value("email", |value| match value.as_str() {
        Some(text) if EMAIL_REGEX.is_match(text) => Ok(()),
        _ => Err(ValidationError::invalid_format(
            "email",
            "This field must be a valid email address.",
        )),
    })
}

/// The value must be a string matching `pattern`.
pub fn matches_regex(pattern: &str) -> Result<Rule, regex::Error> {
    let regex = regex::Regex::new(pattern)?;
    Ok(Rule::for_value("regex", move |value| match value.as_str() {
        Some(text) if regex.is_match(text) => Ok(()),
        _ => Err(
            ValidationError::invalid_format("regex", "This field format is invalid.")
                .with_param("pattern", regex.as_str().to_owned()),
        ),
    }))
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry
        .register("in_list", |args| Ok(in_list(some_texts("in_list", args)?)))
        .register("not_in", |args| Ok(not_in(some_texts("not_in", args)?)))
        .register("email", |args| {
            no_args("email", args)?;
            Ok(email())
        })
        .register("regex", |args| {
            let pattern = one_text("regex", args)?;
            matches_regex(&pattern)
                .map_err(|error| CompileError::invalid_argument("regex", error.to_string()))
        })
        .alias("in", "in_list");
}
