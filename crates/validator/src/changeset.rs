//! Delegation to external validators.
//!
//! Some callers already validate with another system that has its own error
//! structure. Wrapping it in a [`ChangesetSchema`] lets it be passed to
//! [`validate`](crate::validate) like a [`RuleMap`](crate::RuleMap): the
//! native rule engine does not run, the external object validates and its
//! errors are flattened into an [`ErrorReport`].
//!
//! ```
//! use serde_json::{Value, json};
//! use sieve_validator::changeset::{Changeset, ChangesetSchema, interpolate};
//! use sieve_validator::{ErrorReport, ValidateOptions, validate};
//!
//! struct NameLength;
//!
//! impl Changeset for NameLength {
//!     type Errors = Vec<(&'static str, &'static str, usize)>;
//!
//!     fn run(&self, tree: &Value) -> Self::Errors {
//!         match tree["name"].as_str() {
//!             Some(name) if name.len() >= 3 => Vec::new(),
//!             _ => vec![("name", "should be at least %{count} character(s)", 3)],
//!         }
//!     }
//!
//!     fn flatten(&self, errors: Self::Errors) -> ErrorReport {
//!         errors
//!             .into_iter()
//!             .map(|(field, template, count)| {
//!                 (field, vec![interpolate(template, &[("count", count)])])
//!             })
//!             .collect()
//!     }
//! }
//!
//! let schema = ChangesetSchema::new(NameLength);
//! let error = validate(&json!({ "name": "jo" }), &schema, &ValidateOptions::default()).unwrap_err();
//! assert_eq!(
//!     error.report().and_then(|report| report.first_message()),
//!     Some("should be at least 3 character(s)")
//! );
//! ```

use std::fmt;

use serde_json::Value;

use crate::engine::{Schema, ValidateOptions};
use crate::foundation::{ErrorReport, ValidateError};

/// An external validation object.
pub trait Changeset {
    /// The validator's native error structure.
    type Errors;

    /// Validates the tree, returning native errors.
    fn run(&self, tree: &Value) -> Self::Errors;

    /// Translates native errors into a report with final message strings.
    /// No errors must translate to an empty report.
    fn flatten(&self, errors: Self::Errors) -> ErrorReport;
}

/// Adapts a [`Changeset`] to the [`Schema`] interface.
///
/// Strict-mode options do not apply; the external validator decides what
/// an unknown field is.
#[derive(Debug, Clone, Default)]
pub struct ChangesetSchema<C> {
    changeset: C,
}

impl<C: Changeset> ChangesetSchema<C> {
    /// Wraps a changeset.
    pub fn new(changeset: C) -> Self {
        Self { changeset }
    }

    /// The wrapped changeset.
    pub fn inner(&self) -> &C {
        &self.changeset
    }

    /// Unwraps the changeset.
    pub fn into_inner(self) -> C {
        self.changeset
    }
}

impl<C: Changeset> Schema for ChangesetSchema<C> {
    fn collect(&self, tree: &Value, options: &ValidateOptions) -> Result<ErrorReport, ValidateError> {
        if options.strict {
            tracing::debug!("strict mode ignored for changeset validation");
        }
        let errors = self.changeset.run(tree);
        Ok(self.changeset.flatten(errors))
    }
}

/// Renders `%{key}` placeholders from `params`.
///
/// Unknown placeholders are left untouched.
///
/// ```
/// use sieve_validator::changeset::interpolate;
///
/// assert_eq!(
///     interpolate("must be between %{min} and %{max}", &[("min", 1), ("max", 5)]),
///     "must be between 1 and 5"
/// );
/// assert_eq!(interpolate("%{other} stays", &[("min", 1)]), "%{other} stays");
/// ```
pub fn interpolate<K, V>(template: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: fmt::Display,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("%{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match params.iter().find(|(name, _)| name.as_ref() == key) {
            Some((_, value)) => out.push_str(&value.to_string()),
            None => out.push_str(&rest[open..open + 2 + close + 1]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
