//! Error collection.
//!
//! [`validate`] runs a [`Schema`] against a parameter tree and returns
//! either `Ok(())` or the aggregated [`ErrorReport`]. For a [`RuleMap`] the
//! collector expands wildcards, then walks the entries in declaration
//! order, each independent of the others:
//!
//! - a chain runs against the field's value and stores its messages under
//!   the field's path;
//! - a nested block requires an object and recurses into it, re-keying
//!   errors as `field.inner`;
//! - an array block requires a sequence and recurses into every element,
//!   re-keying errors as `field.index.inner`.
//!
//! In strict mode, leaves of the tree that no entry covers are reported as
//! unknown. Rule faults abort the whole call.

mod expand;
mod strict;

pub use expand::expand;
pub use strict::{UNKNOWN_FIELD, unknown_fields};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::{ErrorReport, ValidateError, ValidationResult, path};
use crate::schema::{FieldRules, RuleMap};

/// Shape error for a nested block whose value is not an object.
pub const NOT_AN_OBJECT: &str = "This field must be an object.";

/// Shape error for an array block whose value is not a sequence.
pub const NOT_AN_ARRAY: &str = "This field must be an array.";

// ============================================================================
// OPTIONS
// ============================================================================

/// Per-call validation options.
///
/// Deserializable with every field optional, so adapters can read it from
/// their own configuration:
///
/// ```
/// use sieve_validator::ValidateOptions;
///
/// let options: ValidateOptions = serde_json::from_str(r#"{ "strict": true }"#).unwrap();
/// assert!(options.strict);
/// assert!(options.report_only_unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Reject tree leaves that no declared rule covers.
    pub strict: bool,

    /// In strict mode, when unknown fields exist, report only those and
    /// skip every rule. When `false`, unknown-field errors are merged with
    /// the normal results.
    pub report_only_unknown: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strict: false,
            report_only_unknown: true,
        }
    }
}

impl ValidateOptions {
    /// Default options: not strict.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables strict mode.
    #[must_use = "builder methods must be chained or built"]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Sets whether unknown fields replace the normal results.
    #[must_use = "builder methods must be chained or built"]
    pub fn report_only_unknown(mut self, only: bool) -> Self {
        self.report_only_unknown = only;
        self
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Anything a tree can be validated against.
///
/// Implemented by [`RuleMap`] and by
/// [`ChangesetSchema`](crate::changeset::ChangesetSchema), which delegates
/// to an external validator.
pub trait Schema {
    /// Collects every field error for `tree`.
    ///
    /// An empty report means the tree is valid. `Err` is reserved for
    /// faults that abort the call.
    fn collect(&self, tree: &Value, options: &ValidateOptions) -> Result<ErrorReport, ValidateError>;
}

impl Schema for RuleMap {
    fn collect(&self, tree: &Value, options: &ValidateOptions) -> Result<ErrorReport, ValidateError> {
        if !options.strict {
            return collect(self, tree);
        }

        let unknown = unknown_fields(self, tree);
        if !unknown.is_empty() && options.report_only_unknown {
            tracing::debug!(unknown = unknown.len(), "unknown fields, rules skipped");
            return Ok(unknown);
        }

        let mut report = collect(self, tree)?;
        report.merge(unknown);
        Ok(report)
    }
}

/// Validates `tree` against `schema`.
///
/// ```
/// use serde_json::json;
/// use sieve_validator::{RuleMap, RuleRegistry, ValidateOptions, validate};
///
/// let rules = RuleMap::compile(
///     [("name", "required|string"), ("age", "required|numeric|min:2|max:32")],
///     RuleRegistry::builtin(),
/// )
/// .unwrap();
///
/// assert!(validate(&json!({ "name": "john", "age": 31 }), &rules, &ValidateOptions::default()).is_ok());
///
/// let error = validate(&json!({ "name": "john", "age": 50 }), &rules, &ValidateOptions::default())
///     .unwrap_err();
/// assert_eq!(
///     error.report().and_then(|report| report.get("age")),
///     Some(&["This field must be at most 32.".to_owned()][..])
/// );
/// ```
pub fn validate<S>(tree: &Value, schema: &S, options: &ValidateOptions) -> ValidationResult
where
    S: Schema + ?Sized,
{
    tracing::debug!(strict = options.strict, "validation started");
    let report = schema.collect(tree, options)?;
    tracing::debug!(
        fields = report.len(),
        messages = report.message_count(),
        "validation finished"
    );
    report.into_result().map_err(ValidateError::Invalid)
}

/// Runs a rule map against a tree, without strict checks.
///
/// Nested and array blocks recurse with the nested value as the tree, so
/// their rules resolve paths (including cross-field references) relative
/// to it. Rules still receive the full concrete path, so `{field}` in a
/// message template and the field of a [`ValidateError::RuleFault`] name
/// e.g. `address.line1` rather than `line1`.
pub fn collect(rules: &RuleMap, tree: &Value) -> Result<ErrorReport, ValidateError> {
    collect_scoped(rules, tree, "")
}

fn collect_scoped(rules: &RuleMap, tree: &Value, scope: &str) -> Result<ErrorReport, ValidateError> {
    let expanded = expand(rules, tree);
    let mut report = ErrorReport::new();

    for (field, entry) in expanded.iter() {
        let full = path::join(scope, field);
        match entry {
            FieldRules::Chain(chain) => {
                let messages = chain.evaluate_value(&full, path::resolve(tree, field), tree)?;
                report.extend_field(field, messages);
            }
            FieldRules::Nested { rules, nullable } => match path::resolve(tree, field) {
                Some(value @ Value::Object(_)) => {
                    report.merge_prefixed(field, collect_scoped(rules, value, &full)?);
                }
                None | Some(Value::Null) if *nullable => {}
                _ => report.add(field, NOT_AN_OBJECT),
            },
            FieldRules::Array(rules) => match path::resolve(tree, field) {
                Some(Value::Array(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        let index = index.to_string();
                        let nested = collect_scoped(rules, item, &path::join(&full, &index))?;
                        report.merge_prefixed(&path::join(field, &index), nested);
                    }
                }
                _ => report.add(field, NOT_AN_ARRAY),
            },
        }
    }

    Ok(report)
}

impl RuleMap {
    /// Validates `tree` with default options.
    pub fn validate(&self, tree: &Value) -> ValidationResult {
        validate(tree, self, &ValidateOptions::default())
    }

    /// Validates `tree` with the given options.
    pub fn validate_with(&self, tree: &Value, options: &ValidateOptions) -> ValidationResult {
        validate(tree, self, options)
    }
}
