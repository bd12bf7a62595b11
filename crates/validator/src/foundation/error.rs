//! Error types for rule failures, schema compilation and validation runs.
//!
//! Three layers of failure exist and they never mix:
//!
//! - [`ValidationError`]: a single rule rejected a field value. Collected
//!   into an [`ErrorReport`], never fatal.
//! - [`CompileError`]: a schema could not be built (unknown rule name,
//!   malformed DSL token, bad path). Raised immediately; a schema that fails
//!   to compile never validates anything.
//! - [`ValidateError`]: the outcome of a validation call: either the
//!   aggregated report or a rule-author fault that aborted the run.
//!
//! All string fields of [`ValidationError`] use `Cow<'static, str>` so the
//! common case of static codes and messages does not allocate.

use std::borrow::Cow;
use std::fmt;

use crate::foundation::report::ErrorReport;

/// Boxed error produced by a rule that could not finish its check.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A rule rejected a field value.
///
/// # Examples
///
/// ```
/// use sieve_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("min", "This field must be at least 3.")
///     .with_param("min", "3");
/// assert_eq!(error.param("min"), Some("3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code for programmatic handling and i18n.
    ///
    /// Examples: "required", "min", "email"
    pub code: Cow<'static, str>,

    /// Final, human-readable message.
    pub message: Cow<'static, str>,

    /// Parameters the message was rendered from.
    ///
    /// Stored as ordered key-value pairs (typically 0-3 params).
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Replaces the message, keeping code and params.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Renders a message template against this error.
    ///
    /// `{field}` becomes the field path, `{code}` the error code and any
    /// other `{name}` the matching param. Unknown placeholders are left as-is.
    #[must_use]
    pub fn render(&self, template: &str, field: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let key = &after[..close];
            match key {
                "field" => out.push_str(field),
                "code" => out.push_str(&self.code),
                _ => match self.param(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                },
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValidationError {
    /// Creates a "required" error.
    pub fn required() -> Self {
        Self::new("required", "This field is required.")
    }

    /// Creates a "type_mismatch" error naming the expected shape.
    pub fn type_mismatch(code: &'static str, expected: &'static str) -> Self {
        Self::new(code, format!("This field must be {expected}."))
            .with_param("expected", expected)
    }

    /// Creates an "invalid_format" error.
    pub fn invalid_format(code: &'static str, message: &'static str) -> Self {
        Self::new(code, message)
    }

    /// Creates a "custom" error with a message.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new("custom", message)
    }
}

// ============================================================================
// RULE ERROR
// ============================================================================

/// What a rule function returns when it does not accept a value.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The value is invalid; the message goes into the report.
    #[error("{0}")]
    Invalid(ValidationError),

    /// The rule itself could not run (lookup store down, bug in the rule).
    /// Never recovered by the engine.
    #[error("rule could not complete: {0}")]
    Fault(BoxError),
}

impl RuleError {
    /// Wraps any error as a rule-author fault.
    pub fn fault(error: impl Into<BoxError>) -> Self {
        Self::Fault(error.into())
    }
}

impl From<ValidationError> for RuleError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error)
    }
}

// ============================================================================
// COMPILE ERROR
// ============================================================================

/// A rule specification or rule map could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The textual specification contains no tokens.
    #[error("rule specification is empty")]
    EmptySpec,

    /// A token does not follow `name (':' arg (',' arg)*)?`.
    #[error("malformed rule token `{token}`: {reason}")]
    MalformedToken {
        /// The offending token, verbatim.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// No constructor is registered under this name.
    #[error("unknown rule `{name}`")]
    UnknownRule {
        /// The unresolved rule name.
        name: String,
    },

    /// A constructor rejected its arguments.
    #[error("invalid arguments for rule `{rule}`: {reason}")]
    InvalidArgument {
        /// Rule name.
        rule: String,
        /// Why the arguments were rejected.
        reason: String,
    },

    /// A declared field path has an empty segment.
    #[error("invalid field path `{path}`")]
    InvalidPath {
        /// The declared path.
        path: String,
    },

    /// A compile error attributed to a declared field.
    #[error("field `{field}`: {source}")]
    Field {
        /// Declared field path.
        field: String,
        /// Underlying error.
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Creates an [`InvalidArgument`](Self::InvalidArgument) error.
    pub fn invalid_argument(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Attributes this error to a declared field.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field attribution.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.root(),
            other => other,
        }
    }
}

// ============================================================================
// VALIDATE ERROR
// ============================================================================

/// Outcome of a failed validation call.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The input is invalid. The report is never empty.
    #[error("validation failed: {0}")]
    Invalid(ErrorReport),

    /// A rule faulted; no report is produced for the call.
    #[error("rule `{rule}` faulted on field `{field}`")]
    RuleFault {
        /// Concrete path of the field being checked.
        field: String,
        /// Name of the faulting rule.
        rule: String,
        /// The rule's own error.
        #[source]
        source: BoxError,
    },
}

impl ValidateError {
    /// Returns the report if this is a validation failure.
    #[must_use]
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            Self::Invalid(report) => Some(report),
            Self::RuleFault { .. } => None,
        }
    }

    /// Consumes the error, returning the report if this is a validation failure.
    #[must_use]
    pub fn into_report(self) -> Option<ErrorReport> {
        match self {
            Self::Invalid(report) => Some(report),
            Self::RuleFault { .. } => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
