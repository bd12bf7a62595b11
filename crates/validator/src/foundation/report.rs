//! The field-addressed error report returned by a failed validation.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::foundation::path;

/// Concrete field path → ordered, non-empty list of messages.
///
/// Fields keep the order in which they were first reported, which follows
/// rule declaration order. An empty report means success.
///
/// Serializes as a plain JSON object:
///
/// ```
/// use sieve_validator::foundation::ErrorReport;
///
/// let mut report = ErrorReport::new();
/// report.add("age", "This field must be at most 32.");
/// assert_eq!(
///     serde_json::to_string(&report).unwrap(),
///     r#"{"age":["This field must be at most 32."]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    fields: IndexMap<String, Vec<String>>,
}

impl ErrorReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message to a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Appends messages to a field. An empty list records nothing.
    pub fn extend_field(&mut self, field: &str, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        match self.fields.get_mut(field) {
            Some(existing) => existing.extend(messages),
            None => {
                self.fields.insert(field.to_owned(), messages);
            }
        }
    }

    /// Merges another report into this one.
    pub fn merge(&mut self, other: ErrorReport) {
        for (field, messages) in other.fields {
            self.extend_field(&field, messages);
        }
    }

    /// Merges another report, re-keying each of its fields under `prefix`.
    ///
    /// ```
    /// use sieve_validator::foundation::ErrorReport;
    ///
    /// let mut nested = ErrorReport::new();
    /// nested.add("line1", "This field is required.");
    ///
    /// let mut report = ErrorReport::new();
    /// report.merge_prefixed("address", nested);
    /// assert!(report.contains("address.line1"));
    /// ```
    pub fn merge_prefixed(&mut self, prefix: &str, other: ErrorReport) {
        for (field, messages) in other.fields {
            self.extend_field(&path::join(prefix, &field), messages);
        }
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns `true` if the field has at least one message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Iterates failing fields with their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Failing field paths in report order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The first message of the first failing field.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// One-line summary: the first message plus a count of the rest.
    ///
    /// ```
    /// use sieve_validator::foundation::ErrorReport;
    ///
    /// let mut report = ErrorReport::new();
    /// report.add("name", "This field is required.");
    /// report.add("age", "This field is required.");
    /// report.add("age", "This field must be a number.");
    /// assert_eq!(report.summary(), "This field is required. (and 2 more errors)");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let Some(first) = self.first_message() else {
            return "The given data was valid.".to_owned();
        };
        match self.message_count() - 1 {
            0 => first.to_owned(),
            1 => format!("{first} (and 1 more error)"),
            rest => format!("{first} (and {rest} more errors)"),
        }
    }

    /// `Ok(())` when empty, otherwise the report itself.
    pub fn into_result(self) -> Result<(), ErrorReport> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl<K, M> FromIterator<(K, Vec<M>)> for ErrorReport
where
    K: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<M>)>>(iter: I) -> Self {
        let mut report = Self::new();
        for (field, messages) in iter {
            let field = field.into();
            report.extend_field(&field, messages.into_iter().map(Into::into).collect());
        }
        report
    }
}

impl<'a> IntoIterator for &'a ErrorReport {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.len())?;
        for (field, messages) in &self.fields {
            write!(f, "; {field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

// ============================================================================
// RESPONSE BODY
// ============================================================================

/// Body an HTTP adapter sends for an invalid request.
///
/// ```
/// use sieve_validator::foundation::{ErrorReport, ValidationResponse};
///
/// let mut report = ErrorReport::new();
/// report.add("email", "This field is required.");
///
/// let body = ValidationResponse::from(report);
/// assert_eq!(ValidationResponse::STATUS_CODE, 422);
/// assert_eq!(
///     serde_json::to_value(&body).unwrap(),
///     serde_json::json!({
///         "message": "This field is required.",
///         "errors": { "email": ["This field is required."] }
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    /// Summary line, see [`ErrorReport::summary`].
    pub message: String,
    /// The full report.
    pub errors: ErrorReport,
}

impl ValidationResponse {
    /// Conventional status code for unprocessable input.
    pub const STATUS_CODE: u16 = 422;
}

impl From<ErrorReport> for ValidationResponse {
    fn from(errors: ErrorReport) -> Self {
        Self {
            message: errors.summary(),
            errors,
        }
    }
}
