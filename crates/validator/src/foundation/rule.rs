//! Rules and rule chains.
//!
//! Every rule has the same signature: `(path, value, tree) -> Result<(), RuleError>`.
//! `value` is `None` when the field is absent from the tree; only *implicit*
//! rules (such as `required`) are ever called with `None`. Rules that do not
//! need the path or the whole tree simply ignore those arguments.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::path;
use crate::foundation::{RuleError, ValidateError, ValidationError};

/// Signature shared by all rule functions.
pub type RuleFn = dyn Fn(&str, Option<&Value>, &Value) -> Result<(), RuleError> + Send + Sync;

// ============================================================================
// RULE
// ============================================================================

/// A named, bound rule.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sieve_validator::foundation::{Rule, ValidationError};
///
/// let even = Rule::for_value("even", |value| match value.as_i64() {
///     Some(n) if n % 2 == 0 => Ok(()),
///     _ => Err(ValidationError::new("even", "This field must be even.")),
/// });
///
/// let tree = json!({});
/// assert!(even.check("n", Some(&json!(4)), &tree).is_ok());
/// assert!(even.check("n", Some(&json!(3)), &tree).is_err());
/// ```
#[derive(Clone)]
pub struct Rule {
    name: Cow<'static, str>,
    check: Arc<RuleFn>,
    implicit: bool,
    message: Option<Cow<'static, str>>,
}

impl Rule {
    /// Creates a rule from a full-signature function.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&str, Option<&Value>, &Value) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
            implicit: false,
            message: None,
        }
    }

    /// Creates an implicit rule, evaluated even when the field is absent.
    pub fn implicit<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&str, Option<&Value>, &Value) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        Self {
            implicit: true,
            ..Self::new(name, check)
        }
    }

    /// Creates a rule that only looks at a present value.
    pub fn for_value<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        Self::new(name, move |_, value, _| match value {
            Some(value) => check(value).map_err(RuleError::from),
            None => Ok(()),
        })
    }

    /// Replaces the failure message with a template.
    ///
    /// The template is rendered with [`ValidationError::render`]: `{field}`
    /// is the field path, `{name}` any param of the underlying error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Rule name, as used in the DSL.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the rule runs for absent fields.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Runs the rule. Faults pass through untouched.
    pub fn check(&self, path: &str, value: Option<&Value>, tree: &Value) -> Result<(), RuleError> {
        let result = (self.check)(path, value, tree);
        match (result, &self.message) {
            (Err(RuleError::Invalid(error)), Some(template)) => {
                let message = error.render(template, path);
                Err(RuleError::Invalid(error.with_message(message)))
            }
            (result, _) => result,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("implicit", &self.implicit)
            .field("message", &self.message)
            .field("check", &"<function>")
            .finish()
    }
}

// ============================================================================
// RULE CHAIN
// ============================================================================

/// Ordered rules bound to one field.
///
/// By default every rule runs and every failure is reported. A *bail* chain
/// stops at the first failure. A *nullable* chain treats an explicit `null`
/// like an absent field, so only implicit rules see it.
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Rule>,
    bail: bool,
    nullable: bool,
}

impl RuleChain {
    /// Creates a collect-all chain.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            bail: false,
            nullable: false,
        }
    }

    /// Switches the chain to bail mode.
    #[must_use = "builder methods must be chained or built"]
    pub fn bail(mut self) -> Self {
        self.bail = true;
        self
    }

    /// Treats `null` as absent.
    #[must_use = "builder methods must be chained or built"]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Appends a rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Appends a rule, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends another chain's rules; modes combine.
    pub(crate) fn absorb(&mut self, other: RuleChain) {
        self.rules.extend(other.rules);
        self.bail |= other.bail;
        self.nullable |= other.nullable;
    }

    /// The bound rules in execution order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether the chain stops at the first failure.
    pub fn is_bail(&self) -> bool {
        self.bail
    }

    /// Whether `null` is treated as absent.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves `field` in `tree` and runs the chain against it.
    ///
    /// Returns the failure messages in rule order (at most one for bail
    /// chains). A faulting rule aborts with [`ValidateError::RuleFault`].
    pub fn evaluate(&self, field: &str, tree: &Value) -> Result<Vec<String>, ValidateError> {
        self.evaluate_value(field, path::resolve(tree, field), tree)
    }

    /// Runs the chain against an already resolved value.
    pub fn evaluate_value(
        &self,
        field: &str,
        value: Option<&Value>,
        tree: &Value,
    ) -> Result<Vec<String>, ValidateError> {
        let value = match value {
            Some(Value::Null) if self.nullable => None,
            other => other,
        };

        let mut messages = Vec::new();
        for rule in &self.rules {
            if value.is_none() && !rule.is_implicit() {
                tracing::trace!(field, rule = rule.name(), "skipped, field absent");
                continue;
            }
            match rule.check(field, value, tree) {
                Ok(()) => {}
                Err(RuleError::Invalid(error)) => {
                    tracing::trace!(field, rule = rule.name(), code = %error.code, "rule failed");
                    messages.push(error.message.into_owned());
                    if self.bail {
                        break;
                    }
                }
                Err(RuleError::Fault(source)) => {
                    tracing::warn!(field, rule = rule.name(), error = %source, "rule faulted");
                    return Err(ValidateError::RuleFault {
                        field: field.to_owned(),
                        rule: rule.name().to_owned(),
                        source,
                    });
                }
            }
        }
        Ok(messages)
    }
}

impl From<Vec<Rule>> for RuleChain {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl FromIterator<Rule> for RuleChain {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
