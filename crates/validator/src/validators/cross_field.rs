//! Cross-field rules
//!
//! These compare the field against another path resolved in the same tree.
//! Inside nested or per-element validation the tree is the nested object,
//! so `other` names a sibling.

use crate::dsl::RuleRegistry;
use crate::foundation::{Rule, ValidationError, path};
use crate::validators::one_text;

/// The value must equal the value at `other`.
#[must_use]
pub fn same(other: impl Into<String>) -> Rule {
    let other = other.into();
    Rule::new("same", move |_, value, tree| {
        if value == path::resolve(tree, &other) {
            return Ok(());
        }
        Err(
            ValidationError::new("same", format!("This field must match {other}."))
                .with_param("other", other.clone())
                .into(),
        )
    })
}

/// The value must differ from the value at `other`. An absent `other`
/// always differs.
#[must_use]
pub fn different(other: impl Into<String>) -> Rule {
    let other = other.into();
    Rule::new("different", move |_, value, tree| {
        if value != path::resolve(tree, &other) {
            return Ok(());
        }
        Err(
            ValidationError::new("different", format!("This field must differ from {other}."))
                .with_param("other", other.clone())
                .into(),
        )
    })
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    registry
        .register("same", |args| Ok(same(one_text("same", args)?)))
        .register("different", |args| Ok(different(one_text("different", args)?)));
}
