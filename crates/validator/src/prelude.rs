//! Prelude module for convenient imports.
//!
//! Provides a single `use sieve_validator::prelude::*;` import that brings
//! in the schema types, the validation entry points and every built-in rule
//! factory.
//!
//! # Examples
//!
//! ```rust
//! use sieve_validator::prelude::*;
//!
//! let name = RuleChain::new(vec![required(), string(), min(3.0)]).bail();
//! let rules = RuleMap::new().with("name", name).unwrap();
//! assert!(rules.validate(&serde_json::json!({ "name": "ab" })).is_err());
//! ```

// ============================================================================
// FOUNDATION: Rules, errors, reports
// ============================================================================

pub use crate::foundation::{
    CompileError, ErrorReport, Rule, RuleChain, RuleError, ValidateError, ValidationError,
    ValidationResponse, ValidationResult,
};

// ============================================================================
// SCHEMA & ENGINE
// ============================================================================

pub use crate::changeset::{Changeset, ChangesetSchema};
pub use crate::dsl::RuleRegistry;
pub use crate::engine::{Schema, ValidateOptions, validate};
pub use crate::schema::{FieldRules, RuleMap, RuleMapBuilder};

// ============================================================================
// VALIDATORS: All built-in rule factories
// ============================================================================

pub use crate::validators::{
    accepted, array, between, boolean, declined, different, email, filled, in_list, integer, map,
    matches_regex, max, min, not_in, numeric, present, required, required_with, same, size, string,
};
