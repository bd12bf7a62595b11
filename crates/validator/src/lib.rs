//! # sieve-validator
//!
//! Declarative validation of parameter trees: decoded request bodies, form
//! fields, anything that arrives as nested maps, sequences and scalars.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sieve_validator::prelude::*;
//!
//! let rules = RuleMap::compile(
//!     [("name", "required|string"), ("age", "required|numeric|min:2|max:32")],
//!     RuleRegistry::builtin(),
//! )
//! .unwrap();
//!
//! let report = rules.validate(&json!({})).unwrap_err().into_report().unwrap();
//! assert_eq!(report.get("name"), Some(&["This field is required.".to_owned()][..]));
//! assert_eq!(report.get("age"), Some(&["This field is required.".to_owned()][..]));
//! ```
//!
//! ## Pieces
//!
//! - [`dsl`] compiles `"required|min:3"` strings into [`RuleChain`]s against
//!   a [`RuleRegistry`] of rule constructors.
//! - [`schema`] holds [`RuleMap`], the field path → rules map, including
//!   nested object and array blocks.
//! - [`engine`] expands `*` patterns, walks the map and builds the
//!   [`ErrorReport`]; strict mode reports unknown fields.
//! - [`changeset`] lets an external validator stand in for a rule map.
//! - [`validators`] is the built-in rule catalog.
//!
//! ## Custom Rules
//!
//! Any function of `(path, value, tree)` is a rule; see [`Rule::new`],
//! [`Rule::implicit`] and [`Rule::for_value`]. Register a constructor on a
//! [`RuleRegistry`] to use it from the DSL.

// ValidationError is carried by value in every rule result; boxing it would
// add an allocation to each failing check.
#![allow(clippy::result_large_err)]

pub mod changeset;
pub mod dsl;
pub mod engine;
pub mod foundation;
pub mod prelude;
pub mod schema;
pub mod validators;

pub use dsl::RuleRegistry;
pub use engine::{Schema, ValidateOptions, validate};
pub use foundation::{
    CompileError, ErrorReport, Rule, RuleChain, RuleError, ValidateError, ValidationError,
    ValidationResponse, ValidationResult,
};
pub use schema::{FieldRules, RuleMap, RuleMapBuilder};
