//! Core validation types
//!
//! This module contains the fundamental building blocks of the engine:
//!
//! - **Paths**: [`path`] for resolving, joining and flattening field paths
//! - **Rules**: [`Rule`], [`RuleChain`]
//! - **Errors**: [`ValidationError`], [`RuleError`], [`CompileError`], [`ValidateError`]
//! - **Reports**: [`ErrorReport`], [`ValidationResponse`]
//!
//! # Architecture
//!
//! A rule is a plain function of `(path, value, tree)`. Rules are grouped
//! into chains, chains are keyed by field path in a
//! [`RuleMap`](crate::schema::RuleMap), and the
//! [engine](crate::engine) walks that map against a parameter tree to build
//! an [`ErrorReport`].
//!
//! Field failures are data and end up in the report. Schema mistakes
//! ([`CompileError`]) and rule faults ([`ValidateError::RuleFault`]) are
//! errors and are never folded into a report.

pub mod error;
pub mod path;
pub mod report;
pub mod rule;

pub use error::{BoxError, CompileError, RuleError, ValidateError, ValidationError};
pub use report::{ErrorReport, ValidationResponse};
pub use rule::{Rule, RuleChain, RuleFn};

/// Result of a single validation call.
pub type ValidationResult = Result<(), ValidateError>;
