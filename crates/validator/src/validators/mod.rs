//! Built-in rules
//!
//! Every rule is available two ways: as a factory function returning a
//! bound [`Rule`](crate::Rule) (the programmatic form) and under a DSL name
//! in [`RuleRegistry::builtin`](crate::RuleRegistry::builtin). The DSL
//! constructors only parse arguments and call the factories, so both forms
//! build the same rule.
//!
//! # Categories
//!
//! - **Presence**: `required`, `required_with`, `present`, `filled`
//! - **Types**: `string`, `numeric`, `integer`, `array`, `map`
//! - **Size**: `min`, `max`, `between`, `size`
//! - **Content**: `in_list` (alias `in`), `not_in`, `email`, `regex`
//! - **Boolean**: `boolean`, `accepted`, `declined`
//! - **Cross-field**: `same`, `different`
//!
//! # Examples
//!
//! ```
//! use sieve_validator::validators::{max, numeric, required};
//! use sieve_validator::RuleChain;
//!
//! let age = RuleChain::new(vec![required(), numeric(), max(32.0)]);
//! assert_eq!(age.len(), 3);
//! ```

pub mod boolean;
pub mod content;
pub mod cross_field;
pub mod nullable;
pub mod range;
pub mod types;

use crate::dsl::{Arg, RuleRegistry};
use crate::foundation::CompileError;

pub use boolean::{accepted, boolean, declined};
pub use content::{email, in_list, matches_regex, not_in};
pub use cross_field::{different, same};
pub use nullable::{filled, is_empty_value, present, required, required_with};
pub use range::{between, max, min, size};
pub use types::{array, integer, map, numeric, string};

/// Registers every built-in rule.
pub fn register_builtins(registry: &mut RuleRegistry) {
    nullable::register(registry);
    types::register(registry);
    range::register(registry);
    content::register(registry);
    boolean::register(registry);
    cross_field::register(registry);
}

// ============================================================================
// ARGUMENT HELPERS
// ============================================================================

pub(crate) fn no_args(rule: &str, args: &[Arg]) -> Result<(), CompileError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CompileError::invalid_argument(rule, "takes no arguments"))
    }
}

pub(crate) fn one_number(rule: &str, args: &[Arg]) -> Result<f64, CompileError> {
    match args {
        [arg] => arg
            .as_f64()
            .ok_or_else(|| CompileError::invalid_argument(rule, format!("`{arg}` is not a number"))),
        _ => Err(CompileError::invalid_argument(
            rule,
            format!("expected 1 numeric argument, got {}", args.len()),
        )),
    }
}

pub(crate) fn two_numbers(rule: &str, args: &[Arg]) -> Result<(f64, f64), CompileError> {
    match args {
        [low, high] => {
            let low = one_number(rule, std::slice::from_ref(low))?;
            let high = one_number(rule, std::slice::from_ref(high))?;
            if low > high {
                return Err(CompileError::invalid_argument(
                    rule,
                    format!("lower bound {low} exceeds upper bound {high}"),
                ));
            }
            Ok((low, high))
        }
        _ => Err(CompileError::invalid_argument(
            rule,
            format!("expected 2 numeric arguments, got {}", args.len()),
        )),
    }
}

pub(crate) fn one_text(rule: &str, args: &[Arg]) -> Result<String, CompileError> {
    match args {
        [arg] if !arg.raw().is_empty() => Ok(arg.raw().to_owned()),
        _ => Err(CompileError::invalid_argument(
            rule,
            "expected exactly 1 non-empty argument",
        )),
    }
}

pub(crate) fn some_texts(rule: &str, args: &[Arg]) -> Result<Vec<String>, CompileError> {
    if args.is_empty() {
        return Err(CompileError::invalid_argument(
            rule,
            "expected at least 1 argument",
        ));
    }
    Ok(args.iter().map(|arg| arg.raw().to_owned()).collect())
}
