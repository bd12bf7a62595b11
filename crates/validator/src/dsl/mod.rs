//! Textual rule specifications.
//!
//! A specification such as `"required|min:3|in_list:a,b,c"` is compiled in
//! two stages:
//!
//! 1. [`parse`] turns the text into [`RuleToken`]s. This stage is pure and
//!    knows nothing about which rules exist.
//! 2. [`compile_tokens`] resolves each token against a [`RuleRegistry`] and
//!    binds the coerced arguments, producing a [`RuleChain`].
//!
//! [`compile`] runs both. The grammar is:
//!
//! ```text
//! spec  := token ('|' token)*
//! token := name (':' arg (',' arg)*)?
//! name  := [a-zA-Z_][a-zA-Z0-9_]*
//! arg   := [^,|]*
//! ```
//!
//! There is no escaping. Arguments containing `|` or `,` must be bound
//! programmatically instead.
//!
//! Two names are modifiers rather than rules: `bail` puts the chain in bail
//! mode and `nullable` makes it treat `null` as absent. Both may appear
//! anywhere in the specification.
//!
//! ```
//! use sieve_validator::dsl::compile;
//! use sieve_validator::RuleRegistry;
//!
//! let chain = compile("bail|required|string|min:3", RuleRegistry::builtin()).unwrap();
//! assert!(chain.is_bail());
//! assert_eq!(chain.len(), 3);
//! ```

pub mod registry;

use std::fmt;

use crate::foundation::{CompileError, RuleChain};

pub use registry::{RuleConstructor, RuleRegistry};

/// Separator between tokens.
pub const TOKEN_SEPARATOR: char = '|';
/// Separator between a rule name and its arguments.
pub const ARGS_SEPARATOR: char = ':';
/// Separator between arguments.
pub const ARG_SEPARATOR: char = ',';

/// Modifier switching the chain to bail mode.
pub const BAIL: &str = "bail";
/// Modifier making the chain treat `null` as absent.
pub const NULLABLE: &str = "nullable";

// ============================================================================
// TOKENS
// ============================================================================

/// Coerced form of a rule argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgValue {
    /// Parsed cleanly as an integer.
    Int(i64),
    /// Parsed cleanly as a finite float.
    Float(f64),
    /// Anything else.
    Text,
}

/// A rule argument: the text as written plus its coerced value.
///
/// Numeric rules read [`as_f64`](Self::as_f64); rules that take paths,
/// patterns or list members read [`raw`](Self::raw), so `regex:010` keeps
/// its leading zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    raw: String,
    value: ArgValue,
}

impl Arg {
    /// Coerces raw argument text. Never fails.
    ///
    /// ```
    /// use sieve_validator::dsl::{Arg, ArgValue};
    ///
    /// assert_eq!(Arg::coerce("5").value(), ArgValue::Int(5));
    /// assert_eq!(Arg::coerce("2.5").value(), ArgValue::Float(2.5));
    /// assert_eq!(Arg::coerce("inf").value(), ArgValue::Text);
    /// assert_eq!(Arg::coerce("007").raw(), "007");
    /// ```
    pub fn coerce(raw: &str) -> Self {
        let value = if let Ok(int) = raw.parse::<i64>() {
            ArgValue::Int(int)
        } else {
            match raw.parse::<f64>() {
                Ok(float) if float.is_finite() => ArgValue::Float(float),
                _ => ArgValue::Text,
            }
        };
        Self {
            raw: raw.to_owned(),
            value,
        }
    }

    /// The argument exactly as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The coerced value.
    pub fn value(&self) -> ArgValue {
        self.value
    }

    /// Numeric value, if the argument is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            ArgValue::Int(int) => Some(int as f64),
            ArgValue::Float(float) => Some(float),
            ArgValue::Text => None,
        }
    }

    /// Integer value, if the argument is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            ArgValue::Int(int) => Some(int),
            _ => None,
        }
    }

    /// Text value, if the argument did not coerce to a number.
    pub fn as_str(&self) -> Option<&str> {
        match self.value {
            ArgValue::Text => Some(&self.raw),
            _ => None,
        }
    }
}

impl From<&str> for Arg {
    fn from(raw: &str) -> Self {
        Self::coerce(raw)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One parsed `name:args` token.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleToken {
    /// Rule name.
    pub name: String,
    /// Coerced arguments, empty when the token has no `:`.
    pub args: Vec<Arg>,
}

// ============================================================================
// PARSER
// ============================================================================

/// Parses a specification into tokens.
pub fn parse(spec: &str) -> Result<Vec<RuleToken>, CompileError> {
    if spec.is_empty() {
        return Err(CompileError::EmptySpec);
    }
    spec.split(TOKEN_SEPARATOR).map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<RuleToken, CompileError> {
    let (name, args) = match token.split_once(ARGS_SEPARATOR) {
        Some((name, args)) => (name, Some(args)),
        None => (token, None),
    };

    if name.is_empty() {
        return Err(malformed(token, "missing rule name"));
    }
    if !is_valid_name(name) {
        return Err(malformed(
            token,
            "rule names must match [a-zA-Z_][a-zA-Z0-9_]*",
        ));
    }

    let args = args
        .map(|args| args.split(ARG_SEPARATOR).map(Arg::coerce).collect())
        .unwrap_or_default();

    Ok(RuleToken {
        name: name.to_owned(),
        args,
    })
}

fn malformed(token: &str, reason: &'static str) -> CompileError {
    CompileError::MalformedToken {
        token: token.to_owned(),
        reason,
    }
}

/// Checks a rule name against `[a-zA-Z_][a-zA-Z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// COMPILER
// ============================================================================

/// Parses and compiles a specification against a registry.
pub fn compile(spec: &str, registry: &RuleRegistry) -> Result<RuleChain, CompileError> {
    let tokens = parse(spec)?;
    let chain = compile_tokens(&tokens, registry)?;
    tracing::debug!(spec, rules = chain.len(), bail = chain.is_bail(), "compiled rule chain");
    Ok(chain)
}

/// Binds parsed tokens to rules from the registry, in token order.
pub fn compile_tokens(tokens: &[RuleToken], registry: &RuleRegistry) -> Result<RuleChain, CompileError> {
    let mut chain = RuleChain::default();
    for token in tokens {
        match token.name.as_str() {
            BAIL => {
                expect_no_args(token)?;
                chain = chain.bail();
            }
            NULLABLE => {
                expect_no_args(token)?;
                chain = chain.nullable();
            }
            _ => chain.push(registry.construct(token)?),
        }
    }
    Ok(chain)
}

fn expect_no_args(token: &RuleToken) -> Result<(), CompileError> {
    if token.args.is_empty() {
        Ok(())
    } else {
        Err(CompileError::invalid_argument(
            &token.name,
            "modifier takes no arguments",
        ))
    }
}
