//! Registry of rule constructors.
//!
//! The registry maps DSL names to constructors that bind coerced arguments
//! into a [`Rule`]. It is configured up front and passed explicitly to the
//! compiler; nothing is looked up from ambient global state at validation
//! time.
//!
//! ```
//! use serde_json::json;
//! use sieve_validator::{Rule, RuleRegistry, ValidationError};
//!
//! let mut registry = RuleRegistry::default();
//! registry.register("even", |_args| {
//!     Ok(Rule::for_value("even", |value| match value.as_i64() {
//!         Some(n) if n % 2 == 0 => Ok(()),
//!         _ => Err(ValidationError::new("even", "This field must be even.")),
//!     }))
//! });
//!
//! let chain = sieve_validator::dsl::compile("required|even", &registry).unwrap();
//! assert_eq!(chain.evaluate("n", &json!({ "n": 3 })).unwrap(), ["This field must be even."]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::dsl::{Arg, RuleToken};
use crate::foundation::{CompileError, Rule};

/// Builds a bound rule from coerced DSL arguments.
pub type RuleConstructor = Arc<dyn Fn(&[Arg]) -> Result<Rule, CompileError> + Send + Sync>;

static BUILTIN: LazyLock<RuleRegistry> = LazyLock::new(|| {
    let mut registry = RuleRegistry::empty();
    crate::validators::register_builtins(&mut registry);
    tracing::debug!(rules = registry.len(), "built-in rule registry initialised");
    registry
});

/// Name → constructor map used by the DSL compiler.
#[derive(Clone)]
pub struct RuleRegistry {
    constructors: HashMap<String, RuleConstructor>,
}

impl RuleRegistry {
    /// Creates a registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// The shared built-in catalog. Immutable; clone it to extend.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Registers a constructor, replacing any existing one with that name.
    ///
    /// `bail` and `nullable` are modifiers handled by the compiler and
    /// cannot be overridden here.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&[Arg]) -> Result<Rule, CompileError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.constructors.insert(name.clone(), Arc::new(constructor)).is_some() {
            tracing::debug!(rule = %name, "rule constructor replaced");
        }
        self
    }

    /// Registers a constructor, builder style.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rule<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&[Arg]) -> Result<Rule, CompileError> + Send + Sync + 'static,
    {
        self.register(name, constructor);
        self
    }

    /// Registers an alias for an existing rule.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> &mut Self {
        if let Some(constructor) = self.constructors.get(target).cloned() {
            self.constructors.insert(alias.into(), constructor);
        }
        self
    }

    /// Looks up a constructor.
    pub fn get(&self, name: &str) -> Option<&RuleConstructor> {
        self.constructors.get(name)
    }

    /// Returns `true` if a rule with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Binds a parsed token to a rule.
    pub fn construct(&self, token: &RuleToken) -> Result<Rule, CompileError> {
        let constructor = self
            .get(&token.name)
            .ok_or_else(|| CompileError::UnknownRule {
                name: token.name.clone(),
            })?;
        constructor(&token.args)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
