//! Rule maps: the declarative schema a tree is validated against.
//!
//! A [`RuleMap`] is an ordered map from field path (concrete or pattern) to
//! [`FieldRules`]. Keys keep declaration order, which is also the order of
//! fields in the resulting [`ErrorReport`](crate::ErrorReport).
//!
//! Maps are built either programmatically or through [`RuleMapBuilder`],
//! which compiles DSL strings against a [`RuleRegistry`] and reports the
//! first configuration error once, from [`build`](RuleMapBuilder::build).
//!
//! ```
//! use serde_json::json;
//! use sieve_validator::{RuleMap, RuleRegistry};
//!
//! let rules = RuleMap::builder(RuleRegistry::builtin())
//!     .rules("name", "required|string")
//!     .nested("address", |address| address.rules("line1", "required"))
//!     .array("documents", |document| document.rules("name", "required|string"))
//!     .build()
//!     .unwrap();
//!
//! let report = rules
//!     .validate(&json!({ "address": {}, "documents": [{ "name": "a" }, {}] }))
//!     .unwrap_err()
//!     .into_report()
//!     .unwrap();
//!
//! assert_eq!(
//!     report.fields().collect::<Vec<_>>(),
//!     ["name", "address.line1", "documents.1.name"]
//! );
//! ```

use indexmap::IndexMap;

use crate::dsl::{self, RuleRegistry};
use crate::foundation::{CompileError, Rule, RuleChain, path};

// ============================================================================
// FIELD RULES
// ============================================================================

/// What is declared for one field path.
#[derive(Debug, Clone)]
pub enum FieldRules {
    /// Rules run against the field's own value.
    Chain(RuleChain),

    /// The field must be an object, validated against `rules`.
    ///
    /// A nullable block accepts an absent or `null` value without error.
    Nested {
        /// Rules for the object's own fields, relative to it.
        rules: RuleMap,
        /// Whether an absent or `null` value is accepted.
        nullable: bool,
    },

    /// The field must be a sequence; every element is validated against
    /// the map.
    Array(RuleMap),
}

impl FieldRules {
    /// Nested object rules, not nullable.
    pub fn nested(rules: RuleMap) -> Self {
        Self::Nested {
            rules,
            nullable: false,
        }
    }

    /// Nested object rules that accept an absent or `null` value.
    pub fn nullable_nested(rules: RuleMap) -> Self {
        Self::Nested {
            rules,
            nullable: true,
        }
    }

    /// Returns the chain if this is a [`Chain`](Self::Chain) entry.
    pub fn as_chain(&self) -> Option<&RuleChain> {
        match self {
            Self::Chain(chain) => Some(chain),
            Self::Nested { .. } | Self::Array(_) => None,
        }
    }
}

impl From<RuleChain> for FieldRules {
    fn from(chain: RuleChain) -> Self {
        Self::Chain(chain)
    }
}

impl From<Vec<Rule>> for FieldRules {
    fn from(rules: Vec<Rule>) -> Self {
        Self::Chain(RuleChain::new(rules))
    }
}

// ============================================================================
// RULE MAP
// ============================================================================

/// Ordered field path → [`FieldRules`] map.
#[derive(Debug, Clone, Default)]
pub struct RuleMap {
    entries: IndexMap<String, FieldRules>,
}

impl RuleMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder that compiles DSL strings against `registry`.
    pub fn builder(registry: &RuleRegistry) -> RuleMapBuilder<'_> {
        RuleMapBuilder::new(registry)
    }

    /// Compiles a flat map of DSL specifications.
    ///
    /// ```
    /// use sieve_validator::{RuleMap, RuleRegistry};
    ///
    /// let rules = RuleMap::compile(
    ///     [("name", "required|string"), ("age", "required|numeric|min:2|max:32")],
    ///     RuleRegistry::builtin(),
    /// )
    /// .unwrap();
    /// assert_eq!(rules.len(), 2);
    /// ```
    pub fn compile<I, K, S>(specs: I, registry: &RuleRegistry) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for (field, spec) in specs {
            let field = field.into();
            let chain = dsl::compile(spec.as_ref(), registry)
                .map_err(|error| error.in_field(field.as_str()))?;
            map.insert(field, chain)?;
        }
        tracing::debug!(fields = map.len(), "compiled rule map");
        Ok(map)
    }

    /// Declares rules for a field.
    ///
    /// The path must have no empty segments. Declaring the same path again
    /// replaces its rules and keeps its position.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        rules: impl Into<FieldRules>,
    ) -> Result<(), CompileError> {
        let field = field.into();
        path::validate(&field)?;
        self.entries.insert(field, rules.into());
        Ok(())
    }

    /// Declares rules for a field, builder style.
    pub fn with(
        mut self,
        field: impl Into<String>,
        rules: impl Into<FieldRules>,
    ) -> Result<Self, CompileError> {
        self.insert(field, rules)?;
        Ok(self)
    }

    /// Looks up the rules declared for a path, verbatim.
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.entries.get(field)
    }

    /// Number of declared paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared paths in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.entries.iter().map(|(field, rules)| (field.as_str(), rules))
    }

    /// Adds an expanded entry. A second chain for the same path is appended
    /// to the first; any other collision keeps the first entry.
    pub(crate) fn merge_entry(&mut self, field: String, rules: FieldRules) {
        match self.entries.get_mut(&field) {
            Some(FieldRules::Chain(existing)) => match rules {
                FieldRules::Chain(chain) => existing.absorb(chain),
                FieldRules::Nested { .. } | FieldRules::Array(_) => {
                    tracing::debug!(field = %field, "field declared twice, keeping the first rules");
                }
            },
            Some(_) => {
                tracing::debug!(field = %field, "field declared twice, keeping the first rules");
            }
            None => {
                self.entries.insert(field, rules);
            }
        }
    }
}

impl<'a> IntoIterator for &'a RuleMap {
    type Item = (&'a String, &'a FieldRules);
    type IntoIter = indexmap::map::Iter<'a, String, FieldRules>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds a [`RuleMap`] from DSL strings and nested blocks.
///
/// Every method records the first [`CompileError`] (attributed to its
/// field path) and ignores later declarations; [`build`](Self::build)
/// returns it.
#[derive(Debug)]
#[must_use = "builders do nothing until `build` is called"]
pub struct RuleMapBuilder<'r> {
    registry: &'r RuleRegistry,
    map: RuleMap,
    error: Option<CompileError>,
}

impl<'r> RuleMapBuilder<'r> {
    /// Creates an empty builder.
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            map: RuleMap::new(),
            error: None,
        }
    }

    /// Declares a chain from a DSL specification.
    pub fn rules(self, field: &str, spec: &str) -> Self {
        let chain = dsl::compile(spec, self.registry);
        self.declare(field, chain.map(FieldRules::Chain))
    }

    /// Declares a programmatic chain.
    pub fn chain(self, field: &str, chain: impl Into<RuleChain>) -> Self {
        self.declare(field, Ok(FieldRules::Chain(chain.into())))
    }

    /// Declares a nested object block.
    pub fn nested<F>(self, field: &str, block: F) -> Self
    where
        F: FnOnce(RuleMapBuilder<'r>) -> RuleMapBuilder<'r>,
    {
        let rules = self.sub_map(block);
        self.declare(field, rules.map(FieldRules::nested))
    }

    /// Declares a nested object block that accepts an absent or `null` value.
    pub fn nullable_nested<F>(self, field: &str, block: F) -> Self
    where
        F: FnOnce(RuleMapBuilder<'r>) -> RuleMapBuilder<'r>,
    {
        let rules = self.sub_map(block);
        self.declare(field, rules.map(FieldRules::nullable_nested))
    }

    /// Declares a sequence whose elements are validated by the block.
    pub fn array<F>(self, field: &str, block: F) -> Self
    where
        F: FnOnce(RuleMapBuilder<'r>) -> RuleMapBuilder<'r>,
    {
        let rules = self.sub_map(block);
        self.declare(field, rules.map(FieldRules::Array))
    }

    /// Finishes the map, or returns the first error recorded.
    pub fn build(self) -> Result<RuleMap, CompileError> {
        match self.error {
            Some(error) => Err(error),
            None => {
                tracing::debug!(fields = self.map.len(), "built rule map");
                Ok(self.map)
            }
        }
    }

    fn sub_map<F>(&self, block: F) -> Result<RuleMap, CompileError>
    where
        F: FnOnce(RuleMapBuilder<'r>) -> RuleMapBuilder<'r>,
    {
        block(RuleMapBuilder::new(self.registry)).build()
    }

    fn declare(mut self, field: &str, rules: Result<FieldRules, CompileError>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let inserted = rules.and_then(|rules| self.map.insert(field, rules));
        if let Err(error) = inserted {
            self.error = Some(error.in_field(field));
        }
        self
    }
}
