// Rule registry

use crate::predicates::{self, string_rule};
use crate::rules::{DIVE, OMITEMPTY};
use crate::{ConfigError, FieldValue, RegistryConfig, RuleCatalog, Validate};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};

type PredicateFn =
    Arc<dyn Fn(&FieldValue<'_>, Option<&str>) -> Result<bool, ConfigError> + Send + Sync>;

/// A named predicate.
#[derive(Clone)]
pub struct Rule {
    name: String,
    takes_param: bool,
    predicate: PredicateFn,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn takes_param(&self) -> bool {
        self.takes_param
    }

    /// Evaluate the rule. `Ok(false)` is a failure of the value;
    /// `Err` means the rule was misused.
    pub fn check(&self, value: &FieldValue<'_>, param: Option<&str>) -> Result<bool, ConfigError> {
        self.check_param(param)?;
        (self.predicate)(value, param)
    }

    /// Check that a parameter is present exactly when the rule takes one
    pub fn check_param(&self, param: Option<&str>) -> Result<(), ConfigError> {
        match (self.takes_param, param) {
            (true, None) => Err(ConfigError::invalid_parameter(
                &self.name,
                None,
                "rule requires a parameter",
            )),
            (false, Some(param)) => Err(ConfigError::invalid_parameter(
                &self.name,
                Some(param),
                "rule takes no parameter",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("takes_param", &self.takes_param)
            .finish_non_exhaustive()
    }
}

/// Immutable mapping from rule names to predicates.
///
/// Build one with [`RegistryBuilder`] and share it freely: lookups never
/// mutate, so concurrent validation calls only read. Clones share the set
/// of types already checked.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    config: RegistryConfig,
    rules: HashMap<String, Rule>,
    checked: Arc<RwLock<HashSet<&'static str>>>,
}

static GLOBAL: Lazy<RuleRegistry> = Lazy::new(|| {
    tracing::debug!("Initializing global rule registry");
    RuleRegistry::with_defaults(RegistryConfig::default())
});

/// Process-wide registry with the built-in rules and default configuration.
///
/// Initialized on first use, read-only afterwards.
pub fn global() -> &'static RuleRegistry {
    &GLOBAL
}

impl RuleRegistry {
    /// Create a registry without any rules
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            rules: HashMap::new(),
            checked: Arc::default(),
        }
    }

    /// Create a registry with the built-in vocabulary
    pub fn with_defaults(config: RegistryConfig) -> Self {
        RegistryBuilder::new(config).defaults().build()
    }

    pub fn builder(config: RegistryConfig) -> RegistryBuilder {
        RegistryBuilder::new(config)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every rule `T` declares, including nested types, against this
    /// registry without needing an instance.
    ///
    /// Run this at startup to catch unknown rule names and misused
    /// parameters before the first validation call.
    pub fn check<T: Validate>(&self) -> Result<(), ConfigError> {
        let mut catalog = RuleCatalog::new(self.config.field_names);
        T::describe(&mut catalog);

        for entry in catalog.entries() {
            let rule = self
                .get(&entry.rule)
                .ok_or_else(|| ConfigError::UnknownRule {
                    field: entry.field.clone(),
                    rule: entry.rule.clone(),
                })?;
            rule.check_param(entry.param.as_deref())?;
        }

        tracing::debug!(
            target_type = T::NAME,
            rules = catalog.entries().len(),
            "Rule annotations checked"
        );
        Ok(())
    }

    /// [`check`](Self::check), skipped for types that already passed.
    ///
    /// Runs before every validation, so annotations on fields the walk never
    /// reaches (empty values, empty collections, absent nested values) are
    /// still resolved.
    pub fn check_cached<T: Validate>(&self) -> Result<(), ConfigError> {
        let key = std::any::type_name::<T>();
        if self
            .checked
            .read()
            .is_ok_and(|checked| checked.contains(key))
        {
            return Ok(());
        }

        self.check::<T>()?;

        if let Ok(mut checked) = self.checked.write() {
            checked.insert(key);
        }
        Ok(())
    }
}

/// Builder for [`RuleRegistry`].
///
/// # Examples
///
/// ```
/// use tagcheck_validation::{RegistryBuilder, RegistryConfig};
///
/// let registry = RegistryBuilder::new(RegistryConfig::default())
///     .defaults()
///     .register("even", |value| matches!(value.as_str(), Some(s) if s.len() % 2 == 0))
///     .unwrap()
///     .build();
///
/// assert!(registry.contains("even"));
/// assert!(registry.contains("phone"));
/// ```
pub struct RegistryBuilder {
    config: RegistryConfig,
    rules: HashMap<String, Rule>,
}

impl RegistryBuilder {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            rules: HashMap::new(),
        }
    }

    /// Add the built-in vocabulary
    pub fn defaults(mut self) -> Self {
        self.insert("required", false, plain(predicates::required));

        self.insert("len", true, with_param(predicates::size_rule("len", Ordering::is_eq)));
        self.insert("min", true, with_param(predicates::size_rule("min", Ordering::is_ge)));
        self.insert("max", true, with_param(predicates::size_rule("max", Ordering::is_le)));
        self.insert("gt", true, with_param(predicates::size_rule("gt", Ordering::is_gt)));
        self.insert("gte", true, with_param(predicates::size_rule("gte", Ordering::is_ge)));
        self.insert("lt", true, with_param(predicates::size_rule("lt", Ordering::is_lt)));
        self.insert("lte", true, with_param(predicates::size_rule("lte", Ordering::is_le)));
        self.insert("eq", true, with_param(predicates::equals));
        self.insert("ne", true, with_param(predicates::not_equals));
        self.insert("oneof", true, with_param(predicates::one_of));

        self.insert("email", false, plain(string_rule(predicates::validates_email)));
        self.insert("url", false, plain(string_rule(predicates::validates_url)));
        self.insert("uuid", false, plain(string_rule(predicates::validates_uuid)));
        self.insert("alpha", false, plain(string_rule(predicates::validates_alpha)));
        self.insert("alphanum", false, plain(string_rule(predicates::validates_alphanumeric)));
        self.insert("numeric", false, plain(string_rule(predicates::validates_numeric)));

        self.insert("phone", false, plain(string_rule(predicates::validates_phone)));
        self.insert("timezone", false, plain(string_rule(predicates::validates_timezone)));
        self.insert("coordinates", false, plain(string_rule(predicates::validates_coordinates)));

        self
    }

    /// Register a rule that takes no parameter.
    ///
    /// Registering an existing name replaces the earlier rule.
    pub fn register<F>(mut self, name: &str, predicate: F) -> Result<Self, ConfigError>
    where
        F: Fn(&FieldValue<'_>) -> bool + Send + Sync + 'static,
    {
        check_rule_name(name)?;
        self.insert(name, false, plain(predicate));
        Ok(self)
    }

    /// Register a rule used as `name=param`.
    pub fn register_with_param<F>(mut self, name: &str, predicate: F) -> Result<Self, ConfigError>
    where
        F: Fn(&FieldValue<'_>, &str) -> Result<bool, ConfigError> + Send + Sync + 'static,
    {
        check_rule_name(name)?;
        self.insert(name, true, with_param(predicate));
        Ok(self)
    }

    pub fn build(self) -> RuleRegistry {
        tracing::debug!(rules = self.rules.len(), "Rule registry built");
        RuleRegistry {
            config: self.config,
            rules: self.rules,
            checked: Arc::default(),
        }
    }

    fn insert(&mut self, name: &str, takes_param: bool, predicate: PredicateFn) {
        let rule = Rule {
            name: name.to_string(),
            takes_param,
            predicate,
        };
        if self.rules.insert(name.to_string(), rule).is_some() {
            tracing::debug!(rule = %name, "Replaced registered rule");
        }
    }
}

fn plain<F>(predicate: F) -> PredicateFn
where
    F: Fn(&FieldValue<'_>) -> bool + Send + Sync + 'static,
{
    Arc::new(
        move |value: &FieldValue<'_>, _: Option<&str>| -> Result<bool, ConfigError> {
            Ok(predicate(value))
        },
    )
}

fn with_param<F>(predicate: F) -> PredicateFn
where
    F: Fn(&FieldValue<'_>, &str) -> Result<bool, ConfigError> + Send + Sync + 'static,
{
    Arc::new(
        move |value: &FieldValue<'_>, param: Option<&str>| -> Result<bool, ConfigError> {
            match param {
                Some(param) => predicate(value, param),
                None => Ok(false),
            }
        },
    )
}

fn check_rule_name(name: &str) -> Result<(), ConfigError> {
    let reserved = name == OMITEMPTY || name == DIVE;
    let malformed = name.is_empty()
        || name
            .chars()
            .any(|c| c == ',' || c == '=' || c.is_whitespace());

    if reserved || malformed {
        return Err(ConfigError::InvalidRuleName(name.to_string()));
    }
    Ok(())
}
