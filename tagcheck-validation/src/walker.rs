// Struct walker: evaluates declared rules while a type visits its fields

use crate::errors::strip_root;
use crate::{
    AsFieldValue, ConfigError, Elements, FieldFailure, FieldNameSource, FieldRules, FieldValue,
    Nested, RuleRegistry, RuleSet,
};

/// Name of a struct field: its Rust identifier and, if renamed, its
/// serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldName {
    pub ident: &'static str,
    pub serialized: Option<&'static str>,
}

impl FieldName {
    pub const fn new(ident: &'static str, serialized: Option<&'static str>) -> Self {
        Self { ident, serialized }
    }

    /// The name reported under the given naming source
    pub fn resolve(&self, source: FieldNameSource) -> &'static str {
        match (source, self.serialized) {
            (FieldNameSource::Serialized, Some(serialized)) => serialized,
            _ => self.ident,
        }
    }
}

/// Collects rule failures while a [`Validate`](crate::Validate) type walks
/// its fields.
///
/// Every rule of every field is evaluated; nothing short-circuits. Rules
/// the registry does not know, or misused parameters, are kept apart as a
/// [`ConfigError`] and never reported as field failures.
pub struct Walker<'r> {
    registry: &'r RuleRegistry,
    naming: FieldNameSource,
    path: Vec<String>,
    failures: Vec<FieldFailure>,
    config_error: Option<ConfigError>,
}

impl<'r> Walker<'r> {
    /// Start a walk rooted at the type named `root`
    pub fn new(registry: &'r RuleRegistry, root: &str) -> Self {
        Self {
            registry,
            naming: registry.config().field_names,
            path: vec![root.to_string()],
            failures: Vec::new(),
            config_error: None,
        }
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    /// Evaluate the field's rules against `value`
    pub fn field<V>(&mut self, name: FieldName, value: &V, rules: &FieldRules)
    where
        V: AsFieldValue + ?Sized,
    {
        let field = name.resolve(self.naming);
        self.evaluate(field, value.as_field_value(), &rules.field);
    }

    /// Evaluate the field's rules, then the post-`dive` rules on each element
    pub fn field_with_elements<V>(&mut self, name: FieldName, value: &V, rules: &FieldRules)
    where
        V: AsFieldValue + Elements + ?Sized,
    {
        let field = name.resolve(self.naming);
        self.evaluate(field, value.as_field_value(), &rules.field);

        if let Some(elements) = &rules.elements {
            if !self.resolve(field, elements) {
                return;
            }
            value.each_element(&mut |index: usize, element: FieldValue<'_>| {
                let element_name = format!("{}[{}]", field, index);
                self.evaluate(&element_name, element, elements);
            });
        }
    }

    /// Descend into a nested value under `name`
    pub fn nested<N>(&mut self, name: FieldName, value: &N)
    where
        N: Nested + ?Sized,
    {
        self.path.push(name.resolve(self.naming).to_string());
        value.walk_nested(self);
        self.path.pop();
    }

    /// Descend into the element at `index` of the collection being walked
    pub fn index<N>(&mut self, index: usize, value: &N)
    where
        N: Nested + ?Sized,
    {
        let Some(segment) = self.path.last_mut() else {
            return;
        };
        let saved = segment.len();
        segment.push_str(&format!("[{}]", index));

        value.walk_nested(self);

        if let Some(segment) = self.path.last_mut() {
            segment.truncate(saved);
        }
    }

    /// Dotted path of the current position, root included
    pub fn namespace(&self) -> String {
        self.path.join(".")
    }

    /// Finish the walk
    pub fn finish(self) -> Result<Vec<FieldFailure>, ConfigError> {
        match self.config_error {
            Some(error) => Err(error),
            None => Ok(self.failures),
        }
    }

    /// Look up every rule of `set`, whether or not the value is evaluated.
    /// Returns `false` if any is unknown.
    fn resolve(&mut self, field: &str, set: &RuleSet) -> bool {
        let registry = self.registry;
        let mut known = true;

        for spec in set.rules.iter() {
            if !registry.contains(spec.name) {
                let namespace = format!("{}.{}", self.namespace(), field);
                self.misconfigured(ConfigError::UnknownRule {
                    field: strip_root(&namespace).to_string(),
                    rule: spec.name.to_string(),
                });
                known = false;
            }
        }
        known
    }

    fn evaluate(&mut self, field: &str, value: FieldValue<'_>, set: &RuleSet) {
        if !self.resolve(field, set) {
            return;
        }
        if set.omitempty && value.is_zero() {
            return;
        }

        let registry = self.registry;
        let namespace = format!("{}.{}", self.namespace(), field);

        for spec in set.rules.iter() {
            let Some(rule) = registry.get(spec.name) else {
                continue;
            };

            match rule.check(&value, spec.param) {
                Ok(true) => {
                    tracing::trace!(field = %namespace, rule = %spec.name, "Rule passed");
                }
                Ok(false) => {
                    tracing::debug!(field = %namespace, rule = %spec.name, "Rule failed");
                    self.failures.push(FieldFailure {
                        namespace: namespace.clone(),
                        field: field.to_string(),
                        rule: spec.name.to_string(),
                        param: spec.param.map(str::to_string),
                    });
                }
                Err(error) => self.misconfigured(error),
            }
        }
    }

    fn misconfigured(&mut self, error: ConfigError) {
        tracing::warn!(%error, "Validation rule misconfigured");
        if self.config_error.is_none() {
            self.config_error = Some(error);
        }
    }
}

/// One declared rule, as collected by [`RuleCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Field path relative to the root type
    pub field: String,
    pub rule: String,
    pub param: Option<String>,
}

/// Static listing of the rules a type declares, used to check annotations
/// against a registry before any value is validated.
#[derive(Debug)]
pub struct RuleCatalog {
    naming: FieldNameSource,
    path: Vec<String>,
    visited: Vec<&'static str>,
    entries: Vec<CatalogEntry>,
}

impl RuleCatalog {
    pub fn new(naming: FieldNameSource) -> Self {
        Self {
            naming,
            path: Vec::new(),
            visited: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Mark a type as being described. Returns `false` if an enclosing
    /// field already describes it, so recursive types terminate.
    pub fn enter(&mut self, type_name: &'static str) -> bool {
        if self.visited.contains(&type_name) {
            return false;
        }
        self.visited.push(type_name);
        true
    }

    /// Record the rules declared on a field
    pub fn field(&mut self, name: FieldName, rules: &FieldRules) {
        let field = self.field_path(name.resolve(self.naming));
        for spec in rules.specs() {
            self.entries.push(CatalogEntry {
                field: field.clone(),
                rule: spec.name.to_string(),
                param: spec.param.map(str::to_string),
            });
        }
    }

    /// Describe the nested type of a field
    pub fn nested<N: Nested>(&mut self, name: FieldName) {
        let depth = self.visited.len();
        self.path.push(name.resolve(self.naming).to_string());
        N::describe_nested(self);
        self.path.pop();
        self.visited.truncate(depth);
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    fn field_path(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.path.join("."), field)
        }
    }
}
