// Validation errors

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A single failing rule, as reported by the [`Walker`](crate::Walker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// Full dotted path, starting with the root type name (`User.address.city`)
    pub namespace: String,

    /// Name of the failing field itself (`city`, `tags[2]`)
    pub field: String,

    /// Rule that failed
    pub rule: String,

    /// Rule parameter, for parameterised rules
    pub param: Option<String>,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}: {}={}", self.namespace, self.rule, param),
            None => write!(f, "{}: {}", self.namespace, self.rule),
        }
    }
}

/// Drop the root type segment from a walker namespace.
pub(crate) fn strip_root(namespace: &str) -> &str {
    namespace.split_once('.').map(|(_, rest)| rest).unwrap_or("")
}

/// All validation failures of one validation call, keyed by field path.
///
/// Every key maps to a non-empty list of reason codes (rule names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, Vec<String>>")]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the aggregate from walker output.
    ///
    /// The root segment of each namespace is stripped and every failing
    /// rule is kept, in the order the walker reported them.
    pub fn from_failures(failures: impl IntoIterator<Item = FieldFailure>) -> Self {
        let mut errors = Self::new();
        for failure in failures {
            errors.add_error(strip_root(&failure.namespace), failure.rule);
        }
        errors
    }

    /// Append a reason to a field's reason list, creating the list if absent
    pub fn add_error(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(reason.into());
    }

    /// Check if any field failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of distinct failing fields (not total reasons)
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the reasons recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Failing field paths, in discovery order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, reasons)| (field.as_str(), reasons.as_slice()))
    }

    /// Fold another collection into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, reasons) in other.errors {
            self.errors.entry(field).or_default().extend(reasons);
        }
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_errors() {
            return Ok(());
        }

        let fields: Vec<&str> = self.fields().collect();
        write!(f, "Validation error on fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.errors.serialize(serializer)
    }
}

impl TryFrom<IndexMap<String, Vec<String>>> for ValidationErrors {
    type Error = String;

    fn try_from(errors: IndexMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        if let Some((field, _)) = errors.iter().find(|(_, reasons)| reasons.is_empty()) {
            return Err(format!("field '{}' has no validation reasons", field));
        }
        Ok(Self { errors })
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Misconfiguration of rules: a programmer error, never a field failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown validation rule '{rule}' on field '{field}'")]
    UnknownRule { field: String, rule: String },

    #[error("Invalid parameter '{param}' for rule '{rule}': {reason}")]
    InvalidParameter {
        rule: String,
        param: String,
        reason: String,
    },

    #[error("Invalid rule name: '{0}'")]
    InvalidRuleName(String),

    #[error("Malformed rule tag \"{tag}\": {reason}")]
    MalformedTag { tag: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid_parameter(
        rule: &str,
        param: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidParameter {
            rule: rule.to_string(),
            param: param.unwrap_or_default().to_string(),
            reason: reason.into(),
        }
    }
}

/// Error returned by [`validate_struct`](crate::validate_struct).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Validation misconfigured: {0}")]
    Configuration(#[from] ConfigError),
}

impl Error {
    /// The field failures, if this is a validation error
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            Error::Configuration(_) => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}
