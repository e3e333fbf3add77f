// Registry configuration

use serde::{Deserialize, Serialize};

/// Which name identifies a field in error reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldNameSource {
    /// The serde rename of the field when present, the identifier otherwise
    #[default]
    #[serde(alias = "json")]
    Serialized,

    /// Always the Rust field identifier
    Structural,
}

/// Configuration of a [`RuleRegistry`](crate::RuleRegistry).
///
/// # Examples
///
/// ```
/// use tagcheck_validation::{FieldNameSource, RegistryConfig};
///
/// let config: RegistryConfig =
///     serde_json::from_str(r#"{"field_names": "structural"}"#).unwrap();
/// assert_eq!(config.field_names, FieldNameSource::Structural);
///
/// // Missing keys fall back to the defaults.
/// let config: RegistryConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, RegistryConfig::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// How failing fields are named
    pub field_names: FieldNameSource,
}

impl RegistryConfig {
    /// Attribute the rules are read from. Fixed at compile time by the derive.
    pub const TAG_NAME: &'static str = "validate";

    /// Report fields by their Rust identifiers
    pub fn structural() -> Self {
        Self {
            field_names: FieldNameSource::Structural,
        }
    }
}
