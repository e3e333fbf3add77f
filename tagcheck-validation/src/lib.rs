//! Declarative struct validation for tagcheck
//!
//! Rules are declared per field as comma separated tags
//! (`"required,min=3,dive,email"`), looked up by name in a
//! [`RuleRegistry`] and evaluated by a [`Walker`] while the type visits its
//! fields. Every failure is collected into [`ValidationErrors`], keyed by
//! field path.
//!
//! Types normally implement [`Validate`] through `#[derive(Validate)]` from
//! the `tagcheck` crate. The examples below use the engine directly.
//!
//! # Examples
//!
//! ## Predicates
//!
//! ```
//! use tagcheck_validation::predicates::{
//!     validates_coordinates, validates_phone, validates_timezone,
//! };
//!
//! assert!(validates_phone("(555) 123-4567"));
//! assert!(!validates_phone("555-1234"));
//!
//! assert!(validates_timezone("Europe/Berlin"));
//! assert!(!validates_timezone("Mars/Olympus"));
//!
//! assert!(validates_coordinates("40.7128,-74.0060"));
//! assert!(!validates_coordinates("north"));
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use tagcheck_validation::{FieldValue, RuleRegistry, RegistryConfig};
//!
//! let registry = RuleRegistry::builder(RegistryConfig::default())
//!     .defaults()
//!     .register("lowercase", |value| match value {
//!         FieldValue::Str(s) => s.chars().all(|c| !c.is_uppercase()),
//!         _ => false,
//!     })
//!     .unwrap()
//!     .build();
//!
//! let rule = registry.get("lowercase").unwrap();
//! assert_eq!(rule.check(&FieldValue::Str("quiet"), None), Ok(true));
//! assert_eq!(rule.check(&FieldValue::Str("LOUD"), None), Ok(false));
//! ```
//!
//! ## Rule Tags
//!
//! ```
//! use tagcheck_validation::ParsedTag;
//!
//! let tag = ParsedTag::parse("omitempty,max=3,dive,email").unwrap();
//! assert!(tag.field.omitempty);
//! assert_eq!(tag.rule_names().collect::<Vec<_>>(), vec!["max", "email"]);
//! ```
//!
//! ## Error Aggregate
//!
//! ```
//! use tagcheck_validation::ValidationErrors;
//!
//! let mut errors = ValidationErrors::new();
//! errors.add_error("phoneNumber", "phone");
//! errors.add_error("addresses[1].city", "required");
//!
//! assert!(errors.has_errors());
//! assert_eq!(
//!     errors.to_string(),
//!     "Validation error on fields: phoneNumber, addresses[1].city"
//! );
//! ```

mod config;
mod errors;
pub mod predicates;
pub mod registry;
mod rules;
mod traits;
mod validate;
mod value;
mod walker;

pub use config::*;
pub use errors::*;
pub use predicates::{validates_coordinates, validates_phone, validates_timezone};
pub use registry::{RegistryBuilder, Rule, RuleRegistry};
pub use rules::*;
pub use traits::*;
pub use validate::*;
pub use value::*;
pub use walker::*;
