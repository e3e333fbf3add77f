// tagcheck - Declarative struct field validation
//
// Annotate fields with rule tags, validate an instance in one call and get
// every violation back at once, keyed by field path.

//! # Example
//!
//! ```
//! use serde::Serialize;
//! use tagcheck::{Error, Validate};
//!
//! #[derive(Serialize, Validate)]
//! #[serde(rename_all = "camelCase")]
//! struct Contact {
//!     #[validate("required,email")]
//!     email: String,
//!     #[validate("phone")]
//!     phone_number: String,
//!     #[validate("omitempty,timezone")]
//!     time_zone: String,
//!     #[validate("omitempty,coordinates")]
//!     location: Option<String>,
//! }
//!
//! let contact = Contact {
//!     email: "jane@example.com".to_string(),
//!     phone_number: "555-1234".to_string(),
//!     time_zone: "Mars/Olympus".to_string(),
//!     location: None,
//! };
//!
//! match tagcheck::validate_struct(&contact) {
//!     Err(Error::Validation(errors)) => {
//!         assert_eq!(errors.get("phoneNumber"), Some(&["phone".to_string()][..]));
//!         assert_eq!(errors.get("timeZone"), Some(&["timezone".to_string()][..]));
//!         assert!(errors.get("location").is_none());
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

// Re-export the validation engine
pub use tagcheck_validation::*;

// Re-export the derive macro
pub use tagcheck_macro::Validate;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        Error, FieldNameSource, RegistryConfig, RuleRegistry, Validate, ValidationErrors,
        validate_struct, validate_struct_with,
    };
}
