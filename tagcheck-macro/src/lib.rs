// Procedural macros for tagcheck
// Rules are declared as Go-style tags on struct fields

use proc_macro::TokenStream;

mod rename;
mod validate;

/// Derives `Validate`, `Nested` and `AsFieldValue` for a struct with named
/// fields.
///
/// Field attributes:
///
/// - `#[validate("required,min=3")]` rules for the field's value
/// - `#[validate("max=5,dive,email")]` rules after `dive` apply to each element
/// - `#[validate(nested)]` descend into a derived type (or `Option`/`Vec` of one)
/// - `#[validate("required", nested)]` both
///
/// Descending is opt-in: a field whose type derives `Validate` but lacks
/// `nested` is checked only against its own rule tag, and the rules declared
/// inside that type are not evaluated.
///
/// Reported field names follow `#[serde(rename)]` and the container's
/// `#[serde(rename_all)]`. Malformed tags are compile errors; unknown rule
/// names are checked against the registry at runtime.
#[proc_macro_derive(Validate, attributes(validate))]
pub fn validate_derive(input: TokenStream) -> TokenStream {
    validate::validate_derive_impl(input)
}
