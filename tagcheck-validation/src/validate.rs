// Top-level validation entry points

use crate::{Error, RuleRegistry, Validate, ValidationErrors, Walker, registry};

/// Validate `instance` against the global registry.
///
/// Returns `Ok(())` when every rule passes, [`Error::Validation`] with
/// every failing field otherwise, and [`Error::Configuration`] when a
/// declared rule is unknown or misused.
pub fn validate_struct<T: Validate>(instance: &T) -> Result<(), Error> {
    validate_struct_with(registry::global(), instance)
}

/// Validate `instance` against an explicit registry
pub fn validate_struct_with<T: Validate>(
    registry: &RuleRegistry,
    instance: &T,
) -> Result<(), Error> {
    registry.check_cached::<T>()?;

    let mut walker = Walker::new(registry, T::NAME);
    instance.walk(&mut walker);

    let failures = walker.finish()?;
    if failures.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        target_type = T::NAME,
        failures = failures.len(),
        "Validation failed"
    );
    Err(Error::Validation(ValidationErrors::from_failures(failures)))
}
