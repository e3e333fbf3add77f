// Validation traits

use crate::{Error, RuleCatalog, RuleRegistry, Walker};

/// Trait for validatable types.
///
/// Usually derived with `#[derive(Validate)]`. A manual implementation
/// visits each annotated field through the [`Walker`] and lists the same
/// annotations in [`describe`](Validate::describe).
pub trait Validate {
    /// Root segment of every reported namespace, stripped from the final paths
    const NAME: &'static str;

    /// Visit the annotated fields of `self`
    fn walk(&self, walker: &mut Walker<'_>);

    /// List the declared rules without an instance
    fn describe(catalog: &mut RuleCatalog)
    where
        Self: Sized;

    /// Validate against the global registry
    fn validate(&self) -> Result<(), Error>
    where
        Self: Sized,
    {
        crate::validate_struct(self)
    }

    /// Validate against an explicit registry
    fn validate_with(&self, registry: &RuleRegistry) -> Result<(), Error>
    where
        Self: Sized,
    {
        crate::validate_struct_with(registry, self)
    }
}

/// Values a walk can descend into: derived types, and `Option`, `Vec`,
/// slices, arrays and boxes of them.
pub trait Nested {
    fn walk_nested(&self, walker: &mut Walker<'_>);

    fn describe_nested(catalog: &mut RuleCatalog)
    where
        Self: Sized;
}

impl<T: Nested> Nested for Option<T> {
    fn walk_nested(&self, walker: &mut Walker<'_>) {
        if let Some(value) = self {
            value.walk_nested(walker);
        }
    }

    fn describe_nested(catalog: &mut RuleCatalog) {
        T::describe_nested(catalog)
    }
}

impl<T: Nested> Nested for Box<T> {
    fn walk_nested(&self, walker: &mut Walker<'_>) {
        (**self).walk_nested(walker)
    }

    fn describe_nested(catalog: &mut RuleCatalog) {
        T::describe_nested(catalog)
    }
}

impl<T: Nested> Nested for [T] {
    fn walk_nested(&self, walker: &mut Walker<'_>) {
        for (index, item) in self.iter().enumerate() {
            walker.index(index, item);
        }
    }

    fn describe_nested(catalog: &mut RuleCatalog) {
        T::describe_nested(catalog)
    }
}

impl<T: Nested, const N: usize> Nested for [T; N] {
    fn walk_nested(&self, walker: &mut Walker<'_>) {
        self.as_slice().walk_nested(walker)
    }

    fn describe_nested(catalog: &mut RuleCatalog) {
        T::describe_nested(catalog)
    }
}

impl<T: Nested> Nested for Vec<T> {
    fn walk_nested(&self, walker: &mut Walker<'_>) {
        self.as_slice().walk_nested(walker)
    }

    fn describe_nested(catalog: &mut RuleCatalog) {
        T::describe_nested(catalog)
    }
}
