// Runtime view of field values

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Borrowed view of a single field's value, as seen by rule predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// An absent optional value
    Missing,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'a str),
    /// A collection; only its length is visible to rules
    Seq(usize),
    /// A derived struct. Never zero; its fields are validated by descending.
    Struct,
}

impl<'a> FieldValue<'a> {
    /// Whether the value is its type's zero value.
    ///
    /// `required` fails on zero values and `omitempty` skips them.
    pub fn is_zero(&self) -> bool {
        match *self {
            FieldValue::Missing => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Int(n) => n == 0,
            FieldValue::UInt(n) => n == 0,
            FieldValue::Float(n) => n == 0.0,
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Seq(len) => len == 0,
            FieldValue::Struct => false,
        }
    }

    /// The string content, if this is a string value
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Conversion of a field into a [`FieldValue`].
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self.as_str())
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value(),
            None => FieldValue::Missing,
        }
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(impl AsFieldValue for $ty {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::Int(*self as i64)
            }
        })*
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(impl AsFieldValue for $ty {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::UInt(*self as u64)
            }
        })*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl AsFieldValue for f32 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl AsFieldValue for f64 {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl<T> AsFieldValue for [T] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T, const N: usize> AsFieldValue for [T; N] {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(N)
    }
}

impl<T> AsFieldValue for Vec<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> AsFieldValue for VecDeque<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<K, V, S> AsFieldValue for HashMap<K, V, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<K, V> AsFieldValue for BTreeMap<K, V> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T, S> AsFieldValue for HashSet<T, S> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> AsFieldValue for BTreeSet<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

/// Collections whose elements can be checked individually (`dive`).
pub trait Elements {
    /// Call `f` with the index and value of every element, in order.
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>));
}

impl<T: AsFieldValue> Elements for [T] {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        for (index, item) in self.iter().enumerate() {
            f(index, item.as_field_value());
        }
    }
}

impl<T: AsFieldValue, const N: usize> Elements for [T; N] {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        self.as_slice().each_element(f)
    }
}

impl<T: AsFieldValue> Elements for Vec<T> {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        self.as_slice().each_element(f)
    }
}

impl<T: AsFieldValue> Elements for VecDeque<T> {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        for (index, item) in self.iter().enumerate() {
            f(index, item.as_field_value());
        }
    }
}

impl<C: Elements> Elements for Option<C> {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        if let Some(collection) = self {
            collection.each_element(f);
        }
    }
}

impl<C: Elements + ?Sized> Elements for &C {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        (**self).each_element(f)
    }
}

impl<C: Elements + ?Sized> Elements for Box<C> {
    fn each_element(&self, f: &mut dyn FnMut(usize, FieldValue<'_>)) {
        (**self).each_element(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert!(FieldValue::Missing.is_zero());
        assert!("".as_field_value().is_zero());
        assert!(0i32.as_field_value().is_zero());
        assert!(0u8.as_field_value().is_zero());
        assert!(0.0f64.as_field_value().is_zero());
        assert!(false.as_field_value().is_zero());
        assert!(Vec::<String>::new().as_field_value().is_zero());

        assert!(!"x".as_field_value().is_zero());
        assert!(!(-1i64).as_field_value().is_zero());
        assert!(!true.as_field_value().is_zero());
        assert!(!vec![1, 2].as_field_value().is_zero());
    }

    #[test]
    fn test_option_unwraps_to_inner_value() {
        let some: Option<String> = Some("hello".to_string());
        let none: Option<String> = None;

        assert_eq!(some.as_field_value(), FieldValue::Str("hello"));
        assert_eq!(none.as_field_value(), FieldValue::Missing);
    }

    #[test]
    fn test_collections_expose_length() {
        let mut map = HashMap::new();
        map.insert("a", 1);
        map.insert("b", 2);

        assert_eq!(map.as_field_value(), FieldValue::Seq(2));
        assert_eq!([1u8, 2, 3].as_field_value(), FieldValue::Seq(3));
    }

    #[test]
    fn test_each_element_visits_in_order() {
        let tags = vec!["a".to_string(), "".to_string()];
        let mut seen = Vec::new();
        tags.each_element(&mut |index, value| seen.push((index, value.is_zero())));

        assert_eq!(seen, vec![(0, false), (1, true)]);
    }
}
