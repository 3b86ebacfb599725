//! Zero-value policy and structure exposure for field types
//!
//! `IsEmpty` makes the "zero value" total across every kind the engine can
//! meet: numeric zero, `false`, the empty string, `None`, the empty sequence
//! or map, JSON null, and, recursively, a record all of whose fields are
//! empty. `Walkable` is how a field type shows its record structure to the
//! restoration walk; scalars expose nothing, `Option` and `Box` compose
//! through, sequences expose their elements.

use crate::shape::Record;
use std::collections::HashMap;

/// Total zero-value test for every field type.
///
/// Empty source fields are never copied by the excluded pass: an empty
/// excluded field must not overwrite a destination default.
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

/// How a field type exposes record structure to the restoration walk.
///
/// All methods default to "nothing to expose", which is correct for
/// scalars. `#[derive(Shape)]` overrides `as_record`; the container impls
/// below compose through `Option`, `Box`, and `Vec`.
pub trait Walkable {
    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    /// For sequences: the elements, index-aligned, `None` at indices whose
    /// element is absent (`Vec<Option<R>>`) or not a record at all.
    fn element_records(&self) -> Option<Vec<Option<&dyn Record>>> {
        None
    }

    fn element_records_mut(&mut self) -> Option<Vec<Option<&mut dyn Record>>> {
        None
    }
}

/// Implements `IsEmpty`, `Walkable`, and `WireMerge` for a leaf type that
/// behaves as an opaque scalar (an enum, a newtype). The type must be
/// `Clone + Default + PartialEq` and serde-deserializable; its zero value
/// is its `Default` and it merges from the wire by deserialization.
#[macro_export]
macro_rules! impl_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::IsEmpty for $ty {
            fn is_empty_value(&self) -> bool {
                *self == <$ty as ::core::default::Default>::default()
            }
        }

        impl $crate::Walkable for $ty {}

        impl $crate::WireMerge for $ty {
            fn merge_wire(
                &mut self,
                value: &$crate::wire::Value,
                path: &str,
            ) -> $crate::Result<()> {
                if value.is_null() {
                    return Ok(());
                }
                *self = $crate::__serde_json::from_value(value.clone())
                    .map_err(|e| $crate::Error::decoding(path, e))?;
                Ok(())
            }
        }
    )+};
}

impl_scalar!(bool, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T> IsEmpty for Option<T> {
    /// Only `None` is empty. A `Some` holding a zero value still expresses
    /// presence.
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

impl<T: Walkable> Walkable for Option<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(|inner| inner.as_record())
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_mut().and_then(|inner| inner.as_record_mut())
    }

    fn element_records(&self) -> Option<Vec<Option<&dyn Record>>> {
        self.as_ref().and_then(|inner| inner.element_records())
    }

    fn element_records_mut(&mut self) -> Option<Vec<Option<&mut dyn Record>>> {
        self.as_mut().and_then(|inner| inner.element_records_mut())
    }
}

impl<T: IsEmpty> IsEmpty for Box<T> {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: Walkable> Walkable for Box<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        (**self).as_record()
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        (**self).as_record_mut()
    }

    fn element_records(&self) -> Option<Vec<Option<&dyn Record>>> {
        (**self).element_records()
    }

    fn element_records_mut(&mut self) -> Option<Vec<Option<&mut dyn Record>>> {
        (**self).element_records_mut()
    }
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Walkable> Walkable for Vec<T> {
    fn element_records(&self) -> Option<Vec<Option<&dyn Record>>> {
        Some(self.iter().map(|element| element.as_record()).collect())
    }

    fn element_records_mut(&mut self) -> Option<Vec<Option<&mut dyn Record>>> {
        Some(
            self.iter_mut()
                .map(|element| element.as_record_mut())
                .collect(),
        )
    }
}

impl<T> IsEmpty for HashMap<String, T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

// String-keyed maps are not walked: their values carry no declared shape.
impl<T> Walkable for HashMap<String, T> {}

impl IsEmpty for serde_json::Value {
    fn is_empty_value(&self) -> bool {
        self.is_null()
    }
}

impl Walkable for serde_json::Value {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_zero_is_empty() {
        assert!(0i64.is_empty_value());
        assert!(0.0f64.is_empty_value());
        assert!(!1i64.is_empty_value());
    }

    #[test]
    fn test_negative_zero_is_empty_nan_is_not() {
        assert!((-0.0f64).is_empty_value());
        assert!(!f64::NAN.is_empty_value());
    }

    #[test]
    fn test_some_zero_is_not_empty() {
        assert!(None::<i64>.is_empty_value());
        assert!(!Some(0i64).is_empty_value());
    }

    #[test]
    fn test_containers() {
        assert!(String::new().is_empty_value());
        assert!(Vec::<String>::new().is_empty_value());
        assert!(HashMap::<String, i64>::new().is_empty_value());
        assert!(serde_json::Value::Null.is_empty_value());
        assert!(!serde_json::Value::Bool(false).is_empty_value());
    }
}
