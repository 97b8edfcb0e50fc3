use crate::model::{Value, ValueType};

/// Behaviour mapping a Rust type onto the value type of a declared flag.
///
/// Implemented for `bool`, `isize`, `i64`, `usize`, `u64`, `f64`, `String` and `Vec` of each.
/// A field of any other type cannot be declared.
pub trait Field: Sized {
    /// The value type declared for a flag of this type.
    fn value_type() -> ValueType;

    /// Extract the typed value, or `None` if the value holds a different type.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! field {
    ($type:ty, $value_type:expr, $variant:ident) => {
        impl Field for $type {
            fn value_type() -> ValueType {
                $value_type
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

field!(bool, ValueType::BOOL, Bool);
field!(isize, ValueType::INT, Int);
field!(i64, ValueType::INT64, Int64);
field!(usize, ValueType::UINT, Uint);
field!(u64, ValueType::UINT64, Uint64);
field!(f64, ValueType::FLOAT64, Float64);
field!(String, ValueType::STRING, String);
field!(Vec<bool>, ValueType::BOOLS, Bools);
field!(Vec<isize>, ValueType::INTS, Ints);
field!(Vec<i64>, ValueType::INT64S, Int64s);
field!(Vec<usize>, ValueType::UINTS, Uints);
field!(Vec<u64>, ValueType::UINT64S, Uint64s);
field!(Vec<f64>, ValueType::FLOAT64S, Float64s);
field!(Vec<String>, ValueType::STRINGS, Strings);
