//! Boxed scalar payload carried by tensor metadata.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use crate::ScalarDType;

/// Representative scalar value used for scalar-tensor specialization.
///
/// Equality and hashing are by (variant, value). Floats compare by bit pattern
/// after folding `-0.0` into `0.0`, which keeps `Eq` and `Hash` total:
/// - NaN values with identical bit patterns are equal
/// - `0.0` and `-0.0` are the same payload
/// - `Int(1)` and `Float(1.0)` are different payloads
#[derive(Debug, Clone, Copy)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Scalar {
    /// Name of the payload variant, used in diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
        }
    }

    /// Widest dtype of the payload variant.
    pub const fn natural_dtype(&self) -> ScalarDType {
        match self {
            Self::Bool(_) => ScalarDType::Bool,
            Self::Int(_) => ScalarDType::Int64,
            Self::UInt(_) => ScalarDType::UInt64,
            Self::Float(_) => ScalarDType::Float64,
        }
    }

}

/// Bit pattern used for float equality and hashing; signed zeros share one key.
#[inline]
fn float_key(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::Float(1.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_key(a) == float_key(b),
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match *self {
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::UInt(v) => v.hash(state),
            Self::Float(v) => float_key(v).hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_scalar_from {
    ($($ty:ty => $variant:ident as $storage:ty),* $(,)?) => {
        $(impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                Self::$variant(value as $storage)
            }
        })*
    };
}

impl_scalar_from! {
    bool => Bool as bool,
    i8 => Int as i64, i16 => Int as i64, i32 => Int as i64, i64 => Int as i64,
    u8 => UInt as u64, u16 => UInt as u64, u32 => UInt as u64, u64 => UInt as u64,
    f32 => Float as f64, f64 => Float as f64,
}
