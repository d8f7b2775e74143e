//! Leaf vocabulary for tensor metadata keys.
//!
//! Everything here is a small `Copy` (or near-`Copy`) value type:
//!
//! - [`ScalarDType`] - element type of a tensor
//! - [`DeviceType`] / [`DeviceSpec`] - where a tensor lives
//! - [`Scalar`] - a representative boxed scalar used for scalar-tensor specialization

pub mod device;
pub mod error;
pub mod ext;
pub mod scalar;


use enumset::{EnumSet, enum_set};

pub use device::{DeviceSpec, DeviceType};
pub use error::{Error, Result};
pub use ext::HasDType;
pub use scalar::Scalar;

/// Scalar element types.
#[derive(Debug, Hash, PartialOrd, Ord)]
#[derive(strum::EnumCount, strum::EnumIter, strum::VariantArray, strum::FromRepr)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr)]
#[derive(enumset::EnumSetType)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarDType {
    Bool = 0,

    UInt8 = 1,
    Int8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Int64 = 7,
    UInt64 = 8,

    Float16 = 9,
    BFloat16 = 10,
    Float32 = 11,
    Float64 = 12,
}

impl ScalarDType {
    pub const SIGNED: EnumSet<Self> =
        enum_set!(ScalarDType::Int8 | ScalarDType::Int16 | ScalarDType::Int32 | ScalarDType::Int64);
    pub const UNSIGNED: EnumSet<Self> =
        enum_set!(ScalarDType::UInt8 | ScalarDType::UInt16 | ScalarDType::UInt32 | ScalarDType::UInt64);
    pub const FLOATS: EnumSet<Self> =
        enum_set!(ScalarDType::Float16 | ScalarDType::BFloat16 | ScalarDType::Float32 | ScalarDType::Float64);

    pub const fn bytes(&self) -> usize {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 | Self::Float16 | Self::BFloat16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_signed(&self) -> bool {
        Self::SIGNED.contains(*self)
    }

    pub fn is_unsigned(&self) -> bool {
        Self::UNSIGNED.contains(*self)
    }

    pub fn is_int(&self) -> bool {
        Self::SIGNED.union(Self::UNSIGNED).contains(*self)
    }

    pub fn is_float(&self) -> bool {
        Self::FLOATS.contains(*self)
    }

    /// Lower-case name, e.g. `float32`.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Parse a dtype name (case insensitive).
    ///
    /// ```rust
    /// # use tensorkey_dtype::ScalarDType;
    /// assert_eq!(ScalarDType::parse("Float32").unwrap(), ScalarDType::Float32);
    /// assert!(ScalarDType::parse("float128").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        name.parse().map_err(|_| Error::UnknownDType { name: name.to_string() })
    }
}
