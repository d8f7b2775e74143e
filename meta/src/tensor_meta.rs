//! Specialization-relevant metadata of one tensor argument.
//!
//! Two [`TensorMeta`] values are equal exactly when a kernel specialized for one
//! can be reused for the other:
//!
//! - symbolic flag, dtype and scalar payload match
//! - device *kind* matches (the index is ignored)
//! - sizes and strides match position by position
//!
//! Hashing (see [`crate::hash`]) folds the same fields in the same order, so
//! equal descriptors always hash equal.

use std::fmt;
use std::hash::{Hash, Hasher};

use bon::bon;
use snafu::ensure;
use tensorkey_dtype::{DeviceSpec, Scalar, ScalarDType};

use crate::config::Validation;
use crate::error::*;
use crate::hash::TensorMetaHasher;
use crate::sint::{Dims, SInt, any_symbolic};

/// Immutable tensor metadata descriptor.
#[derive(Debug, Clone)]
pub struct TensorMeta {
    is_symbolic: bool,
    dtype: ScalarDType,
    scalar: Scalar,
    device: DeviceSpec,
    sizes: Dims,
    strides: Dims,
}

#[bon]
impl TensorMeta {
    /// Create a descriptor with the default scalar payload (`Float(1.0)`).
    ///
    /// # Errors
    ///
    /// Fails if the descriptor is symbolic or sizes and strides differ in length.
    pub fn new(is_symbolic: bool, dtype: ScalarDType, device: DeviceSpec, sizes: Dims, strides: Dims) -> Result<Self> {
        Self::with_scalar(is_symbolic, dtype, Scalar::default(), device, sizes, strides)
    }

    /// Create a descriptor with an explicit representative scalar payload.
    ///
    /// Also available as a builder:
    ///
    /// ```rust
    /// # use tensorkey::{TensorMeta, sint::dims};
    /// # use tensorkey_dtype::{DeviceSpec, Scalar, ScalarDType};
    /// let meta = TensorMeta::builder()
    ///     .dtype(ScalarDType::Int64)
    ///     .scalar(Scalar::Int(3))
    ///     .device(DeviceSpec::cpu())
    ///     .sizes(dims([2, 4]))
    ///     .strides(dims([4, 1]))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(meta.rank(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if the descriptor is symbolic or sizes and strides differ in length,
    /// unless validation is globally disabled.
    #[builder(start_fn = builder, finish_fn = build)]
    pub fn with_scalar(
        #[builder(default)] is_symbolic: bool,
        dtype: ScalarDType,
        #[builder(default)] scalar: Scalar,
        device: DeviceSpec,
        #[builder(into)] sizes: Dims,
        #[builder(into)] strides: Dims,
    ) -> Result<Self> {
        let meta = Self { is_symbolic, dtype, scalar, device, sizes, strides };
        Validation::global().check(&meta)?;
        Ok(meta)
    }

    /// Create a descriptor without runtime validation.
    ///
    /// For dispatch paths that have already filtered out symbolic tensors.
    /// Debug builds still panic on symbolic or rank-mismatched input.
    pub fn new_unchecked(
        is_symbolic: bool,
        dtype: ScalarDType,
        scalar: Scalar,
        device: DeviceSpec,
        sizes: Dims,
        strides: Dims,
    ) -> Self {
        let meta = Self { is_symbolic, dtype, scalar, device, sizes, strides };
        meta.debug_assert_supported();
        meta
    }
}

impl TensorMeta {
    /// Check that this descriptor is usable as a cache key.
    ///
    /// # Errors
    ///
    /// - [`Error::SymbolicShape`] if declared symbolic
    /// - [`Error::SymbolicFlagMismatch`] if a size or stride is symbolic anyway
    /// - [`Error::RankMismatch`] if sizes and strides differ in length
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.is_symbolic, SymbolicShapeSnafu);

        let actual = any_symbolic(&self.sizes, &self.strides);
        ensure!(actual == self.is_symbolic, SymbolicFlagMismatchSnafu { declared: self.is_symbolic, actual });

        ensure!(
            self.sizes.len() == self.strides.len(),
            RankMismatchSnafu { sizes: self.sizes.len(), strides: self.strides.len() }
        );
        Ok(())
    }

    pub(crate) fn debug_assert_supported(&self) {
        debug_assert!(!self.is_symbolic, "symbolic shape not supported");
        debug_assert!(!any_symbolic(&self.sizes, &self.strides), "symbolic shape not supported");
        debug_assert_eq!(self.sizes.len(), self.strides.len(), "sizes and strides must have equal rank");
    }

    pub fn is_symbolic(&self) -> bool {
        self.is_symbolic
    }

    pub fn dtype(&self) -> ScalarDType {
        self.dtype
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    pub fn device(&self) -> &DeviceSpec {
        &self.device
    }

    pub fn sizes(&self) -> &[SInt] {
        &self.sizes
    }

    pub fn strides(&self) -> &[SInt] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.sizes.len()
    }

    /// Number of elements, `None` if any size is symbolic or the product overflows.
    pub fn numel(&self) -> Option<i64> {
        self.sizes.iter().try_fold(1i64, |acc, size| acc.checked_mul(size.as_const()?))
    }

    /// Row-major contiguity. Size-1 dimensions may carry any stride.
    pub fn is_contiguous(&self) -> bool {
        // `None` once the running extent no longer fits in i64.
        let mut expected = Some(1i64);
        for (size, stride) in self.sizes.iter().zip(&self.strides).rev() {
            let (Some(size), Some(stride)) = (size.as_const(), stride.as_const()) else {
                return false;
            };
            if size != 1 && expected != Some(stride) {
                return false;
            }
            expected = expected.and_then(|extent| extent.checked_mul(size));
        }
        true
    }
}

impl PartialEq for TensorMeta {
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(!self.is_symbolic, "symbolic shape not supported");

        self.is_symbolic == other.is_symbolic
            && self.dtype == other.dtype
            && self.scalar == other.scalar
            && self.device.same_kind(&other.device)
            && self.sizes == other.sizes
            && self.strides == other.strides
    }
}

impl Eq for TensorMeta {}

impl Hash for TensorMeta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(TensorMetaHasher.hash(self));
    }
}

fn write_dims(f: &mut fmt::Formatter<'_>, label: &str, dims: &[SInt]) -> fmt::Result {
    write!(f, "{label}:")?;
    for dim in dims {
        write!(f, " {dim}")?;
    }
    writeln!(f)
}

impl fmt::Display for TensorMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "is_symbolic: {}", self.is_symbolic)?;
        writeln!(f, "dtype: {}", self.dtype)?;
        writeln!(f, "scalar: {}({})", self.scalar.type_name(), self.scalar)?;
        writeln!(f, "device: {}", self.device)?;
        write_dims(f, "sizes", &self.sizes)?;
        write_dims(f, "strides", &self.strides)
    }
}
