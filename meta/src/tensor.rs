//! Lifting live tensors into metadata descriptors.
//!
//! A live tensor tells us its device and shape but the descriptor built from it
//! has no dtype yet. [`UntypedTensorMeta`] has no `Eq`/`Hash`, so it cannot be
//! used as a cache key until the caller supplies a dtype.

use tensorkey_dtype::{DeviceSpec, HasDType, Scalar, ScalarDType};

use crate::error::Result;
use crate::sint::{Dims, SInt, any_symbolic};
use crate::tensor_meta::TensorMeta;

/// Read-only view of a live tensor.
pub trait TensorHandle {
    fn device(&self) -> DeviceSpec;

    /// Per-dimension sizes, possibly symbolic.
    fn sym_sizes(&self) -> &[SInt];

    /// Per-dimension strides, possibly symbolic.
    fn sym_strides(&self) -> &[SInt];
}

/// Shape and device of a live tensor, still missing its dtype.
#[derive(Debug, Clone, PartialEq)]
pub struct UntypedTensorMeta {
    is_symbolic: bool,
    device: DeviceSpec,
    sizes: Dims,
    strides: Dims,
}

impl TensorMeta {
    /// Capture device, sizes and strides of a live tensor.
    ///
    /// Sizes are scanned for symbolic dimensions first; strides only if no
    /// size was symbolic.
    pub fn from_tensor<T: TensorHandle + ?Sized>(tensor: &T) -> UntypedTensorMeta {
        let sizes: Dims = tensor.sym_sizes().iter().copied().collect();
        let strides: Dims = tensor.sym_strides().iter().copied().collect();
        let is_symbolic = any_symbolic(&sizes, &strides);

        if is_symbolic {
            tracing::trace!(sizes = ?sizes, strides = ?strides, "symbolic dimension detected in live tensor");
        }

        UntypedTensorMeta { is_symbolic, device: tensor.device(), sizes, strides }
    }
}

impl UntypedTensorMeta {
    pub fn is_symbolic(&self) -> bool {
        self.is_symbolic
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

    /// Complete the descriptor with the default scalar payload.
    ///
    /// # Errors
    ///
    /// Fails if the tensor had symbolic dimensions.
    pub fn with_dtype(self, dtype: ScalarDType) -> Result<TensorMeta> {
        self.with_dtype_and_scalar(dtype, Scalar::default())
    }

    /// Complete the descriptor with the dtype of a Rust element type.
    pub fn with_dtype_of<T: HasDType>(self) -> Result<TensorMeta> {
        self.with_dtype(T::DTYPE)
    }

    /// Complete the descriptor with a dtype and representative scalar.
    pub fn with_dtype_and_scalar(self, dtype: ScalarDType, scalar: Scalar) -> Result<TensorMeta> {
        TensorMeta::with_scalar(self.is_symbolic, dtype, scalar, self.device, self.sizes, self.strides)
    }
}
