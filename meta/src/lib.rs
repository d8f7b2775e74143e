//! Tensor metadata descriptors and composite cache keys.
//!
//! A just-in-time kernel cache needs to know when a compiled specialization can
//! be reused. This crate defines that equivalence:
//!
//! - [`tensor_meta`] - [`TensorMeta`], the per-argument descriptor and its equality
//! - [`hash`] - combining hash functors for one descriptor and for a whole key
//! - [`kernel_meta`] - [`KernelMeta`], the ordered argument list used as cache key
//! - [`tensor`] - lifting live tensors into descriptors
//! - [`sint`] - concrete-or-symbolic dimensions
//! - [`config`] - validation settings
//! - [`error`] - error types
//!
//! Only static shapes are supported. Symbolic dimensions are detected and
//! rejected at construction.
//!
//! ```rust
//! use tensorkey::{KernelMeta, TensorMeta, sint::dims};
//! use tensorkey_dtype::{DeviceSpec, DeviceType, ScalarDType};
//!
//! let on = |index| DeviceSpec::new(DeviceType::Cpu, Some(index));
//! let a = TensorMeta::new(false, ScalarDType::Float32, on(0), dims([2, 4]), dims([4, 1])).unwrap();
//! let b = TensorMeta::new(false, ScalarDType::Float32, on(1), dims([2, 4]), dims([4, 1])).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(KernelMeta::new([a]), KernelMeta::new([b]));
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod kernel_meta;
pub mod sint;
pub mod tensor;
pub mod tensor_meta;


pub use config::Validation;
pub use error::{Error, Result};
pub use hash::{KernelMetaHasher, TensorMetaHasher, hash_combine};
pub use kernel_meta::KernelMeta;
pub use sint::{Dims, SInt, SymbolId};
pub use tensor::{TensorHandle, UntypedTensorMeta};
pub use tensor_meta::TensorMeta;

pub use tensorkey_dtype::{DeviceSpec, DeviceType, Scalar, ScalarDType};
