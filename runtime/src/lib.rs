//! Runtime side of kernel specialization.
//!
//! The `kernel_cache` module maps a [`tensorkey::KernelMeta`] (the ordered argument
//! descriptors of one invocation) to a compiled kernel handle, compiling at most
//! once per distinct key.

pub mod kernel_cache;


pub use kernel_cache::*;
