//! Combining hashes for tensor metadata and kernel keys.
//!
//! Field hashes come from a fixed-seed [`FxHasher`], so values are reproducible
//! across processes of the same build. Fields are folded with [`hash_combine`],
//! which is order-sensitive: `[2, 3]` and `[3, 2]` fold to different values.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::TensorMeta;
use crate::sint::SInt;

const GOLDEN_RATIO: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fold `value` into `seed` (64-bit boost `hash_combine`).
#[inline]
pub const fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value.wrapping_add(GOLDEN_RATIO).wrapping_add(seed << 6).wrapping_add(seed >> 2)
}

/// Hash a single value with the fixed-seed field hasher.
#[inline]
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Hash functor over one [`TensorMeta`].
///
/// Folds, in order: symbolic flag, dtype, scalar payload, device kind, every
/// concrete size, every concrete stride. Symbolic dimensions contribute nothing;
/// symbolic descriptors never get past construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorMetaHasher;

impl TensorMetaHasher {
    pub fn hash(&self, meta: &TensorMeta) -> u64 {
        let mut hash = hash_value(&meta.is_symbolic());
        hash = hash_combine(hash, hash_value(&meta.dtype()));
        hash = hash_combine(hash, hash_value(meta.scalar()));
        hash = hash_combine(hash, hash_value(&meta.device().kind));

        hash = fold_dims(hash, meta.sizes());
        fold_dims(hash, meta.strides())
    }
}

/// Fold the concrete entries of `dims` into `seed`, skipping symbolic ones.
pub(crate) fn fold_dims(seed: u64, dims: &[SInt]) -> u64 {
    dims.iter().filter_map(SInt::as_const).fold(seed, |hash, dim| hash_combine(hash, hash_value(&dim)))
}

/// Hash functor over an ordered argument list.
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelMetaHasher;

impl KernelMetaHasher {
    pub fn hash(&self, metas: &[TensorMeta]) -> u64 {
        metas.iter().fold(0, |hash, meta| hash_combine(hash, TensorMetaHasher.hash(meta)))
    }
}
