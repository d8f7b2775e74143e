//! Cache key for one kernel invocation: the ordered argument descriptors.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use smallvec::SmallVec;
use tensorkey_dtype::ScalarDType;

use crate::error::Result;
use crate::hash::KernelMetaHasher;
use crate::tensor::TensorHandle;
use crate::tensor_meta::TensorMeta;

/// Ordered, immutable list of argument descriptors.
///
/// Equality is elementwise and positional, so `[a, b] != [b, a]` for distinct
/// `a` and `b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelMeta(SmallVec<[TensorMeta; 4]>);

impl KernelMeta {
    pub fn new(metas: impl IntoIterator<Item = TensorMeta>) -> Self {
        metas.into_iter().collect()
    }

    /// Build a key from live tensors and their dtypes.
    ///
    /// # Errors
    ///
    /// Fails on the first argument with symbolic dimensions.
    pub fn from_tensors<'a, T>(args: impl IntoIterator<Item = (&'a T, ScalarDType)>) -> Result<Self>
    where
        T: TensorHandle + ?Sized + 'a,
    {
        args.into_iter().map(|(tensor, dtype)| TensorMeta::from_tensor(tensor).with_dtype(dtype)).collect()
    }

    pub fn as_slice(&self) -> &[TensorMeta] {
        &self.0
    }
}

impl Deref for KernelMeta {
    type Target = [TensorMeta];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Hash for KernelMeta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(KernelMetaHasher.hash(&self.0));
    }
}

impl FromIterator<TensorMeta> for KernelMeta {
    fn from_iter<I: IntoIterator<Item = TensorMeta>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<TensorMeta>> for KernelMeta {
    fn from(metas: Vec<TensorMeta>) -> Self {
        Self(SmallVec::from_vec(metas))
    }
}

impl<'a> IntoIterator for &'a KernelMeta {
    type Item = &'a TensorMeta;
    type IntoIter = std::slice::Iter<'a, TensorMeta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for KernelMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, meta) in self.0.iter().enumerate() {
            writeln!(f, "arg {idx}:")?;
            for line in meta.to_string().lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
