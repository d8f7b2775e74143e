//! Kernel specialization cache.
//!
//! Maps a [`KernelMeta`] to a compiled kernel. Two invocations share a kernel
//! exactly when their keys are equal: same dtypes, scalar payloads, device kinds,
//! sizes and strides, argument by argument. Device indices are not part of the
//! key, so a kernel compiled for `CUDA:0` is served to `CUDA:1`.
//!
//! # Thread Safety
//!
//! Backed by papaya's lock-free HashMap. Multiple threads can look up and compile
//! kernels concurrently without explicit synchronization.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use papaya::{Compute, HashMap, Operation};
use tensorkey::KernelMeta;

/// Hit/miss counters and current size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Concurrent map from argument metadata to compiled kernels.
///
/// Kernels live until removed via [`KernelCache::remove`], [`KernelCache::retain`]
/// or [`KernelCache::clear`].
pub struct KernelCache<K> {
    kernels: HashMap<KernelMeta, Arc<K>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K> Default for KernelCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> KernelCache<K> {
    pub fn new() -> Self {
        Self { kernels: HashMap::new(), hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    /// Look up a kernel without compiling.
    pub fn get(&self, key: &KernelMeta) -> Option<Arc<K>> {
        let guard = self.kernels.guard();
        self.kernels.get(key, &guard).map(Arc::clone)
    }

    /// Get or compile the kernel specialized for `key`.
    ///
    /// If multiple threads race on the same key, each may compile, but exactly one
    /// result is stored and every caller receives that one.
    ///
    /// # Errors
    ///
    /// Returns the error of `compile_fn`; nothing is cached in that case.
    pub fn get_or_compile<F, E>(&self, key: KernelMeta, compile_fn: F) -> Result<Arc<K>, E>
    where
        F: FnOnce(&KernelMeta) -> Result<K, E>,
    {
        let guard = self.kernels.guard();

        // Fast path: kernel already cached
        if let Some(cached) = self.kernels.get(&key, &guard) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(args = key.len(), "kernel cache hit");
            return Ok(Arc::clone(cached));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(args = key.len(), "kernel cache miss, compiling specialization");

        // Slow path: compile kernel (expensive)
        let compiled = Arc::new(compile_fn(&key)?);

        // Atomic insert - if another thread beat us, use their kernel
        match self.kernels.compute(
            key,
            |entry| match entry {
                Some((_, existing)) => Operation::Abort(Arc::clone(existing)),
                None => Operation::Insert(Arc::clone(&compiled)),
            },
            &guard,
        ) {
            Compute::Inserted(_, kernel) => Ok(Arc::clone(kernel)),
            Compute::Aborted(kernel) => {
                tracing::debug!("concurrent compile won the race, discarding local kernel");
                Ok(kernel)
            }
            _ => Ok(compiled),
        }
    }

    /// Insert or replace the kernel for `key`, returning the previous one.
    pub fn insert(&self, key: KernelMeta, kernel: K) -> Option<Arc<K>> {
        let guard = self.kernels.guard();
        self.kernels.insert(key, Arc::new(kernel), &guard).map(Arc::clone)
    }

    pub fn remove(&self, key: &KernelMeta) -> Option<Arc<K>> {
        let guard = self.kernels.guard();
        self.kernels.remove(key, &guard).map(Arc::clone)
    }

    /// Keep only the kernels whose key satisfies `keep`.
    pub fn retain(&self, mut keep: impl FnMut(&KernelMeta) -> bool) {
        let guard = self.kernels.guard();
        self.kernels.retain(|key, _| keep(key), &guard);
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Drop every cached kernel. Counters are kept.
    pub fn clear(&self) {
        let guard = self.kernels.guard();
        self.kernels.clear(&guard);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
