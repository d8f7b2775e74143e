use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;
use tensorkey::test::helpers::{StridedTensor, cpu, f32_meta, meta};
use tensorkey::test::proptests::generators::kernel_meta;
use tensorkey::{KernelMeta, TensorMeta};
use tensorkey_dtype::{DeviceSpec, ScalarDType};

use crate::{CacheStats, KernelCache};

/// Stand-in for a compiled kernel: the specialization it was built for.
#[derive(Debug, PartialEq)]
struct FakeKernel {
    name: String,
}

fn compile(key: &KernelMeta) -> Result<FakeKernel, String> {
    let shapes: Vec<String> = key.iter().map(|m| format!("{}{:?}", m.dtype(), m.sizes())).collect();
    Ok(FakeKernel { name: shapes.join("_") })
}

fn binary_key(lhs: &[i64], rhs: &[i64]) -> KernelMeta {
    KernelMeta::new([f32_meta(lhs), f32_meta(rhs)])
}

#[test]
fn test_compiles_once_per_key() {
    let cache = KernelCache::new();
    let compiles = AtomicUsize::new(0);
    let counting = |key: &KernelMeta| {
        compiles.fetch_add(1, Ordering::Relaxed);
        compile(key)
    };

    let first = cache.get_or_compile(binary_key(&[2, 4], &[4]), counting).unwrap();
    let second = cache.get_or_compile(binary_key(&[2, 4], &[4]), counting).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(compiles.load(Ordering::Relaxed), 1);
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, entries: 1 });
}

#[test]
fn test_device_index_shares_kernel() {
    let cache = KernelCache::new();
    let on = |index| KernelMeta::new([meta(ScalarDType::Float32, DeviceSpec::cuda(index), &[8], &[1])]);

    let cuda0 = cache.get_or_compile(on(0), compile).unwrap();
    let cuda1 = cache.get_or_compile(on(1), compile).unwrap();

    assert!(Arc::ptr_eq(&cuda0, &cuda1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_specializations() {
    let cache = KernelCache::new();

    cache.get_or_compile(binary_key(&[2, 4], &[4]), compile).unwrap();
    cache.get_or_compile(binary_key(&[4], &[2, 4]), compile).unwrap();
    cache.get_or_compile(binary_key(&[4, 2], &[2]), compile).unwrap();
    cache
        .get_or_compile(KernelMeta::new([meta(ScalarDType::Float32, DeviceSpec::cuda(0), &[2, 4], &[4, 1])]), compile)
        .unwrap();

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.stats().misses, 4);
}

#[test]
fn test_compile_error_is_not_cached() {
    let cache: KernelCache<FakeKernel> = KernelCache::new();
    let key = binary_key(&[3], &[3]);

    let err = cache.get_or_compile(key.clone(), |_| Err::<FakeKernel, _>("no backend")).unwrap_err();
    assert_eq!(err, "no backend");
    assert!(cache.get(&key).is_none());

    let kernel = cache.get_or_compile(key.clone(), compile).unwrap();
    assert_eq!(kernel.name, "float32[Const(3)]_float32[Const(3)]");
}

#[test]
fn test_from_live_tensors() {
    let cache = KernelCache::new();
    let x = StridedTensor::contiguous(cpu(0), &[16, 16]);
    let w = StridedTensor::contiguous(cpu(0), &[16, 16]);

    let key = KernelMeta::from_tensors([(&x, ScalarDType::Float16), (&w, ScalarDType::Float16)]).unwrap();
    let kernel = cache.get_or_compile(key, compile).unwrap();

    let again = KernelMeta::from_tensors([(&x, ScalarDType::Float16), (&w, ScalarDType::Float16)]).unwrap();
    assert!(Arc::ptr_eq(&kernel, &cache.get(&again).unwrap()));
}

#[test]
fn test_insert_remove_retain_clear() {
    let cache = KernelCache::new();
    let a = binary_key(&[1], &[1]);
    let b = binary_key(&[2], &[2]);

    assert!(cache.insert(a.clone(), FakeKernel { name: "a".into() }).is_none());
    let previous = cache.insert(a.clone(), FakeKernel { name: "a2".into() }).unwrap();
    assert_eq!(previous.name, "a");
    cache.insert(b.clone(), FakeKernel { name: "b".into() });
    assert_eq!(cache.len(), 2);

    cache.retain(|key| key[0].sizes()[0].as_const() == Some(2));
    assert!(cache.get(&a).is_none());
    assert_eq!(cache.get(&b).unwrap().name, "b");

    assert_eq!(cache.remove(&b).unwrap().name, "b");
    assert!(cache.is_empty());

    cache.insert(a, FakeKernel { name: "a".into() });
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_concurrent_lookups_share_one_kernel() {
    let cache: KernelCache<FakeKernel> = KernelCache::new();
    let key = binary_key(&[32, 32], &[32]);

    let kernels: Vec<Arc<FakeKernel>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let key = key.clone();
                let cache = &cache;
                scope.spawn(move || cache.get_or_compile(key, compile).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), 1);
    let stored = cache.get(&key).unwrap();
    assert!(kernels.iter().all(|k| Arc::ptr_eq(k, &stored)));
}

proptest! {
    #[test]
    fn equal_keys_always_hit(key in kernel_meta(), index in 0u16..8) {
        let cache = KernelCache::new();
        let first = cache.get_or_compile(key.clone(), compile).unwrap();

        let moved: KernelMeta = key
            .iter()
            .map(|m| {
                let device = DeviceSpec::new(m.device().kind, Some(index));
                TensorMeta::with_scalar(false, m.dtype(), *m.scalar(), device, m.sizes().into(), m.strides().into())
                    .unwrap()
            })
            .collect();

        let second = cache.get_or_compile(moved, compile).unwrap();
        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(cache.len(), 1);
    }
}
