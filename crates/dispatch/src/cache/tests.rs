use core::ffi::c_int;
use std::sync::{Arc, Barrier};
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::testing::FakeLoader;
use crate::{Remediation, SPEC_VERSION};

const SYMBOL: &str = "kdispatch_blas_table";

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct AddTable {
	version: c_int,
	add: extern "C" fn(i32, i32) -> i32,
}

unsafe impl FunctionTable for AddTable {}

extern "C" fn add(a: i32, b: i32) -> i32 {
	a + b
}

extern "C" fn add_saturating(a: i32, b: i32) -> i32 {
	a.saturating_add(b)
}

static CURRENT: AddTable = AddTable {
	version: SPEC_VERSION,
	add,
};

static SATURATING: AddTable = AddTable {
	version: SPEC_VERSION,
	add: add_saturating,
};

static STALE: AddTable = AddTable {
	version: SPEC_VERSION + 1,
	add,
};

fn catalog(pairs: &[(Device, &[&str])]) -> BackendCatalog {
	let mut catalog = BackendCatalog::empty();
	for (device, names) in pairs {
		catalog.set_candidates(Domain::Blas, *device, names.iter().map(|n| n.to_string()).collect());
	}
	catalog
}

fn cache(pairs: &[(Device, &[&str])], loader: FakeLoader) -> TableCache<AddTable, FakeLoader> {
	TableCache::with_loader(Domain::Blas, catalog(pairs), loader)
}

#[test]
fn first_lookup_loads_and_second_reuses() {
	let loader = FakeLoader::new().export("libcpu.so", SYMBOL, &CURRENT);
	let probe = loader.probe();
	let cache = cache(&[(Device::X86Cpu, &["libcpu.so"])], loader);
	assert!(cache.is_empty());
	assert!(!cache.contains(Device::X86Cpu));

	let first = cache.lookup(Device::X86Cpu, "cpu queue 0").unwrap();
	assert_eq!(cache.devices(), [Device::X86Cpu]);
	assert_eq!(first.library(), "libcpu.so");
	assert_eq!((first.add)(2, 3), 5);

	let second = cache.lookup(Device::X86Cpu, "cpu queue 1").unwrap();
	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(second.version(), first.version());
	assert_eq!(second.add as usize, first.add as usize);
	assert_eq!(probe.opens(), 1);
	assert_eq!(probe.attempts(), ["libcpu.so"]);
	assert_eq!(cache.len(), 1);
}

#[test]
fn candidates_are_tried_in_order_until_one_opens() {
	let loader = FakeLoader::new().export("b.so", SYMBOL, &CURRENT).export("c.so", SYMBOL, &SATURATING);
	let probe = loader.probe();
	let cache = cache(&[(Device::AmdGpu, &["a.so", "b.so", "c.so"])], loader);

	let table = cache.lookup(Device::AmdGpu, &()).unwrap();
	assert_eq!(table.library(), "b.so");
	assert_eq!(table.add as usize, add as usize);
	assert_eq!(probe.attempts(), ["a.so", "b.so"]);
}

#[rstest]
#[case::no_candidates(&[])]
#[case::all_fail(&["a.so", "b.so"])]
fn exhausted_candidates_report_backend_not_found(#[case] names: &[&str]) {
	let loader = FakeLoader::new();
	let probe = loader.probe();
	let cache = cache(&[(Device::NvidiaGpu, names)], loader);

	let err = cache.lookup(Device::NvidiaGpu, "gpu").unwrap_err();
	let DispatchError::BackendNotFound { attempts, device, .. } = &err else {
		panic!("expected BackendNotFound, got {err:?}");
	};
	assert_eq!(*device, Device::NvidiaGpu);
	let tried: Vec<_> = attempts.iter().map(|a| a.library.as_str()).collect();
	assert_eq!(tried, names);
	assert_eq!(probe.attempts(), names);
	assert_eq!(err.remediation(), Remediation::Install);
	assert!(cache.is_empty());
}

#[rstest]
#[case::unsupported(false)]
#[case::supported(true)]
fn generic_device_without_backend(#[case] supported: bool) {
	let cache = cache(&[(Device::GenericDevice, &["libgeneric.so"])], FakeLoader::new())
		.generic_device_supported(supported);

	let err = cache.lookup(Device::GenericDevice, "host device").unwrap_err();
	if supported {
		assert!(matches!(err, DispatchError::BackendNotFound { .. }), "got {err:?}");
	} else {
		assert_eq!(
			err,
			DispatchError::UnsupportedDevice {
				domain: Domain::Blas,
				device: Device::GenericDevice,
				context: "host device".to_string(),
			}
		);
		assert_eq!(err.remediation(), Remediation::Rebuild);
	}
}

#[test]
fn generic_device_loads_when_a_candidate_opens() {
	let loader = FakeLoader::new().export("libgeneric.so", SYMBOL, &CURRENT);
	let cache = cache(&[(Device::GenericDevice, &["libgeneric.so"])], loader).generic_device_supported(false);
	assert!(cache.lookup(Device::GenericDevice, &()).is_ok());
}

#[test]
fn missing_symbol_releases_handle() {
	let loader = FakeLoader::new().library("libempty.so");
	let probe = loader.probe();
	let cache = cache(&[(Device::IntelGpu, &["libempty.so"])], loader);

	let err = cache.lookup(Device::IntelGpu, &()).unwrap_err();
	let DispatchError::FunctionNotFound { library, symbol, .. } = &err else {
		panic!("expected FunctionNotFound, got {err:?}");
	};
	assert_eq!(library, "libempty.so");
	assert_eq!(symbol, SYMBOL);
	assert_eq!(err.remediation(), Remediation::Upgrade);
	assert_eq!(probe.opens(), 1);
	assert_eq!(probe.releases(), 1);
	assert!(cache.is_empty());
}

#[test]
fn version_mismatch_releases_handle() {
	let loader = FakeLoader::new().export("libold.so", SYMBOL, &STALE);
	let probe = loader.probe();
	let cache = cache(&[(Device::X86Cpu, &["libold.so"])], loader);

	let err = cache.lookup(Device::X86Cpu, &()).unwrap_err();
	assert_eq!(
		err,
		DispatchError::SpecificationMismatch {
			domain: Domain::Blas,
			device: Device::X86Cpu,
			library: "libold.so".to_string(),
			expected: SPEC_VERSION,
			found: SPEC_VERSION + 1,
		}
	);
	assert_eq!(probe.releases(), 1);
	assert!(cache.is_empty());
}

#[test]
fn failed_lookup_is_retried() {
	let loader = Arc::new(FakeLoader::new());
	let probe = loader.probe();
	let cache = TableCache::<AddTable, _>::with_loader(
		Domain::Blas,
		catalog(&[(Device::AmdGpu, &["librocm.so"])]),
		Arc::clone(&loader),
	);

	assert!(cache.lookup(Device::AmdGpu, &()).is_err());
	loader.install("librocm.so", SYMBOL, &CURRENT);
	let table = cache.lookup(Device::AmdGpu, &()).unwrap();

	assert_eq!(table.library(), "librocm.so");
	assert_eq!(probe.attempts(), ["librocm.so", "librocm.so"]);
	assert_eq!(probe.opens(), 1);
}

#[test]
fn device_kinds_sharing_a_library_open_it_separately() {
	let loader = FakeLoader::new().export("libshared.so", SYMBOL, &CURRENT);
	let probe = loader.probe();
	let cache = cache(
		&[(Device::X86Cpu, &["libshared.so"]), (Device::Aarch64Cpu, &["libshared.so"])],
		loader,
	);

	let x86 = cache.lookup(Device::X86Cpu, &()).unwrap();
	let arm = cache.lookup(Device::Aarch64Cpu, &()).unwrap();
	assert!(!Arc::ptr_eq(&x86, &arm));
	assert_eq!(probe.opens(), 2);
	assert_eq!(cache.devices(), [Device::X86Cpu, Device::Aarch64Cpu]);

	drop((x86, arm));
	assert_eq!(probe.releases(), 0);
	drop(cache);
	assert_eq!(probe.releases(), 2);
}

#[test]
fn held_table_keeps_library_open_past_cache() {
	let loader = FakeLoader::new().export("libcpu.so", SYMBOL, &CURRENT);
	let probe = loader.probe();
	let cache = cache(&[(Device::X86Cpu, &["libcpu.so"])], loader);

	let table = cache.lookup(Device::X86Cpu, &()).unwrap();
	drop(cache);
	assert_eq!(probe.releases(), 0);
	assert_eq!((table.add)(40, 2), 42);
	drop(table);
	assert_eq!(probe.releases(), 1);
}

#[test]
fn concurrent_misses_load_once() {
	const THREADS: usize = 16;

	let loader = FakeLoader::new()
		.export("libcpu.so", SYMBOL, &CURRENT)
		.open_delay(Duration::from_millis(20));
	let probe = loader.probe();
	let cache = cache(&[(Device::X86Cpu, &["libcpu.so"])], loader);
	let barrier = Barrier::new(THREADS);

	let tables: Vec<_> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..THREADS)
			.map(|i| {
				let cache = &cache;
				let barrier = &barrier;
				scope.spawn(move || {
					barrier.wait();
					cache.lookup(Device::X86Cpu, &format!("queue {i}")).unwrap()
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	assert_eq!(probe.opens(), 1);
	assert_eq!(probe.attempts().len(), 1);
	assert!(tables.iter().all(|t| Arc::ptr_eq(t, &tables[0])));
}

#[test]
fn concurrent_misses_on_different_kinds_load_each_once() {
	let loader = FakeLoader::new()
		.export("libcpu.so", SYMBOL, &CURRENT)
		.export("libgpu.so", SYMBOL, &SATURATING)
		.open_delay(Duration::from_millis(10));
	let probe = loader.probe();
	let cache = cache(
		&[(Device::X86Cpu, &["libcpu.so"]), (Device::NvidiaGpu, &["libgpu.so"])],
		loader,
	);

	std::thread::scope(|scope| {
		for i in 0..8 {
			let cache = &cache;
			let device = if i % 2 == 0 { Device::X86Cpu } else { Device::NvidiaGpu };
			scope.spawn(move || cache.lookup(device, &()).unwrap());
		}
	});

	assert_eq!(probe.opens(), 2);
	assert_eq!(cache.len(), 2);
	let gpu = cache.get(Device::NvidiaGpu).unwrap();
	assert_eq!((gpu.add)(i32::MAX, 1), i32::MAX);
}
