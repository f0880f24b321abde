//! Write-once per-device table cache.
//!
//! Each [`TableCache`] serves one domain. The first lookup for a device kind
//! opens a backend, validates its table and stores it; every later lookup for
//! that kind returns the stored entry without touching the loader. Entries are
//! never replaced or evicted, and failed loads leave nothing behind so the
//! next lookup retries from the first candidate.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use kdispatch_abi::{Device, Domain, FunctionTable};
use kdispatch_catalog::BackendCatalog;
use parking_lot::{Mutex, RwLock};
use tracing::{info, trace};

use crate::resolve::resolve;
use crate::validate::extract;
use crate::{DiagnosticContext, DispatchError, LibraryHandle, LibraryLoader, SystemLoader};

/// Whether this build ships a portable backend for `generic_device`.
pub const GENERIC_DEVICE_SUPPORTED: bool = cfg!(any(feature = "generic-blas", feature = "portfft"));

/// A validated table together with the library that backs it.
///
/// Fields drop in declaration order, so the table goes before the handle that
/// keeps its entry points mapped.
pub struct LoadedTable<T> {
	table: T,
	library: LibraryHandle,
}

impl<T> LoadedTable<T> {
	pub fn table(&self) -> &T {
		&self.table
	}

	/// Name of the candidate library the table was loaded from.
	pub fn library(&self) -> &str {
		self.library.name()
	}
}

impl<T> Deref for LoadedTable<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.table
	}
}

impl<T: fmt::Debug> fmt::Debug for LoadedTable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoadedTable")
			.field("table", &self.table)
			.field("library", &self.library.name())
			.finish()
	}
}

/// Per-domain cache of function tables keyed by device kind.
pub struct TableCache<T: FunctionTable, L: LibraryLoader = SystemLoader> {
	domain: Domain,
	symbol: String,
	catalog: Arc<BackendCatalog>,
	loader: L,
	generic_device_supported: bool,
	entries: RwLock<HashMap<Device, Arc<LoadedTable<T>>>>,
	/// One gate per device kind so concurrent misses on the same kind load once
	/// while misses on different kinds proceed in parallel.
	loading: Mutex<HashMap<Device, Arc<Mutex<()>>>>,
}

impl<T: FunctionTable> TableCache<T> {
	/// Creates a cache that loads through the host operating system.
	pub fn new(domain: Domain, catalog: impl Into<Arc<BackendCatalog>>) -> Self {
		Self::with_loader(domain, catalog, SystemLoader)
	}
}

impl<T: FunctionTable, L: LibraryLoader> TableCache<T, L> {
	pub fn with_loader(domain: Domain, catalog: impl Into<Arc<BackendCatalog>>, loader: L) -> Self {
		let catalog = catalog.into();
		Self {
			domain,
			symbol: catalog.table_symbol(domain),
			catalog,
			loader,
			generic_device_supported: GENERIC_DEVICE_SUPPORTED,
			entries: RwLock::new(HashMap::new()),
			loading: Mutex::new(HashMap::new()),
		}
	}

	/// Overrides [`GENERIC_DEVICE_SUPPORTED`] for this cache.
	pub fn generic_device_supported(mut self, supported: bool) -> Self {
		self.generic_device_supported = supported;
		self
	}

	pub fn domain(&self) -> Domain {
		self.domain
	}

	/// Returns the table for `device`, loading it on first use.
	///
	/// `context` describes the caller's device for error reporting only; queues
	/// on devices of the same kind share one entry.
	pub fn lookup(
		&self,
		device: Device,
		context: &(impl DiagnosticContext + ?Sized),
	) -> Result<Arc<LoadedTable<T>>, DispatchError> {
		if let Some(entry) = self.get(device) {
			trace!(domain = %self.domain, %device, "backend table cache hit");
			return Ok(entry);
		}

		let gate = Arc::clone(self.loading.lock().entry(device).or_default());
		let _gate = gate.lock();

		// Another caller may have loaded it while we waited on the gate.
		if let Some(entry) = self.get(device) {
			return Ok(entry);
		}

		let loaded = Arc::new(self.load(device, context)?);
		info!(
			domain = %self.domain,
			%device,
			library = loaded.library(),
			version = loaded.table.version(),
			"loaded backend table"
		);
		let mut entries = self.entries.write();
		Ok(Arc::clone(entries.entry(device).or_insert(loaded)))
	}

	/// Opens, validates and pairs a table with its handle. The handle is
	/// dropped on every error path after it was opened.
	fn load(
		&self,
		device: Device,
		context: &(impl DiagnosticContext + ?Sized),
	) -> Result<LoadedTable<T>, DispatchError> {
		let candidates = self.catalog.candidates(self.domain, device);
		let library = resolve(
			&self.loader,
			self.domain,
			device,
			candidates,
			self.generic_device_supported,
			context,
		)?;
		let table = extract::<T>(&library, self.domain, device, &self.symbol)?;
		Ok(LoadedTable { table, library })
	}

	/// Returns the cached entry without loading.
	pub fn get(&self, device: Device) -> Option<Arc<LoadedTable<T>>> {
		self.entries.read().get(&device).cloned()
	}

	pub fn contains(&self, device: Device) -> bool {
		self.entries.read().contains_key(&device)
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Cached device kinds, sorted.
	pub fn devices(&self) -> Vec<Device> {
		let mut devices: Vec<_> = self.entries.read().keys().copied().collect();
		devices.sort();
		devices
	}
}

impl<T: FunctionTable, L: LibraryLoader> fmt::Debug for TableCache<T, L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableCache")
			.field("domain", &self.domain)
			.field("symbol", &self.symbol)
			.field("devices", &self.devices())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
