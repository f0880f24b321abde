//! In-process loader double that records what the cache asks of it.

use core::ffi::c_void;
use core::ptr::NonNull;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::{Library, LibraryLoader, LoaderError};

/// Counters shared by a [`FakeLoader`] and every library it opened.
#[derive(Debug, Default)]
pub(crate) struct Probe {
	opens: AtomicUsize,
	releases: AtomicUsize,
	attempts: Mutex<Vec<String>>,
}

impl Probe {
	/// Successful opens.
	pub fn opens(&self) -> usize {
		self.opens.load(Ordering::SeqCst)
	}

	pub fn releases(&self) -> usize {
		self.releases.load(Ordering::SeqCst)
	}

	/// Every name passed to `open`, successful or not, in call order.
	pub fn attempts(&self) -> Vec<String> {
		self.attempts.lock().clone()
	}
}

/// Loader whose libraries are maps from symbol name to in-process addresses.
#[derive(Debug, Default)]
pub(crate) struct FakeLoader {
	libraries: Mutex<HashMap<String, HashMap<String, usize>>>,
	probe: Arc<Probe>,
	open_delay: Duration,
}

impl FakeLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a library that opens but exports nothing.
	pub fn library(self, name: &str) -> Self {
		self.libraries.lock().entry(name.to_string()).or_default();
		self
	}

	/// Registers a library exporting `symbol` at the address of `value`.
	pub fn export<T: 'static>(self, name: &str, symbol: &str, value: &'static T) -> Self {
		self.install(name, symbol, value);
		self
	}

	/// Same as [`FakeLoader::export`], for a loader already handed to a cache.
	pub fn install<T: 'static>(&self, name: &str, symbol: &str, value: &'static T) {
		self.libraries
			.lock()
			.entry(name.to_string())
			.or_default()
			.insert(symbol.to_string(), value as *const T as usize);
	}

	/// Sleeps inside every `open` call.
	pub fn open_delay(mut self, delay: Duration) -> Self {
		self.open_delay = delay;
		self
	}

	pub fn probe(&self) -> Arc<Probe> {
		Arc::clone(&self.probe)
	}
}

impl LibraryLoader for FakeLoader {
	type Library = FakeLibrary;

	fn open(&self, name: &str) -> Result<FakeLibrary, LoaderError> {
		self.probe.attempts.lock().push(name.to_string());
		if !self.open_delay.is_zero() {
			std::thread::sleep(self.open_delay);
		}
		let symbols = self
			.libraries
			.lock()
			.get(name)
			.cloned()
			.ok_or_else(|| LoaderError::new(format!("{name}: cannot open shared object file: No such file or directory")))?;
		self.probe.opens.fetch_add(1, Ordering::SeqCst);
		Ok(FakeLibrary {
			symbols,
			probe: Arc::clone(&self.probe),
		})
	}
}

#[derive(Debug)]
pub(crate) struct FakeLibrary {
	symbols: HashMap<String, usize>,
	probe: Arc<Probe>,
}

impl Library for FakeLibrary {
	fn symbol(&self, name: &str) -> Result<NonNull<c_void>, LoaderError> {
		self.symbols
			.get(name)
			.and_then(|&addr| NonNull::new(addr as *mut c_void))
			.ok_or_else(|| LoaderError::new(format!("undefined symbol: {name}")))
	}
}

impl Drop for FakeLibrary {
	fn drop(&mut self) {
		self.probe.releases.fetch_add(1, Ordering::SeqCst);
	}
}
