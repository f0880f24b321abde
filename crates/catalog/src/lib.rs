//! Backend catalog: which libraries to try for each domain and device, and
//! which symbol each domain's table is exported under.
//!
//! The built-in table ([`BackendCatalog::builtin`]) lists the vendor backend
//! first and the portable backend last for every pair. A TOML overlay can
//! replace individual candidate lists or table symbols:
//!
//! ```toml
//! replace_builtin = false
//!
//! [symbols]
//! blas = "custom_blas_table"
//!
//! [libraries.blas]
//! nvidiagpu = ["libmy_cublas.so", "libkdispatch_blas_generic.so"]
//! ```
//!
//! The overlay is looked up by [`BackendCatalog::load`]: first the path in
//! `KDISPATCH_CATALOG`, then `<config dir>/kdispatch/backends.toml`.

mod builtin;
mod error;
mod file;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kdispatch_abi::{Device, Domain};
use tracing::{debug, info};

pub use builtin::library_file_name;
pub use error::CatalogError;
pub use file::CatalogFile;

/// Environment variable naming an overlay file.
pub const CATALOG_ENV: &str = "KDISPATCH_CATALOG";

/// Candidate library names per (domain, device) and table symbols per domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendCatalog {
	libraries: BTreeMap<Domain, BTreeMap<Device, Vec<String>>>,
	symbols: BTreeMap<Domain, String>,
}

impl BackendCatalog {
	/// Creates a catalog with no candidates and default symbols.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Creates the catalog shipped with this build.
	pub fn builtin() -> Self {
		let mut catalog = Self::empty();
		for &(domain, device, backends) in builtin::BACKENDS {
			let names = backends
				.iter()
				.map(|backend| library_file_name(domain, backend))
				.collect();
			catalog.set_candidates(domain, device, names);
		}
		catalog
	}

	/// Loads the built-in catalog plus the overlay from the environment or the
	/// user config directory, if one exists.
	pub fn load() -> Result<Self, CatalogError> {
		match overlay_path() {
			Some(path) => Self::load_from(&path),
			None => {
				debug!("no backend catalog overlay found");
				Ok(Self::builtin())
			}
		}
	}

	/// Loads the built-in catalog and applies the overlay at `path`.
	pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
		debug!(path = %path.display(), "reading backend catalog overlay");
		let overlay = CatalogFile::read(path)?;
		info!(
			path = %path.display(),
			pairs = overlay.pair_count(),
			symbols = overlay.symbols.len(),
			replace_builtin = overlay.replace_builtin,
			"applied backend catalog overlay"
		);
		let mut catalog = if overlay.replace_builtin {
			Self::empty()
		} else {
			Self::builtin()
		};
		catalog.apply(overlay);
		Ok(catalog)
	}

	/// Applies an overlay; each mentioned pair's list is replaced wholesale.
	pub fn apply(&mut self, overlay: CatalogFile) {
		for (domain, devices) in overlay.libraries {
			for (device, names) in devices {
				self.set_candidates(domain, device, names);
			}
		}
		self.symbols.extend(overlay.symbols);
	}

	/// Ordered candidate names for a pair; empty when none are registered.
	pub fn candidates(&self, domain: Domain, device: Device) -> &[String] {
		self.libraries
			.get(&domain)
			.and_then(|devices| devices.get(&device))
			.map(Vec::as_slice)
			.unwrap_or(&[])
	}

	/// Replaces the candidate list for a pair.
	pub fn set_candidates(&mut self, domain: Domain, device: Device, names: Vec<String>) -> &mut Self {
		self.libraries.entry(domain).or_default().insert(device, names);
		self
	}

	/// Symbol the domain's table is exported under.
	pub fn table_symbol(&self, domain: Domain) -> String {
		self.symbols
			.get(&domain)
			.cloned()
			.unwrap_or_else(|| domain.default_table_symbol())
	}

	pub fn set_table_symbol(&mut self, domain: Domain, symbol: impl Into<String>) -> &mut Self {
		self.symbols.insert(domain, symbol.into());
		self
	}

	/// Device kinds with at least one candidate registered for `domain`.
	pub fn devices(&self, domain: Domain) -> impl Iterator<Item = Device> + '_ {
		self.libraries
			.get(&domain)
			.into_iter()
			.flat_map(|devices| devices.iter())
			.filter(|(_, names)| !names.is_empty())
			.map(|(device, _)| *device)
	}
}

/// Resolves the overlay path: `KDISPATCH_CATALOG` wins, then the config dir
/// file if it exists.
fn overlay_path() -> Option<PathBuf> {
	if let Some(path) = std::env::var_os(CATALOG_ENV) {
		return Some(PathBuf::from(path));
	}
	dirs::config_dir()
		.map(|dir| dir.join("kdispatch").join("backends.toml"))
		.filter(|path| path.is_file())
}
