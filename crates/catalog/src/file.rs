use std::collections::BTreeMap;
use std::path::Path;

use kdispatch_abi::{Device, Domain};
use serde::Deserialize;

use crate::CatalogError;

/// On-disk catalog overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogFile {
	/// Start from an empty catalog instead of the built-in one.
	pub replace_builtin: bool,
	pub symbols: BTreeMap<Domain, String>,
	pub libraries: BTreeMap<Domain, BTreeMap<Device, Vec<String>>>,
}

impl CatalogFile {
	pub fn read(path: &Path) -> Result<Self, CatalogError> {
		let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		toml::from_str(&content).map_err(|source| CatalogError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Number of (domain, device) pairs this overlay sets.
	pub fn pair_count(&self) -> usize {
		self.libraries.values().map(BTreeMap::len).sum()
	}
}
