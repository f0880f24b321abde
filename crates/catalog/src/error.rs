use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a catalog overlay.
#[derive(Error, Debug)]
pub enum CatalogError {
	/// The overlay file could not be read.
	#[error("failed to read backend catalog {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The overlay file is not a valid catalog.
	#[error("invalid backend catalog {}: {source}", path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}
