use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// A family of computational routines sharing one function table layout.
///
/// Each domain is served by its own table cache and resolves its own exported
/// table symbol inside a backend library.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Domain {
	Blas,
	Dft,
	Lapack,
	Rng,
	SparseBlas,
}

impl Domain {
	/// Every domain, in declaration order.
	pub const ALL: [Domain; 5] = [
		Domain::Blas,
		Domain::Dft,
		Domain::Lapack,
		Domain::Rng,
		Domain::SparseBlas,
	];

	/// Returns the stable lowercase name used in file names and config keys.
	pub fn as_str(self) -> &'static str {
		self.into()
	}

	/// Returns the symbol a backend exports its table under unless the catalog
	/// says otherwise.
	pub fn default_table_symbol(self) -> String {
		format!("kdispatch_{}_table", self.as_str())
	}
}
