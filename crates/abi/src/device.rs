use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// A class of execution targets; the key every table cache is indexed by.
///
/// Two queues on devices of the same kind share one loaded backend.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Device {
	X86Cpu,
	Aarch64Cpu,
	IntelGpu,
	NvidiaGpu,
	AmdGpu,
	/// Any target served only by the portable backends.
	#[serde(rename = "generic_device")]
	#[strum(serialize = "generic_device")]
	GenericDevice,
}

impl Device {
	/// Every device kind, in declaration order.
	pub const ALL: [Device; 6] = [
		Device::X86Cpu,
		Device::Aarch64Cpu,
		Device::IntelGpu,
		Device::NvidiaGpu,
		Device::AmdGpu,
		Device::GenericDevice,
	];

	pub fn as_str(self) -> &'static str {
		self.into()
	}

	/// True for the fallback class that needs a portable backend compiled in.
	pub const fn is_generic(self) -> bool {
		matches!(self, Device::GenericDevice)
	}
}
