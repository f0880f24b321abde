use core::ffi::c_int;
use core::fmt;

use kdispatch_abi::{Device, Domain};
use thiserror::Error;

/// Message reported by the platform dynamic loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct LoaderError {
	pub message: String,
}

impl LoaderError {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

impl From<libloading::Error> for LoaderError {
	fn from(err: libloading::Error) -> Self {
		Self::new(err.to_string())
	}
}

/// One candidate library that failed to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFailure {
	pub library: String,
	pub error: LoaderError,
}

impl fmt::Display for CandidateFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.library, self.error)
	}
}

/// What the caller can do about a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
	/// No usable backend is installed for this device kind.
	Install,
	/// A backend is installed but built against a different table layout.
	Upgrade,
	/// The dispatcher was built without support for this device kind.
	Rebuild,
}

impl fmt::Display for Remediation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Remediation::Install => "install a backend for this device",
			Remediation::Upgrade => "upgrade the backend or the dispatcher to matching versions",
			Remediation::Rebuild => "rebuild the dispatcher with generic device support",
		})
	}
}

/// Errors surfaced by [`TableCache::lookup`](crate::TableCache::lookup).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
	/// No candidate library could be opened.
	#[error("no {domain} backend found for {device}: {}", last_attempt(.attempts))]
	BackendNotFound {
		domain: Domain,
		device: Device,
		/// Every failed candidate, in the order tried.
		attempts: Vec<CandidateFailure>,
	},

	/// The device kind needs a backend family this build does not support.
	#[error("{domain} is not supported on {device} ({context}) by this build")]
	UnsupportedDevice {
		domain: Domain,
		device: Device,
		context: String,
	},

	/// The library opened but does not export the table symbol.
	#[error("{library} does not export {symbol} for {domain} on {device}: {message}")]
	FunctionNotFound {
		domain: Domain,
		device: Device,
		library: String,
		symbol: String,
		message: String,
	},

	/// The exported table was built for another specification version.
	#[error("{library} exports {domain} table version {found} for {device}, expected {expected}")]
	SpecificationMismatch {
		domain: Domain,
		device: Device,
		library: String,
		expected: c_int,
		found: c_int,
	},
}

impl DispatchError {
	pub fn domain(&self) -> Domain {
		match self {
			Self::BackendNotFound { domain, .. }
			| Self::UnsupportedDevice { domain, .. }
			| Self::FunctionNotFound { domain, .. }
			| Self::SpecificationMismatch { domain, .. } => *domain,
		}
	}

	pub fn device(&self) -> Device {
		match self {
			Self::BackendNotFound { device, .. }
			| Self::UnsupportedDevice { device, .. }
			| Self::FunctionNotFound { device, .. }
			| Self::SpecificationMismatch { device, .. } => *device,
		}
	}

	/// Distinguishes a missing backend from an incompatible one.
	pub fn remediation(&self) -> Remediation {
		match self {
			Self::BackendNotFound { .. } => Remediation::Install,
			Self::UnsupportedDevice { .. } => Remediation::Rebuild,
			Self::FunctionNotFound { .. } | Self::SpecificationMismatch { .. } => Remediation::Upgrade,
		}
	}
}

fn last_attempt(attempts: &[CandidateFailure]) -> String {
	attempts
		.last()
		.map_or_else(|| "no candidate libraries".to_string(), ToString::to_string)
}
