use core::ffi::c_int;

use kdispatch_abi::{Device, Domain, FunctionTable, SPEC_VERSION};
use tracing::{error, warn};

use crate::{DispatchError, LibraryHandle};

/// Resolves `symbol` in `handle`, checks the table version and copies the
/// table out by value.
///
/// Nothing past the version field is read until the version matches, since
/// the layout of the rest is only known for [`SPEC_VERSION`].
pub(crate) fn extract<T: FunctionTable>(
	handle: &LibraryHandle,
	domain: Domain,
	device: Device,
	symbol: &str,
) -> Result<T, DispatchError> {
	let address = handle.symbol(symbol).map_err(|err| {
		warn!(%domain, %device, library = handle.name(), symbol, error = %err, "backend table symbol not found");
		DispatchError::FunctionNotFound {
			domain,
			device,
			library: handle.name().to_string(),
			symbol: symbol.to_string(),
			message: err.message,
		}
	})?;

	// SAFETY: every exported table starts with a `c_int` version, and the
	// address stays mapped while `handle` is open.
	let found = unsafe { address.cast::<c_int>().read_unaligned() };
	if found != SPEC_VERSION {
		error!(
			%domain,
			%device,
			library = handle.name(),
			expected = SPEC_VERSION,
			found,
			"backend table specification mismatch"
		);
		return Err(DispatchError::SpecificationMismatch {
			domain,
			device,
			library: handle.name().to_string(),
			expected: SPEC_VERSION,
			found,
		});
	}

	// SAFETY: the version matches, so the object behind `address` was built
	// with `T`'s layout per the `FunctionTable` contract.
	Ok(unsafe { address.cast::<T>().read_unaligned() })
}
