use kdispatch_abi::{Device, Domain};
use tracing::{debug, warn};

use crate::{CandidateFailure, DiagnosticContext, DispatchError, LibraryHandle, LibraryLoader};

/// Opens the first candidate that loads, in list order.
///
/// Candidates after the first success are never attempted. When every
/// candidate fails, the generic device class reports `UnsupportedDevice` if
/// this build has no portable backend support; everything else reports
/// `BackendNotFound` with each loader message.
pub(crate) fn resolve<L: LibraryLoader>(
	loader: &L,
	domain: Domain,
	device: Device,
	candidates: &[String],
	generic_device_supported: bool,
	context: &(impl DiagnosticContext + ?Sized),
) -> Result<LibraryHandle, DispatchError> {
	let mut attempts = Vec::new();

	for name in candidates {
		match loader.open(name) {
			Ok(library) => {
				debug!(%domain, %device, library = %name, skipped = attempts.len(), "opened backend library");
				return Ok(LibraryHandle::new(name.as_str(), library));
			}
			Err(error) => {
				debug!(%domain, %device, library = %name, %error, "backend candidate failed to open");
				attempts.push(CandidateFailure {
					library: name.clone(),
					error,
				});
			}
		}
	}

	if device.is_generic() && !generic_device_supported {
		return Err(DispatchError::UnsupportedDevice {
			domain,
			device,
			context: context.describe_device(),
		});
	}

	match attempts.last() {
		Some(last) => warn!(%domain, %device, tried = attempts.len(), error = %last, "no backend library could be opened"),
		None => warn!(%domain, %device, "no backend libraries registered"),
	}
	Err(DispatchError::BackendNotFound {
		domain,
		device,
		attempts,
	})
}
