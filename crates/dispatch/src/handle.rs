use core::ffi::c_void;
use core::fmt;
use core::ptr::NonNull;

use tracing::trace;

use crate::{Library, LoaderError};

/// Exclusive owner of one opened backend library.
///
/// Not `Clone`: each handle is released exactly once, when it is dropped.
/// Two device kinds resolving to the same library name hold two handles.
pub struct LibraryHandle {
	name: String,
	library: Box<dyn Library>,
}

impl LibraryHandle {
	pub(crate) fn new(name: impl Into<String>, library: impl Library) -> Self {
		Self {
			name: name.into(),
			library: Box::new(library),
		}
	}

	/// Candidate name the library was opened under.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn symbol(&self, symbol: &str) -> Result<NonNull<c_void>, LoaderError> {
		self.library.symbol(symbol)
	}
}

impl fmt::Debug for LibraryHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LibraryHandle").field("name", &self.name).finish_non_exhaustive()
	}
}

impl Drop for LibraryHandle {
	fn drop(&mut self) {
		trace!(library = %self.name, "releasing backend library");
	}
}
