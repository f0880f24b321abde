//! Seam between the cache and the platform dynamic loader.

use core::ffi::c_void;
use core::ptr::NonNull;

use crate::LoaderError;

/// An opened dynamic library. Dropping it closes the OS handle.
pub trait Library: Send + Sync + 'static {
	/// Resolves an exported symbol to its address.
	fn symbol(&self, name: &str) -> Result<NonNull<c_void>, LoaderError>;
}

/// Opens libraries by name.
pub trait LibraryLoader: Send + Sync {
	type Library: Library;

	fn open(&self, name: &str) -> Result<Self::Library, LoaderError>;
}

/// The host operating system's loader, through `libloading`.
///
/// On Unix libraries are opened `RTLD_LAZY | RTLD_GLOBAL` so a backend can
/// resolve symbols of the vendor runtime it links against lazily.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

/// A library opened by [`SystemLoader`].
#[derive(Debug)]
pub struct SystemLibrary {
	lib: libloading::Library,
}

impl LibraryLoader for SystemLoader {
	type Library = SystemLibrary;

	fn open(&self, name: &str) -> Result<SystemLibrary, LoaderError> {
		// SAFETY: loading runs the backend's initializers; backends listed in the
		// catalog are trusted native code.
		let lib = unsafe { open_library(name) }?;
		Ok(SystemLibrary { lib })
	}
}

impl Library for SystemLibrary {
	fn symbol(&self, name: &str) -> Result<NonNull<c_void>, LoaderError> {
		// SAFETY: requesting the symbol as a data pointer only yields its
		// address; nothing is called through it here.
		let sym = unsafe { self.lib.get::<*mut c_void>(name.as_bytes()) }?;
		NonNull::new(*sym).ok_or_else(|| LoaderError::new(format!("{name}: symbol resolved to a null address")))
	}
}

#[cfg(unix)]
unsafe fn open_library(name: &str) -> Result<libloading::Library, libloading::Error> {
	use libloading::os::unix::{Library, RTLD_GLOBAL, RTLD_LAZY};

	unsafe { Library::open(Some(name), RTLD_LAZY | RTLD_GLOBAL) }.map(Into::into)
}

#[cfg(windows)]
unsafe fn open_library(name: &str) -> Result<libloading::Library, libloading::Error> {
	unsafe { libloading::Library::new(name) }
}

impl<L: LibraryLoader + ?Sized> LibraryLoader for std::sync::Arc<L> {
	type Library = L::Library;

	fn open(&self, name: &str) -> Result<Self::Library, LoaderError> {
		(**self).open(name)
	}
}
