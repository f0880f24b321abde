use core::ffi::c_int;

/// Table version this build of the dispatcher was compiled against.
pub const SPEC_VERSION: c_int = 1;

/// Layout contract for a function table exported by a backend library.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` and their first field must be a `c_int`
/// holding the table version. The remaining fields must match the layout the
/// backend was built with for that version, and every bit pattern the backend
/// can export must be a valid value of `Self` (function pointers must be
/// non-null or wrapped in `Option`).
pub unsafe trait FunctionTable: Copy + Send + Sync + 'static {
	/// Returns the leading version field.
	fn version(&self) -> c_int {
		// SAFETY: the trait contract places a `c_int` at offset zero.
		unsafe { *(self as *const Self).cast::<c_int>() }
	}
}

/// The version field shared by every table, usable for any domain.
///
/// Loading a `TableHeader` validates a backend without depending on the
/// layout of its entry points.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHeader {
	pub version: c_int,
}

// SAFETY: `repr(C)` with the version as its only field.
unsafe impl FunctionTable for TableHeader {}
