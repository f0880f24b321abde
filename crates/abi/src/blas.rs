use core::ffi::c_int;

use crate::FunctionTable;

/// Single-precision level-1 BLAS entry points.
///
/// Vector lengths and strides are signed 64-bit, matching the `std::int64_t`
/// convention backends are compiled with. Negative strides are not supported.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BlasTable {
	pub version: c_int,
	/// `y = alpha * x + y`
	pub saxpy: unsafe extern "C" fn(n: i64, alpha: f32, x: *const f32, incx: i64, y: *mut f32, incy: i64),
	/// Returns `x · y`.
	pub sdot: unsafe extern "C" fn(n: i64, x: *const f32, incx: i64, y: *const f32, incy: i64) -> f32,
	/// `x = alpha * x`
	pub sscal: unsafe extern "C" fn(n: i64, alpha: f32, x: *mut f32, incx: i64),
}

// SAFETY: `repr(C)`, version first, non-null function pointers only.
unsafe impl FunctionTable for BlasTable {}
