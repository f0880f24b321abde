#![allow(non_upper_case_globals)]
//! Minimal backend library exporting a [`BlasTable`].
//!
//! Built as `libkdispatch_blas_demo.so`; list it in a catalog overlay to
//! serve any device kind:
//!
//! ```toml
//! [libraries.blas]
//! x86cpu = ["libkdispatch_blas_demo.so"]
//! ```

use kdispatch_abi::{BlasTable, SPEC_VERSION};

/// The table the dispatcher resolves under the default blas symbol.
#[unsafe(no_mangle)]
pub static kdispatch_blas_table: BlasTable = BlasTable {
	version: SPEC_VERSION,
	saxpy,
	sdot,
	sscal,
};

/// # Safety
/// `x` and `y` must hold `n` elements at strides `incx` and `incy`.
unsafe extern "C" fn saxpy(n: i64, alpha: f32, x: *const f32, incx: i64, y: *mut f32, incy: i64) {
	for i in 0..n.max(0) {
		unsafe {
			let yi = y.offset((i * incy) as isize);
			*yi += alpha * *x.offset((i * incx) as isize);
		}
	}
}

/// # Safety
/// `x` and `y` must hold `n` elements at strides `incx` and `incy`.
unsafe extern "C" fn sdot(n: i64, x: *const f32, incx: i64, y: *const f32, incy: i64) -> f32 {
	(0..n.max(0))
		.map(|i| unsafe { *x.offset((i * incx) as isize) * *y.offset((i * incy) as isize) })
		.sum()
}

/// # Safety
/// `x` must hold `n` elements at stride `incx`.
unsafe extern "C" fn sscal(n: i64, alpha: f32, x: *mut f32, incx: i64) {
	for i in 0..n.max(0) {
		unsafe { *x.offset((i * incx) as isize) *= alpha };
	}
}
