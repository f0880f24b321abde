//! Runtime backend dispatch.
//!
//! A [`TableCache`] maps a device kind to the native function table that
//! implements one [`Domain`] for it. Backends are shared libraries listed in a
//! [`BackendCatalog`]; none of them is linked at build time.
//!
//! # Architecture
//!
//! * resolution: tries each candidate library in catalog order through a
//!   [`LibraryLoader`]
//! * [`LibraryHandle`]: owns an opened library and releases it on drop
//! * validation: resolves the table symbol and checks its version before the
//!   table is copied out
//! * [`TableCache`]: write-once memoization per device kind
//!
//! ```no_run
//! use kdispatch::{BackendCatalog, Device, Domain, TableCache};
//! use kdispatch::abi::BlasTable;
//!
//! let cache = TableCache::<BlasTable>::new(Domain::Blas, BackendCatalog::load()?);
//! let blas = cache.lookup(Device::NvidiaGpu, "gpu:0")?;
//! let mut y = [1.0f32; 4];
//! let x = [2.0f32; 4];
//! unsafe { (blas.saxpy)(4, 0.5, x.as_ptr(), 1, y.as_mut_ptr(), 1) };
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cache;
mod context;
mod error;
mod handle;
mod loader;
mod resolve;
mod validate;

#[cfg(test)]
mod testing;

pub use cache::{GENERIC_DEVICE_SUPPORTED, LoadedTable, TableCache};
pub use context::DiagnosticContext;
pub use error::{CandidateFailure, DispatchError, LoaderError, Remediation};
pub use handle::LibraryHandle;
pub use kdispatch_abi as abi;
pub use kdispatch_abi::{Device, Domain, FunctionTable, SPEC_VERSION};
pub use kdispatch_catalog::BackendCatalog;
pub use loader::{Library, LibraryLoader, SystemLibrary, SystemLoader};
