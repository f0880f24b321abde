//! Identifiers and layouts shared between the dispatcher and native backends.
//!
//! Everything in this crate is part of the contract a backend library is built
//! against:
//!
//! * [`Domain`]: the family of routines a function table implements
//! * [`Device`]: the class of execution target a backend serves
//! * [`FunctionTable`]: the layout contract every exported table honors
//! * [`SPEC_VERSION`]: the table version this build expects to find
//!
//! Changing the layout of any table shipped here requires bumping
//! [`SPEC_VERSION`].

mod blas;
mod device;
mod domain;
mod table;

pub use blas::BlasTable;
pub use device::Device;
pub use domain::Domain;
pub use table::{FunctionTable, SPEC_VERSION, TableHeader};
