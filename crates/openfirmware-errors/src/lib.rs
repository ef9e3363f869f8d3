//! Shared error kinds for the OpenFirmware loading stack
//!
//! Every component of the stack (inflate, store, fetch bridge, manager) reports
//! failures through the single [`FirmwareError`] enum so that a driver can match
//! on one type regardless of which layer failed.
//!
//! # Example
//!
//! ```
//! use openfirmware_errors::prelude::*;
//!
//! fn require_capacity(capacity: i64) -> FirmwareResult<usize> {
//!     usize::try_from(capacity)
//!         .ok()
//!         .filter(|c| *c > 0)
//!         .ok_or_else(|| FirmwareError::invalid_argument(format!("capacity {capacity}")))
//! }
//!
//! assert_eq!(require_capacity(0).map_err(|e| e.kind()), Err(ErrorKind::InvalidArgument));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod prelude;

pub use error::{ErrorKind, FirmwareError};

/// A specialized `Result` type for firmware loading operations.
pub type FirmwareResult<T = ()> = std::result::Result<T, FirmwareError>;
