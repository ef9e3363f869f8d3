//! Shared test utilities for OpenFirmware.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`mock`] - Scriptable [`ResourceLoader`](openfirmware_fetch::ResourceLoader) doubles
//! - [`fixtures`] - zlib-framed images and deterministic payloads
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! openfirmware-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use openfirmware_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod must;
pub mod prelude;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

pub use must::*;
