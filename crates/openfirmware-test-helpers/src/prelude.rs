//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use openfirmware_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_some, must_with};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{pseudo_random_bytes, zlib, zlib_max, zlib_stored};

#[cfg(feature = "mock")]
pub use crate::mock::{InlineLoader, LoaderScript, NOT_FOUND, SilentLoader, ThreadedLoader};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
