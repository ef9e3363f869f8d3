//! Convenience re-exports for error handling

pub use crate::FirmwareResult;
pub use crate::error::{ErrorKind, FirmwareError};
