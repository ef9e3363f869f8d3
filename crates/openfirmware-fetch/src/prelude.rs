//! Convenience re-exports for the fetch bridge

pub use crate::bridge::AsyncLoadBridge;
pub use crate::loader::{LoadStatus, RequestStatus, RequestTag, ResourceCallback, ResourceLoader};
pub use openfirmware_errors::{ErrorKind, FirmwareError, FirmwareResult};
