//! Convenience re-exports for the blob store

pub use crate::blob::FirmwareBlob;
pub use crate::store::BlobStore;
pub use openfirmware_errors::{ErrorKind, FirmwareError, FirmwareResult};
