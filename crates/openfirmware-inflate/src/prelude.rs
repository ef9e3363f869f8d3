//! Convenience re-exports for firmware inflation

pub use crate::config::{BufferPolicy, InflateConfig};
pub use crate::header::{ZlibHeader, is_compressed};
pub use crate::inflater::{Inflater, compress, decompress};
pub use openfirmware_errors::{ErrorKind, FirmwareError, FirmwareResult};
