//! Convenience re-exports for common firmware manager types

pub use crate::config::{ManagerConfig, ManagerConfigBuilder};
pub use crate::descriptor::FirmwareDescriptor;
pub use crate::manager::FirmwareManager;
pub use openfirmware_errors::{ErrorKind, FirmwareError, FirmwareResult};
pub use openfirmware_fetch::{
    LoadStatus, RequestStatus, RequestTag, ResourceCallback, ResourceLoader,
};
pub use openfirmware_inflate::{BufferPolicy, InflateConfig};
