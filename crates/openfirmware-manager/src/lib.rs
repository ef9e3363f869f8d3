//! On-demand firmware image management for hardware drivers
//!
//! A driver names the firmware images it needs; this crate finds them in a
//! compiled-in candidate table, accepts them as explicit descriptors, or
//! fetches them through the host's resource loader, then normalizes any
//! zlib-framed image to raw bytes and keeps it in a thread-safe store.
//!
//! # Architecture
//!
//! - [`manager`]: [`FirmwareManager`], the facade drivers talk to
//! - [`descriptor`]: [`FirmwareDescriptor`], a named image (usually `'static`)
//! - [`config`]: [`ManagerConfig`] and its builder
//!
//! The pieces it composes live in their own crates: `openfirmware-inflate`
//! (zlib detection and inflation), `openfirmware-store` (the keyed blob
//! store) and `openfirmware-fetch` (the blocking bridge over the loader).
//!
//! # Example
//!
//! ```
//! use openfirmware_manager::prelude::*;
//!
//! static CANDIDATES: &[FirmwareDescriptor] = &[
//!     FirmwareDescriptor::from_static("rtl8761b_fw", b"\x01\x02\x03"),
//!     FirmwareDescriptor::from_static("rtl8761b_config", b"\x55\xAB"),
//! ];
//!
//! # fn main() -> FirmwareResult<()> {
//! let manager = FirmwareManager::with_name(ManagerConfig::default(), "rtl8761b_fw", CANDIDATES)?;
//! assert_eq!(manager.get("rtl8761b_fw").as_deref(), Some(&b"\x01\x02\x03"[..]));
//!
//! assert_eq!(
//!     manager.add_by_name("rtl8852a_fw", CANDIDATES).map_err(|e| e.kind()),
//!     Err(ErrorKind::Unsupported)
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod descriptor;
pub mod manager;
pub mod prelude;

pub use config::{ManagerConfig, ManagerConfigBuilder};
pub use descriptor::FirmwareDescriptor;
pub use manager::FirmwareManager;

pub use openfirmware_errors::{ErrorKind, FirmwareError, FirmwareResult};
pub use openfirmware_fetch::{
    LoadStatus, RequestStatus, RequestTag, ResourceCallback, ResourceLoader,
};
pub use openfirmware_inflate::{BufferPolicy, InflateConfig};
