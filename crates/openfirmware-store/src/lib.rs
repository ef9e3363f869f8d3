//! # openfirmware-store
//!
//! Thread-safe mapping from firmware name to an owned, already-normalized
//! byte blob.
//!
//! ## Guarantees
//!
//! - A name maps to at most one blob; inserting an existing name overwrites it.
//! - Bytes are deep-copied on insert, so the store never aliases caller memory.
//! - Every operation on an uninitialized store returns
//!   [`FirmwareError::NotInitialized`](openfirmware_errors::FirmwareError::NotInitialized)
//!   or an empty result; nothing panics.
//! - The store lock is held only for the map operation itself.
//!
//! ## Example
//!
//! ```rust
//! use openfirmware_store::prelude::*;
//!
//! # fn main() -> FirmwareResult<()> {
//! let store = BlobStore::create(4)?;
//! store.insert("rtl8168h-2.fw", b"\x01\x02")?;
//! store.insert("rtl8168h-2.fw", b"\x03")?;
//!
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.get("rtl8168h-2.fw").as_deref(), Some(&b"\x03"[..]));
//! # Ok(())
//! # }
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod blob;
pub mod store;

pub mod prelude;

pub use blob::FirmwareBlob;
pub use store::BlobStore;
