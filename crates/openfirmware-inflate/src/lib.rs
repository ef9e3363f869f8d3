//! zlib detection and inflation for firmware images
//!
//! Firmware images may be shipped raw or wrapped in RFC 1950 (zlib) framing.
//! This crate recognises the three framing headers emitted by common firmware
//! packaging tools and normalizes images to raw bytes:
//!
//! - [`header`]: zlib header detection ([`ZlibHeader`], [`is_compressed`])
//! - [`inflater`]: single-pass and growing-buffer inflation ([`Inflater`])
//! - [`config`]: buffer sizing policy ([`InflateConfig`], [`BufferPolicy`])
//!
//! Raw images pass through untouched and without a copy:
//!
//! ```
//! use openfirmware_inflate::prelude::*;
//! use std::borrow::Cow;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = b"\x7fELF firmware";
//! assert!(matches!(decompress(raw)?, Cow::Borrowed(_)));
//!
//! let packed = compress(b"hello", ZlibHeader::Default)?;
//! assert_eq!(&*decompress(&packed)?, b"hello");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod header;
pub mod inflater;
pub mod prelude;

pub use config::{BufferPolicy, InflateConfig};
pub use header::{ZlibHeader, is_compressed};
pub use inflater::{Inflater, compress, decompress};
