//! Blocking bridge over callback-driven firmware resource loaders
//!
//! Resource loaders (the host's bundle/resource subsystem) deliver data
//! asynchronously: a request is queued, and a completion callback fires
//! exactly once on a thread of the loader's choosing. Driver code usually
//! wants a plain blocking call instead. This crate provides:
//!
//! - [`loader`]: the [`ResourceLoader`] seam and its callback types
//! - [`completion`]: the one-shot result slot shared with the callback
//! - [`bridge`]: [`AsyncLoadBridge::fetch_blocking`], single-flight per bridge
//!
//! # Hang risk
//!
//! Without a configured timeout, `fetch_blocking` waits forever. A loader
//! that never invokes its callback hangs the caller permanently.

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bridge;
pub mod completion;
pub mod loader;

pub mod prelude;

pub use bridge::AsyncLoadBridge;
pub use loader::{LoadStatus, RequestStatus, RequestTag, ResourceCallback, ResourceLoader};
