//! The external resource loader seam.

use std::fmt;

/// Identifier the loader assigns to a queued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTag(pub u64);

impl fmt::Display for RequestTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// Immediate answer from [`ResourceLoader::request`].
///
/// Advisory only: the callback still fires exactly once either way, and is
/// the only channel that delivers data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// The request was queued.
    Queued(RequestTag),
    /// The loader refused the request; the callback will report the failure.
    Rejected {
        /// Loader-specific status code.
        code: i32,
    },
}

/// Final status passed to the completion callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The resource was read; the data slice holds its bytes.
    Success,
    /// The loader failed with a loader-specific status code.
    Failed {
        /// Loader-specific status code.
        code: i32,
    },
}

/// Completion callback handed to the loader.
///
/// `FnOnce` makes a second invocation impossible. The data slice is only
/// valid for the duration of the call.
pub type ResourceCallback = Box<dyn FnOnce(RequestTag, LoadStatus, &[u8]) + Send + 'static>;

/// A callback-driven resource loading subsystem.
///
/// Implementations must invoke `callback` exactly once, from any thread,
/// whatever they return from `request`.
pub trait ResourceLoader: Send + Sync {
    /// Queue a read of `resource_name` owned by `owner` (a bundle or driver
    /// identifier).
    fn request(&self, owner: &str, resource_name: &str, callback: ResourceCallback)
    -> RequestStatus;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for std::sync::Arc<L> {
    fn request(
        &self,
        owner: &str,
        resource_name: &str,
        callback: ResourceCallback,
    ) -> RequestStatus {
        (**self).request(owner, resource_name, callback)
    }
}
