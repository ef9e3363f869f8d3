//! Blocking fetch over a [`ResourceLoader`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use openfirmware_errors::{FirmwareError, FirmwareResult};
use tracing::{debug, warn};

use crate::completion::{Completion, FetchOutcome};
use crate::loader::{LoadStatus, RequestStatus, RequestTag, ResourceCallback, ResourceLoader};

/// Turns the loader's callback API into a blocking call.
///
/// Only one fetch may be outstanding per bridge: the completion slot is
/// shared by every fetch the bridge issues. A second caller arriving while a
/// fetch is in flight gets [`FirmwareError::FetchInFlight`] immediately
/// instead of waiting; callers that need to queue must serialize themselves.
///
/// # Blocking
///
/// With no timeout configured, [`fetch_blocking`](Self::fetch_blocking)
/// blocks until the loader calls back. If the loader never does, the caller
/// never returns.
pub struct AsyncLoadBridge {
    loader: Arc<dyn ResourceLoader>,
    completion: Arc<Completion>,
    in_flight: AtomicBool,
    generation: AtomicU64,
    timeout: Option<Duration>,
}

impl AsyncLoadBridge {
    /// Create a bridge that waits indefinitely for each callback.
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            completion: Arc::new(Completion::new()),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            timeout: None,
        }
    }

    /// Bound every wait by `timeout` (`None` restores the unbounded wait).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured wait bound.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether a fetch is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Request `resource_name` from `resource_ref` and block until the
    /// loader's callback delivers it.
    ///
    /// The returned bytes are an owned copy of the loader's buffer.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::FetchInFlight`] if another fetch is outstanding.
    /// - [`FirmwareError::FetchFailed`] if the loader reports failure or
    ///   delivers zero bytes.
    /// - [`FirmwareError::FetchTimedOut`] if a timeout is configured and
    ///   expires first.
    pub fn fetch_blocking(
        &self,
        resource_ref: &str,
        resource_name: &str,
    ) -> FirmwareResult<Vec<u8>> {
        let _flight = InFlightGuard::acquire(&self.in_flight)
            .ok_or_else(|| FirmwareError::fetch_in_flight(resource_name))?;

        let generation = self.generation.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        self.completion.arm(generation);

        let callback =
            completion_callback(Arc::clone(&self.completion), generation, resource_name);
        let status = self.loader.request(resource_ref, resource_name, callback);
        match status {
            RequestStatus::Queued(tag) => {
                debug!(
                    resource = resource_name,
                    owner = resource_ref,
                    %tag,
                    "Resource request queued"
                );
            }
            RequestStatus::Rejected { code } => {
                debug!(
                    resource = resource_name,
                    owner = resource_ref,
                    code,
                    "Resource request rejected, waiting for callback"
                );
            }
        }

        match self.completion.wait(generation, self.timeout) {
            Some(FetchOutcome::Loaded(bytes)) => {
                debug!(resource = resource_name, bytes = bytes.len(), "Resource fetched");
                Ok(bytes)
            }
            Some(FetchOutcome::Failed(reason)) => {
                warn!(resource = resource_name, %reason, "Resource fetch failed");
                Err(FirmwareError::fetch_failed(resource_name, reason))
            }
            None => {
                let waited = self.timeout.unwrap_or_default();
                warn!(resource = resource_name, ?waited, "Resource fetch timed out");
                Err(FirmwareError::fetch_timed_out(resource_name, waited))
            }
        }
    }
}

fn completion_callback(
    completion: Arc<Completion>,
    generation: u64,
    resource_name: &str,
) -> ResourceCallback {
    let resource = resource_name.to_owned();
    Box::new(move |tag: RequestTag, status: LoadStatus, data: &[u8]| {
        let outcome = match status {
            LoadStatus::Success if data.is_empty() => {
                FetchOutcome::Failed("loader returned no data".to_owned())
            }
            LoadStatus::Success => FetchOutcome::Loaded(data.to_vec()),
            LoadStatus::Failed { code } => {
                FetchOutcome::Failed(format!("loader status {code:#010x}"))
            }
        };
        if completion.complete(generation, outcome) {
            debug!(%resource, %tag, len = data.len(), "Resource callback delivered");
        } else {
            warn!(%resource, %tag, "Discarding callback for an abandoned fetch");
        }
    })
}

/// Clears the in-flight flag when the fetch returns, on every path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl fmt::Debug for AsyncLoadBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLoadBridge")
            .field("in_flight", &self.is_in_flight())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
