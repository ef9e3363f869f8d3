//! Error type shared by every firmware loading component.

use core::fmt;

use thiserror::Error;

/// Errors that can occur while loading, normalizing or storing firmware.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FirmwareError {
    /// The blob store was never created, or has been torn down.
    #[error("Firmware store is not initialized")]
    NotInitialized,

    /// A caller-supplied value violates the operation's contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested firmware name is absent from the candidate list.
    #[error("Unsupported firmware: {0}")]
    Unsupported(String),

    /// The zlib decoder failed or ran out of scratch buffer.
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// The underlying map rejected the write.
    #[error("Store insert failed for '{name}': {reason}")]
    StoreInsertFailed {
        /// Firmware name that was being written.
        name: String,
        /// Why the write was rejected.
        reason: String,
    },

    /// The external resource loader reported failure or returned no data.
    #[error("Fetch of '{resource}' failed: {reason}")]
    FetchFailed {
        /// Resource name that was requested.
        resource: String,
        /// Failure reported by the loader.
        reason: String,
    },

    /// Another blocking fetch is already outstanding on the same bridge.
    #[error("Fetch of '{0}' rejected: another fetch is in flight")]
    FetchInFlight(String),

    /// The configured bounded wait expired before the loader called back.
    #[error("Fetch of '{resource}' timed out after {waited_ms} ms")]
    FetchTimedOut {
        /// Resource name that was requested.
        resource: String,
        /// How long the caller waited.
        waited_ms: u64,
    },
}

impl FirmwareError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Create an unsupported firmware error.
    #[must_use]
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::Unsupported(name.into())
    }

    /// Create a decompression failure.
    #[must_use]
    pub fn decompression_failed(reason: impl Into<String>) -> Self {
        Self::DecompressionFailed(reason.into())
    }

    /// Create a store insert failure.
    #[must_use]
    pub fn store_insert_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreInsertFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a fetch failure.
    #[must_use]
    pub fn fetch_failed(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Create a fetch-in-flight rejection.
    #[must_use]
    pub fn fetch_in_flight(resource: impl Into<String>) -> Self {
        Self::FetchInFlight(resource.into())
    }

    /// Create a fetch timeout error.
    #[must_use]
    pub fn fetch_timed_out(resource: impl Into<String>, waited: std::time::Duration) -> Self {
        Self::FetchTimedOut {
            resource: resource.into(),
            waited_ms: u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Get the error kind for classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FirmwareError::NotInitialized => ErrorKind::NotInitialized,
            FirmwareError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            FirmwareError::Unsupported(_) => ErrorKind::Unsupported,
            FirmwareError::DecompressionFailed(_) => ErrorKind::DecompressionFailed,
            FirmwareError::StoreInsertFailed { .. } => ErrorKind::StoreInsertFailed,
            FirmwareError::FetchFailed { .. } => ErrorKind::FetchFailed,
            FirmwareError::FetchInFlight(_) => ErrorKind::FetchInFlight,
            FirmwareError::FetchTimedOut { .. } => ErrorKind::FetchTimedOut,
        }
    }

    /// Whether retrying the same call later could succeed.
    ///
    /// Contract violations and missing candidates never heal on their own;
    /// loader-side failures and single-flight rejections might.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::FetchFailed | ErrorKind::FetchInFlight | ErrorKind::FetchTimedOut
        )
    }
}

/// Copyable classification of a [`FirmwareError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Store never created
    NotInitialized = 0,
    /// Contract violation
    InvalidArgument = 1,
    /// Name absent from candidates
    Unsupported = 2,
    /// Decoder error or buffer exhaustion
    DecompressionFailed = 3,
    /// Map rejected the write
    StoreInsertFailed = 4,
    /// Loader failure or empty data
    FetchFailed = 5,
    /// Single-flight violation
    FetchInFlight = 6,
    /// Bounded wait expired
    FetchTimedOut = 7,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotInitialized => "NotInitialized",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::DecompressionFailed => "DecompressionFailed",
            ErrorKind::StoreInsertFailed => "StoreInsertFailed",
            ErrorKind::FetchFailed => "FetchFailed",
            ErrorKind::FetchInFlight => "FetchInFlight",
            ErrorKind::FetchTimedOut => "FetchTimedOut",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::NotInitialized.to_string(), "NotInitialized");
        assert_eq!(ErrorKind::FetchFailed.to_string(), "FetchFailed");
    }

    #[test]
    fn test_constructors_map_to_kind() {
        assert_eq!(
            FirmwareError::unsupported("bcm4350").kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            FirmwareError::store_insert_failed("a", "oom").kind(),
            ErrorKind::StoreInsertFailed
        );
        assert_eq!(
            FirmwareError::fetch_timed_out("fw.bin", Duration::from_millis(250)),
            FirmwareError::FetchTimedOut {
                resource: "fw.bin".to_string(),
                waited_ms: 250,
            }
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(FirmwareError::fetch_failed("fw.bin", "io").is_transient());
        assert!(FirmwareError::fetch_in_flight("fw.bin").is_transient());
        assert!(!FirmwareError::NotInitialized.is_transient());
        assert!(!FirmwareError::unsupported("x").is_transient());
    }

    #[test]
    fn test_firmware_error_is_std_error() {
        let err = FirmwareError::decompression_failed("truncated stream");
        let _: &dyn std::error::Error = &err;
    }
}
