//! Snapshot tests for error message formatting.
//!
//! Drivers surface these strings in their own logs, so they must stay stable.

use insta::assert_snapshot;
use openfirmware_errors::prelude::*;
use std::time::Duration;

#[test]
fn test_not_initialized() {
    assert_snapshot!(
        FirmwareError::NotInitialized.to_string(),
        @"Firmware store is not initialized"
    );
}

#[test]
fn test_invalid_argument() {
    assert_snapshot!(
        FirmwareError::invalid_argument("capacity hint must be positive, got 0").to_string(),
        @"Invalid argument: capacity hint must be positive, got 0"
    );
}

#[test]
fn test_unsupported() {
    assert_snapshot!(
        FirmwareError::unsupported("iwlwifi-9000-pu-b0-jf-b0").to_string(),
        @"Unsupported firmware: iwlwifi-9000-pu-b0-jf-b0"
    );
}

#[test]
fn test_store_insert_failed() {
    assert_snapshot!(
        FirmwareError::store_insert_failed("ibt-17-16-1.sfi", "allocation failure").to_string(),
        @"Store insert failed for 'ibt-17-16-1.sfi': allocation failure"
    );
}

#[test]
fn test_fetch_failed() {
    assert_snapshot!(
        FirmwareError::fetch_failed("ibt-17-16-1.ddc", "loader returned no data").to_string(),
        @"Fetch of 'ibt-17-16-1.ddc' failed: loader returned no data"
    );
}

#[test]
fn test_fetch_in_flight() {
    assert_snapshot!(
        FirmwareError::fetch_in_flight("ibt-17-16-1.sfi").to_string(),
        @"Fetch of 'ibt-17-16-1.sfi' rejected: another fetch is in flight"
    );
}

#[test]
fn test_fetch_timed_out() {
    assert_snapshot!(
        FirmwareError::fetch_timed_out("ibt-17-16-1.sfi", Duration::from_millis(1500)).to_string(),
        @"Fetch of 'ibt-17-16-1.sfi' timed out after 1500 ms"
    );
}
