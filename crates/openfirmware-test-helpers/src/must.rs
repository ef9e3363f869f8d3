//! Unwrap helpers with good error messages.
//!
//! Test code uses these instead of `unwrap()`/`expect()` so that a failure
//! reports the error value and the caller's location.

use std::fmt::Debug;

/// Unwrap a `Result`, panicking with the error value on `Err`.
///
/// ```rust
/// use openfirmware_test_helpers::must;
///
/// let len: Result<usize, &str> = Ok(4096);
/// assert_eq!(must(len), 4096);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap an `Option`, panicking with `msg` on `None`.
///
/// ```rust
/// use openfirmware_test_helpers::must_some;
///
/// let header = [0x78u8, 0x9C, 0x01];
/// assert_eq!(must_some(header.first(), "non-empty image"), &0x78);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

/// Unwrap a `Result`, panicking with `context` and the error value on `Err`.
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must_with<T, E: Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{context}: {e:?}"),
    }
}
