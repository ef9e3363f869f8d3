//! Capacity-hinted, lock-protected firmware map.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use openfirmware_errors::{FirmwareError, FirmwareResult};
use parking_lot::RwLock;
use tracing::debug;

use crate::blob::FirmwareBlob;

type Entries = HashMap<String, FirmwareBlob>;

/// Thread-safe mapping from firmware name to [`FirmwareBlob`].
///
/// The map itself is created once, from a capacity hint. Until then (and
/// again after [`teardown`](Self::teardown)) the store is uninitialized:
/// mutations fail with [`FirmwareError::NotInitialized`] and queries return
/// empty results.
///
/// The capacity hint only sizes the initial allocation. Inserting more
/// entries than the hint is allowed.
pub struct BlobStore {
    entries: RwLock<Option<Entries>>,
}

impl BlobStore {
    /// A store whose map has not been created yet.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            entries: RwLock::new(None),
        }
    }

    /// Create an initialized store sized for `capacity_hint` entries.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if `capacity_hint <= 0` or
    /// the map cannot reserve that many slots.
    pub fn create(capacity_hint: i64) -> FirmwareResult<Self> {
        let store = Self::uninitialized();
        store.init(capacity_hint)?;
        Ok(store)
    }

    /// Create the underlying map.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if `capacity_hint <= 0`, if
    /// the map cannot be allocated, or if the store is already initialized.
    pub fn init(&self, capacity_hint: i64) -> FirmwareResult<()> {
        let capacity = usize::try_from(capacity_hint)
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| {
                FirmwareError::invalid_argument(format!(
                    "capacity hint must be positive, got {capacity_hint}"
                ))
            })?;

        let mut map = Entries::new();
        map.try_reserve(capacity).map_err(|e| {
            FirmwareError::invalid_argument(format!(
                "cannot reserve {capacity} store slots: {e}"
            ))
        })?;

        let mut entries = self.entries.write();
        if entries.is_some() {
            return Err(FirmwareError::invalid_argument(
                "firmware store is already initialized",
            ));
        }
        *entries = Some(map);
        debug!(capacity, "Firmware store created");
        Ok(())
    }

    /// Whether the map has been created.
    pub fn is_initialized(&self) -> bool {
        self.entries.read().is_some()
    }

    /// Copy `bytes` into the store under `name`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::NotInitialized`] if the store was never created.
    /// - [`FirmwareError::StoreInsertFailed`] if the map cannot grow.
    pub fn insert(&self, name: &str, bytes: &[u8]) -> FirmwareResult<()> {
        // Copy outside the lock.
        let blob = FirmwareBlob::new(name, bytes);

        let mut guard = self.entries.write();
        let entries = guard.as_mut().ok_or(FirmwareError::NotInitialized)?;
        entries
            .try_reserve(1)
            .map_err(|e| FirmwareError::store_insert_failed(name, e.to_string()))?;
        let replaced = entries.insert(name.to_owned(), blob).is_some();
        drop(guard);

        debug!(name, bytes = bytes.len(), replaced, "Firmware stored");
        Ok(())
    }

    /// Remove the entry for `name`. A missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::NotInitialized`] if the store was never created.
    pub fn remove(&self, name: &str) -> FirmwareResult<()> {
        let removed = self
            .entries
            .write()
            .as_mut()
            .ok_or(FirmwareError::NotInitialized)?
            .remove(name)
            .is_some();
        debug!(name, removed, "Firmware removed");
        Ok(())
    }

    /// Remove every entry, keeping the store initialized.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::NotInitialized`] if the store was never created.
    pub fn remove_all(&self) -> FirmwareResult<()> {
        let mut guard = self.entries.write();
        let entries = guard.as_mut().ok_or(FirmwareError::NotInitialized)?;
        let count = entries.len();
        entries.clear();
        drop(guard);

        debug!(count, "All firmware removed");
        Ok(())
    }

    /// The bytes stored under `name`, or `None` if absent or uninitialized.
    pub fn get(&self, name: &str) -> Option<Arc<[u8]>> {
        self.entries
            .read()
            .as_ref()
            .and_then(|entries| entries.get(name))
            .map(|blob| Arc::clone(blob.bytes()))
    }

    /// The full blob stored under `name`.
    pub fn get_blob(&self, name: &str) -> Option<FirmwareBlob> {
        self.entries
            .read()
            .as_ref()
            .and_then(|entries| entries.get(name).cloned())
    }

    /// Whether an entry exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .as_ref()
            .is_some_and(|entries| entries.contains_key(name))
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.entries.read().as_ref().map_or(0, HashMap::len)
    }

    /// Returns `true` if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of stored firmware names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .as_ref()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> usize {
        self.entries
            .read()
            .as_ref()
            .map_or(0, |entries| entries.values().map(FirmwareBlob::len).sum())
    }

    /// Drop every entry and return to the uninitialized state.
    pub fn teardown(&self) {
        if let Some(entries) = self.entries.write().take() {
            debug!(count = entries.len(), "Firmware store torn down");
        }
    }
}

impl Default for BlobStore {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore")
            .field("initialized", &self.is_initialized())
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openfirmware_errors::ErrorKind;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    #[test]
    fn test_create_rejects_non_positive_capacity() {
        for hint in [0, -1, i64::MIN] {
            let err = BlobStore::create(hint).map(|_| ()).map_err(|e| e.kind());
            assert_eq!(err, Err(ErrorKind::InvalidArgument), "hint {hint}");
        }
    }

    #[test]
    fn test_unreservable_capacity_fails_creation() {
        let err = BlobStore::create(i64::MAX).map(|_| ()).map_err(|e| e.kind());
        assert_eq!(err, Err(ErrorKind::InvalidArgument));

        let store = BlobStore::uninitialized();
        assert!(store.init(i64::MAX).is_err());
        assert!(!store.is_initialized());
    }

    #[test]
    fn test_double_init_is_rejected() -> TestResult {
        let store = BlobStore::create(1)?;
        store.insert("a", b"1")?;
        let err = store.init(4).map_err(|e| e.kind());
        assert_eq!(err, Err(ErrorKind::InvalidArgument));
        assert_eq!(store.len(), 1, "failed re-init must not clear entries");
        Ok(())
    }

    #[test]
    fn test_capacity_is_only_a_hint() -> TestResult {
        let store = BlobStore::create(1)?;
        for i in 0..32 {
            store.insert(&format!("fw-{i}"), &[i as u8])?;
        }
        assert_eq!(store.len(), 32);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Insert / overwrite
    // -----------------------------------------------------------------------

    #[test]
    fn test_overwrite_keeps_single_entry() -> TestResult {
        let store = BlobStore::create(2)?;
        store.insert("A", b"first")?;
        store.insert("A", b"second")?;
        assert_eq!(store.get("A").as_deref(), Some(&b"second"[..]));
        assert_eq!(store.names(), vec!["A".to_string()]);
        Ok(())
    }

    #[test]
    fn test_reader_keeps_replaced_bytes() -> TestResult {
        let store = BlobStore::create(1)?;
        store.insert("A", b"old")?;
        let held = store.get("A");
        store.insert("A", b"new")?;
        assert_eq!(held.as_deref(), Some(&b"old"[..]));
        Ok(())
    }

    #[test]
    fn test_names_are_case_sensitive() -> TestResult {
        let store = BlobStore::create(2)?;
        store.insert("BCM4360", b"upper")?;
        store.insert("bcm4360", b"lower")?;
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 10);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    #[test]
    fn test_remove_missing_is_ok() -> TestResult {
        let store = BlobStore::create(1)?;
        store.remove("never-added")?;
        Ok(())
    }

    #[test]
    fn test_remove_all_keeps_store_usable() -> TestResult {
        let store = BlobStore::create(2)?;
        store.insert("a", b"1")?;
        store.insert("b", b"2")?;
        store.remove_all()?;
        assert!(store.is_empty());
        assert!(store.is_initialized());
        store.insert("c", b"3")?;
        assert!(store.contains("c"));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Uninitialized access
    // -----------------------------------------------------------------------

    #[test]
    fn test_uninitialized_store_is_guarded() {
        let store = BlobStore::uninitialized();
        assert_eq!(
            store.insert("a", b"1").map_err(|e| e.kind()),
            Err(ErrorKind::NotInitialized)
        );
        assert_eq!(
            store.remove("a").map_err(|e| e.kind()),
            Err(ErrorKind::NotInitialized)
        );
        assert_eq!(
            store.remove_all().map_err(|e| e.kind()),
            Err(ErrorKind::NotInitialized)
        );
        assert!(store.get("a").is_none());
        assert!(store.names().is_empty());
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn test_teardown_returns_to_uninitialized() -> TestResult {
        let store = BlobStore::create(1)?;
        store.insert("a", b"1")?;
        store.teardown();
        assert!(!store.is_initialized());
        assert!(store.get("a").is_none());
        store.init(1)?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_debug_format() -> TestResult {
        let store = BlobStore::create(1)?;
        store.insert("x", b"x")?;
        let debug = format!("{store:?}");
        assert!(debug.contains("BlobStore"));
        assert!(debug.contains("entry_count: 1"));
        Ok(())
    }
}
