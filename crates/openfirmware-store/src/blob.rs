//! Named firmware blob.

use std::fmt;
use std::sync::Arc;

/// An owned, named firmware image.
///
/// The bytes live behind an `Arc` so readers can hold on to an image after
/// it has been replaced or removed from the store.
#[derive(Clone, PartialEq, Eq)]
pub struct FirmwareBlob {
    name: String,
    bytes: Arc<[u8]>,
}

impl FirmwareBlob {
    /// Copy `bytes` into a new blob called `name`.
    pub fn new(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// Firmware name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the firmware bytes.
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Size of the image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-length image.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FirmwareBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwareBlob")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_copies_input() {
        let mut source = vec![1u8, 2, 3];
        let blob = FirmwareBlob::new("fw", &source);
        source[0] = 9;
        assert_eq!(&**blob.bytes(), &[1, 2, 3]);
        assert_eq!(blob.len(), 3);
    }

    #[test]
    fn test_debug_omits_payload() {
        let blob = FirmwareBlob::new("ath10k", &[0xAA; 32]);
        let debug = format!("{blob:?}");
        assert!(debug.contains("ath10k"));
        assert!(debug.contains("len: 32"));
        assert!(!debug.contains("170"));
    }
}
