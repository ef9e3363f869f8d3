//! Named firmware image descriptors.

use std::borrow::Cow;
use std::fmt;

/// A firmware image and the name it is registered under.
///
/// Candidate tables are usually compiled in, so descriptors can borrow
/// `'static` data without copying; [`FirmwareDescriptor::new`] covers images
/// built at runtime.
#[derive(Clone, PartialEq, Eq)]
pub struct FirmwareDescriptor {
    name: Cow<'static, str>,
    data: Cow<'static, [u8]>,
}

impl FirmwareDescriptor {
    /// Describe an image owned by the descriptor.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            data: Cow::Owned(data.into()),
        }
    }

    /// Describe a compiled-in image. Usable in `static` candidate tables.
    pub const fn from_static(name: &'static str, data: &'static [u8]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            data: Cow::Borrowed(data),
        }
    }

    /// Firmware name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image bytes, possibly zlib-framed.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for FirmwareDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwareDescriptor")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}
