//! RFC 1950 header detection
//!
//! A zlib stream starts with a CMF byte (`0x78` for deflate with a 32 KiB
//! window) followed by a FLG byte whose FLEVEL bits encode the compression
//! level the producer used. Only the three FLG values below are accepted as
//! "compressed"; anything else is treated as an already-raw image.

use openfirmware_errors::{FirmwareError, FirmwareResult};

/// CMF byte for deflate with a 32 KiB window.
pub const ZLIB_CMF: u8 = 0x78;

/// Minimum number of bytes needed to inspect a zlib header.
pub const HEADER_LEN: usize = 2;

/// The recognised zlib framing headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZlibHeader {
    /// `78 01`: stored blocks / fastest level
    NoCompression,
    /// `78 9C`: default level
    Default,
    /// `78 DA`: maximum level
    Maximum,
}

impl ZlibHeader {
    /// All recognised headers.
    pub const ALL: [ZlibHeader; 3] = [
        ZlibHeader::NoCompression,
        ZlibHeader::Default,
        ZlibHeader::Maximum,
    ];

    /// The two header bytes as they appear on the wire.
    pub const fn bytes(self) -> [u8; HEADER_LEN] {
        match self {
            ZlibHeader::NoCompression => [ZLIB_CMF, 0x01],
            ZlibHeader::Default => [ZLIB_CMF, 0x9C],
            ZlibHeader::Maximum => [ZLIB_CMF, 0xDA],
        }
    }

    /// Compression level that makes an encoder emit this header.
    pub const fn level(self) -> u32 {
        match self {
            ZlibHeader::NoCompression => 0,
            ZlibHeader::Default => 6,
            ZlibHeader::Maximum => 9,
        }
    }

    /// Inspect the first two bytes of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] when `data` is shorter than
    /// two bytes; such input is never dereferenced.
    pub fn detect(data: &[u8]) -> FirmwareResult<Option<ZlibHeader>> {
        let Some(&[cmf, flg]) = data.first_chunk::<HEADER_LEN>() else {
            return Err(FirmwareError::invalid_argument(format!(
                "zlib detection needs at least {HEADER_LEN} bytes, got {}",
                data.len()
            )));
        };
        Ok(Self::ALL.into_iter().find(|h| h.bytes() == [cmf, flg]))
    }
}

/// Whether `data` carries one of the recognised zlib headers.
///
/// # Errors
///
/// Returns [`FirmwareError::InvalidArgument`] for inputs shorter than two bytes.
pub fn is_compressed(data: &[u8]) -> FirmwareResult<bool> {
    ZlibHeader::detect(data).map(|h| h.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openfirmware_errors::ErrorKind;

    #[test]
    fn test_detects_all_three_headers() {
        assert_eq!(
            ZlibHeader::detect(&[0x78, 0x01, 0x00]),
            Ok(Some(ZlibHeader::NoCompression))
        );
        assert_eq!(
            ZlibHeader::detect(&[0x78, 0x9C]),
            Ok(Some(ZlibHeader::Default))
        );
        assert_eq!(
            ZlibHeader::detect(&[0x78, 0xDA, 0xFF]),
            Ok(Some(ZlibHeader::Maximum))
        );
    }

    #[test]
    fn test_other_valid_zlib_levels_are_not_recognised() {
        // 78 5E is a legal zlib header (FLEVEL 1) but is not one of the three.
        assert_eq!(is_compressed(&[0x78, 0x5E]), Ok(false));
    }

    #[test]
    fn test_byte_order_matters() {
        assert_eq!(is_compressed(&[0x9C, 0x78]), Ok(false));
    }

    #[test]
    fn test_short_input_is_invalid_argument() {
        for input in [&[][..], &[0x78][..]] {
            let err = is_compressed(input).map_err(|e| e.kind());
            assert_eq!(err, Err(ErrorKind::InvalidArgument));
        }
    }
}
