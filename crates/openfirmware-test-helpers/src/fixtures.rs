//! Firmware image fixtures.
//!
//! Images are produced with `flate2` directly so fixtures do not depend on
//! the code under test.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::must::must;

fn encode(payload: &[u8], level: Compression) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level);
    must(encoder.write_all(payload));
    must(encoder.finish())
}

/// `payload` zlib-framed at the default level (`78 9C` header).
pub fn zlib(payload: &[u8]) -> Vec<u8> {
    encode(payload, Compression::default())
}

/// `payload` zlib-framed at the maximum level (`78 DA` header).
pub fn zlib_max(payload: &[u8]) -> Vec<u8> {
    encode(payload, Compression::best())
}

/// `payload` zlib-framed as stored blocks (`78 01` header).
pub fn zlib_stored(payload: &[u8]) -> Vec<u8> {
    encode(payload, Compression::none())
}

/// Deterministic, poorly compressible bytes (xorshift64).
pub fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state.to_le_bytes()[0]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_headers() {
        assert_eq!(zlib(b"x").get(..2), Some(&[0x78, 0x9C][..]));
        assert_eq!(zlib_max(b"x").get(..2), Some(&[0x78, 0xDA][..]));
        assert_eq!(zlib_stored(b"x").get(..2), Some(&[0x78, 0x01][..]));
    }

    #[test]
    fn test_pseudo_random_is_deterministic() {
        assert_eq!(pseudo_random_bytes(64, 3), pseudo_random_bytes(64, 3));
        assert_ne!(pseudo_random_bytes(64, 3), pseudo_random_bytes(64, 4));
    }
}
