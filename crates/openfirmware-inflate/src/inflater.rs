//! Firmware inflation
//!
//! [`Inflater`] turns a zlib-framed image into raw bytes. Images without a
//! recognised header are returned as-is, borrowed from the caller.

use std::borrow::Cow;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use openfirmware_errors::{FirmwareError, FirmwareResult};
use tracing::debug;

use crate::config::{BufferPolicy, InflateConfig};
use crate::header::ZlibHeader;

/// Inflates zlib-framed firmware images according to an [`InflateConfig`].
#[derive(Debug, Clone, Default)]
pub struct Inflater {
    config: InflateConfig,
}

impl Inflater {
    /// Create an inflater with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if the configuration is invalid.
    pub fn new(config: InflateConfig) -> FirmwareResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &InflateConfig {
        &self.config
    }

    /// Normalize `data` to raw bytes.
    ///
    /// Returns `Cow::Borrowed(data)` when no recognised zlib header is present
    /// and the inflated bytes otherwise.
    ///
    /// # Errors
    ///
    /// - [`FirmwareError::InvalidArgument`] if `data` is shorter than two bytes.
    /// - [`FirmwareError::DecompressionFailed`] if the decoder rejects the
    ///   stream, the scratch buffer is exhausted, or the stream inflates to
    ///   zero bytes.
    pub fn decompress<'a>(&self, data: &'a [u8]) -> FirmwareResult<Cow<'a, [u8]>> {
        let Some(header) = ZlibHeader::detect(data)? else {
            debug!(len = data.len(), "Firmware is not compressed, passing through");
            return Ok(Cow::Borrowed(data));
        };

        let output = match self.config.buffer_policy {
            BufferPolicy::Fixed => self.inflate_fixed(data)?,
            BufferPolicy::Growing => self.inflate_growing(data)?,
        };

        if output.is_empty() {
            return Err(FirmwareError::decompression_failed(
                "stream inflated to zero bytes",
            ));
        }

        debug!(
            ?header,
            compressed_len = data.len(),
            bytes = output.len(),
            "Firmware decompressed"
        );
        Ok(Cow::Owned(output))
    }

    fn inflate_fixed(&self, data: &[u8]) -> FirmwareResult<Vec<u8>> {
        let mut output = Vec::new();
        reserve(&mut output, self.config.initial_capacity(data.len()))?;

        let mut stream = Decompress::new(true);
        let status = stream
            .decompress_vec(data, &mut output, FlushDecompress::Finish)
            .map_err(|e| FirmwareError::decompression_failed(e.to_string()))?;

        match status {
            Status::StreamEnd => {}
            Status::Ok if output.len() < output.capacity() => {}
            Status::Ok | Status::BufError => {
                return Err(FirmwareError::decompression_failed(format!(
                    "output buffer of {} bytes exhausted before end of stream",
                    output.capacity()
                )));
            }
        }

        output.shrink_to_fit();
        Ok(output)
    }

    fn inflate_growing(&self, data: &[u8]) -> FirmwareResult<Vec<u8>> {
        let max = self.config.max_output_len;
        let mut output = Vec::new();
        reserve(&mut output, self.config.initial_capacity(data.len()))?;

        let mut stream = Decompress::new(true);
        loop {
            let consumed = usize::try_from(stream.total_in())
                .map_err(|e| FirmwareError::decompression_failed(e.to_string()))?;
            let remaining = data.get(consumed..).unwrap_or_default();
            let before = (stream.total_in(), stream.total_out());

            // Streaming flush: a `Finish` pass that runs out of room cannot be resumed.
            let status = stream
                .decompress_vec(remaining, &mut output, FlushDecompress::None)
                .map_err(|e| FirmwareError::decompression_failed(e.to_string()))?;

            if status == Status::StreamEnd {
                output.shrink_to_fit();
                return Ok(output);
            }

            if output.len() < output.capacity() {
                // Room left but no end of stream: input is truncated.
                if (stream.total_in(), stream.total_out()) == before {
                    return Err(FirmwareError::decompression_failed(
                        "truncated zlib stream",
                    ));
                }
                continue;
            }

            if output.len() >= max {
                return Err(FirmwareError::decompression_failed(format!(
                    "inflated size exceeds limit of {max} bytes"
                )));
            }
            let grow = output.capacity().max(1).min(max - output.len());
            debug!(from = output.capacity(), by = grow, "Growing inflate buffer");
            reserve(&mut output, grow)?;
        }
    }
}

fn reserve(output: &mut Vec<u8>, additional: usize) -> FirmwareResult<()> {
    output.try_reserve_exact(additional).map_err(|e| {
        FirmwareError::decompression_failed(format!(
            "cannot allocate {additional} byte scratch buffer: {e}"
        ))
    })
}

/// Normalize `data` with the default (fixed 4x buffer) configuration.
///
/// # Errors
///
/// See [`Inflater::decompress`].
pub fn decompress(data: &[u8]) -> FirmwareResult<Cow<'_, [u8]>> {
    Inflater::default().decompress(data)
}

/// Wrap `data` in zlib framing carrying `header`.
///
/// Used to produce fixtures and packaged images.
///
/// # Errors
///
/// Returns any I/O error reported by the encoder.
pub fn compress(data: &[u8], header: ZlibHeader) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(header.level()));
    encoder.write_all(data)?;
    encoder.finish()
}
