//! Scratch-buffer sizing policy for inflation.

use openfirmware_errors::{FirmwareError, FirmwareResult};
use serde::{Deserialize, Serialize};

/// Default scratch buffer size, as a multiple of the compressed length.
pub const DEFAULT_OUTPUT_MULTIPLIER: usize = 4;

/// Default ceiling for [`BufferPolicy::Growing`] (64 MiB).
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 64 * 1024 * 1024;

/// How the output buffer is sized when inflating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPolicy {
    /// One inflate pass into a buffer of `output_multiplier * input_len`
    /// bytes. Images that expand further fail with `DecompressionFailed`.
    #[default]
    Fixed,
    /// Start like `Fixed`, then double the buffer until the stream ends or
    /// `max_output_len` is reached.
    Growing,
}

/// Inflation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflateConfig {
    /// Initial output buffer size as a multiple of the compressed length.
    pub output_multiplier: usize,
    /// Buffer sizing policy.
    pub buffer_policy: BufferPolicy,
    /// Upper bound on the inflated size under [`BufferPolicy::Growing`].
    pub max_output_len: usize,
}

impl Default for InflateConfig {
    fn default() -> Self {
        Self {
            output_multiplier: DEFAULT_OUTPUT_MULTIPLIER,
            buffer_policy: BufferPolicy::Fixed,
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }
}

impl InflateConfig {
    /// Growing-buffer configuration with default limits.
    #[must_use]
    pub fn growing() -> Self {
        Self {
            buffer_policy: BufferPolicy::Growing,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if the multiplier or the
    /// output ceiling is zero.
    pub fn validate(&self) -> FirmwareResult<()> {
        if self.output_multiplier == 0 {
            return Err(FirmwareError::invalid_argument(
                "output_multiplier must be greater than 0",
            ));
        }
        if self.max_output_len == 0 {
            return Err(FirmwareError::invalid_argument(
                "max_output_len must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Initial scratch buffer size for a compressed input of `input_len` bytes.
    pub(crate) fn initial_capacity(&self, input_len: usize) -> usize {
        let wanted = input_len.saturating_mul(self.output_multiplier);
        match self.buffer_policy {
            BufferPolicy::Fixed => wanted,
            BufferPolicy::Growing => wanted.min(self.max_output_len),
        }
    }
}
