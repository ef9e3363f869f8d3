//! Configuration types for the firmware manager.

use std::time::Duration;

use openfirmware_errors::{FirmwareError, FirmwareResult};
use openfirmware_inflate::{BufferPolicy, InflateConfig};
use serde::{Deserialize, Serialize};

/// Firmware manager configuration.
///
/// Serialized timeouts are whole milliseconds:
///
/// ```
/// use openfirmware_manager::ManagerConfig;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config: ManagerConfig = serde_json::from_str(r#"{ "fetch_timeout_ms": 2500 }"#)?;
/// assert_eq!(config.fetch_timeout, Some(Duration::from_millis(2500)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Inflation settings for zlib-framed images.
    pub inflate: InflateConfig,

    /// Upper bound on a blocking resource fetch.
    ///
    /// Default: `None`, wait until the loader answers.
    #[serde(rename = "fetch_timeout_ms", with = "timeout_ms")]
    pub fetch_timeout: Option<Duration>,
}

impl ManagerConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ManagerConfigBuilder {
        ManagerConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::InvalidArgument`] if the inflate settings are
    /// invalid or the fetch timeout is zero.
    pub fn validate(&self) -> FirmwareResult<()> {
        self.inflate.validate()?;
        if self.fetch_timeout.is_some_and(|t| t.is_zero()) {
            return Err(FirmwareError::invalid_argument(
                "fetch_timeout must be greater than 0 when set",
            ));
        }
        Ok(())
    }
}

/// Builder for `ManagerConfig`.
#[derive(Debug, Default)]
pub struct ManagerConfigBuilder {
    config: ManagerConfig,
}

impl ManagerConfigBuilder {
    /// Set the scratch buffer multiplier.
    #[must_use]
    pub fn output_multiplier(mut self, multiplier: usize) -> Self {
        self.config.inflate.output_multiplier = multiplier;
        self
    }

    /// Set the buffer sizing policy.
    #[must_use]
    pub fn buffer_policy(mut self, policy: BufferPolicy) -> Self {
        self.config.inflate.buffer_policy = policy;
        self
    }

    /// Set the inflated size ceiling for the growing policy.
    #[must_use]
    pub fn max_output_len(mut self, len: usize) -> Self {
        self.config.inflate.max_output_len = len;
        self
    }

    /// Bound blocking fetches. `None` waits indefinitely.
    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> FirmwareResult<ManagerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

mod timeout_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
