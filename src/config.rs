//! Controller configuration
//!
//! Built with the builder pattern; a configuration can also be validated
//! after manual mutation via [`ControllerConfig::validate`].

use instant::Duration;

use crate::{
    error::{ControllerError, Result},
    samples::SampleCatalog,
    validation::MAX_IMAGE_BYTES,
};

/// Default prefix for download file names
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "background-removed-";

/// Default timeout for sample asset fetches
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the image processing controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Size ceiling for accepted inputs, in bytes
    pub max_image_bytes: u64,
    /// Prefix prepended to the original file name for downloads
    pub download_prefix: String,
    /// Timeout for sample asset fetches
    pub fetch_timeout: Duration,
    /// Sample images offered in the idle view
    pub samples: SampleCatalog,
}

impl ControllerConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::new()
    }

    /// Check configuration invariants
    ///
    /// # Errors
    /// Returns [`ControllerError::InvalidConfig`] for a zero size ceiling, an
    /// empty download prefix, or a zero fetch timeout.
    pub fn validate(&self) -> Result<()> {
        if self.max_image_bytes == 0 {
            return Err(ControllerError::invalid_config(
                "max_image_bytes must be greater than zero",
            ));
        }
        if self.download_prefix.is_empty() {
            return Err(ControllerError::invalid_config(
                "download_prefix must not be empty",
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ControllerError::invalid_config(
                "fetch_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: MAX_IMAGE_BYTES,
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_owned(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            samples: SampleCatalog::default(),
        }
    }
}

/// Builder for [`ControllerConfig`]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    /// Start from the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
        }
    }

    /// Set the input size ceiling in bytes
    #[must_use]
    pub fn max_image_bytes(mut self, max: u64) -> Self {
        self.config.max_image_bytes = max;
        self
    }

    /// Set the download file-name prefix
    #[must_use]
    pub fn download_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.download_prefix = prefix.into();
        self
    }

    /// Set the sample fetch timeout
    #[must_use]
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Set the sample catalog
    #[must_use]
    pub fn samples(mut self, samples: SampleCatalog) -> Self {
        self.config.samples = samples;
        self
    }

    /// Validate and return the configuration
    ///
    /// # Errors
    /// See [`ControllerConfig::validate`].
    pub fn build(self) -> Result<ControllerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ControllerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
