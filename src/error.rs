//! Error types for the background-removal session controller

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Fixed user-facing banner strings
///
/// Every error kind surfaces to the presentation layer as one of these
/// messages; the diagnostic detail stays on the `Display` impl and the
/// tracing channel.
pub mod messages {
    /// Shown when the declared media type is not in the image family
    pub const INVALID_TYPE: &str = "please choose a valid image file (PNG, JPG, etc.)";
    /// Shown when the input exceeds the size ceiling
    pub const TOO_LARGE: &str = "image must be smaller than 10MB";
    /// Shown when a sample asset could not be retrieved
    pub const SAMPLE_FETCH_FAILED: &str = "failed to load sample image, try uploading your own";
    /// Shown when the background-removal capability rejected the input
    pub const PROCESSING_FAILED: &str = "background removal failed, try a different image";
    /// Fallback for internal errors that should never reach the banner
    pub const INTERNAL: &str = "something went wrong, please try again";
}

/// Error types for controller operations
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Declared media type is not in the image family
    #[error("invalid media type '{media_type}': expected an image/* type")]
    InvalidType {
        /// The declared media type of the rejected input
        media_type: String,
    },

    /// Input exceeds the configured size ceiling
    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge {
        /// Byte size of the rejected input
        size: u64,
        /// The configured ceiling in bytes
        limit: u64,
    },

    /// Network or HTTP failure while retrieving a sample asset
    #[error("sample fetch failed: {0}")]
    SampleFetchFailed(String),

    /// The external background-removal capability rejected or threw
    #[error("background removal failed: {0}")]
    ProcessingFailed(String),

    /// Invalid controller configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image encoding or decoding errors
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ControllerError {
    /// Create a new invalid-type error
    pub fn invalid_type<S: Into<String>>(media_type: S) -> Self {
        Self::InvalidType {
            media_type: media_type.into(),
        }
    }

    /// Create a new too-large error
    #[must_use]
    pub fn too_large(size: u64, limit: u64) -> Self {
        Self::TooLarge { size, limit }
    }

    /// Create a new sample-fetch error
    pub fn sample_fetch<S: Into<String>>(msg: S) -> Self {
        Self::SampleFetchFailed(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// The fixed banner string shown to the user for this error kind
    ///
    /// All kinds render identically as a dismissible error banner; only the
    /// message text distinguishes them.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => messages::INVALID_TYPE,
            Self::TooLarge { .. } => messages::TOO_LARGE,
            Self::SampleFetchFailed(_) => messages::SAMPLE_FETCH_FAILED,
            Self::ProcessingFailed(_) => messages::PROCESSING_FAILED,
            Self::InvalidConfig(_) | Self::Image(_) => messages::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ControllerError::invalid_type("text/plain");
        assert!(matches!(err, ControllerError::InvalidType { .. }));

        let err = ControllerError::too_large(11 * 1024 * 1024, 10 * 1024 * 1024);
        assert!(matches!(err, ControllerError::TooLarge { .. }));
    }

    #[test]
    fn test_error_display_carries_detail() {
        let err = ControllerError::invalid_type("text/plain");
        assert!(err.to_string().contains("text/plain"));

        let err = ControllerError::too_large(42, 10);
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("10"));

        let err = ControllerError::sample_fetch("GET /cat.jpg returned 404");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_user_message_mapping() {
        assert_eq!(
            ControllerError::invalid_type("application/pdf").user_message(),
            messages::INVALID_TYPE
        );
        assert_eq!(
            ControllerError::too_large(1, 0).user_message(),
            messages::TOO_LARGE
        );
        assert_eq!(
            ControllerError::sample_fetch("timeout").user_message(),
            messages::SAMPLE_FETCH_FAILED
        );
        assert_eq!(
            ControllerError::processing("model rejected input").user_message(),
            messages::PROCESSING_FAILED
        );
        assert_eq!(
            ControllerError::invalid_config("bad ceiling").user_message(),
            messages::INTERNAL
        );
    }
}
