//! Input validation gate
//!
//! Every processing routine runs this gate before any processing state is
//! entered. The media type is binding; file extensions and the picker's
//! accept filter are advisory only.

use crate::{
    error::{ControllerError, Result},
    source::ImageSource,
};

/// Media-type family prefix an input must carry
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Default size ceiling: 10 MiB
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Gate an [`ImageSource`] before it is allowed into processing
///
/// Checks the media type first, then the byte size against `max_bytes`.
///
/// # Errors
/// - [`ControllerError::InvalidType`] when the declared media type does not
///   start with `image/`
/// - [`ControllerError::TooLarge`] when the byte size exceeds `max_bytes`
pub fn validate_source(source: &ImageSource, max_bytes: u64) -> Result<()> {
    if !source.media_type.starts_with(IMAGE_MEDIA_PREFIX) {
        return Err(ControllerError::invalid_type(source.media_type.clone()));
    }
    if source.len() > max_bytes {
        return Err(ControllerError::too_large(source.len(), max_bytes));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_with(media_type: &str, len: usize) -> ImageSource {
        ImageSource::new(vec![0u8; len], media_type, "input.bin")
    }

    #[test]
    fn test_accepts_image_types() {
        for media_type in ["image/png", "image/jpeg", "image/webp", "image/gif"] {
            assert!(validate_source(&source_with(media_type, 16), MAX_IMAGE_BYTES).is_ok());
        }
    }

    #[test]
    fn test_rejects_non_image_types() {
        for media_type in ["text/plain", "application/pdf", "video/mp4", ""] {
            let err = validate_source(&source_with(media_type, 16), MAX_IMAGE_BYTES).unwrap_err();
            assert!(matches!(err, ControllerError::InvalidType { .. }));
        }
    }

    #[test]
    fn test_media_type_checked_before_size() {
        // An oversized non-image reports the type error, not the size error
        let source = source_with("text/plain", 32);
        let err = validate_source(&source, 4).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidType { .. }));
    }

    #[test]
    fn test_size_boundary() {
        // Exactly at the ceiling passes; one byte over fails
        let at_limit = source_with("image/png", 64);
        assert!(validate_source(&at_limit, 64).is_ok());

        let over_limit = source_with("image/png", 65);
        let err = validate_source(&over_limit, 64).unwrap_err();
        assert!(matches!(err, ControllerError::TooLarge { size: 65, limit: 64 }));
    }
}
