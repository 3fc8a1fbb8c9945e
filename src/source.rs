//! Raw input images before processing
//!
//! An [`ImageSource`] normalizes the three input origins (file picker,
//! drag-drop, remote sample fetch) into one shape: owned bytes, the declared
//! media type, and a display name.

/// A raw input image before validation and processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// Binary content of the image
    pub bytes: Vec<u8>,
    /// Declared media type (e.g. `image/jpeg`); binding for validation
    pub media_type: String,
    /// Display name, also used to derive the download name
    pub name: String,
}

impl ImageSource {
    /// Create a source from a picker or drop file object
    pub fn new<S: Into<String>, N: Into<String>>(bytes: Vec<u8>, media_type: S, name: N) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            name: name.into(),
        }
    }

    /// Re-wrap fetched sample bytes into a source
    ///
    /// The reported content type may carry parameters (`image/jpeg;
    /// charset=...`); only the essence is kept. A missing content type falls
    /// back to `image/jpeg` so a well-formed sample still passes the
    /// media-type gate.
    pub fn from_fetched<N: Into<String>>(
        bytes: Vec<u8>,
        content_type: Option<&str>,
        name: N,
    ) -> Self {
        let media_type = content_type
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .filter(|essence| !essence.is_empty())
            .unwrap_or("image/jpeg")
            .to_owned();
        Self {
            bytes,
            media_type,
            name: name.into(),
        }
    }

    /// Byte size of the content
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the content is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Normalize a dropped file set: only the first file is used
///
/// Additional files in the drop are silently ignored, matching the drop
/// surface contract.
pub fn first_dropped(files: Vec<ImageSource>) -> Option<ImageSource> {
    let mut files = files.into_iter();
    let first = files.next();
    let ignored = files.count();
    if ignored > 0 {
        tracing::debug!(ignored, "ignoring extra files in drop");
    }
    first
}
