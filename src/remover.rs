//! The opaque background-removal capability seam
//!
//! The controller never sees model loading or inference; it calls
//! [`BackgroundRemover::remove_background`] and treats the implementation as
//! a black box that may be slow (seconds to minutes on cold start) and may
//! fail for any input. Implementations are injected at construction, so tests
//! and demos run against [`MockRemover`] without any model files.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use instant::Duration;

use crate::{error::Result, source::ImageSource};

/// Output of a successful background-removal call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    /// Encoded image bytes with non-subject pixels made transparent
    pub bytes: Vec<u8>,
    /// Media type of the encoded output (PNG with alpha)
    pub media_type: String,
}

/// Asynchronous background-removal capability
///
/// No retry is performed by the controller; a rejection for any reason maps
/// to the fixed processing-failed banner.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background from a validated input image
    ///
    /// # Errors
    /// Any error the underlying engine produces: unsupported content,
    /// internal model errors, resource exhaustion.
    async fn remove_background(&self, source: &ImageSource) -> Result<ProcessedImage>;
}

/// Mock capability for tests and demos
///
/// Synthesizes a small transparent-background PNG without decoding the input,
/// so it accepts any bytes that pass validation. Failure and latency are
/// configurable, and calls are recorded for verification.
pub struct MockRemover {
    failing: AtomicBool,
    delay: Option<Duration>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockRemover {
    /// Create a mock that succeeds immediately
    #[must_use]
    pub fn new() -> Self {
        Self {
            failing: AtomicBool::new(false),
            delay: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that fails every call
    #[must_use]
    pub fn new_failing() -> Self {
        let remover = Self::new();
        remover.failing.store(true, Ordering::SeqCst);
        remover
    }

    /// Create a mock that sleeps before settling
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// Toggle failure mode for subsequent calls
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Names of the sources processed so far
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().expect("call history lock poisoned").clone()
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.call_history.lock().expect("call history lock poisoned").len()
    }

    fn synthesize_cutout() -> Result<Vec<u8>> {
        // Opaque centered disc on a fully transparent canvas
        let size = 64u32;
        let center = size as f32 / 2.0;
        let radius = size as f32 / 3.0;
        let mut canvas = RgbaImage::new(size, size);
        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let inside = (dx * dx + dy * dy).sqrt() <= radius;
            *pixel = if inside {
                Rgba([200, 120, 80, 255])
            } else {
                Rgba([0, 0, 0, 0])
            };
        }
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(buffer)
    }
}

impl Default for MockRemover {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackgroundRemover for MockRemover {
    async fn remove_background(&self, source: &ImageSource) -> Result<ProcessedImage> {
        self.call_history
            .lock()
            .expect("call history lock poisoned")
            .push(source.name.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(crate::error::ControllerError::processing(
                "mock remover configured to fail",
            ));
        }

        Ok(ProcessedImage {
            bytes: Self::synthesize_cutout()?,
            media_type: "image/png".to_owned(),
        })
    }
}
