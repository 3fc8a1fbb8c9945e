#![allow(clippy::uninlined_format_args)]

//! # Clearframe
//!
//! Session controller for a client-side background-removal application:
//! accept an image from a file picker, a drag-drop event, or a gallery of
//! remote sample images, validate it, invoke an injected background-removal
//! capability, and manage the ephemeral display handles created for the
//! original/processed comparison view.
//!
//! The hard computation lives entirely behind the [`BackgroundRemover`]
//! trait; this crate owns everything around it: input normalization,
//! validation (media-type family and a 10 MiB ceiling by default), the
//! idle → processing → result/error state machine, deterministic release of
//! display handles, and download-name synthesis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clearframe::{ControllerConfig, ImageController, ImageSource, MockRemover, ViewState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Inject a capability; MockRemover stands in for a real engine here.
//! let controller = ImageController::with_http_fetcher(
//!     ControllerConfig::default(),
//!     Arc::new(MockRemover::new()),
//! )?;
//!
//! // Feed it a picked file.
//! let file = ImageSource::new(std::fs::read("photo.jpg")?, "image/jpeg", "photo.jpg");
//! controller.select_file(file).await;
//!
//! // Render from the view state.
//! match controller.view_state() {
//!     ViewState::Result { result, .. } => {
//!         let download = controller.download_request().unwrap();
//!         println!("save {} ({})", download.file_name, result.processed.url());
//!     }
//!     ViewState::Idle { error: Some(banner) } => eprintln!("{banner}"),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Resource lifecycle
//!
//! Display handles model the platform's object-URL table: entries live until
//! explicitly revoked. The controller releases both handles of a displayed
//! result exactly once, when a newer run's result supersedes it or on
//! [`ImageController::reset`]; a run that settles after a reset discards its
//! outcome and leaks nothing.

pub mod config;
pub mod controller;
pub mod error;
pub mod handles;
pub mod remover;
pub mod samples;
pub mod source;
pub mod validation;

// Public API exports
pub use config::{ControllerConfig, ControllerConfigBuilder, DEFAULT_DOWNLOAD_PREFIX, DEFAULT_FETCH_TIMEOUT};
pub use controller::{DownloadRequest, ImageController, ProcessedResult, RunTimings, ViewState};
pub use error::{messages, ControllerError, Result};
pub use handles::{DisplayHandle, HandleData, HandleRegistry, HandleStats};
pub use remover::{BackgroundRemover, MockRemover, ProcessedImage};
pub use samples::{HttpSampleFetcher, SampleCatalog, SampleFetcher, SampleImage};
pub use source::{first_dropped, ImageSource};
pub use validation::{validate_source, IMAGE_MEDIA_PREFIX, MAX_IMAGE_BYTES};
