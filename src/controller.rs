//! The image processing controller
//!
//! This module provides the [`ImageController`], the single stateful
//! component of the application: it accepts an image from the picker, a drop
//! event, or the sample gallery, validates it, invokes the injected
//! background-removal capability, and manages the display handles created for
//! presentation. The presentation layer is a pure function of
//! [`ViewState`].
//!
//! Every processing run captures a generation number. Reset and newer runs
//! bump the generation, so a run that settles after being superseded discards
//! its outcome and revokes any handles it created instead of clobbering
//! state the user already left behind.

use std::sync::{Arc, Mutex, MutexGuard};

use instant::Instant;
use tracing::{debug, error, info, warn};

use crate::{
    config::ControllerConfig,
    error::{messages, Result},
    handles::{DisplayHandle, HandleRegistry, HandleStats},
    remover::BackgroundRemover,
    samples::{HttpSampleFetcher, SampleCatalog, SampleFetcher, SampleImage},
    source::{first_dropped, ImageSource},
    validation::validate_source,
};

/// Wall-clock timings of one processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunTimings {
    /// Sample fetch duration, present only for gallery runs
    pub fetch_ms: Option<u64>,
    /// Duration of the background-removal call
    pub removal_ms: u64,
}

impl RunTimings {
    /// Total run duration in milliseconds
    #[must_use]
    pub fn total_ms(&self) -> u64 {
        self.fetch_ms.unwrap_or(0) + self.removal_ms
    }
}

/// Outcome of a successful processing run
///
/// Owned exclusively by the controller while displayed; both handles are
/// revoked exactly once, on supersession by a newer run's result or on
/// explicit reset. Replaced wholesale, never mutated field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedResult {
    /// Display handle for the original input bytes
    pub original: DisplayHandle,
    /// Display handle for the background-removed output
    pub processed: DisplayHandle,
    /// Original file name, used to derive the download name
    pub source_name: String,
    /// Timings of the run that produced this result
    pub timings: RunTimings,
}

/// The single source of truth for what the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// No image chosen; an optional error banner from the last attempt
    Idle {
        /// Banner from a failed validation, fetch, or run
        error: Option<String>,
    },
    /// A run is in flight; spinner only, never an error or result pane
    Processing {
        /// Prior result kept alive until the run settles, so a failed run
        /// leaves it exactly as it was before the run started
        retained: Option<ProcessedResult>,
    },
    /// Terminal success state for the last run
    Result {
        /// The displayed comparison result
        result: ProcessedResult,
        /// Banner from a failed validation of a subsequent upload attempt;
        /// the prior result stays displayed underneath
        error: Option<String>,
    },
}

impl ViewState {
    /// The error banner, if one is shown
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Idle { error } | Self::Result { error, .. } => error.as_deref(),
            Self::Processing { .. } => None,
        }
    }

    /// The displayed result, if any
    #[must_use]
    pub fn result(&self) -> Option<&ProcessedResult> {
        match self {
            Self::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Whether a run is in flight
    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }
}

/// A requested save-as of the processed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Handle to the processed bytes
    pub handle: DisplayHandle,
    /// Suggested file name: configured prefix + original name
    pub file_name: String,
}

struct Inner {
    state: ViewState,
    dragging: bool,
    input_clear_pending: bool,
    generation: u64,
    /// Banner from a rejection that arrived while a run was in flight;
    /// surfaces when the run settles, never beside the spinner
    pending_banner: Option<String>,
}

/// Controller for the background-removal session
///
/// Methods take `&self`; state lives behind a mutex whose guard is never held
/// across an await, so a reset dispatched while a run is suspended interleaves
/// exactly as it would on a single-threaded event loop.
pub struct ImageController {
    config: ControllerConfig,
    remover: Arc<dyn BackgroundRemover>,
    fetcher: Arc<dyn SampleFetcher>,
    registry: Arc<HandleRegistry>,
    inner: Mutex<Inner>,
}

impl ImageController {
    /// Create a controller with an explicit sample fetcher
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation.
    pub fn new(
        config: ControllerConfig,
        remover: Arc<dyn BackgroundRemover>,
        fetcher: Arc<dyn SampleFetcher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            remover,
            fetcher,
            registry: Arc::new(HandleRegistry::new()),
            inner: Mutex::new(Inner {
                state: ViewState::Idle { error: None },
                dragging: false,
                input_clear_pending: false,
                generation: 0,
                pending_banner: None,
            }),
        })
    }

    /// Create a controller fetching samples over HTTP
    ///
    /// # Errors
    /// Returns an error if the configuration fails validation or the HTTP
    /// client cannot be constructed.
    pub fn with_http_fetcher(
        config: ControllerConfig,
        remover: Arc<dyn BackgroundRemover>,
    ) -> Result<Self> {
        let fetcher = HttpSampleFetcher::new(config.fetch_timeout)?;
        Self::new(config, remover, Arc::new(fetcher))
    }

    /// Snapshot of the current view state
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.lock().state.clone()
    }

    /// Whether a run is in flight
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.lock().state.is_processing()
    }

    /// Whether a drag is hovering over the drop zone
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.lock().dragging
    }

    /// The registry the view resolves display handles against
    #[must_use]
    pub fn registry(&self) -> Arc<HandleRegistry> {
        Arc::clone(&self.registry)
    }

    /// Live/created counts for the display-handle table
    #[must_use]
    pub fn handle_stats(&self) -> HandleStats {
        self.registry.stats()
    }

    /// Sample images offered in the idle view
    #[must_use]
    pub fn samples(&self) -> &SampleCatalog {
        &self.config.samples
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// A drag entered the drop zone; visual flag only, no validation
    pub fn drag_over(&self) {
        self.lock().dragging = true;
    }

    /// The drag left the drop zone
    pub fn drag_leave(&self) {
        self.lock().dragging = false;
    }

    /// Consume the pending request to clear the file-selection control
    ///
    /// Set by [`reset`](Self::reset) so the view clears the picker's retained
    /// value and re-selecting the same file re-fires the change event.
    pub fn take_input_clear_request(&self) -> bool {
        let mut inner = self.lock();
        std::mem::take(&mut inner.input_clear_pending)
    }

    /// Process a file from the picker
    pub async fn select_file(&self, file: ImageSource) {
        if let Err(err) = validate_source(&file, self.config.max_image_bytes) {
            warn!(name = %file.name, error = %err, "rejected input");
            self.surface_error(err.user_message());
            return;
        }
        let run_gen = self.begin_run(&file.name);
        self.run(file, run_gen, None).await;
    }

    /// Process a dropped file set; only the first file is used
    pub async fn drop_files(&self, files: Vec<ImageSource>) {
        self.lock().dragging = false;
        let Some(file) = first_dropped(files) else {
            return;
        };
        self.select_file(file).await;
    }

    /// Fetch a sample image and process it
    ///
    /// The processing flag goes up before the fetch; a fetch failure settles
    /// the run with the fixed sample-fetch banner since the removal call is
    /// never reached.
    pub async fn load_sample(&self, sample: &SampleImage) {
        let run_gen = self.begin_run(&sample.file_name);
        let fetch_start = Instant::now();
        match self.fetcher.fetch(sample).await {
            Ok(source) => {
                let fetch_ms = fetch_start.elapsed().as_millis() as u64;
                if let Err(err) = validate_source(&source, self.config.max_image_bytes) {
                    warn!(name = %source.name, error = %err, "rejected fetched sample");
                    self.settle_failure(run_gen, err.user_message());
                    return;
                }
                self.run(source, run_gen, Some(fetch_ms)).await;
            },
            Err(err) => {
                warn!(url = %sample.url, error = %err, "sample fetch failed");
                self.settle_failure(run_gen, err.user_message());
            },
        }
    }

    /// Release the displayed result and return to idle
    ///
    /// Idempotent: a second reset finds nothing to release. Also bumps the
    /// run generation so an in-flight run's settlement is discarded, and
    /// marks the file-input clear request.
    pub fn reset(&self) {
        let previous = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.input_clear_pending = true;
            inner.pending_banner = None;
            std::mem::replace(&mut inner.state, ViewState::Idle { error: None })
        };
        match previous {
            ViewState::Result { result, .. }
            | ViewState::Processing {
                retained: Some(result),
            } => {
                self.release_result(&result);
                debug!("reset: released displayed result");
            },
            _ => debug!("reset: nothing to release"),
        }
    }

    /// Build a download request for the processed image
    ///
    /// Leaf action with no state transition; `None` unless a result is
    /// displayed.
    #[must_use]
    pub fn download_request(&self) -> Option<DownloadRequest> {
        let inner = self.lock();
        match &inner.state {
            ViewState::Result { result, .. } => Some(DownloadRequest {
                handle: result.processed.clone(),
                file_name: format!("{}{}", self.config.download_prefix, result.source_name),
            }),
            _ => None,
        }
    }

    /// Enter processing: bump the generation, clear the banner, and stash any
    /// displayed result until the run settles
    fn begin_run(&self, name: &str) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.pending_banner = None;
        let run_gen = inner.generation;
        let retained = match std::mem::replace(&mut inner.state, ViewState::Idle { error: None }) {
            ViewState::Result { result, .. } => Some(result),
            // A newer run supersedes an in-flight one; the retained result
            // carries over and the older run's settlement is now stale.
            ViewState::Processing { retained } => retained,
            ViewState::Idle { .. } => None,
        };
        inner.state = ViewState::Processing { retained };
        info!(name, generation = run_gen, "processing run started");
        run_gen
    }

    /// Await the removal call and settle the run
    async fn run(&self, source: ImageSource, run_gen: u64, fetch_ms: Option<u64>) {
        let removal_start = Instant::now();
        match self.remover.remove_background(&source).await {
            Ok(processed) => {
                let timings = RunTimings {
                    fetch_ms,
                    removal_ms: removal_start.elapsed().as_millis() as u64,
                };
                let ImageSource {
                    bytes,
                    media_type,
                    name,
                } = source;
                let result = ProcessedResult {
                    original: self.registry.create(bytes, &media_type),
                    processed: self.registry.create(processed.bytes, &processed.media_type),
                    source_name: name,
                    timings,
                };
                self.settle_success(run_gen, result);
            },
            Err(err) => {
                error!(name = %source.name, error = %err, "background removal failed");
                self.settle_failure(run_gen, messages::PROCESSING_FAILED);
            },
        }
    }

    /// Install a run's result, or discard it if the run went stale
    fn settle_success(&self, run_gen: u64, result: ProcessedResult) {
        let superseded = {
            let mut inner = self.lock();
            if inner.generation != run_gen {
                debug!(generation = run_gen, "discarding stale run result");
                drop(inner);
                self.release_result(&result);
                return;
            }
            let retained = match std::mem::replace(&mut inner.state, ViewState::Idle { error: None })
            {
                ViewState::Processing { retained } => retained,
                _ => None,
            };
            let timings = result.timings;
            let banner = inner.pending_banner.take();
            inner.state = ViewState::Result {
                result,
                error: banner,
            };
            info!(
                removal_ms = timings.removal_ms,
                total_ms = timings.total_ms(),
                "processing run succeeded"
            );
            retained
        };
        if let Some(previous) = superseded {
            self.release_result(&previous);
        }
    }

    /// Settle a failed run: restore the retained result if one existed,
    /// otherwise return to idle, either way with the banner set
    fn settle_failure(&self, run_gen: u64, message: &str) {
        let mut inner = self.lock();
        if inner.generation != run_gen {
            debug!(generation = run_gen, "discarding stale run failure");
            return;
        }
        // The run's own failure message wins over a stashed rejection banner
        inner.pending_banner = None;
        let retained = match std::mem::replace(&mut inner.state, ViewState::Idle { error: None }) {
            ViewState::Processing { retained } => retained,
            _ => None,
        };
        inner.state = match retained {
            Some(result) => ViewState::Result {
                result,
                error: Some(message.to_owned()),
            },
            None => ViewState::Idle {
                error: Some(message.to_owned()),
            },
        };
    }

    /// Show a validation banner without entering processing
    ///
    /// A still-displayed result stays displayed. While a run is in flight the
    /// banner is stashed and surfaces once that run settles; it never renders
    /// beside the spinner.
    fn surface_error(&self, message: &str) {
        let mut inner = self.lock();
        inner.state = match std::mem::replace(&mut inner.state, ViewState::Idle { error: None }) {
            ViewState::Result { result, .. } => ViewState::Result {
                result,
                error: Some(message.to_owned()),
            },
            ViewState::Processing { retained } => {
                inner.pending_banner = Some(message.to_owned());
                ViewState::Processing { retained }
            },
            ViewState::Idle { .. } => ViewState::Idle {
                error: Some(message.to_owned()),
            },
        };
    }

    fn release_result(&self, result: &ProcessedResult) {
        self.registry.revoke(&result.original);
        self.registry.revoke(&result.processed);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("controller state lock poisoned")
    }
}
