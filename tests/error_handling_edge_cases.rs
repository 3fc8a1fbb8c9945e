//! Error handling, boundary conditions, and banner mapping
//!
//! Exercises the validation boundaries, the fixed user-facing messages, and
//! the paths where errors must not disturb displayed state.

use std::sync::Arc;

use async_trait::async_trait;
use clearframe::{
    messages, ControllerConfig, ControllerError, ImageController, ImageSource, MockRemover,
    Result, SampleCatalog, SampleFetcher, SampleImage, ViewState, MAX_IMAGE_BYTES,
};

struct FailingFetcher;

#[async_trait]
impl SampleFetcher for FailingFetcher {
    async fn fetch(&self, sample: &SampleImage) -> Result<ImageSource> {
        Err(ControllerError::sample_fetch(format!(
            "GET {}: connection refused",
            sample.url
        )))
    }
}

/// Route controller diagnostics into the test harness output
fn init_diagnostics() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn controller(config: ControllerConfig, remover: Arc<MockRemover>) -> ImageController {
    init_diagnostics();
    ImageController::new(config, remover, Arc::new(FailingFetcher)).unwrap()
}

fn source(name: &str, media_type: &str, len: usize) -> ImageSource {
    ImageSource::new(vec![0u8; len], media_type, name)
}

#[test]
fn test_banner_strings_are_fixed() {
    assert_eq!(messages::INVALID_TYPE, "please choose a valid image file (PNG, JPG, etc.)");
    assert_eq!(messages::TOO_LARGE, "image must be smaller than 10MB");
    assert_eq!(
        messages::SAMPLE_FETCH_FAILED,
        "failed to load sample image, try uploading your own"
    );
    assert_eq!(
        messages::PROCESSING_FAILED,
        "background removal failed, try a different image"
    );
}

#[test]
fn test_size_ceiling_constant() {
    assert_eq!(MAX_IMAGE_BYTES, 10_485_760);
}

#[tokio::test]
async fn test_input_at_exactly_the_ceiling_is_accepted() {
    let remover = Arc::new(MockRemover::new());
    let ctl = controller(ControllerConfig::default(), Arc::clone(&remover));

    ctl.select_file(source("edge.jpg", "image/jpeg", 10 * 1024 * 1024))
        .await;

    assert!(ctl.view_state().result().is_some());
    assert_eq!(remover.call_count(), 1);
}

#[tokio::test]
async fn test_one_byte_over_the_ceiling_is_rejected() {
    let remover = Arc::new(MockRemover::new());
    let ctl = controller(ControllerConfig::default(), Arc::clone(&remover));

    ctl.select_file(source("edge.jpg", "image/jpeg", 10 * 1024 * 1024 + 1))
        .await;

    assert_eq!(ctl.view_state().error(), Some(messages::TOO_LARGE));
    assert_eq!(remover.call_count(), 0);
}

#[tokio::test]
async fn test_custom_ceiling_is_honored() {
    let config = ControllerConfig::builder()
        .max_image_bytes(1024)
        .build()
        .unwrap();
    let remover = Arc::new(MockRemover::new());
    let ctl = controller(config, Arc::clone(&remover));

    ctl.select_file(source("small.png", "image/png", 2048)).await;
    assert_eq!(ctl.view_state().error(), Some(messages::TOO_LARGE));
    assert_eq!(remover.call_count(), 0);
}

#[tokio::test]
async fn test_custom_download_prefix() {
    let config = ControllerConfig::builder()
        .download_prefix("cutout-")
        .build()
        .unwrap();
    let ctl = controller(config, Arc::new(MockRemover::new()));

    ctl.select_file(source("dog.png", "image/png", 64)).await;
    assert_eq!(ctl.download_request().unwrap().file_name, "cutout-dog.png");
}

#[tokio::test]
async fn test_empty_drop_is_a_no_op() {
    let remover = Arc::new(MockRemover::new());
    let ctl = controller(ControllerConfig::default(), Arc::clone(&remover));

    ctl.drop_files(Vec::new()).await;

    assert_eq!(ctl.view_state(), ViewState::Idle { error: None });
    assert_eq!(remover.call_count(), 0);
}

#[tokio::test]
async fn test_sample_fetch_failure_retains_displayed_result() {
    let remover = Arc::new(MockRemover::new());
    let ctl = controller(ControllerConfig::default(), Arc::clone(&remover));

    ctl.select_file(source("kept.jpg", "image/jpeg", 128)).await;
    let kept = ctl.view_state().result().cloned().unwrap();

    let sample = SampleImage::new("https://example.com/down.jpg", "down.jpg");
    ctl.load_sample(&sample).await;

    assert_eq!(
        ctl.view_state(),
        ViewState::Result {
            result: kept,
            error: Some(messages::SAMPLE_FETCH_FAILED.to_owned())
        }
    );
    assert_eq!(ctl.handle_stats().active, 2);
}

#[tokio::test]
async fn test_error_banner_clears_on_next_valid_run() {
    let remover = Arc::new(MockRemover::new());
    let ctl = controller(ControllerConfig::default(), Arc::clone(&remover));

    ctl.select_file(source("nope.txt", "text/plain", 64)).await;
    assert_eq!(ctl.view_state().error(), Some(messages::INVALID_TYPE));

    ctl.select_file(source("ok.png", "image/png", 64)).await;
    let state = ctl.view_state();
    assert!(state.error().is_none(), "no stale error beside a fresh result");
    assert!(state.result().is_some());
}

#[tokio::test]
async fn test_reset_clears_error_banner() {
    let ctl = controller(ControllerConfig::default(), Arc::new(MockRemover::new()));

    ctl.select_file(source("nope.txt", "text/plain", 64)).await;
    assert!(ctl.view_state().error().is_some());

    ctl.reset();
    assert_eq!(ctl.view_state(), ViewState::Idle { error: None });
}

#[test]
fn test_error_display_includes_diagnostics() {
    let err = ControllerError::too_large(11_534_336, 10_485_760);
    assert!(err.to_string().contains("11534336"));
    assert!(err.to_string().contains("10485760"));

    let err = ControllerError::invalid_type("application/zip");
    assert!(err.to_string().contains("application/zip"));
}

#[test]
fn test_config_build_failures_are_invalid_config() {
    let err = ControllerConfig::builder()
        .max_image_bytes(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, ControllerError::InvalidConfig(_)));
    assert!(err.to_string().contains("max_image_bytes"));

    let err = ControllerConfig::builder()
        .download_prefix("")
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("download_prefix"));
}

#[test]
fn test_gallery_is_exposed_to_the_view() {
    let catalog = SampleCatalog::new(vec![SampleImage::new(
        "https://example.com/a.jpg",
        "a.jpg",
    )]);
    let config = ControllerConfig::builder().samples(catalog.clone()).build().unwrap();
    let ctl = controller(config, Arc::new(MockRemover::new()));

    assert_eq!(ctl.samples(), &catalog);
}
