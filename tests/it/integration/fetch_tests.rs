//! Background fetch tests.
//!
//! A scripted resolver lets the tests decide which source resolves slowly,
//! so completion order can be forced without a network.

use crate::helpers::{CONTAINER, TestCanvasBuilder, png_bytes, wait_for_fetch};
use anyhow::bail;
use glyphboard::fetch::{DecodedImage, FetchOutcome};
use glyphboard::{BackgroundSource, Canvas, CanvasSettings, FetchStatus, ImageResolver};
use image::DynamicImage;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Resolves `slow-*` URLs after a delay, `fail-*` URLs to an error,
/// `panic-*` URLs by panicking, and any other URL immediately. The image width is the URL length.
struct ScriptedResolver;

impl ImageResolver for ScriptedResolver {
    fn resolve(&self, source: &BackgroundSource) -> anyhow::Result<DecodedImage> {
        let Some(url) = source.url_str() else {
            bail!("scripted resolver only handles urls");
        };
        if url.starts_with("slow-") {
            std::thread::sleep(Duration::from_millis(300));
        }
        if url.starts_with("fail-") {
            bail!("scripted failure for {url}");
        }
        if url.starts_with("panic-") {
            panic!("scripted panic for {url}");
        }
        Ok(DecodedImage::from_image(DynamicImage::new_rgb8(url.len() as u32, 10)))
    }
}

fn scripted_canvas() -> Canvas {
    let mut canvas = Canvas::with_resolver(CanvasSettings::default(), Arc::new(ScriptedResolver));
    canvas.set_container_size(CONTAINER);
    canvas
}

#[test]
fn test_stale_success_never_overwrites_newer_failure() {
    let mut canvas = scripted_canvas();

    canvas.set_background(BackgroundSource::url("slow-a"), false);
    canvas.set_background(BackgroundSource::url("fail-b"), false);
    assert_eq!(
        wait_for_fetch(&mut canvas),
        FetchStatus::Failed {
            url: Some("fail-b".into())
        }
    );

    std::thread::sleep(Duration::from_millis(500));
    let outcomes = canvas.poll_background();
    assert!(outcomes.iter().any(|o| matches!(o, FetchOutcome::Stale { .. })));
    assert_eq!(
        *canvas.fetch_status(),
        FetchStatus::Failed {
            url: Some("fail-b".into())
        }
    );
    assert!(canvas.background_image().is_none());
}

#[test]
fn test_latest_request_wins() {
    let mut canvas = scripted_canvas();

    canvas.set_background(BackgroundSource::url("slow-a"), false);
    canvas.set_background(BackgroundSource::url("b-image"), false);
    assert_eq!(wait_for_fetch(&mut canvas), FetchStatus::Fetched);

    std::thread::sleep(Duration::from_millis(500));
    canvas.poll_background();
    assert_eq!(*canvas.fetch_status(), FetchStatus::Fetched);
    assert_eq!(canvas.background_image().map(|i| i.width), Some("b-image".len() as u32));
}

#[test]
fn test_status_listener_sees_fetching_then_fetched() {
    let mut canvas = scripted_canvas();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    canvas.subscribe_fetch_status(move |status| sink.borrow_mut().push(status.clone()));

    canvas.set_background(BackgroundSource::url("quick"), false);
    wait_for_fetch(&mut canvas);

    assert_eq!(*seen.borrow(), vec![FetchStatus::Fetching, FetchStatus::Fetched]);
}

#[test]
fn test_undecodable_bytes_fail_without_url() {
    let (mut canvas, _) = TestCanvasBuilder::new().build();

    canvas.set_background(BackgroundSource::image_data(vec![1, 2, 3, 4]), true);

    assert_eq!(wait_for_fetch(&mut canvas), FetchStatus::Failed { url: None });
    assert_eq!(canvas.transform().steady_zoom(), 1.0);
}

#[test]
fn test_network_urls_need_a_resolver() {
    let (mut canvas, _) = TestCanvasBuilder::new().build();

    canvas.set_background(BackgroundSource::url("https://example.com/a.png"), false);

    assert_eq!(
        wait_for_fetch(&mut canvas),
        FetchStatus::Failed {
            url: Some("https://example.com/a.png".into())
        }
    );
}

#[test]
fn test_failed_source_can_be_retried_without_new_command() {
    let mut canvas = scripted_canvas();
    assert!(canvas.set_background(BackgroundSource::url("fail-once"), false));
    assert!(matches!(wait_for_fetch(&mut canvas), FetchStatus::Failed { .. }));

    assert!(!canvas.set_background(BackgroundSource::url("fail-once"), false));
    assert!(canvas.fetch_status().is_fetching());
    assert_eq!(canvas.history().undo_len(), 1);
}

#[test]
fn test_panicking_resolver_fails_and_allows_retry() {
    let mut canvas = scripted_canvas();
    let failed = FetchStatus::Failed {
        url: Some("panic-bg".into()),
    };

    canvas.set_background(BackgroundSource::url("panic-bg"), true);
    assert_eq!(wait_for_fetch(&mut canvas), failed);
    assert_eq!(canvas.transform().steady_zoom(), 1.0);

    assert!(!canvas.set_background(BackgroundSource::url("panic-bg"), true));
    assert!(canvas.fetch_status().is_fetching());
    assert_eq!(wait_for_fetch(&mut canvas), failed);
}

#[test]
fn test_local_file_autofits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wide bg.png");
    std::fs::write(&path, png_bytes(600, 150)).unwrap();
    let url = format!("file://{}", urlencoding::encode(&path.to_string_lossy()).replace("%2F", "/"));

    let (mut canvas, _) = TestCanvasBuilder::new().with_zoom(4.0).build();
    canvas.set_background(BackgroundSource::url(url), true);

    assert_eq!(wait_for_fetch(&mut canvas), FetchStatus::Fetched);
    assert_eq!(canvas.transform().steady_zoom(), 0.5);
    assert_eq!(canvas.background_image().map(|i| (i.width, i.height)), Some((600, 150)));
}
