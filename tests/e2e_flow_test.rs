//! End-to-end flow: configure once, let the panel poll bare /render.

mod common;

use common::{fixtures, StubCapture, TestApp};
use inkshot::models::DisplaySpec;
use inkshot::services::capture::CaptureSource;

#[tokio::test]
async fn test_configure_then_poll_flow() {
    // The firmware-facing workflow: an operator saves a configuration
    // through the UI, then the panel hits /render with no parameters on
    // every wake-up and receives ready-to-blit plane bytes.
    let capture = StubCapture::new(fixtures::split_png(800, 480));
    let app = TestApp::with_capture(capture.clone());

    // Step 1: operator saves the dashboard configuration.
    let set = app
        .post(
            "/config",
            "application/json",
            r#"{
                "mode": "url",
                "url": "https://grafana.local/d/panel",
                "format": "bwr",
                "bwrDither": true,
                "dismissCookies": true
            }"#,
        )
        .await;
    common::assert_ok(&set);

    // Step 2: operator checks what the panel will see.
    let preview = app.get("/preview?url=https://grafana.local/d/panel").await;
    common::assert_png(&preview);

    // Step 3: the panel polls with a bare request.
    let render = app.post("/render", "text/html", "").await;
    common::assert_ok(&render);
    assert_eq!(render.content_type(), "application/octet-stream");
    assert_eq!(render.body.len(), DisplaySpec::BWR_750.packed_len());

    // Left half black, right half white: the packed planes mirror the
    // capture. Pure black and white carry no quantization error, so the
    // enabled dithering changes nothing here.
    let plane_len = DisplaySpec::BWR_750.packed_len() / 2;
    let first_row = &render.body[..DisplaySpec::BWR_750.stride()];
    assert!(first_row[..50].iter().all(|&b| b == 0x00));
    assert!(first_row[50..].iter().all(|&b| b == 0xFF));
    assert!(render.body[plane_len..].iter().all(|&b| b == 0xFF));

    // The render run used the saved configuration.
    let seen = capture.seen();
    let poll = seen.last().unwrap();
    assert!(
        matches!(poll.source, CaptureSource::Url(ref u) if u == "https://grafana.local/d/panel")
    );
    assert!(poll.dismiss_cookies);
}

#[tokio::test]
async fn test_reconfiguring_format_changes_poll_output() {
    let app = TestApp::new();

    let set = app
        .post("/config", "application/json", r#"{"format":"bmp"}"#)
        .await;
    common::assert_ok(&set);
    let render = app.post("/render", "text/html", "").await;
    common::assert_ok(&render);
    assert_eq!(render.content_type(), "image/bmp");

    let set = app
        .post("/config", "application/json", r#"{"format":"bwr"}"#)
        .await;
    common::assert_ok(&set);
    let render = app.post("/render", "text/html", "").await;
    common::assert_ok(&render);
    assert_eq!(render.content_type(), "application/octet-stream");
    assert_eq!(render.body.len(), DisplaySpec::BWR_750.packed_len());
}
