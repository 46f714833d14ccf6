//! Tests for the /config endpoints.

mod common;

use common::TestApp;
use inkshot::models::AppConfig;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_get_config_returns_defaults() {
    let app = TestApp::new();

    let response = app.get("/config").await;
    common::assert_ok(&response);

    let json = response.json();
    assert_eq!(json["mode"], "demo");
    assert_eq!(json["format"], "bmp");
    assert_eq!(json["resizeAlgorithm"], "lanczos3");
    assert_eq!(json["bwrDither"], false);
    assert_eq!(json["viewport"]["width"], 800);
    assert_eq!(json["viewport"]["layoutWidth"], 800);
    assert_eq!(json["crop"]["width"], 800);
    assert_eq!(json["crop"]["height"], 480);
}

#[tokio::test]
async fn test_post_config_round_trips() {
    let app = TestApp::new();

    let mut config = AppConfig::default();
    config.mode = inkshot::models::SourceMode::Url;
    config.url = Some("https://example.com/dashboard".to_string());
    config.format = inkshot::models::OutputFormat::Bwr;
    config.bwr_dither = true;
    config.remove_classes = vec!["cookie-banner".to_string()];

    let response = app
        .post(
            "/config",
            "application/json",
            serde_json::to_string(&config).unwrap(),
        )
        .await;
    common::assert_ok(&response);
    assert_eq!(response.json()["success"], true);

    let response = app.get("/config").await;
    common::assert_ok(&response);
    let loaded: AppConfig = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(loaded, config);
}

#[tokio::test]
async fn test_partial_config_merges_with_defaults() {
    let app = TestApp::new();

    let response = app
        .post(
            "/config",
            "application/json",
            r#"{"mode":"url","url":"https://example.com","bwrDither":true}"#,
        )
        .await;
    common::assert_ok(&response);

    let json = app.get("/config").await.json();
    assert_eq!(json["mode"], "url");
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["bwrDither"], true);
    // Fields the client never sent come back as defaults.
    assert_eq!(json["format"], "bmp");
    assert_eq!(json["viewport"]["height"], 480);
}

#[tokio::test]
async fn test_posted_config_lands_on_disk() {
    let app = TestApp::new();

    let response = app
        .post("/config", "application/json", r#"{"sharpen":2.5}"#)
        .await;
    common::assert_ok(&response);

    // The store reads the file fresh on every load; no in-memory state.
    let persisted = app.config_store.load();
    assert_eq!(persisted.sharpen, 2.5);
}
