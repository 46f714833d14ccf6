//! Test application factory for integration tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

use inkshot::server::{build_router, create_app_state};
use inkshot::services::capture::{CaptureError, CaptureRequest, PageCapture};
use inkshot::services::ConfigStore;

use super::fixtures;

/// Capture stub returning fixed PNG bytes and recording every request.
pub struct StubCapture {
    png: Vec<u8>,
    pub requests: Mutex<Vec<CaptureRequest>>,
}

impl StubCapture {
    pub fn new(png: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            png,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A stub producing a solid-color screenshot at panel size.
    pub fn solid(px: [u8; 4]) -> Arc<Self> {
        Self::new(fixtures::solid_png(800, 480, px))
    }

    /// The capture requests the router issued, in order.
    pub fn seen(&self) -> Vec<CaptureRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageCapture for StubCapture {
    async fn capture(&self, request: CaptureRequest) -> Result<Vec<u8>, CaptureError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.png.clone())
    }
}

/// Test application with router and direct access to services.
pub struct TestApp {
    router: axum::Router,
    pub config_store: Arc<ConfigStore>,
    // Keeps the config directory alive for the app's lifetime.
    _config_dir: TempDir,
}

impl TestApp {
    /// App with an all-white capture stub.
    pub fn new() -> Self {
        Self::with_capture(StubCapture::solid([255, 255, 255, 255]))
    }

    /// App with a specific capture backend.
    pub fn with_capture(capture: Arc<dyn PageCapture>) -> Self {
        let config_dir = tempfile::tempdir().expect("temp config dir");
        let state = create_app_state(config_dir.path().join("config.json"), capture);
        let config_store = state.config_store.clone();

        Self {
            router: build_router(state),
            config_store,
            _config_dir: config_dir,
        }
    }

    /// Make a GET request to the given path.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a body.
    pub async fn post(&self, path: &str, content_type: &str, body: impl Into<Body>) -> TestResponse {
        self.request(
            Request::post(path)
                .header("content-type", content_type)
                .body(body.into())
                .unwrap(),
        )
        .await
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body collect")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Collected response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn is_png(&self) -> bool {
        self.body.starts_with(&[0x89, b'P', b'N', b'G'])
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("UTF-8 body")
    }
}
