//! Page capture via headless Chromium.
//!
//! The capture side of the pipeline is isolated behind the [`PageCapture`]
//! trait so the HTTP layer and tests never depend on a running browser.
//! [`ChromeCapture`] is the production implementation; it drives Chromium
//! over the DevTools protocol and hands back PNG screenshot bytes.

use async_trait::async_trait;
use base64::prelude::*;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Crop, Viewport};

/// Desktop user agent presented to captured pages.
pub const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/115 Safari/537.36";

/// Mobile user agent for pages that should serve their phone layout.
pub const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

/// Synthetic test pattern: concentric frames, directional labels, red
/// center text. Renders every panel color and all four edges, which makes
/// mirroring, cropping and color-plane mixups visible at a glance.
pub const DEMO_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body { margin: 0; padding: 0; background: white; font-family: sans-serif; overflow: hidden; width: 800px; height: 480px; position: relative; }
        .rect { position: absolute; border: 2px solid black; }
        .text { position: absolute; font-size: 20px; font-weight: bold; color: black; }
        .center-text { position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: red; font-size: 40px; font-weight: bold; }
    </style>
</head>
<body>
    <div class="rect" style="top: 0; left: 0; right: 0; bottom: 0;"></div>
    <div class="rect" style="top: 10px; left: 10px; right: 10px; bottom: 10px;"></div>
    <div class="rect" style="top: 20px; left: 20px; right: 20px; bottom: 20px;"></div>
    <div class="rect" style="top: 30px; left: 30px; right: 30px; bottom: 30px;"></div>
    <div class="rect" style="top: 40px; left: 40px; right: 40px; bottom: 40px;"></div>

    <div class="text" style="top: 10px; left: 50%; transform: translateX(-50%);">TOP</div>
    <div class="text" style="bottom: 10px; left: 50%; transform: translateX(-50%);">BOTTOM</div>
    <div class="text" style="top: 50%; left: 10px; transform: translateY(-50%);">LEFT</div>
    <div class="text" style="top: 50%; right: 10px; transform: translateY(-50%);">RIGHT</div>

    <div class="center-text">Hello, World!</div>
</body>
</html>"#;

/// Best-effort cookie banner dismissal. Scores visible click targets by
/// consent keywords, skips settings/manage style buttons, prefers
/// candidates inside a cookie-ish container, and clicks the best match.
const DISMISS_COOKIES_JS: &str = r#"(() => {
    const commonWords = ['accept', 'agree', 'allow', 'ok', 'got it'];
    const blackList = ['settings', 'options', 'custom', 'manage', 'more', 'info', 'policy', 'read', 'learn'];
    const cookieKeywords = ['cookie', 'consent', 'gdpr', 'privacy', 'banner', 'notice'];

    const isVisible = (el) => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
    const checkText = (el) => {
        const lower = (el.innerText || el.textContent || '').toLowerCase().trim();
        return commonWords.some(w => lower.includes(w)) && !blackList.some(w => lower.includes(w));
    };

    const candidates = document.querySelectorAll(
        'button, a, div[role="button"], input[type="button"], input[type="submit"], span[role="button"]');

    let best = null;
    let bestScore = 0;
    for (const btn of candidates) {
        if (!isVisible(btn) || !checkText(btn)) continue;
        if ((btn.innerText || '').length > 50) continue;
        let score = 1;
        for (let p = btn.parentElement; p && p !== document.body; p = p.parentElement) {
            const attr = (p.id + ' ' + p.className).toLowerCase();
            if (cookieKeywords.some(k => attr.includes(k))) { score = 2; break; }
        }
        if (score > bestScore) { bestScore = score; best = btn; }
    }
    if (best) { best.click(); return true; }
    return false;
})()"#;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("browser launch failed: {0}")]
    Browser(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("screenshot failed: {0}")]
    Screenshot(String),
}

/// What to point the browser at.
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// The embedded test pattern.
    Demo,
    /// Navigate to a URL.
    Url(String),
    /// Render a caller-supplied HTML document.
    Html(String),
}

/// One capture job.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub source: CaptureSource,
    pub viewport: Viewport,
    pub mobile: bool,
    pub dismiss_cookies: bool,
    pub remove_classes: Vec<String>,
    /// Screenshot clip rectangle; None captures the whole viewport.
    pub crop: Option<Crop>,
    /// Delay before the screenshot so dynamic content settles.
    pub settle: Duration,
}

impl CaptureRequest {
    /// A request with everything defaulted except the source.
    pub fn new(source: CaptureSource) -> Self {
        Self {
            source,
            viewport: Viewport::default(),
            mobile: false,
            dismiss_cookies: false,
            remove_classes: Vec::new(),
            crop: None,
            settle: Duration::ZERO,
        }
    }
}

/// Capture seam between the HTTP layer and the browser.
#[async_trait]
pub trait PageCapture: Send + Sync {
    /// Produce PNG screenshot bytes for the request.
    async fn capture(&self, request: CaptureRequest) -> Result<Vec<u8>, CaptureError>;
}

/// Production capture backed by headless Chromium.
pub struct ChromeCapture {
    chrome_path: Option<PathBuf>,
}

impl ChromeCapture {
    /// Use the Chromium binary at `chrome_path`, or let the launcher
    /// auto-detect one when None.
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }

    /// Build from the `CHROME_PATH` environment variable.
    pub fn from_env() -> Self {
        Self::new(std::env::var("CHROME_PATH").ok().map(PathBuf::from))
    }
}

#[async_trait]
impl PageCapture for ChromeCapture {
    async fn capture(&self, request: CaptureRequest) -> Result<Vec<u8>, CaptureError> {
        let chrome_path = self.chrome_path.clone();

        // The DevTools client is synchronous and a page load takes
        // seconds; keep it off the async runtime.
        tokio::task::spawn_blocking(move || capture_blocking(request, chrome_path))
            .await
            .map_err(|e| CaptureError::Browser(format!("capture task failed: {e}")))?
    }
}

fn capture_blocking(
    request: CaptureRequest,
    chrome_path: Option<PathBuf>,
) -> Result<Vec<u8>, CaptureError> {
    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .sandbox(false)
        .window_size(Some((
            request.viewport.view_width(),
            request.viewport.height,
        )));
    if chrome_path.is_some() {
        builder.path(chrome_path);
    }
    let options = builder
        .build()
        .map_err(|e| CaptureError::Browser(e.to_string()))?;

    let browser = Browser::new(options).map_err(|e| CaptureError::Browser(e.to_string()))?;
    let tab = browser
        .new_tab()
        .map_err(|e| CaptureError::Browser(e.to_string()))?;

    let ua = if request.mobile { MOBILE_UA } else { DESKTOP_UA };
    tab.set_user_agent(ua, None, None)
        .map_err(|e| CaptureError::Browser(e.to_string()))?;

    let url = match &request.source {
        CaptureSource::Url(url) => url.clone(),
        CaptureSource::Html(html) => data_url(html),
        CaptureSource::Demo => data_url(DEMO_HTML),
    };

    tracing::debug!(
        mobile = request.mobile,
        view_width = request.viewport.view_width(),
        height = request.viewport.height,
        "Navigating for capture"
    );

    tab.navigate_to(&url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| CaptureError::Navigation {
            url: describe_source(&request.source),
            message: e.to_string(),
        })?;

    if request.dismiss_cookies {
        match tab.evaluate(DISMISS_COOKIES_JS, false) {
            Ok(result) => {
                tracing::debug!(?result.value, "Cookie dismissal attempted");
                // Give a consent overlay time to animate away.
                std::thread::sleep(Duration::from_millis(1000));
            }
            Err(e) => tracing::warn!(%e, "Cookie dismissal script failed"),
        }
    }

    if !request.remove_classes.is_empty() {
        let script = remove_classes_js(&request.remove_classes);
        if let Err(e) = tab.evaluate(&script, false) {
            tracing::warn!(%e, "Class removal script failed");
        }
    }

    std::thread::sleep(request.settle);

    let clip = request.crop.map(|c| Page::Viewport {
        x: c.x as f64,
        y: c.y as f64,
        width: c.width as f64,
        height: c.height as f64,
        scale: 1.0,
    });

    tab.capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, clip, true)
        .map_err(|e| CaptureError::Screenshot(e.to_string()))
}

/// Inline an HTML document as a navigable data URL.
fn data_url(html: &str) -> String {
    format!("data:text/html;base64,{}", BASE64_STANDARD.encode(html))
}

/// JS removing every element carrying one of the given class names.
fn remove_classes_js(classes: &[String]) -> String {
    // serde_json gives safely quoted string literals for the class list.
    let names = serde_json::to_string(classes).unwrap_or_else(|_| "[]".to_string());
    format!(
        "(() => {{ for (const name of {names}) {{ \
             document.querySelectorAll('.' + name).forEach(el => el.remove()); \
         }} }})()"
    )
}

fn describe_source(source: &CaptureSource) -> String {
    match source {
        CaptureSource::Url(url) => url.clone(),
        CaptureSource::Html(_) => "<inline html>".to_string(),
        CaptureSource::Demo => "<demo>".to_string(),
    }
}
