//! Navigation and full-page screenshot capture for a single URL.

use anyhow::{Context as _, Result, anyhow};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, Headers, SetExtraHttpHeadersParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use image::{RgbaImage, load_from_memory};
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::browser::HeadlessBrowser;
use crate::freeze::{SETTLE_DELAY, freeze_page_motion};

/// Per-capture settings shared by every page of a run.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Emulated viewport width in CSS pixels.
    pub viewport_width: u32,
    /// Emulated viewport height in CSS pixels.
    pub viewport_height: u32,
    /// Value for the `Authorization` header sent with every request, if any.
    pub auth_header: Option<String>,
    /// Upper bound for each navigation wait.
    pub nav_timeout: Duration,
    /// Post-freeze settling time before the screenshot is taken.
    pub settle_delay: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            auth_header: None,
            nav_timeout: Duration::from_secs(60),
            settle_delay: SETTLE_DELAY,
        }
    }
}

/// Renders `url` in a fresh tab and returns a full-page RGBA screenshot.
///
/// The tab carries the configured viewport and `Authorization` header, waits
/// for navigation to settle, freezes animated content, captures a full-page
/// PNG (not clipped to the viewport) and decodes it. The tab is closed on
/// both the success and the error path.
///
/// # Errors
///
/// Returns an error if tab creation, navigation (including timeout),
/// screenshot capture, or PNG decoding fails.
pub async fn capture_page(
    browser: &HeadlessBrowser,
    url: &Url,
    config: &CaptureConfig,
) -> Result<RgbaImage> {
    let page = browser
        .new_page()
        .await
        .with_context(|| format!("Failed to open a tab for {url}"))?;

    let captured = capture_on_page(&page, url, config).await;

    // Close the tab regardless of outcome to prevent tab accumulation.
    let _ignore_close_error = page.close().await;

    captured
}

async fn capture_on_page(page: &Page, url: &Url, config: &CaptureConfig) -> Result<RgbaImage> {
    prepare_page(page, config).await?;
    navigate(page, url, config.nav_timeout).await?;
    freeze_page_motion(page, config.settle_delay).await?;

    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();
    let png_bytes = page
        .screenshot(params)
        .await
        .with_context(|| format!("Screenshot capture failed for {url}"))?;

    let image = load_from_memory(&png_bytes)
        .with_context(|| format!("Failed to decode screenshot for {url}"))?
        .to_rgba8();
    Ok(image)
}

/// Applies the shared request headers and the fixed viewport to a fresh tab.
async fn prepare_page(page: &Page, config: &CaptureConfig) -> Result<()> {
    if let Some(auth) = &config.auth_header {
        page.execute(EnableParams::default()).await?;
        let headers = Headers::new(serde_json::json!({ "Authorization": auth }));
        page.execute(SetExtraHttpHeadersParams::new(headers)).await?;
    }

    let viewport = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(config.viewport_width))
        .height(i64::from(config.viewport_height))
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(|error| anyhow!("Failed to build viewport params: {error}"))?;
    page.execute(viewport).await?;
    Ok(())
}

async fn navigate(page: &Page, url: &Url, nav_timeout: Duration) -> Result<()> {
    match timeout(nav_timeout, page.goto(url.as_str())).await {
        Ok(Ok(_)) => {}
        Ok(Err(error)) => return Err(anyhow!("Navigation failed for {url}: {error}")),
        Err(_) => return Err(anyhow!("Navigation timed out after {nav_timeout:?} for {url}")),
    }

    match timeout(nav_timeout, page.wait_for_navigation()).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(error)) => Err(anyhow!("Wait for navigation failed for {url}: {error}")),
        Err(_) => Err(anyhow!(
            "Wait for navigation timed out after {nav_timeout:?} for {url}"
        )),
    }
}
