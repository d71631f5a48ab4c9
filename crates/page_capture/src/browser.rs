//! Shared headless browser lifecycle.

use anyhow::{Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt as _;
use tokio::task::JoinHandle;

/// A launched headless Chrome instance with its background event handler.
///
/// One instance is shared read-only across a whole run; every capture opens
/// its own tab via [`HeadlessBrowser::new_page`].
pub struct HeadlessBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl HeadlessBrowser {
    /// Launches a headless Chrome instance configured for deterministic
    /// rendering (fixed scale factor, sRGB color profile, no scrollbars).
    ///
    /// # Errors
    ///
    /// Returns an error if Chrome cannot be found or fails to start.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1280, 720)
            .arg("--force-device-scale-factor=1")
            .arg("--force-color-profile=sRGB")
            .arg("--hide-scrollbars")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--mute-audio")
            .build()
            .map_err(|error| anyhow!("Browser config error: {error}"))?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Drain CDP events for the lifetime of the browser connection.
        let handler_task = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(error) = event {
                    log::debug!("Browser event error: {error:?}");
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Opens a fresh blank tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser refuses to create the target.
    pub async fn new_page(&self) -> Result<Page> {
        Ok(self.browser.new_page("about:blank").await?)
    }

    /// Closes the browser and waits for the event handler to drain.
    ///
    /// # Errors
    ///
    /// Returns an error if the close command or the handler task fails.
    pub async fn shutdown(mut self) -> Result<()> {
        self.browser.close().await?;
        self.handler_task.await?;
        Ok(())
    }
}
