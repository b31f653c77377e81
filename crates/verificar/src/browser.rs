//! Browser lifecycle and page control over the Chrome DevTools Protocol.
//!
//! The browser session is an owned, single-use resource: launched at the
//! start of a run, closed unconditionally at the end. Locators borrow
//! their page, so no element query can outlive the page it targets.

use crate::locator::Locator;
use crate::result::{VerifyError, VerifyResult};

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Browser instance with a live CDP connection
#[derive(Debug)]
pub struct Browser {
    config: BrowserConfig,
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a new browser instance
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::BrowserNotFound`] if no chromium executable
    /// can be located, or [`VerifyError::BrowserLaunch`] for any other
    /// launch failure. Both are fatal to a verification run.
    pub async fn launch(config: BrowserConfig) -> VerifyResult<Self> {
        info!(
            headless = config.headless,
            width = config.viewport_width,
            height = config.viewport_height,
            "launching browser"
        );

        let mut builder =
            CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| {
            if e.contains("executable") {
                VerifyError::BrowserNotFound
            } else {
                VerifyError::BrowserLaunch { message: e }
            }
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| VerifyError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP event stream until the connection drops
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Create a new page
    ///
    /// # Errors
    ///
    /// Returns error if the page cannot be created
    pub async fn new_page(&self) -> VerifyResult<Page> {
        let browser = self.inner.lock().await;
        let cdp_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| VerifyError::Page {
                message: e.to_string(),
            })?;

        Ok(Page {
            url: String::from("about:blank"),
            inner: Arc::new(Mutex::new(cdp_page)),
        })
    }

    /// Get the browser configuration
    #[must_use]
    pub const fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Close the browser
    ///
    /// # Errors
    ///
    /// Returns error if the browser process refuses to shut down
    pub async fn close(self) -> VerifyResult<()> {
        info!("closing browser");
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| VerifyError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// A view into one document loaded in the browser session
#[derive(Debug)]
pub struct Page {
    /// Current URL
    url: String,
    /// CDP page handle
    inner: Arc<Mutex<CdpPage>>,
}

impl Page {
    /// Navigate to a URL and wait for the navigation to settle
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Navigation`] if the load fails; fatal to a
    /// verification run.
    pub async fn goto(&mut self, url: &str) -> VerifyResult<()> {
        debug!(url, "navigating");
        {
            let page = self.inner.lock().await;
            page.goto(url).await.map_err(|e| VerifyError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        }
        self.url = url.to_string();
        Ok(())
    }

    /// Evaluate a JavaScript expression and deserialize its result
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Evaluation`] if the expression throws or the
    /// result cannot be deserialized into `T`
    pub async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> VerifyResult<T> {
        let page = self.inner.lock().await;
        let result = page
            .evaluate(expr)
            .await
            .map_err(|e| VerifyError::Evaluation {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| VerifyError::Evaluation {
            message: e.to_string(),
        })
    }

    /// Create a locator for a CSS selector, re-resolved on each use
    #[must_use]
    pub fn locator(&self, selector: impl Into<String>) -> Locator<'_> {
        Locator::new(self, selector)
    }

    /// Get current URL
    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.url
    }

    /// CDP page handle, for modules issuing raw protocol commands
    pub(crate) fn cdp(&self) -> &Arc<Mutex<CdpPage>> {
        &self.inner
    }
}
