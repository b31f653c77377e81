//! Verificar: headless-browser verification for the real-estate listing page.
//!
//! Verificar (Spanish: "to verify") drives a headless Chromium instance
//! over the Chrome DevTools Protocol against a static listing page and
//! asserts the presence and behavior of its UI features: the property
//! grid, the recommended section, the comparison toolbar and modal, the
//! property-details modal, the embedded mortgage calculator, and the
//! virtual-tour modal.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    VERIFICAR Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐     ┌──────────────┐     ┌────────────┐        │
//! │   │ Listing    │     │ Verification │     │ Headless   │        │
//! │   │ Runner     │────►│ Expectations │────►│ Browser    │        │
//! │   │ (fixed     │     │ (polled      │     │ (chromium, │        │
//! │   │  sequence) │     │  locators)   │     │  CDP)      │        │
//! │   └────────────┘     └──────────────┘     └────────────┘        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The run is single-session and fail-fast: one browser, one page, one
//! linear sequence. Each expectation polls until satisfied or timed
//! out; a timed-out expectation ends the run at that step.

#![warn(missing_docs)]

pub mod browser;
pub mod expect;
pub mod locator;
pub mod result;
pub mod runner;
pub mod screenshot;
pub mod wait;

pub use browser::{Browser, BrowserConfig, Page};
pub use expect::{expect, Expect};
pub use locator::{ClickOptions, Locator, Selector};
pub use result::{VerifyError, VerifyResult};
pub use runner::{
    file_url, ListingRunner, RunReport, RunnerConfig, StepResult, DEFAULT_PAGE,
    DEFAULT_SCREENSHOT_PATH,
};
pub use screenshot::ScreenshotOptions;
pub use wait::{WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};

/// Convenience re-exports for verification scripts
pub mod prelude {
    pub use crate::browser::{Browser, BrowserConfig, Page};
    pub use crate::expect::{expect, Expect};
    pub use crate::locator::{ClickOptions, Locator, Selector};
    pub use crate::result::{VerifyError, VerifyResult};
    pub use crate::runner::{ListingRunner, RunReport, RunnerConfig, StepResult};
    pub use crate::screenshot::ScreenshotOptions;
    pub use crate::wait::WaitOptions;
}
