//! The listing-page verification runner.
//!
//! One browser session, one page, one fixed linear sequence of
//! interactions and polled expectations. Every expectation retries
//! internally up to its wait budget, but a failed step ends the run:
//! later steps never execute, and no screenshot is captured after a
//! failed assertion. The browser is closed on every exit path.

use crate::browser::{Browser, BrowserConfig, Page};
use crate::expect::expect;
use crate::locator::ClickOptions;
use crate::result::VerifyResult;
use crate::screenshot::{self, ScreenshotOptions};
use crate::wait::{self, WaitOptions, DEFAULT_TIMEOUT_MS};

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Default listing page, resolved from the working directory
pub const DEFAULT_PAGE: &str = "index.html";

/// Default screenshot output path, overwritten on each run
pub const DEFAULT_SCREENSHOT_PATH: &str = "jules-scratch/verification/verification.png";

/// Configuration for a verification run
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the listing page (resolved to a file:// URL at run time)
    pub page: PathBuf,
    /// Screenshot output path
    pub screenshot_path: PathBuf,
    /// Browser launch configuration
    pub browser: BrowserConfig,
    /// Wait budget per expectation, in milliseconds
    pub timeout_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            page: PathBuf::from(DEFAULT_PAGE),
            screenshot_path: PathBuf::from(DEFAULT_SCREENSHOT_PATH),
            browser: BrowserConfig::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl RunnerConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listing page path
    #[must_use]
    pub fn with_page(mut self, page: impl Into<PathBuf>) -> Self {
        self.page = page.into();
        self
    }

    /// Set the screenshot output path
    #[must_use]
    pub fn with_screenshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_path = path.into();
        self
    }

    /// Set the browser configuration
    #[must_use]
    pub fn with_browser(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    /// Set the per-expectation wait budget in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Outcome of a single verification step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Step name
    pub name: String,
    /// Whether the step passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Step duration
    pub duration: Duration,
}

impl StepResult {
    /// Create a passing step result
    #[must_use]
    pub fn pass(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            duration,
        }
    }

    /// Create a failing step result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            duration,
        }
    }
}

/// Aggregated outcome of a verification run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Individual step results, in execution order
    pub steps: Vec<StepResult>,
    /// Total run duration
    pub duration: Duration,
}

impl RunReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step result
    pub fn add(&mut self, step: StepResult) {
        self.steps.push(step);
    }

    /// Number of passed steps
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.passed).count()
    }

    /// Number of failed steps
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.passed).count()
    }

    /// Total number of executed steps
    #[must_use]
    pub fn total(&self) -> usize {
        self.steps.len()
    }

    /// Whether every executed step passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.steps.iter().all(|s| s.passed)
    }

    /// The failing step, if any (fail-fast means at most one)
    #[must_use]
    pub fn failure(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| !s.passed)
    }
}

/// Resolve a page path to an absolute file:// URL
///
/// # Errors
///
/// Returns an I/O error if the path does not exist; this is an
/// environment failure, fatal to the run
pub fn file_url(path: &Path) -> VerifyResult<String> {
    let absolute = std::fs::canonicalize(path)?;
    Ok(format!("file://{}", absolute.display()))
}

/// Drives the fixed verification sequence against the listing page
#[derive(Debug)]
pub struct ListingRunner {
    config: RunnerConfig,
}

impl ListingRunner {
    /// Create a runner with the given configuration
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute the verification run.
    ///
    /// Launch and navigation failures are fatal and surface as `Err`;
    /// assertion and interaction failures are recorded in the report,
    /// which then has `all_passed() == false`. The browser is closed
    /// before this returns, on every path.
    ///
    /// # Errors
    ///
    /// Returns error if the browser cannot be launched or the page
    /// cannot be created
    pub async fn run(&self) -> VerifyResult<RunReport> {
        let url = file_url(&self.config.page)?;
        let browser = Browser::launch(self.config.browser.clone()).await?;
        let outcome = self.run_steps(&browser, &url).await;
        if let Err(e) = browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        outcome
    }

    async fn run_steps(&self, browser: &Browser, url: &str) -> VerifyResult<RunReport> {
        let started = Instant::now();
        let mut report = RunReport::new();
        let mut page = browser.new_page().await?;

        // Navigation failure is an environment failure, fatal like a
        // launch failure, not a recorded step outcome
        let nav_start = Instant::now();
        page.goto(url).await?;
        report.add(StepResult::pass("navigate to listing page", nav_start.elapsed()));

        let steps_ok = record(
            &mut report,
            "property grid shows 15 cards",
            self.check_property_grid(&page),
        )
        .await
            && record(
                &mut report,
                "recommended section shows 4 cards",
                self.check_recommendations(&page),
            )
            .await
            && record(
                &mut report,
                "comparison toolbar collects 2 properties",
                self.check_comparison_toolbar(&page),
            )
            .await
            && record(
                &mut report,
                "compare modal opens and closes",
                self.check_compare_modal(&page),
            )
            .await
            && record(
                &mut report,
                "clearing comparison hides toolbar",
                self.check_clear_comparison(&page),
            )
            .await
            && record(
                &mut report,
                "property details modal opens",
                self.check_property_details(&page),
            )
            .await
            && record(
                &mut report,
                "mortgage calculator reports Ksh",
                self.check_mortgage_calculator(&page),
            )
            .await
            && record(
                &mut report,
                "virtual tour replaces details modal",
                self.check_virtual_tour(&page),
            )
            .await
            && record(
                &mut report,
                "capture full-page screenshot",
                self.capture_screenshot(&page),
            )
            .await;

        report.duration = started.elapsed();
        if steps_ok {
            info!(
                steps = report.total(),
                elapsed_ms = report.duration.as_millis() as u64,
                "verification run passed"
            );
        }
        Ok(report)
    }

    fn wait_options(&self) -> WaitOptions {
        WaitOptions::new().with_timeout(self.config.timeout_ms)
    }

    /// Step 3: the property grid renders exactly 15 cards
    async fn check_property_grid(&self, page: &Page) -> VerifyResult<()> {
        expect(page.locator("#properties .property-grid .property-card"))
            .with_timeout(self.config.timeout_ms)
            .to_have_count(15)
            .await
    }

    /// Step 4: "Recommended for You" heading with exactly 4 cards
    async fn check_recommendations(&self, page: &Page) -> VerifyResult<()> {
        expect(page.locator("h2").with_text("Recommended for You"))
            .with_timeout(self.config.timeout_ms)
            .to_be_visible()
            .await?;
        expect(page.locator("#recommended-property-grid .property-card"))
            .with_timeout(self.config.timeout_ms)
            .to_have_count(4)
            .await
    }

    /// Step 5a/5b: force-click two compare toggles, toolbar appears with
    /// exactly 2 items. Force bypasses actionability since the toggles
    /// sit under card overlays.
    async fn check_comparison_toolbar(&self, page: &Page) -> VerifyResult<()> {
        page.locator(".compare-btn")
            .nth(0)
            .click(ClickOptions::forced())
            .await?;
        page.locator(".compare-btn")
            .nth(1)
            .click(ClickOptions::forced())
            .await?;
        expect(page.locator(".comparison-toolbar"))
            .with_timeout(self.config.timeout_ms)
            .to_be_visible()
            .await?;
        expect(page.locator(".comparison-item"))
            .with_timeout(self.config.timeout_ms)
            .to_have_count(2)
            .await
    }

    /// Step 5c/5d: the toolbar's primary action opens the compare modal;
    /// its close control dismisses it
    async fn check_compare_modal(&self, page: &Page) -> VerifyResult<()> {
        page.locator(".comparison-actions .button-primary")
            .click(ClickOptions::new())
            .await?;
        expect(page.locator(".modal h3").with_text("Compare Properties"))
            .with_timeout(self.config.timeout_ms)
            .to_be_visible()
            .await?;
        page.locator(".modal .cart-close")
            .click(ClickOptions::new())
            .await
    }

    /// Step 5e: clearing the comparison hides the toolbar
    async fn check_clear_comparison(&self, page: &Page) -> VerifyResult<()> {
        page.locator(".comparison-actions .button-secondary")
            .click(ClickOptions::new())
            .await?;
        expect(page.locator(".comparison-toolbar"))
            .with_timeout(self.config.timeout_ms)
            .to_be_hidden()
            .await
    }

    /// Step 6a: the first card's "View Details" opens the details modal
    async fn check_property_details(&self, page: &Page) -> VerifyResult<()> {
        page.locator(".property-card .button-secondary")
            .with_text("View Details")
            .nth(0)
            .click(ClickOptions::new())
            .await?;
        expect(page.locator(".modal h3").with_text("Property Details"))
            .with_timeout(self.config.timeout_ms)
            .to_be_visible()
            .await
    }

    /// Step 6b/6c: the embedded mortgage calculator computes a result
    /// carrying the currency marker. Only the "Ksh" marker is asserted,
    /// not the numeric amount.
    async fn check_mortgage_calculator(&self, page: &Page) -> VerifyResult<()> {
        page.locator(".modal .button-secondary")
            .with_text("Mortgage Calculator")
            .click(ClickOptions::new())
            .await?;
        expect(page.locator("#mortgage-calculator-container"))
            .with_timeout(self.config.timeout_ms)
            .to_be_visible()
            .await?;

        page.locator("#mc-down-payment").fill("25").await?;
        page.locator("#mc-interest-rate").fill("10").await?;
        page.locator("#mc-loan-term").fill("30").await?;
        page.locator(".modal button")
            .with_text("Calculate")
            .click(ClickOptions::new())
            .await?;

        expect(page.locator("#mc-result"))
            .with_timeout(self.config.timeout_ms)
            .to_contain_text("Ksh")
            .await
    }

    /// Step 6d: the virtual tour replaces the details modal. Both sides
    /// of the swap are checked in the same polled condition, so a run
    /// never observes the modals stacked.
    async fn check_virtual_tour(&self, page: &Page) -> VerifyResult<()> {
        page.locator(".modal .button-secondary")
            .with_text("Virtual Tour")
            .click(ClickOptions::new())
            .await?;

        let details = page.locator(".modal h3").with_text("Property Details");
        let tour = page.locator(".virtual-tour-modal");
        let details_ref = &details;
        let tour_ref = &tour;
        wait::poll_until(
            &self.wait_options(),
            "details modal hidden and virtual tour visible",
            move || async move {
                Ok(!details_ref.is_visible().await? && tour_ref.is_visible().await?)
            },
        )
        .await?;
        Ok(())
    }

    /// Step 7: full-page screenshot to the configured output path
    async fn capture_screenshot(&self, page: &Page) -> VerifyResult<()> {
        screenshot::capture_to_file(
            page,
            ScreenshotOptions::new().with_full_page(),
            &self.config.screenshot_path,
        )
        .await
    }
}

/// Run one step, recording its outcome; returns whether the run may
/// continue (fail-fast)
async fn record<F>(report: &mut RunReport, name: &str, step: F) -> bool
where
    F: Future<Output = VerifyResult<()>>,
{
    let start = Instant::now();
    match step.await {
        Ok(()) => {
            info!(step = name, "step passed");
            report.add(StepResult::pass(name, start.elapsed()));
            true
        }
        Err(e) => {
            error!(step = name, error = %e, "step failed");
            report.add(StepResult::fail(name, e.to_string(), start.elapsed()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_match_reference_run() {
        let config = RunnerConfig::default();
        assert_eq!(config.page, PathBuf::from("index.html"));
        assert_eq!(
            config.screenshot_path,
            PathBuf::from("jules-scratch/verification/verification.png")
        );
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_config_builders() {
        let config = RunnerConfig::new()
            .with_page("listing.html")
            .with_screenshot_path("out/shot.png")
            .with_timeout(10_000);
        assert_eq!(config.page, PathBuf::from("listing.html"));
        assert_eq!(config.screenshot_path, PathBuf::from("out/shot.png"));
        assert_eq!(config.timeout_ms, 10_000);
    }

    #[test]
    fn test_file_url_resolves_to_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(&page, "<html></html>").unwrap();

        let url = file_url(&page).unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with("index.html"));
    }

    #[test]
    fn test_file_url_missing_page_is_fatal() {
        let result = file_url(Path::new("/definitely/not/here/index.html"));
        assert!(matches!(result, Err(crate::VerifyError::Io(_))));
    }

    #[test]
    fn test_report_aggregation() {
        let mut report = RunReport::new();
        report.add(StepResult::pass("navigate", Duration::from_millis(5)));
        report.add(StepResult::pass("grid", Duration::from_millis(40)));
        report.add(StepResult::fail(
            "toolbar",
            "expected `.comparison-item` to have count 2 within 5000ms, last saw 1",
            Duration::from_millis(5000),
        ));

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.all_passed());
        let failure = report.failure().unwrap();
        assert_eq!(failure.name, "toolbar");
        assert!(failure.error.as_deref().unwrap().contains("last saw 1"));
    }

    #[test]
    fn test_empty_report_passes() {
        assert!(RunReport::new().all_passed());
        assert!(RunReport::new().failure().is_none());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut report = RunReport::new();
        report.add(StepResult::pass("navigate", Duration::from_millis(5)));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"navigate\""));
        assert!(json.contains("\"passed\":true"));
    }

    #[tokio::test]
    async fn test_record_is_fail_fast_signal() {
        let mut report = RunReport::new();
        let ok = record(&mut report, "good", async { Ok(()) }).await;
        assert!(ok);

        let bad = record(&mut report, "bad", async {
            Err(crate::VerifyError::Assertion {
                message: "nope".to_string(),
            })
        })
        .await;
        assert!(!bad);
        assert_eq!(report.total(), 2);
        assert_eq!(report.failure().unwrap().name, "bad");
    }
}
