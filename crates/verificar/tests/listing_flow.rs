//! Live-browser verification of the listing flow against a fixture page.
//!
//! These tests launch a real headless Chromium and are ignored by
//! default; run them with:
//!
//! ```bash
//! cargo test -p verificar -- --ignored
//! ```

use std::path::PathBuf;
use verificar::prelude::*;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn runner_config(page: PathBuf, screenshot: PathBuf) -> RunnerConfig {
    // Sandbox is disabled so the suite also runs inside containers/CI
    RunnerConfig::new()
        .with_page(page)
        .with_screenshot_path(screenshot)
        .with_browser(BrowserConfig::default().with_no_sandbox())
        .with_timeout(10_000)
}

#[tokio::test]
#[ignore = "requires a local chromium"]
async fn full_run_passes_and_writes_screenshot() {
    let out = tempfile::tempdir().unwrap();
    let screenshot = out.path().join("verification/verification.png");
    let config = runner_config(fixtures_dir().join("listing.html"), screenshot.clone());

    let report = ListingRunner::new(config).run().await.unwrap();

    assert!(report.all_passed(), "failure: {:?}", report.failure());
    assert_eq!(report.total(), 10);
    let png = std::fs::read(&screenshot).unwrap();
    assert!(png.starts_with(b"\x89PNG"), "screenshot is not a PNG");
}

#[tokio::test]
#[ignore = "requires a local chromium"]
async fn missing_card_fails_grid_step_and_skips_screenshot() {
    // Same page with 14 cards instead of 15
    let html = std::fs::read_to_string(fixtures_dir().join("listing.html")).unwrap();
    let broken = html.replace("const CARD_COUNT = 15;", "const CARD_COUNT = 14;");
    assert_ne!(html, broken, "fixture no longer declares CARD_COUNT");

    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("listing.html");
    std::fs::write(&page, broken).unwrap();
    let screenshot = dir.path().join("verification.png");

    let config = runner_config(page, screenshot.clone())
        // Keep the failing wait short; the count will never reach 15
        .with_timeout(1_500);
    let report = ListingRunner::new(config).run().await.unwrap();

    assert!(!report.all_passed());
    let failure = report.failure().unwrap();
    assert_eq!(failure.name, "property grid shows 15 cards");
    assert!(failure.error.as_deref().unwrap().contains("last saw 14"));
    assert!(!screenshot.exists(), "no screenshot after a failed run");
}

async fn launch_on_fixture() -> (Browser, Page) {
    let url = verificar::file_url(&fixtures_dir().join("listing.html")).unwrap();
    let browser = Browser::launch(BrowserConfig::default().with_no_sandbox())
        .await
        .unwrap();
    let mut page = browser.new_page().await.unwrap();
    page.goto(&url).await.unwrap();
    (browser, page)
}

async fn open_property_details(page: &Page) {
    page.locator(".property-card .button-secondary")
        .with_text("View Details")
        .nth(0)
        .click(ClickOptions::new())
        .await
        .unwrap();
    expect(page.locator(".modal h3").with_text("Property Details"))
        .to_be_visible()
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a local chromium"]
async fn navigation_to_missing_url_is_fatal() {
    let browser = Browser::launch(BrowserConfig::default().with_no_sandbox())
        .await
        .unwrap();
    let mut page = browser.new_page().await.unwrap();

    let err = page
        .goto("file:///definitely/not/here/listing.html")
        .await
        .unwrap_err();
    assert!(matches!(err, VerifyError::Navigation { .. }));
    assert!(err.to_string().contains("definitely/not/here"));

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a local chromium"]
async fn virtual_tour_replaces_details_without_stacking() {
    let (browser, page) = launch_on_fixture().await;
    open_property_details(&page).await;

    page.locator(".modal .button-secondary")
        .with_text("Virtual Tour")
        .click(ClickOptions::new())
        .await
        .unwrap();
    expect(page.locator(".virtual-tour-modal"))
        .to_be_visible()
        .await
        .unwrap();

    // Both sides of the swap observed in a single evaluation: the
    // details modal is gone at the same instant the tour is visible
    let details = page.locator(".modal h3").with_text("Property Details");
    let tour = page.locator(".virtual-tour-modal");
    let swapped: bool = page
        .eval(&format!(
            "!({}) && ({})",
            details.selector().to_visible_query(0),
            tour.selector().to_visible_query(0)
        ))
        .await
        .unwrap();
    assert!(swapped, "details modal still visible alongside the tour");
    assert_eq!(page.locator(".modal").count().await.unwrap(), 1);

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a local chromium"]
async fn mortgage_calculator_tolerates_non_numeric_input() {
    let (browser, page) = launch_on_fixture().await;
    open_property_details(&page).await;

    page.locator(".modal .button-secondary")
        .with_text("Mortgage Calculator")
        .click(ClickOptions::new())
        .await
        .unwrap();
    expect(page.locator("#mortgage-calculator-container"))
        .to_be_visible()
        .await
        .unwrap();

    // Junk input falls back to defaults; the result still carries the
    // currency marker
    page.locator("#mc-down-payment").fill("a lot").await.unwrap();
    page.locator("#mc-interest-rate").fill("ten").await.unwrap();
    page.locator("#mc-loan-term").fill("thirty").await.unwrap();
    page.locator(".modal button")
        .with_text("Calculate")
        .click(ClickOptions::new())
        .await
        .unwrap();
    expect(page.locator("#mc-result"))
        .to_contain_text("Ksh")
        .await
        .unwrap();

    browser.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a local chromium"]
async fn toolbar_stays_hidden_after_clearing() {
    let url = verificar::file_url(&fixtures_dir().join("listing.html")).unwrap();

    let browser = Browser::launch(BrowserConfig::default().with_no_sandbox())
        .await
        .unwrap();
    let mut page = browser.new_page().await.unwrap();
    page.goto(&url).await.unwrap();

    expect(page.locator("#properties .property-grid .property-card"))
        .to_have_count(15)
        .await
        .unwrap();

    // Any two distinct toggles yield exactly 2 comparison items
    page.locator(".compare-btn")
        .nth(4)
        .click(ClickOptions::forced())
        .await
        .unwrap();
    page.locator(".compare-btn")
        .nth(9)
        .click(ClickOptions::forced())
        .await
        .unwrap();
    expect(page.locator(".comparison-item"))
        .to_have_count(2)
        .await
        .unwrap();

    page.locator(".comparison-actions .button-secondary")
        .click(ClickOptions::new())
        .await
        .unwrap();
    expect(page.locator(".comparison-toolbar"))
        .to_be_hidden()
        .await
        .unwrap();

    // No flicker back: still hidden after a settling pause
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    assert!(!page
        .locator(".comparison-toolbar")
        .is_visible()
        .await
        .unwrap());

    browser.close().await.unwrap();
}
