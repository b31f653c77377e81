//! Polled expectations over locators (Playwright's `expect()`).
//!
//! An expectation is not a one-shot check: it re-evaluates its locator
//! until the condition holds or the wait budget is spent, then fails the
//! run with a message naming the expectation and the last observed state.

use crate::locator::Locator;
use crate::result::{VerifyError, VerifyResult};
use crate::wait::{self, WaitOptions};
use std::cell::RefCell;

/// Create an expectation for a locator
#[must_use]
pub fn expect(locator: Locator<'_>) -> Expect<'_> {
    Expect {
        locator,
        options: WaitOptions::default(),
    }
}

/// A pending expectation: condition builders poll until satisfied
#[derive(Debug, Clone)]
pub struct Expect<'a> {
    locator: Locator<'a>,
    options: WaitOptions,
}

impl Expect<'_> {
    /// Override the wait budget for this expectation
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.options.timeout_ms = timeout_ms;
        self
    }

    /// Assert the locator matches exactly `expected` elements
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Assertion`] with the last observed count if
    /// the cardinality never matches within the wait budget
    pub async fn to_have_count(&self, expected: usize) -> VerifyResult<()> {
        let description = format!("{} to have count {expected}", self.locator.describe());
        let seen = RefCell::new(None);
        let locator = &self.locator;
        let seen_ref = &seen;
        let result = wait::poll_until(&self.options, &description, move || async move {
            let actual = locator.count().await?;
            seen_ref.replace(Some(actual.to_string()));
            Ok(actual == expected)
        })
        .await;
        finish(result, seen.into_inner())
    }

    /// Assert the targeted element becomes visible
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Assertion`] if the element never becomes
    /// visible within the wait budget
    pub async fn to_be_visible(&self) -> VerifyResult<()> {
        let description = format!("{} to be visible", self.locator.describe());
        let locator = &self.locator;
        let result = wait::poll_until(&self.options, &description, move || async move {
            locator.is_visible().await
        })
        .await;
        finish(result, None)
    }

    /// Assert the targeted element becomes hidden (or absent)
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Assertion`] if the element stays visible
    /// within the wait budget
    pub async fn to_be_hidden(&self) -> VerifyResult<()> {
        let description = format!("{} to be hidden", self.locator.describe());
        let locator = &self.locator;
        let result = wait::poll_until(&self.options, &description, move || async move {
            Ok(!locator.is_visible().await?)
        })
        .await;
        finish(result, None)
    }

    /// Assert the targeted element's text content contains `expected`
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Assertion`] with the last observed text if
    /// the substring never appears within the wait budget
    pub async fn to_contain_text(&self, expected: &str) -> VerifyResult<()> {
        let description = format!("{} to contain text {expected:?}", self.locator.describe());
        let seen = RefCell::new(None);
        let locator = &self.locator;
        let seen_ref = &seen;
        let result = wait::poll_until(&self.options, &description, move || async move {
            let text = locator.text_content().await?;
            let matched = text.contains(expected);
            seen_ref.replace(Some(truncate(&text)));
            Ok(matched)
        })
        .await;
        finish(result, seen.into_inner())
    }
}

/// Map an expectation timeout into an assertion failure carrying the
/// last observed state; pass everything else through.
fn finish(
    result: VerifyResult<wait::WaitResult>,
    last_seen: Option<String>,
) -> VerifyResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(VerifyError::ExpectationTimeout { description, ms }) => {
            let message = match last_seen {
                Some(seen) => format!("expected {description} within {ms}ms, last saw {seen}"),
                None => format!("expected {description} within {ms}ms"),
            };
            Err(VerifyError::Assertion { message })
        }
        Err(e) => Err(e),
    }
}

/// Clip observed text for error messages
fn truncate(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(MAX).collect();
        format!("{clipped}…")
    }
}
