//! Locator abstraction for element selection and interaction.
//!
//! A locator is a lazy query against the live DOM: it owns no element
//! handle and is re-evaluated on every operation, so a locator built
//! before a page mutation still observes the DOM as it is now. Locators
//! borrow their [`Page`](crate::browser::Page) and generate
//! `querySelectorAll`-based JavaScript for each interaction.

use crate::browser::Page;
use crate::result::{VerifyError, VerifyResult};
use tracing::debug;

/// Selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. ".property-card")
    Css(String),
    /// CSS selector narrowed by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match (substring)
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// JavaScript expression evaluating to an array of all matches
    #[must_use]
    pub fn to_list_query(&self) -> String {
        match self {
            Self::Css(css) => format!("Array.from(document.querySelectorAll({css:?}))"),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter((el) => el.textContent.includes({text:?}))"
            ),
        }
    }

    /// JavaScript expression evaluating to the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(css) => format!("document.querySelectorAll({css:?}).length"),
            Self::CssWithText { .. } => format!("{}.length", self.to_list_query()),
        }
    }

    /// JavaScript expression evaluating to the `nth` match (or undefined)
    #[must_use]
    pub fn to_element_query(&self, nth: usize) -> String {
        format!("{}[{nth}]", self.to_list_query())
    }

    /// JavaScript expression checking the `nth` match is visible:
    /// present, not `display:none`/`visibility:hidden`, non-zero box.
    /// Evaluates to `false` for a missing element.
    #[must_use]
    pub fn to_visible_query(&self, nth: usize) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             const s = getComputedStyle(el); \
             if (s.display === \"none\" || s.visibility === \"hidden\") return false; \
             const r = el.getBoundingClientRect(); \
             return r.width > 0 && r.height > 0; }})()",
            self.to_element_query(nth)
        )
    }

    /// JavaScript expression for the text content of the `nth` match
    /// (empty string if missing)
    #[must_use]
    pub fn to_text_query(&self, nth: usize) -> String {
        format!(
            "(() => {{ const el = {}; return el ? el.textContent : \"\"; }})()",
            self.to_element_query(nth)
        )
    }

    /// JavaScript clicking the `nth` match, evaluating to a status string:
    /// "clicked", "missing", "hidden", or "occluded". The target is
    /// scrolled into view first; the hit-test runs on the post-scroll
    /// rect, so a below-fold element is actionable, not "occluded".
    /// With `force` the actionability checks are skipped and only
    /// "missing" can block.
    #[must_use]
    pub fn to_click_script(&self, nth: usize, force: bool) -> String {
        let checks = if force {
            ""
        } else {
            "const r = el.getBoundingClientRect(); \
             if (r.width === 0 || r.height === 0) return \"hidden\"; \
             const hit = document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2); \
             if (hit !== el && !el.contains(hit)) return \"occluded\"; "
        };
        format!(
            "(() => {{ const el = {}; if (!el) return \"missing\"; \
             el.scrollIntoView({{ block: \"center\" }}); \
             {checks}el.click(); return \"clicked\"; }})()",
            self.to_element_query(nth)
        )
    }

    /// JavaScript filling the `nth` match with `value` and dispatching
    /// `input` and `change` events; evaluates to `false` if missing
    #[must_use]
    pub fn to_fill_script(&self, nth: usize, value: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return false; \
             el.value = {value:?}; \
             el.dispatchEvent(new Event(\"input\", {{ bubbles: true }})); \
             el.dispatchEvent(new Event(\"change\", {{ bubbles: true }})); \
             return true; }})()",
            self.to_element_query(nth)
        )
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Css(css) => format!("`{css}`"),
            Self::CssWithText { css, text } => format!("`{css}` with text {text:?}"),
        }
    }
}

/// Options for a click interaction
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickOptions {
    /// Bypass actionability checks (visibility, hit-test at center).
    /// Escape hatch for controls that are partially occluded.
    pub force: bool,
}

impl ClickOptions {
    /// Create default options (actionability checks enabled)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create options with forced clicking
    #[must_use]
    pub const fn forced() -> Self {
        Self { force: true }
    }
}

/// A page-bound locator: lazily re-resolved on every operation
#[derive(Debug, Clone)]
pub struct Locator<'a> {
    page: &'a Page,
    selector: Selector,
    nth: usize,
}

impl<'a> Locator<'a> {
    /// Create a locator for a CSS selector on a page
    #[must_use]
    pub fn new(page: &'a Page, selector: impl Into<String>) -> Self {
        Self {
            page,
            selector: Selector::Css(selector.into()),
            nth: 0,
        }
    }

    /// Narrow to elements whose text content contains `text`
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.selector = match self.selector {
            Selector::Css(css) | Selector::CssWithText { css, .. } => Selector::CssWithText {
                css,
                text: text.into(),
            },
        };
        self
    }

    /// Target the `index`-th match (0-based); element operations target
    /// the first match by default
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.nth = index;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Human-readable form for error messages
    #[must_use]
    pub fn describe(&self) -> String {
        if self.nth == 0 {
            self.selector.describe()
        } else {
            format!("{} nth({})", self.selector.describe(), self.nth)
        }
    }

    /// Count matching elements right now (no waiting)
    ///
    /// # Errors
    ///
    /// Returns error if evaluation fails
    pub async fn count(&self) -> VerifyResult<usize> {
        let n: u64 = self.page.eval(&self.selector.to_count_query()).await?;
        Ok(n as usize)
    }

    /// Check whether the targeted element is visible right now.
    /// A missing element is not visible.
    ///
    /// # Errors
    ///
    /// Returns error if evaluation fails
    pub async fn is_visible(&self) -> VerifyResult<bool> {
        self.page.eval(&self.selector.to_visible_query(self.nth)).await
    }

    /// Get the text content of the targeted element (empty if missing)
    ///
    /// # Errors
    ///
    /// Returns error if evaluation fails
    pub async fn text_content(&self) -> VerifyResult<String> {
        self.page.eval(&self.selector.to_text_query(self.nth)).await
    }

    /// Click the targeted element
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Input`] if the element is missing, or — when
    /// `options.force` is not set — hidden or occluded at its center point
    pub async fn click(&self, options: ClickOptions) -> VerifyResult<()> {
        debug!(target = %self.describe(), force = options.force, "click");
        let status: String = self
            .page
            .eval(&self.selector.to_click_script(self.nth, options.force))
            .await?;
        if status == "clicked" {
            Ok(())
        } else {
            Err(VerifyError::Input {
                message: format!("{} not clickable: {status}", self.describe()),
            })
        }
    }

    /// Fill the targeted input with `value`, dispatching `input` and
    /// `change` events
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Input`] if the element is missing
    pub async fn fill(&self, value: &str) -> VerifyResult<()> {
        debug!(target = %self.describe(), value, "fill");
        let found: bool = self
            .page
            .eval(&self.selector.to_fill_script(self.nth, value))
            .await?;
        if found {
            Ok(())
        } else {
            Err(VerifyError::Input {
                message: format!("{} not found for fill", self.describe()),
            })
        }
    }
}
