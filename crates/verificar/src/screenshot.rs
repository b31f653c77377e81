//! Screenshot capture over CDP.

use crate::browser::Page;
use crate::result::{VerifyError, VerifyResult};

use base64::Engine;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use std::path::Path;
use tracing::info;

/// Options for screenshot capture
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenshotOptions {
    /// Capture the full scrollable page, not just the viewport
    pub full_page: bool,
}

impl ScreenshotOptions {
    /// Create default options (viewport only)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the full scrollable page
    #[must_use]
    pub const fn with_full_page(mut self) -> Self {
        self.full_page = true;
        self
    }
}

/// Capture a PNG screenshot of the page
///
/// # Errors
///
/// Returns [`VerifyError::Screenshot`] if capture or decoding fails
pub async fn capture(page: &Page, options: ScreenshotOptions) -> VerifyResult<Vec<u8>> {
    let params = CaptureScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .capture_beyond_viewport(options.full_page)
        .build();

    let cdp = page.cdp().lock().await;
    let screenshot = cdp
        .execute(params)
        .await
        .map_err(|e| VerifyError::Screenshot {
            message: e.to_string(),
        })?;

    base64::engine::general_purpose::STANDARD
        .decode(&screenshot.data)
        .map_err(|e| VerifyError::Screenshot {
            message: e.to_string(),
        })
}

/// Capture a PNG screenshot and write it to `path`, creating parent
/// directories and overwriting any previous capture
///
/// # Errors
///
/// Returns error if capture or the filesystem write fails
pub async fn capture_to_file(
    page: &Page,
    options: ScreenshotOptions,
    path: &Path,
) -> VerifyResult<()> {
    let data = capture(page, options).await?;
    write_bytes(path, &data)?;
    info!(path = %path.display(), bytes = data.len(), "screenshot written");
    Ok(())
}

/// Write screenshot bytes, creating parent directories as needed
fn write_bytes(path: &Path, data: &[u8]) -> VerifyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_viewport_only() {
        assert!(!ScreenshotOptions::new().full_page);
    }

    #[test]
    fn test_full_page_builder() {
        assert!(ScreenshotOptions::new().with_full_page().full_page);
    }

    #[test]
    fn test_write_bytes_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jules-scratch/verification/verification.png");
        write_bytes(&path, b"png-bytes").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_write_bytes_overwrites_previous_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verification.png");
        write_bytes(&path, b"first").unwrap();
        write_bytes(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
