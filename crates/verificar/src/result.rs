//! Result and error types for Verificar.

use thiserror::Error;

/// Result type for Verificar operations
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors that can occur while driving a verification run
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or pass --chromium-path")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page creation error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// JavaScript evaluation error
    #[error("Evaluation failed: {message}")]
    Evaluation {
        /// Error message
        message: String,
    },

    /// Expectation never satisfied within its wait budget
    #[error("Timed out after {ms}ms waiting for {description}")]
    ExpectationTimeout {
        /// What was being waited for
        description: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// Input simulation error (click/fill target not interactable)
    #[error("Input failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
