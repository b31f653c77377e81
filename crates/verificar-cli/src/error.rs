//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Report rendering error
    #[error("Report rendering failed: {message}")]
    Report {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Verificar library error
    #[error("Verification error: {0}")]
    Verificar(#[from] verificar::VerifyError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a report rendering error
    #[must_use]
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad timeout");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad timeout"));
    }

    #[test]
    fn test_report_error() {
        let err = CliError::report("not serializable");
        assert!(err.to_string().contains("Report rendering"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CliError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }

    #[test]
    fn test_verificar_error_from() {
        let err: CliError = verificar::VerifyError::BrowserNotFound.into();
        assert!(err.to_string().contains("Verification error"));
        assert!(err.to_string().contains("Browser not found"));
    }
}
