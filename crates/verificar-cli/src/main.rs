//! Verificar CLI: drive the listing-page verification run
//!
//! ## Usage
//!
//! ```bash
//! verificar                          # Verify ./index.html headlessly
//! verificar site/index.html          # Verify a specific page
//! verificar --format json            # Emit the run report as JSON
//! verificar --headed --timeout-ms 10000
//! ```

mod error;
mod output;

use clap::Parser;
use error::{CliError, CliResult};
use output::{OutputFormat, Reporter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use verificar::{
    BrowserConfig, ListingRunner, RunnerConfig, DEFAULT_PAGE, DEFAULT_SCREENSHOT_PATH,
    DEFAULT_TIMEOUT_MS,
};

/// Headless-browser verification for the real-estate listing page
#[derive(Debug, Parser)]
#[command(name = "verificar", version, about)]
struct Cli {
    /// Path to the listing page HTML file
    #[arg(default_value = DEFAULT_PAGE)]
    page: PathBuf,

    /// Screenshot output path
    #[arg(long, default_value = DEFAULT_SCREENSHOT_PATH)]
    screenshot: PathBuf,

    /// Wait budget per expectation, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Disable the chromium sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Path to a chromium executable
    #[arg(long, env = "VERIFICAR_CHROMIUM")]
    chromium_path: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only print failures and the summary
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()).await {
        Ok(all_passed) => {
            if all_passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<bool> {
    let config = build_config(&cli);
    tracing::debug!(page = %config.page.display(), timeout_ms = config.timeout_ms, "starting run");
    let runner = ListingRunner::new(config);
    let report = runner.run().await?;

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::report(format!("failed to serialize report: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let reporter = Reporter::new(!cli.no_color, cli.quiet);
            reporter.report(&report);
        }
    }

    Ok(report.all_passed())
}

fn build_config(cli: &Cli) -> RunnerConfig {
    let mut browser = BrowserConfig::default().with_headless(!cli.headed);
    if cli.no_sandbox {
        browser = browser.with_no_sandbox();
    }
    if let Some(path) = &cli.chromium_path {
        browser = browser.with_chromium_path(path);
    }
    RunnerConfig::new()
        .with_page(&cli.page)
        .with_screenshot_path(&cli.screenshot)
        .with_browser(browser)
        .with_timeout(cli.timeout_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["verificar"]).unwrap();
        assert_eq!(cli.page, PathBuf::from(DEFAULT_PAGE));
        assert_eq!(cli.screenshot, PathBuf::from(DEFAULT_SCREENSHOT_PATH));
        assert_eq!(cli.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!cli.headed);
        assert!(!cli.no_sandbox);
        assert!(cli.chromium_path.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.quiet);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_page_positional() {
        let cli = Cli::try_parse_from(["verificar", "site/listing.html"]).unwrap();
        assert_eq!(cli.page, PathBuf::from("site/listing.html"));
    }

    #[test]
    fn test_json_format() {
        let cli = Cli::try_parse_from(["verificar", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_browser_flags_flow_into_config() {
        let cli = Cli::try_parse_from([
            "verificar",
            "--headed",
            "--no-sandbox",
            "--chromium-path",
            "/usr/bin/chromium",
            "--timeout-ms",
            "10000",
        ])
        .unwrap();
        let config = build_config(&cli);
        assert!(!config.browser.headless);
        assert!(!config.browser.sandbox);
        assert_eq!(
            config.browser.chromium_path.as_deref(),
            Some("/usr/bin/chromium")
        );
        assert_eq!(config.timeout_ms, 10_000);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["verificar", "--format", "yaml"]).is_err());
    }
}
