//! Output formatting for verification runs

use clap::ValueEnum;
use console::{style, Term};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verificar::{RunReport, StepResult};

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Step-by-step reporter for verification runs
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().to_string()
        } else {
            title.to_string()
        };
        let _ = self.term.write_line(&styled);
    }

    /// Print one step outcome
    pub fn step(&self, step: &StepResult) {
        // Failures always print, even in quiet mode
        if self.quiet && step.passed {
            return;
        }
        let _ = self.term.write_line(&step_line(step, self.use_color));
    }

    /// Print the run summary
    pub fn summary(&self, report: &RunReport) {
        let line = summary_line(
            report.passed_count(),
            report.failed_count(),
            report.duration,
        );
        let styled = if !self.use_color {
            line
        } else if report.all_passed() {
            style(line).green().to_string()
        } else {
            style(line).red().to_string()
        };
        let _ = self.term.write_line(&styled);
    }

    /// Print an entire report: header, steps, summary
    pub fn report(&self, report: &RunReport) {
        self.header("Listing page verification");
        for step in &report.steps {
            self.step(step);
        }
        self.summary(report);
    }
}

/// Format one step outcome line
#[must_use]
pub fn step_line(step: &StepResult, use_color: bool) -> String {
    let prefix = if step.passed {
        if use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        }
    } else if use_color {
        style("✗").red().bold().to_string()
    } else {
        "FAIL".to_string()
    };

    match step.error.as_deref() {
        Some(error) => format!("{prefix} {}: {error}", step.name),
        None => format!("{prefix} {} ({}ms)", step.name, step.duration.as_millis()),
    }
}

/// Format the run summary line
#[must_use]
pub fn summary_line(passed: usize, failed: usize, duration: Duration) -> String {
    format!(
        "{passed} passed, {failed} failed in {:.2}s",
        duration.as_secs_f64()
    )
}
