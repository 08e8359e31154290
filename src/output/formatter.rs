//! Output formatters for run summaries
//!
//! Provides a boxed table for operators and JSON for tooling.

use crate::models::{RunSummary, ScenarioResult, ScenarioStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    /// ANSI colours on or off; off when the output is not a terminal
    pub fn colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Format one scenario verdict as a table row
    pub fn format_result(&self, result: &ScenarioResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                ScenarioStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                ScenarioStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
                ScenarioStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                ScenarioStatus::Pass => "✓ PASS",
                ScenarioStatus::Fail => "✗ FAIL",
                ScenarioStatus::Error => "! ERROR",
            }
        };

        let mut line = format!(
            "{:44} {} [{:>6}ms]",
            result.scenario.name(),
            status_str,
            result.duration_ms
        );
        if let Some(message) = &result.message {
            line.push_str(&format!("\n      {message}"));
        }
        line
    }

    /// Format the run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  Payment Gateway Harness - {:34}║\n",
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        for result in &summary.results {
            output.push_str(&format!("  {}\n", self.format_result(result)));
        }

        output.push_str("────────────────────────────────────────────────────────────────\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "  Scenarios: {} | Pass: {} | Fail: {} | Error: {}\n",
            summary.total, pass_str, fail_str, summary.errors
        ));
        output.push_str(&format!(
            "  Pass Rate: {:.1}% | Duration: {}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));

        let checks = &summary.checks;
        output.push_str(&format!(
            "  Checks: {} | Pass: {} | Fail: {} | Warn: {} ({:.1}%)\n",
            checks.total,
            checks.passed,
            checks.failed,
            checks.warned,
            checks.success_rate()
        ));
        if !checks.failures.is_empty() {
            output.push_str("\n  Failed checks:\n");
            for record in &checks.failures {
                output.push_str(&format!("    {record}\n"));
            }
        }

        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}
