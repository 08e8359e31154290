//! Scenario verdicts and run summary
//!
//! Defines per-scenario results and the aggregate printed at the end of a run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::Scenario;
use crate::recorder::CheckSummary;

/// Scenario verdict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Pass,
    Fail,
    Error,
}

impl ScenarioStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            ScenarioStatus::Pass => "✓",
            ScenarioStatus::Fail => "✗",
            ScenarioStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScenarioStatus::Pass)
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioStatus::Pass => write!(f, "PASS"),
            ScenarioStatus::Fail => write!(f, "FAIL"),
            ScenarioStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single scenario execution
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub status: ScenarioStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl ScenarioResult {
    pub fn pass(scenario: Scenario, duration_ms: u64) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail(scenario: Scenario, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Fail,
            duration_ms,
            message: Some(message.into()),
        }
    }

    pub fn error(scenario: Scenario, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            scenario,
            status: ScenarioStatus::Error,
            duration_ms,
            message: Some(error.into()),
        }
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.scenario,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of one harness run
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<ScenarioResult>,
    pub checks: CheckSummary,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>, results: Vec<ScenarioResult>, checks: CheckSummary) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Pass)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Fail)
            .count();
        let errors = results
            .iter()
            .filter(|r| r.status == ScenarioStatus::Error)
            .count();
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            started_at,
            total,
            passed,
            failed,
            errors,
            total_duration_ms,
            results,
            checks,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// A run is clean when every scenario passed and no check failed
    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total && self.checks.is_clean()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_all_passed() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run started {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Scenarios: {} | Pass: {} | Fail: {} | Error: {}",
            self.total, self.passed, self.failed, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )?;
        write!(f, "{}", self.checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OfferCase, OrderCase};
    use crate::recorder::Recorder;

    #[test]
    fn test_result_creation() {
        let result = ScenarioResult::pass(Scenario::Order(OrderCase::PayIn), 100);
        assert!(result.status.is_success());
        assert_eq!(result.duration_ms, 100);
        assert!(result.to_string().contains("create_order_basic"));
    }

    #[test]
    fn test_run_summary_counts() {
        let mut recorder = Recorder::new();
        recorder.pass("ok");
        recorder.fail("broken", "expected 1, got 2");

        let results = vec![
            ScenarioResult::pass(Scenario::Order(OrderCase::PayIn), 100),
            ScenarioResult::fail(Scenario::Order(OrderCase::PayOut), 50, "1 check failed"),
            ScenarioResult::error(Scenario::Offer(OfferCase::Get), 5, "boom"),
        ];

        let summary = RunSummary::new(Utc::now(), results, recorder.summary());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_duration_ms, 155);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_clean_run_exits_zero() {
        let mut recorder = Recorder::new();
        recorder.pass("ok");
        let results = vec![ScenarioResult::pass(Scenario::Order(OrderCase::PayIn), 1)];
        let summary = RunSummary::new(Utc::now(), results, recorder.summary());
        assert!(summary.is_all_passed());
        assert_eq!(summary.exit_code(), 0);
        assert!((summary.pass_rate() - 100.0).abs() < f64::EPSILON);
    }
}
