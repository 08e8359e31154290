//! Result/assertion recorder
//!
//! An append-only ledger of named checks. Every check primitive appends
//! exactly one record, PASS or FAIL, and returns whether it passed.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fmt::Debug;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::models::{CheckRecord, CheckStatus};

const UUID_PATTERN: &str =
    r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

fn uuid_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(UUID_PATTERN).ok()).as_ref()
}

/// Whether `value` has the 8-4-4-4-12 hex shape of a UUID
pub fn is_uuid(value: &str) -> bool {
    uuid_regex().map(|re| re.is_match(value)).unwrap_or(false)
}

/// Whether a JSON value counts as empty: null, blank string, empty array or object
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Check ledger for one harness run
#[derive(Debug, Default)]
pub struct Recorder {
    records: Vec<CheckRecord>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order
    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    /// Position marker; records appended later are "since" this mark
    pub fn mark(&self) -> usize {
        self.records.len()
    }

    pub fn records_since(&self, mark: usize) -> &[CheckRecord] {
        self.records.get(mark..).unwrap_or(&[])
    }

    pub fn failures_since(&self, mark: usize) -> Vec<&CheckRecord> {
        self.records_since(mark)
            .iter()
            .filter(|r| r.is_failure())
            .collect()
    }

    fn push(&mut self, record: CheckRecord) {
        match record.status {
            CheckStatus::Pass => debug!("{}", record),
            CheckStatus::Fail | CheckStatus::Warn => warn!("{}", record),
        }
        self.records.push(record);
    }

    /// Record a passing check
    pub fn pass(&mut self, name: impl Into<String>) -> bool {
        self.push(CheckRecord::new(name, CheckStatus::Pass, ""));
        true
    }

    /// Record a failing check
    pub fn fail(&mut self, name: impl Into<String>, detail: impl Into<String>) -> bool {
        self.push(CheckRecord::new(name, CheckStatus::Fail, detail));
        false
    }

    /// Record a warning; warnings never fail a run
    pub fn warn(&mut self, name: impl Into<String>, detail: impl Into<String>) {
        self.push(CheckRecord::new(name, CheckStatus::Warn, detail));
    }

    /// Record PASS when `ok`, otherwise FAIL with `detail`
    pub fn check(&mut self, ok: bool, name: impl Into<String>, detail: impl Into<String>) -> bool {
        if ok {
            self.pass(name)
        } else {
            self.fail(name, detail)
        }
    }

    pub fn assert_equal<A, E>(&mut self, actual: A, expected: E, name: impl Into<String>) -> bool
    where
        A: PartialEq<E> + Debug,
        E: Debug,
    {
        let ok = actual == expected;
        self.check(ok, name, format!("expected {expected:?}, got {actual:?}"))
    }

    pub fn assert_has_field(&mut self, object: &Value, field: &str, name: impl Into<String>) -> bool {
        let ok = object.get(field).is_some();
        self.check(ok, name, format!("field '{field}' is missing"))
    }

    pub fn assert_not_empty(&mut self, value: &Value, name: impl Into<String>) -> bool {
        let ok = !is_blank(value);
        self.check(ok, name, format!("value is empty: {value}"))
    }

    pub fn assert_uuid(&mut self, value: &Value, name: impl Into<String>) -> bool {
        let ok = value.as_str().map(is_uuid).unwrap_or(false);
        self.check(ok, name, format!("not a UUID: {value}"))
    }

    /// Aggregate counts over the whole ledger
    pub fn summary(&self) -> CheckSummary {
        CheckSummary::from_records(&self.records)
    }

    pub fn is_clean(&self) -> bool {
        !self.records.iter().any(CheckRecord::is_failure)
    }
}

/// Aggregate over a check ledger
#[derive(Clone, Debug, Default, Serialize)]
pub struct CheckSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub failures: Vec<CheckRecord>,
}

impl CheckSummary {
    pub fn from_records(records: &[CheckRecord]) -> Self {
        let mut summary = CheckSummary {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Fail => {
                    summary.failed += 1;
                    summary.failures.push(record.clone());
                }
                CheckStatus::Warn => summary.warned += 1,
            }
        }
        summary
    }

    /// PASS share of the PASS and FAIL checks
    pub fn success_rate(&self) -> f64 {
        let decided = self.passed + self.failed;
        if decided == 0 {
            0.0
        } else {
            (self.passed as f64 / decided as f64) * 100.0
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checks: {} | Pass: {} | Fail: {} | Warn: {}",
            self.total, self.passed, self.failed, self.warned
        )?;
        writeln!(f, "Success Rate: {:.1}%", self.success_rate())?;
        if !self.failures.is_empty() {
            writeln!(f, "Failed checks:")?;
            for record in &self.failures {
                writeln!(f, "  {record}")?;
            }
        }
        Ok(())
    }
}
