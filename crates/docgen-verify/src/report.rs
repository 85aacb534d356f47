//! Verification report records

use docgen_paper::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fmt::Write as _;

/// Outcome of one fixture in an external test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureOutcome {
    pub id: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

impl FixtureOutcome {
    /// Passing outcome
    #[inline]
    #[must_use]
    pub fn passed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            passed: true,
            actual: None,
            expected: None,
        }
    }

    /// Failing outcome
    #[inline]
    #[must_use]
    pub fn failed(id: impl Into<String>) -> Self {
        Self {
            passed: false,
            ..Self::passed(id)
        }
    }

    /// With observed and expected values
    #[inline]
    #[must_use]
    pub fn with_values(mut self, actual: Value, expected: Value) -> Self {
        self.actual = Some(actual);
        self.expected = Some(expected);
        self
    }
}

/// Results of running one specification's fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub specification_id: String,
    pub fixtures: Vec<FixtureOutcome>,
}

impl TestResult {
    /// Create new test result
    #[must_use]
    pub fn new(specification_id: impl Into<String>, fixtures: Vec<FixtureOutcome>) -> Self {
        Self {
            specification_id: specification_id.into(),
            fixtures,
        }
    }
}

/// Status of one fixture in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixtureStatus {
    Passed,
    Failed,
    /// No test result exercised the fixture
    Untested,
}

/// Per-fixture line of a specification report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureReport {
    pub id: String,
    pub status: FixtureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

/// Aggregate status of a specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpecificationStatus {
    /// Every fixture ran and passed
    Passed,
    /// At least one fixture failed
    Failed,
    /// Nothing failed but some fixtures never ran
    Incomplete,
    /// No fixture ran
    NotRun,
}

impl fmt::Display for SpecificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpecificationStatus::Passed => "passed",
            SpecificationStatus::Failed => "failed",
            SpecificationStatus::Incomplete => "incomplete",
            SpecificationStatus::NotRun => "notRun",
        };
        f.write_str(s)
    }
}

/// Report for one specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationReport {
    pub specification_id: String,
    pub title: String,
    pub status: SpecificationStatus,
    pub passed: usize,
    pub failed: usize,
    pub untested: usize,
    pub fixtures: Vec<FixtureReport>,
    /// Reported fixture ids the specification does not declare
    #[serde(default)]
    pub unknown_fixtures: Vec<FixtureOutcome>,
}

/// Totals across every specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSummary {
    pub specifications: usize,
    pub passed: usize,
    pub failed: usize,
    pub incomplete: usize,
    pub not_run: usize,
    pub fixtures_passed: usize,
    pub fixtures_failed: usize,
    pub fixtures_untested: usize,
    pub unknown_fixtures: usize,
    /// Passed fixtures over executed fixtures (0 when nothing ran)
    pub pass_rate: f64,
}

/// Pass/fail report over a set of specifications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub specifications: Vec<SpecificationReport>,
    pub summary: VerificationSummary,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationReport {
    /// Find specification report by ID
    #[must_use]
    pub fn specification(&self, id: &str) -> Option<&SpecificationReport> {
        self.specifications.iter().find(|s| s.specification_id == id)
    }

    /// Check if every specification passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.summary.specifications > 0 && self.summary.passed == self.summary.specifications
    }

    /// Plain-text rendering for terminals and logs
    #[must_use]
    pub fn generate_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();
        out.push_str("=== Verification Report ===\n\n");
        let _ = writeln!(
            out,
            "Specifications: {} ({} passed, {} failed, {} incomplete, {} not run)",
            s.specifications, s.passed, s.failed, s.incomplete, s.not_run
        );
        let _ = writeln!(
            out,
            "Fixtures: {} passed, {} failed, {} untested, {} unknown",
            s.fixtures_passed, s.fixtures_failed, s.fixtures_untested, s.unknown_fixtures
        );
        let _ = writeln!(out, "Pass rate: {:.1}%", s.pass_rate * 100.0);

        for spec in &self.specifications {
            let _ = writeln!(out, "\n[{}] {} ({})", spec.status, spec.title, spec.specification_id);
            for fixture in spec.fixtures.iter().filter(|f| f.status != FixtureStatus::Passed) {
                let _ = writeln!(out, "  {:?}: {}", fixture.status, fixture.id);
            }
            for unknown in &spec.unknown_fixtures {
                let _ = writeln!(out, "  unknown fixture: {}", unknown.id);
            }
        }
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "\n{diagnostic}");
        }
        out
    }
}
