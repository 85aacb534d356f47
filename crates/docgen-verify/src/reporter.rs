//! Matching test results against specification fixtures

use crate::report::{
    FixtureOutcome, FixtureReport, FixtureStatus, SpecificationReport, SpecificationStatus,
    TestResult, VerificationReport, VerificationSummary,
};
use docgen_paper::Diagnostic;
use docgen_specgen::ExecutableSpecification;
use indexmap::IndexMap;

#[derive(Default)]
struct Collected {
    outcomes: IndexMap<String, FixtureOutcome>,
    unknown: Vec<FixtureOutcome>,
}

/// Build a pass/fail report for `specifications` from external test results
///
/// Results for unknown specifications and outcomes for undeclared fixtures
/// are reported, never dropped. When a fixture is reported twice the later
/// outcome wins.
#[must_use]
pub fn generate_verification_report(
    specifications: &[ExecutableSpecification],
    test_results: &[TestResult],
) -> VerificationReport {
    let mut collected: IndexMap<&str, Collected> = specifications
        .iter()
        .map(|s| (s.id.as_str(), Collected::default()))
        .collect();
    let mut diagnostics = Vec::new();

    for result in test_results {
        let spec_id = result.specification_id.as_str();
        let Some(spec) = specifications.iter().find(|s| s.id == spec_id) else {
            diagnostics.push(
                Diagnostic::error(
                    "unknown-specification",
                    format!("no specification '{spec_id}'; {} fixture outcome(s) ignored", result.fixtures.len()),
                )
                .with_subject(spec_id),
            );
            continue;
        };
        let Some(entry) = collected.get_mut(spec_id) else {
            continue;
        };

        for outcome in &result.fixtures {
            let Some(fixture) = spec.fixture(&outcome.id) else {
                tracing::warn!("{}: unknown fixture '{}'", spec_id, outcome.id);
                diagnostics.push(
                    Diagnostic::warning("unknown-fixture", format!("fixture '{}' is not declared", outcome.id))
                        .with_subject(spec_id),
                );
                entry.unknown.push(outcome.clone());
                continue;
            };

            if let (Some(reported), Some(declared)) = (&outcome.expected, &fixture.expected_output) {
                if reported != declared {
                    diagnostics.push(
                        Diagnostic::warning(
                            "expected-output-mismatch",
                            format!("fixture '{}' was run against {reported}, declared {declared}", outcome.id),
                        )
                        .with_subject(spec_id),
                    );
                }
            }

            if entry.outcomes.insert(outcome.id.clone(), outcome.clone()).is_some() {
                diagnostics.push(
                    Diagnostic::warning(
                        "duplicate-fixture-result",
                        format!("fixture '{}' reported more than once; last outcome kept", outcome.id),
                    )
                    .with_subject(spec_id),
                );
            }
        }
    }

    let reports: Vec<SpecificationReport> = specifications
        .iter()
        .filter_map(|spec| {
            let entry = collected.swap_remove(spec.id.as_str())?;
            Some(specification_report(spec, entry))
        })
        .collect();
    let summary = summarize(&reports);
    tracing::info!(
        "Verification: {}/{} specifications passed, {} fixtures failed",
        summary.passed,
        summary.specifications,
        summary.fixtures_failed
    );

    VerificationReport {
        specifications: reports,
        summary,
        diagnostics,
    }
}

fn specification_report(spec: &ExecutableSpecification, entry: Collected) -> SpecificationReport {
    let fixtures: Vec<FixtureReport> = spec
        .verification_fixtures
        .iter()
        .map(|fixture| match entry.outcomes.get(&fixture.id) {
            Some(outcome) => FixtureReport {
                id: fixture.id.clone(),
                status: if outcome.passed {
                    FixtureStatus::Passed
                } else {
                    FixtureStatus::Failed
                },
                actual: outcome.actual.clone(),
                expected: outcome.expected.clone().or_else(|| fixture.expected_output.clone()),
            },
            None => FixtureReport {
                id: fixture.id.clone(),
                status: FixtureStatus::Untested,
                actual: None,
                expected: fixture.expected_output.clone(),
            },
        })
        .collect();

    let count = |status: FixtureStatus| fixtures.iter().filter(|f| f.status == status).count();
    let (passed, failed, untested) = (
        count(FixtureStatus::Passed),
        count(FixtureStatus::Failed),
        count(FixtureStatus::Untested),
    );
    let status = if failed > 0 {
        SpecificationStatus::Failed
    } else if passed == 0 {
        SpecificationStatus::NotRun
    } else if untested > 0 {
        SpecificationStatus::Incomplete
    } else {
        SpecificationStatus::Passed
    };

    SpecificationReport {
        specification_id: spec.id.clone(),
        title: spec.title.clone(),
        status,
        passed,
        failed,
        untested,
        fixtures,
        unknown_fixtures: entry.unknown,
    }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(reports: &[SpecificationReport]) -> VerificationSummary {
    let mut summary = VerificationSummary {
        specifications: reports.len(),
        ..VerificationSummary::default()
    };
    for report in reports {
        match report.status {
            SpecificationStatus::Passed => summary.passed += 1,
            SpecificationStatus::Failed => summary.failed += 1,
            SpecificationStatus::Incomplete => summary.incomplete += 1,
            SpecificationStatus::NotRun => summary.not_run += 1,
        }
        summary.fixtures_passed += report.passed;
        summary.fixtures_failed += report.failed;
        summary.fixtures_untested += report.untested;
        summary.unknown_fixtures += report.unknown_fixtures.len();
    }
    let executed = summary.fixtures_passed + summary.fixtures_failed;
    if executed > 0 {
        summary.pass_rate = summary.fixtures_passed as f64 / executed as f64;
    }
    summary
}
