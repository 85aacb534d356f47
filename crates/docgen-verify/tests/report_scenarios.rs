use docgen_knowledge::build_knowledge_model;
use docgen_specgen::{generate_executable_specifications, ExecutableSpecification};
use docgen_test_utils::route_planning_paper;
use docgen_verify::{
    generate_verification_report, FixtureOutcome, FixtureStatus, SpecificationStatus, TestResult,
    VerificationReport,
};
use pretty_assertions::assert_eq;

fn specifications() -> Vec<ExecutableSpecification> {
    let paper = route_planning_paper();
    let model = build_knowledge_model(&paper);
    generate_executable_specifications(&paper, &model, "python")
}

fn all_passing(spec: &ExecutableSpecification) -> TestResult {
    TestResult::new(
        spec.id.clone(),
        spec.verification_fixtures
            .iter()
            .map(|f| FixtureOutcome::passed(f.id.clone()))
            .collect(),
    )
}

#[test]
fn every_fixture_passing_passes_everything() {
    let specs = specifications();
    let results: Vec<TestResult> = specs.iter().map(all_passing).collect();
    let report = generate_verification_report(&specs, &results);

    assert!(report.all_passed());
    assert_eq!(report.summary.specifications, specs.len());
    assert_eq!(report.summary.fixtures_untested, 0);
    assert!((report.summary.pass_rate - 1.0).abs() < 1e-9);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn no_results_means_not_run() {
    let specs = specifications();
    let report = generate_verification_report(&specs, &[]);
    assert_eq!(report.summary.not_run, specs.len());
    assert!(report
        .specifications
        .iter()
        .flat_map(|s| &s.fixtures)
        .all(|f| f.status == FixtureStatus::Untested));
}

#[test]
fn specifications_are_not_mutated() {
    let specs = specifications();
    let before = specs.clone();
    let mut results: Vec<TestResult> = specs.iter().map(all_passing).collect();
    results[0].fixtures[0].passed = false;
    let report = generate_verification_report(&specs, &results);

    assert_eq!(specs, before);
    assert_eq!(report.specifications[0].status, SpecificationStatus::Failed);
    assert!(report.generate_text().contains("Failed"));
}

#[test]
fn report_round_trips_through_json() {
    let specs = specifications();
    let results = vec![
        all_passing(&specs[0]),
        TestResult::new("spec-missing", vec![FixtureOutcome::failed("fixture-representative")]),
    ];
    let report = generate_verification_report(&specs, &results);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"status\":\"notRun\""));
    let decoded: VerificationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, report);
}
