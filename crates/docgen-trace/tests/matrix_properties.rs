use docgen_knowledge::build_knowledge_model;
use docgen_test_utils::route_planning_paper;
use docgen_trace::{
    generate_initial_traceability_matrix, generate_visualization, update_traceability_matrix,
    CodeElement, CodeElementType, CodeMapping, TraceType, TraceabilityMatrix,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn seeded() -> TraceabilityMatrix {
    let paper = route_planning_paper();
    let model = build_knowledge_model(&paper);
    generate_initial_traceability_matrix(&paper, &model)
}

fn arb_mapping() -> impl Strategy<Value = CodeMapping> {
    (
        prop::sample::select(vec!["algo-1", "algo-2", "algo-3", "missing"]),
        prop::sample::select(vec!["c1", "c2", "c3", ""]),
        prop::sample::select(vec!["Alpha", "Beta"]),
        prop_oneof![
            Just(TraceType::Implements),
            Just(TraceType::Tests),
            Just(TraceType::References),
        ],
        prop_oneof![-1.0..2.0f64, Just(f64::NAN), Just(0.5)],
    )
        .prop_map(|(paper, code, name, trace_type, confidence)| {
            CodeMapping::new(
                paper,
                CodeElement::new(code, CodeElementType::Function, name, format!("src/{code}.rs")),
                trace_type,
                confidence,
            )
        })
}

proptest! {
    #[test]
    fn prop_update_is_idempotent(mappings in prop::collection::vec(arb_mapping(), 0..12)) {
        let matrix = seeded();
        let once = update_traceability_matrix(&matrix, &mappings).value;
        let twice = update_traceability_matrix(&once, &mappings).value;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_updated_matrix_is_consistent(mappings in prop::collection::vec(arb_mapping(), 0..12)) {
        let outcome = update_traceability_matrix(&seeded(), &mappings);
        prop_assert!(outcome.value.validate().is_empty());
        let rejected = mappings
            .iter()
            .filter(|m| m.paper_element_id == "missing" || m.code_element.id.is_empty())
            .count();
        prop_assert_eq!(outcome.error_count(), rejected);
    }

    #[test]
    fn prop_visualization_node_count(mappings in prop::collection::vec(arb_mapping(), 0..12)) {
        let matrix = update_traceability_matrix(&seeded(), &mappings).value;
        let graph = generate_visualization(&matrix);
        prop_assert_eq!(
            graph.nodes.len(),
            matrix.paper_elements.len() + matrix.code_elements.len()
        );
        prop_assert_eq!(graph.edges.len(), matrix.relationships.len());
    }
}

#[test]
fn empty_update_is_identity() {
    let matrix = seeded();
    let outcome = update_traceability_matrix(&matrix, &[]);
    assert!(outcome.is_clean());
    assert_eq!(outcome.value, matrix);
}

#[test]
fn matrix_round_trips_through_json() {
    let mapping = CodeMapping::new(
        "algo-2",
        CodeElement::new("path_search", CodeElementType::Function, "path_search", "src/search.py"),
        TraceType::Implements,
        0.8,
    )
    .with_notes("matched by name");
    let matrix = update_traceability_matrix(&seeded(), &[mapping]).value;
    let json = serde_json::to_string(&matrix).unwrap();
    assert!(json.contains("\"paperElementId\":\"algo-2\""));
    let decoded: TraceabilityMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, matrix);
}
