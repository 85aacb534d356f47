use docgen_knowledge::{build_knowledge_model, ConceptType, RelationshipType};
use docgen_paper::{Algorithm, PaperContent, Section};
use docgen_test_utils::{route_planning_paper, single_algorithm_paper};
use proptest::prelude::*;
use std::collections::HashSet;

const NAMES: &[&str] = &["Sort", "Merge Sort", "Search", "Beam Search", "Rank", "Score"];
const VARS: &[&str] = &["x", "y", "z", "graph", "path", "score"];

fn arb_algorithm(index: usize) -> impl Strategy<Value = Algorithm> {
    (
        prop::sample::select(NAMES),
        prop::collection::vec(prop::sample::select(VARS), 0..3),
        prop::collection::vec(prop::sample::select(VARS), 0..3),
        prop::collection::vec(prop::sample::select(NAMES), 0..2),
    )
        .prop_map(move |(name, inputs, outputs, mentioned)| {
            Algorithm::new(format!("algo-{index}"), name)
                .with_description(format!("Uses {} with a priority queue.", mentioned.join(" and ")))
                .with_inputs(inputs)
                .with_outputs(outputs)
                .in_section("s1")
        })
}

fn arb_paper() -> impl Strategy<Value = PaperContent> {
    (0..6usize)
        .prop_flat_map(|n| (0..n).map(arb_algorithm).collect::<Vec<_>>())
        .prop_map(|algorithms| {
            let mut paper = PaperContent::new("Generated");
            paper.sections = vec![Section::new("s1", 1, "Method")
                .with_content("The priority queue holds candidates. A priority queue is a heap.")];
            paper.algorithms = algorithms;
            paper
        })
}

proptest! {
    #[test]
    fn prop_model_is_internally_consistent(paper in arb_paper()) {
        let model = build_knowledge_model(&paper);
        let diagnostics = model.validate(&paper);
        prop_assert!(diagnostics.is_empty(), "violations: {:?}", diagnostics);
    }

    #[test]
    fn prop_no_self_loops_and_endpoints_resolve(paper in arb_paper()) {
        let model = build_knowledge_model(&paper);
        let ids: HashSet<&str> = model.concepts.iter().map(|c| c.id.as_str()).collect();
        for rel in &model.relationships {
            prop_assert_ne!(&rel.source_id, &rel.target_id);
            prop_assert!(ids.contains(rel.source_id.as_str()));
            prop_assert!(ids.contains(rel.target_id.as_str()));
        }
    }

    #[test]
    fn prop_one_algorithm_concept_per_algorithm(paper in arb_paper()) {
        let model = build_knowledge_model(&paper);
        let algorithm_concepts = model.concepts_of_type(ConceptType::Algorithm).count();
        if paper.algorithms.is_empty() {
            prop_assert_eq!(algorithm_concepts, 0);
        } else {
            prop_assert_eq!(algorithm_concepts, paper.algorithms.len());
        }
    }

    #[test]
    fn prop_build_is_deterministic(paper in arb_paper()) {
        prop_assert_eq!(build_knowledge_model(&paper), build_knowledge_model(&paper));
    }
}

#[test]
fn scenario_single_algorithm() {
    let model = build_knowledge_model(&single_algorithm_paper());
    assert_eq!(model.concepts.len(), 1);
    assert_eq!(model.concepts[0].concept_type, ConceptType::Algorithm);
    assert_eq!(model.concepts[0].source_elements, vec!["algo-1"]);
}

#[test]
fn route_planning_depends_on_chain() {
    let model = build_knowledge_model(&route_planning_paper());
    let depends: Vec<(&str, &str)> = model
        .relationships_of_type(RelationshipType::DependsOn)
        .map(|r| (r.source_id.as_str(), r.target_id.as_str()))
        .collect();
    assert_eq!(depends, vec![("algo-2", "algo-1"), ("algo-3", "algo-2")]);
}

#[test]
fn model_round_trips_through_json() {
    let model = build_knowledge_model(&route_planning_paper());
    let json = serde_json::to_string(&model).unwrap();
    let decoded: docgen_knowledge::KnowledgeModel = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, model);
}
