use docgen_knowledge::build_knowledge_model;
use docgen_test_utils::route_planning_paper;
use docgen_workflow::{
    classify_transition, generate_implementation_plan, layer_components, next_statuses,
    update_implementation_progress, Component, ComponentStatus, ImplementationPlan, StatusUpdate,
    Transition,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const IDS: [&str; 6] = ["c0", "c1", "c2", "c3", "c4", "c5"];

fn arb_components() -> impl Strategy<Value = Vec<Component>> {
    prop::collection::vec(prop::collection::vec(0usize..7, 0..4), IDS.len()).prop_map(|deps| {
        deps.into_iter()
            .enumerate()
            .map(|(i, targets)| {
                Component::new(IDS[i], IDS[i].to_uppercase()).with_dependencies(
                    targets
                        .into_iter()
                        .map(|t| IDS.get(t).map_or_else(|| "ghost".to_string(), |id| (*id).to_string())),
                )
            })
            .collect()
    })
}

fn arb_status() -> impl Strategy<Value = ComponentStatus> {
    prop_oneof![
        Just(ComponentStatus::NotStarted),
        Just(ComponentStatus::InProgress),
        Just(ComponentStatus::Implemented),
        Just(ComponentStatus::Verified),
    ]
}

proptest! {
    #[test]
    fn prop_dependencies_precede_dependents(components in arb_components()) {
        let plan = layer_components(components);
        prop_assert_eq!(plan.components().count(), IDS.len());
        for component in plan.components() {
            let stage = plan.stage_of(&component.id).unwrap();
            for dep in &component.dependencies {
                let dep_stage = plan.stage_of(dep);
                prop_assert!(dep_stage.is_some());
                prop_assert!(dep_stage.unwrap() < stage);
            }
        }
        for stage in &plan.stages {
            prop_assert!(!stage.components.is_empty());
        }
    }

    #[test]
    fn prop_layering_ignores_input_order(components in arb_components()) {
        let mut reversed = components.clone();
        reversed.reverse();
        prop_assert_eq!(layer_components(components), layer_components(reversed));
    }

    #[test]
    fn prop_transitions_match_next_statuses(from in arb_status(), to in arb_status()) {
        let forward = next_statuses(from).contains(&to);
        let transition = classify_transition(from, to);
        prop_assert_eq!(forward, matches!(transition, Transition::Forward | Transition::Skip));
        prop_assert_eq!(transition == Transition::Unchanged, from == to);
    }

    #[test]
    fn prop_updates_always_land(status in arb_status(), index in 0usize..IDS.len()) {
        let plan = layer_components(IDS.iter().map(|id| Component::new(*id, *id)).collect());
        let outcome = update_implementation_progress(&plan, &[StatusUpdate::new(IDS[index], status)]);
        prop_assert_eq!(outcome.error_count(), 0);
        prop_assert_eq!(outcome.value.component(IDS[index]).unwrap().status, status);
    }
}

#[test]
fn generated_plan_round_trips_through_json() {
    let paper = route_planning_paper();
    let model = build_knowledge_model(&paper);
    let plan = generate_implementation_plan(&paper, &model);
    let first = plan.stages[0].components[0].id.clone();
    let plan = update_implementation_progress(
        &plan,
        &[StatusUpdate::new(first, ComponentStatus::Implemented).with_notes("done")],
    )
    .value;

    let json = serde_json::to_string(&plan).unwrap();
    assert!(json.contains("\"status\":\"implemented\""));
    let decoded: ImplementationPlan = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, plan);
}

#[test]
fn full_lifecycle_reaches_complete() {
    let paper = route_planning_paper();
    let model = build_knowledge_model(&paper);
    let mut plan = generate_implementation_plan(&paper, &model);
    let ids: Vec<String> = plan.components().map(|c| c.id.clone()).collect();

    for id in &ids {
        let outcome = update_implementation_progress(&plan, &[StatusUpdate::new(id.clone(), ComponentStatus::Verified)]);
        assert!(outcome.is_clean(), "{:?}", outcome.diagnostics);
        plan = outcome.value;
    }

    let summary = plan.progress();
    assert_eq!(summary.verified, ids.len());
    assert!((summary.percent_complete - 100.0).abs() < 1e-9);
    assert!(summary.ready.is_empty());
}
