//! Implementation planner
//!
//! Groups concepts into components around anchor concepts, derives the
//! component dependency DAG and layers it into stages:
//!
//! 1. anchors are algorithm concepts (every concept when there are none);
//!    anchors on a common `uses`/`dependsOn` cycle merge into one component
//! 2. other concepts join the single component they are linked to, or the
//!    shared foundations component when linked to several or none
//! 3. `dependsOn` edges across components become component dependencies
//! 4. cycles are broken by dropping, among edges inside a strongly
//!    connected set, the one with the smallest target id (then source id)
//! 5. stage = 1 + max(stage of dependencies)

use crate::plan::{Component, ImplementationPlan, Stage};
use docgen_knowledge::{Concept, ConceptType, KnowledgeModel, RelationshipType};
use docgen_paper::{Diagnostic, PaperContent};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Id of the component holding concepts shared by several components
pub const FOUNDATIONS_ID: &str = "component-foundations";

/// Build a dependency-ordered plan from a knowledge model
#[must_use]
pub fn generate_implementation_plan(paper: &PaperContent, model: &KnowledgeModel) -> ImplementationPlan {
    let components = cluster_components(paper, model);
    let mut plan = layer_components(components);
    if plan.stages.is_empty() {
        plan.warnings.push(Diagnostic::warning(
            "empty-plan",
            "knowledge model has no concepts; plan has no components",
        ));
    }
    tracing::info!(
        "Planned {} components in {} stages ({} warnings)",
        plan.components().count(),
        plan.stages.len(),
        plan.warnings.len()
    );
    plan
}

fn cluster_components(paper: &PaperContent, model: &KnowledgeModel) -> Vec<Component> {
    let mut anchors: Vec<&Concept> = model.concepts_of_type(ConceptType::Algorithm).collect();
    if anchors.is_empty() {
        anchors = model.concepts.iter().collect();
    }
    anchors.sort_by(|a, b| a.id.cmp(&b.id));
    anchors.dedup_by(|a, b| a.id == b.id);
    let anchor_ids: HashSet<&str> = anchors.iter().map(|c| c.id.as_str()).collect();

    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for anchor in &anchors {
        graph.add_node(anchor.id.as_str());
    }
    for rel in &model.relationships {
        let (src, tgt) = (rel.source_id.as_str(), rel.target_id.as_str());
        if matches!(rel.relationship_type, RelationshipType::Uses | RelationshipType::DependsOn)
            && src != tgt
            && anchor_ids.contains(src)
            && anchor_ids.contains(tgt)
        {
            graph.add_edge(src, tgt, ());
        }
    }

    let mut groups: Vec<Vec<&str>> = tarjan_scc(&graph)
        .into_iter()
        .map(|mut group| {
            group.sort_unstable();
            group
        })
        .collect();
    groups.sort();

    let anchor_owner: HashMap<&str, usize> = groups
        .iter()
        .enumerate()
        .flat_map(|(i, group)| group.iter().map(move |id| (*id, i)))
        .collect();

    let mut members: Vec<Vec<&str>> = groups.clone();
    let mut foundations: Vec<&str> = Vec::new();
    let mut foundation_users: BTreeSet<usize> = BTreeSet::new();
    for concept in model.concepts.iter().filter(|c| !anchor_ids.contains(c.id.as_str())) {
        let linked: BTreeSet<usize> = model
            .relationships
            .iter()
            .filter_map(|r| {
                if r.source_id == concept.id {
                    anchor_owner.get(r.target_id.as_str()).copied()
                } else if r.target_id == concept.id {
                    anchor_owner.get(r.source_id.as_str()).copied()
                } else {
                    None
                }
            })
            .collect();
        let single = if linked.len() == 1 { linked.first().copied() } else { None };
        if let Some(only) = single {
            members[only].push(concept.id.as_str());
        } else {
            foundations.push(concept.id.as_str());
            foundation_users.extend(linked);
        }
    }

    let mut components: Vec<Component> = groups
        .iter()
        .zip(&members)
        .map(|(group, concept_ids)| {
            Component::new(format!("component-{}", group[0]), component_name(model, group))
                .with_description(describe(paper, model, group))
                .with_concepts(concept_ids.iter().copied())
        })
        .collect();

    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (i, concept_ids) in members.iter().enumerate() {
        owner.extend(concept_ids.iter().map(|id| (*id, i)));
    }
    if !foundations.is_empty() {
        let index = components.len();
        owner.extend(foundations.iter().map(|id| (*id, index)));
        components.push(
            Component::new(FOUNDATIONS_ID, "Foundations")
                .with_description("Concepts shared by several components or not tied to any")
                .with_concepts(foundations.iter().copied()),
        );
        for user in foundation_users {
            components[user].dependencies.push(FOUNDATIONS_ID.to_string());
        }
    }

    for rel in model.relationships_of_type(RelationshipType::DependsOn) {
        let (Some(&from), Some(&to)) = (
            owner.get(rel.source_id.as_str()),
            owner.get(rel.target_id.as_str()),
        ) else {
            continue;
        };
        if from != to {
            let target = components[to].id.clone();
            if !components[from].dependencies.contains(&target) {
                components[from].dependencies.push(target);
            }
        }
    }
    components
}

fn component_name(model: &KnowledgeModel, group: &[&str]) -> String {
    group
        .iter()
        .map(|id| model.concept(id).map_or(*id, |c| c.name.as_str()))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn describe(paper: &PaperContent, model: &KnowledgeModel, group: &[&str]) -> String {
    if let [id] = group {
        let from_paper = paper
            .find_algorithm(id)
            .map(|a| a.description.as_str())
            .filter(|d| !d.is_empty());
        let from_model = model
            .concept(id)
            .map(|c| c.description.as_str())
            .filter(|d| !d.is_empty());
        return from_paper
            .or(from_model)
            .map_or_else(|| format!("Implementation of '{id}'"), str::to_string);
    }
    format!(
        "Mutually dependent concepts implemented together: {}",
        component_name(model, group)
    )
}

/// Layer components into stages
///
/// Unknown dependency ids are dropped and cycles broken, each with a
/// warning on the returned plan. Component statuses are kept as given.
#[must_use]
pub fn layer_components(mut components: Vec<Component>) -> ImplementationPlan {
    let mut warnings = Vec::new();

    components.sort_by(|a, b| a.id.cmp(&b.id));
    let mut seen = HashSet::new();
    components.retain(|c| {
        let fresh = seen.insert(c.id.clone());
        if !fresh {
            warnings.push(
                Diagnostic::warning("duplicate-component", "component id appears more than once; later copy dropped")
                    .with_subject(&c.id),
            );
        }
        fresh
    });

    let ids: Vec<String> = components.iter().map(|c| c.id.clone()).collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (i, component) in components.iter_mut().enumerate() {
        graph.add_node(i);
        let mut kept = BTreeSet::new();
        for dep in component.dependencies.drain(..) {
            match index.get(dep.as_str()) {
                Some(&j) => {
                    graph.add_edge(i, j, ());
                    kept.insert(dep);
                }
                None => {
                    tracing::warn!("{}: dropping unknown dependency '{}'", component.id, dep);
                    warnings.push(
                        Diagnostic::warning(
                            "unknown-dependency",
                            format!("dependency '{dep}' is not a component; dropped"),
                        )
                        .with_subject(&component.id),
                    );
                }
            }
        }
        component.dependencies = kept.into_iter().collect();
    }

    while let Some((from, to)) = cycle_edge(&graph, &ids) {
        graph.remove_edge(from, to);
        components[from].dependencies.retain(|d| *d != ids[to]);
        tracing::warn!("Dependency cycle: dropped {} -> {}", ids[from], ids[to]);
        warnings.push(
            Diagnostic::warning(
                "dependency-cycle",
                format!(
                    "dropped dependency of '{}' on '{}' to break a cycle",
                    ids[from], ids[to]
                ),
            )
            .with_subject(&ids[from]),
        );
    }

    let order = toposort(&graph, None).unwrap_or_else(|_| graph.nodes().collect());
    let mut stage_of = vec![0usize; components.len()];
    for &node in order.iter().rev() {
        stage_of[node] = graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|dep| stage_of[dep] + 1)
            .max()
            .unwrap_or(0);
    }

    let mut layers: BTreeMap<usize, Vec<Component>> = BTreeMap::new();
    for (i, component) in components.into_iter().enumerate() {
        layers.entry(stage_of[i]).or_default().push(component);
    }
    let stages = layers
        .into_iter()
        .map(|(n, components)| Stage {
            id: format!("stage-{}", n + 1),
            name: format!("Stage {}", n + 1),
            description: if n == 0 {
                "Components without dependencies".to_string()
            } else {
                format!("Components whose dependencies are all in stages 1-{n}")
            },
            components,
        })
        .collect();

    ImplementationPlan { stages, warnings }
}

/// Edge to drop next, or `None` once the graph is acyclic
fn cycle_edge(graph: &DiGraphMap<usize, ()>, ids: &[String]) -> Option<(usize, usize)> {
    tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flat_map(|scc| {
            let members: HashSet<usize> = scc.into_iter().collect();
            graph
                .all_edges()
                .filter(|(a, b, _)| members.contains(a) && members.contains(b))
                .map(|(a, b, _)| (a, b))
                .collect::<Vec<_>>()
        })
        .min_by(|x, y| (&ids[x.1], &ids[x.0]).cmp(&(&ids[y.1], &ids[y.0])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_knowledge::{build_knowledge_model, Relationship};
    use docgen_test_utils::{cyclic_io_paper, route_planning_paper, sections_only_paper};
    use pretty_assertions::assert_eq;

    fn stage_ids(plan: &ImplementationPlan) -> Vec<Vec<&str>> {
        plan.stages
            .iter()
            .map(|s| s.components.iter().map(|c| c.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn route_planning_is_a_chain() {
        let paper = route_planning_paper();
        let plan = generate_implementation_plan(&paper, &build_knowledge_model(&paper));

        assert_eq!(plan.stage_of("component-algo-1"), Some(0));
        assert_eq!(plan.stage_of("component-algo-2"), Some(1));
        assert_eq!(plan.stage_of("component-algo-3"), Some(2));
        assert_eq!(
            plan.component("component-algo-3").map(|c| c.dependencies.clone()),
            Some(vec!["component-algo-2".to_string()])
        );
        assert!(plan.warnings.is_empty());
        assert!(plan.components().all(|c| c.status == crate::ComponentStatus::NotStarted));
    }

    #[test]
    fn every_concept_lands_in_exactly_one_component() {
        let paper = route_planning_paper();
        let model = build_knowledge_model(&paper);
        let plan = generate_implementation_plan(&paper, &model);

        let mut placed: Vec<&str> = plan
            .components()
            .flat_map(|c| c.concept_ids.iter().map(String::as_str))
            .collect();
        placed.sort_unstable();
        let mut expected: Vec<&str> = model.concepts.iter().map(|c| c.id.as_str()).collect();
        expected.sort_unstable();
        assert_eq!(placed, expected);
    }

    #[test]
    fn mutually_reachable_algorithms_merge() {
        let paper = cyclic_io_paper();
        let plan = generate_implementation_plan(&paper, &build_knowledge_model(&paper));

        assert_eq!(stage_ids(&plan), vec![vec!["component-algo-a"]]);
        let component = &plan.stages[0].components[0];
        assert_eq!(component.name, "Encode + Decode");
        assert_eq!(component.concept_ids, vec!["algo-a", "algo-b"]);
    }

    #[test]
    fn shared_terms_form_foundations() {
        let model = KnowledgeModel {
            concepts: vec![
                Concept::new("a", "A", ConceptType::Algorithm),
                Concept::new("b", "B", ConceptType::Algorithm),
                Concept::new("term-heap", "heap", ConceptType::DataStructure),
                Concept::new("term-lonely", "lonely rate", ConceptType::Parameter),
                Concept::new("term-own", "own list", ConceptType::DataStructure),
            ],
            relationships: vec![
                Relationship::new("rel-1", "a", "term-heap", RelationshipType::Uses),
                Relationship::new("rel-2", "b", "term-heap", RelationshipType::Uses),
                Relationship::new("rel-3", "b", "term-own", RelationshipType::Uses),
            ],
            warnings: Vec::new(),
        };
        let plan = generate_implementation_plan(&PaperContent::default(), &model);

        let foundations = plan.component(FOUNDATIONS_ID).unwrap();
        assert_eq!(foundations.concept_ids, vec!["term-heap", "term-lonely"]);
        assert_eq!(plan.stage_of(FOUNDATIONS_ID), Some(0));
        let b = plan.component("component-b").unwrap();
        assert_eq!(b.concept_ids, vec!["b", "term-own"]);
        assert_eq!(b.dependencies, vec![FOUNDATIONS_ID]);
        assert_eq!(plan.stage_of("component-a"), Some(1));
    }

    #[test]
    fn section_only_paper_uses_all_concepts_as_anchors() {
        let paper = sections_only_paper();
        let model = build_knowledge_model(&paper);
        let plan = generate_implementation_plan(&paper, &model);
        assert_eq!(plan.components().count(), model.concepts.len());
        assert_eq!(plan.stages.len(), 1);
    }

    #[test]
    fn empty_model_yields_warning() {
        let plan = generate_implementation_plan(&PaperContent::default(), &KnowledgeModel::default());
        assert!(plan.stages.is_empty());
        assert_eq!(plan.warnings[0].code, "empty-plan");
    }

    #[test]
    fn scenario_two_component_cycle() {
        let plan = layer_components(vec![
            Component::new("a", "A").with_dependencies(["b"]),
            Component::new("b", "B").with_dependencies(["a"]),
        ]);

        assert_eq!(stage_ids(&plan), vec![vec!["b"], vec!["a"]]);
        assert_eq!(plan.warnings.len(), 1);
        assert_eq!(plan.warnings[0].code, "dependency-cycle");
        assert_eq!(plan.warnings[0].subject.as_deref(), Some("b"));
        assert!(plan.component("b").unwrap().dependencies.is_empty());
    }

    #[test]
    fn three_cycle_breaks_at_smallest_target() {
        let plan = layer_components(vec![
            Component::new("x", "X").with_dependencies(["y"]),
            Component::new("y", "Y").with_dependencies(["z"]),
            Component::new("z", "Z").with_dependencies(["x"]),
        ]);
        assert_eq!(stage_ids(&plan), vec![vec!["z"], vec!["y"], vec!["x"]]);
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.component("z").unwrap().dependencies.is_empty());
    }

    #[test]
    fn unknown_and_self_dependencies() {
        let plan = layer_components(vec![
            Component::new("a", "A").with_dependencies(["ghost", "a"]),
            Component::new("a", "Duplicate"),
        ]);
        let codes: Vec<&str> = plan.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["duplicate-component", "unknown-dependency", "dependency-cycle"]);
        assert_eq!(stage_ids(&plan), vec![vec!["a"]]);
        assert_eq!(plan.component("a").unwrap().name, "A");
    }
}
