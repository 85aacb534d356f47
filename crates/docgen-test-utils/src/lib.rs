//! Testing utilities for DocGen workspace
//!
//! Shared sample papers used by unit and integration tests across crates.

#![allow(missing_docs)]

use docgen_paper::{Algorithm, Equation, PaperContent, PaperInfo, Section};

/// Paper with a single algorithm and no sections
pub fn single_algorithm_paper() -> PaperContent {
    let mut paper = PaperContent::new("Single Algorithm");
    paper.algorithms = vec![Algorithm::new("algo-1", "Transform")
        .with_inputs(["input1"])
        .with_outputs(["output1"])];
    paper
}

/// Route planning paper: three chained algorithms and recurring terminology
///
/// `algo-2` consumes the graph produced by `algo-1`, and `algo-3` consumes
/// the path produced by `algo-2`.
pub fn route_planning_paper() -> PaperContent {
    PaperContent {
        paper_info: PaperInfo {
            title: "Fast Route Planning on Road Networks".to_string(),
            authors: vec!["A. Author".to_string(), "B. Author".to_string()],
            abstract_text: "We present a three stage route planner.".to_string(),
            year: Some(2024),
        },
        sections: vec![
            Section::new("s1", 1, "Introduction")
                .with_content(
                    "We study route planning on road networks. A priority queue and an \
                     adjacency list are central to our approach. The distance threshold \
                     controls pruning.",
                )
                .with_subsection(Section::new("s1.1", 2, "Background").with_content(
                    "Classic shortest path search relies on a priority queue. Dijkstra \
                     introduced the method.",
                )),
            Section::new("s2", 1, "Method").with_content(
                "Graph Construction converts raw edges into an adjacency list. Path Search \
                 explores the adjacency list with a priority queue. Route Scoring applies the \
                 distance threshold to each candidate path.",
            ),
        ],
        algorithms: vec![
            Algorithm::new("algo-1", "Graph Construction")
                .with_description("Builds an adjacency list from raw edges.")
                .with_pseudocode(
                    "1: graph ← empty map\n\
                     2: for each edge in edges do\n\
                     3:     append edge.target to graph[edge.source]\n\
                     4: end for\n\
                     5: return graph",
                )
                .with_inputs(["edges: list"])
                .with_outputs(["graph: map"])
                .in_section("s2"),
            Algorithm::new("algo-2", "Path Search")
                .with_description(
                    "Finds a shortest path using a priority queue over the graph produced \
                     by Graph Construction.",
                )
                .with_pseudocode(
                    "queue ← priority queue containing source\n\
                     while queue is not empty do\n\
                     \x20   node ← pop queue\n\
                     \x20   if node = target then\n\
                     \x20       return reconstruct path\n\
                     \x20   end if\n\
                     \x20   for each neighbor in graph[node] do\n\
                     \x20       push neighbor onto queue\n\
                     \x20   end for\n\
                     end while\n\
                     return path",
                )
                .with_inputs(["graph: map", "source: string", "target: string"])
                .with_outputs(["path: list"])
                .in_section("s2"),
            Algorithm::new("algo-3", "Route Scoring")
                .with_description("Scores a candidate path against the distance threshold.")
                .with_pseudocode(
                    "score ← 0\n\
                     for each hop in path do\n\
                     \x20   score ← score + hop.length\n\
                     end for\n\
                     if score > threshold then\n\
                     \x20   return 0\n\
                     end if\n\
                     return score",
                )
                .with_inputs(["path: list", "threshold: float"])
                .with_outputs(["score: float"])
                .in_section("s2"),
        ],
        equations: vec![Equation {
            id: "eq-1".to_string(),
            content: "c(p) = \\sum_{e \\in p} w(e)".to_string(),
            description: "Path cost sums edge weight along the path.".to_string(),
            section_id: "s2".to_string(),
        }],
        ..PaperContent::default()
    }
}

/// Paper whose two algorithms consume each other's outputs
pub fn cyclic_io_paper() -> PaperContent {
    let mut paper = PaperContent::new("Mutual Recursion");
    paper.sections = vec![Section::new("s1", 1, "Method")];
    paper.algorithms = vec![
        Algorithm::new("algo-a", "Encode")
            .with_inputs(["x"])
            .with_outputs(["y"])
            .in_section("s1"),
        Algorithm::new("algo-b", "Decode")
            .with_inputs(["y"])
            .with_outputs(["x"])
            .in_section("s1"),
    ];
    paper
}

/// Paper with nested sections but no algorithms
pub fn sections_only_paper() -> PaperContent {
    let mut paper = PaperContent::new("Survey");
    paper.sections = vec![
        Section::new("intro", 1, "Introduction")
            .with_content("This survey covers planning. It is organised by topic.")
            .with_subsection(
                Section::new("intro.scope", 2, "Scope")
                    .with_content("Only road networks are considered.")
                    .with_subsection(Section::new("intro.scope.notes", 3, "Notes")),
            ),
        Section::new("related", 1, "Related Work").with_content("Prior surveys exist."),
    ];
    paper
}

/// Algorithm whose pseudocode closes a block it never opened
pub fn malformed_algorithm() -> Algorithm {
    Algorithm::new("algo-bad", "Broken")
        .with_pseudocode("x ← 1\nend for\nreturn x")
        .with_inputs(["n: int"])
        .with_outputs(["x: int"])
        .in_section("s1")
}

/// Algorithm whose single return is a literal
pub fn constant_algorithm() -> Algorithm {
    Algorithm::new("algo-const", "Constant Answer")
        .with_pseudocode("Algorithm 9 Constant Answer\nInput: question\n1: ignore question\n2: return 42")
        .with_inputs(["question: string"])
        .with_outputs(["answer: int"])
        .in_section("s1")
}
