//! Knowledge model builder
//!
//! Pure transform from [`PaperContent`] to [`KnowledgeModel`]:
//!
//! 1. one `algorithm` concept per algorithm (concept id = algorithm id)
//! 2. recurring technical phrases near algorithms/equations become
//!    `method`, `dataStructure` or `parameter` concepts
//! 3. structural and lexical relationship inference
//!
//! A paper without algorithms degrades to section-level concepts.

use crate::model::{Concept, ConceptType, KnowledgeModel, Relationship, RelationshipType};
use crate::terms::{classify, contains_phrase, slug, tokenize, TermCounts};
use docgen_paper::{Algorithm, Diagnostic, PaperContent};
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Terminology extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Minimum occurrences before a phrase becomes a concept
    pub min_term_frequency: usize,
    /// Upper bound on synthesized term concepts
    pub max_term_concepts: usize,
}

impl KnowledgeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With minimum term frequency
    #[inline]
    #[must_use]
    pub fn with_min_term_frequency(mut self, min: usize) -> Self {
        self.min_term_frequency = min.max(1);
        self
    }

    /// With maximum number of term concepts
    #[inline]
    #[must_use]
    pub fn with_max_term_concepts(mut self, max: usize) -> Self {
        self.max_term_concepts = max;
        self
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            min_term_frequency: 2,
            max_term_concepts: 32,
        }
    }
}

/// Builds concept graphs from paper content
#[derive(Debug, Clone, Default)]
pub struct KnowledgeModelBuilder {
    config: KnowledgeConfig,
}

/// Build a knowledge model with default settings
#[must_use]
pub fn build_knowledge_model(paper: &PaperContent) -> KnowledgeModel {
    KnowledgeModelBuilder::default().build(paper)
}

/// Tokenized view of one algorithm
struct AlgorithmText<'a> {
    algorithm: &'a Algorithm,
    name: Vec<String>,
    body: Vec<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl<'a> AlgorithmText<'a> {
    fn new(algorithm: &'a Algorithm) -> Self {
        let lower = |s: &str| s.to_lowercase();
        Self {
            algorithm,
            name: tokenize(&algorithm.name),
            body: tokenize(&format!("{}\n{}", algorithm.description, algorithm.pseudocode)),
            inputs: algorithm.input_names().map(lower).collect(),
            outputs: algorithm.output_names().map(lower).collect(),
        }
    }

    fn id(&self) -> &str {
        &self.algorithm.id
    }

    fn mentions(&self, phrase: &[String]) -> bool {
        contains_phrase(&self.name, phrase) || contains_phrase(&self.body, phrase)
    }
}

/// Element that can anchor a term (algorithm or equation)
struct Anchor {
    id: String,
    own: Vec<String>,
    section: Vec<String>,
}

/// Term selected for promotion to a concept
#[derive(Debug, Clone)]
struct Term {
    id: String,
    phrase: Vec<String>,
    concept_type: ConceptType,
}

impl KnowledgeModelBuilder {
    /// Create new builder
    #[inline]
    #[must_use]
    pub fn new(config: KnowledgeConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    /// Build the concept graph for a paper
    #[must_use]
    pub fn build(&self, paper: &PaperContent) -> KnowledgeModel {
        if paper.algorithms.is_empty() {
            return Self::build_section_model(paper);
        }

        let mut acc = ModelAccumulator::default();

        let mut texts = Vec::new();
        for algorithm in &paper.algorithms {
            let concept = Concept::new(&algorithm.id, &algorithm.name, ConceptType::Algorithm)
                .with_description(describe_algorithm(algorithm))
                .with_source(&algorithm.id);
            if acc.add_concept(concept) {
                texts.push(AlgorithmText::new(algorithm));
            }
        }
        texts.sort_by(|a, b| a.id().cmp(b.id()));

        let terms = self.extract_terms(paper, &texts, &mut acc);
        Self::link_algorithms(&texts, &mut acc);
        Self::link_terms(&texts, &terms, &mut acc);

        let model = acc.finish();
        tracing::info!(
            "Built knowledge model: {} concepts, {} relationships",
            model.concepts.len(),
            model.relationships.len()
        );
        model
    }

    /// Coarse model for papers without algorithms
    fn build_section_model(paper: &PaperContent) -> KnowledgeModel {
        let mut acc = ModelAccumulator::default();
        acc.warnings.push(Diagnostic::warning(
            "no-algorithms",
            "paper has no algorithms; model is limited to section-level concepts",
        ));

        for section in &paper.sections {
            acc.add_concept(section_concept(section));
            for sub in &section.subsections {
                if acc.add_concept(section_concept(sub)) {
                    acc.relate(
                        &sub.id,
                        &section.id,
                        RelationshipType::Refines,
                        format!("'{}' is a subsection of '{}'", sub.title, section.title),
                    );
                }
            }
        }

        if acc.concepts.is_empty() {
            acc.warnings.push(Diagnostic::warning(
                "empty-model",
                "paper has neither algorithms nor sections",
            ));
        }

        let model = acc.finish();
        tracing::warn!(
            "Built degraded knowledge model: {} section concepts",
            model.concepts.len()
        );
        model
    }

    /// Promote recurring phrases near algorithms/equations to concepts
    fn extract_terms(
        &self,
        paper: &PaperContent,
        texts: &[AlgorithmText<'_>],
        acc: &mut ModelAccumulator,
    ) -> Vec<Term> {
        let sections: Vec<(&str, Vec<String>)> = paper
            .sections_depth_first()
            .map(|(s, _)| (s.id.as_str(), tokenize(&s.content)))
            .collect();

        let corpus = paper
            .sections_depth_first()
            .map(|(s, _)| s.content.as_str())
            .chain(paper.algorithms.iter().map(|a| a.description.as_str()))
            .chain(paper.equations.iter().map(|e| e.description.as_str()));
        let counts = TermCounts::from_texts(corpus);

        let mut anchors: Vec<Anchor> = texts
            .iter()
            .map(|t| Anchor {
                id: t.id().to_string(),
                own: t.name.iter().chain(&t.body).cloned().collect(),
                section: tokenize(paper.section_text(&t.algorithm.section_id)),
            })
            .collect();
        anchors.extend(paper.equations.iter().map(|e| Anchor {
            id: e.id.clone(),
            own: tokenize(&format!("{}\n{}", e.description, e.content)),
            section: tokenize(paper.section_text(&e.section_id)),
        }));

        let algorithm_names: HashSet<&[String]> = texts.iter().map(|t| t.name.as_slice()).collect();

        let mut terms = Vec::new();
        for (phrase, frequency) in counts.frequent(self.config.min_term_frequency) {
            if terms.len() >= self.config.max_term_concepts {
                tracing::debug!("Term limit {} reached", self.config.max_term_concepts);
                break;
            }
            if algorithm_names.contains(phrase.as_slice()) {
                continue;
            }
            let Some(concept_type) = classify(&phrase) else {
                continue;
            };

            let own: Vec<&str> = anchors
                .iter()
                .filter(|a| contains_phrase(&a.own, &phrase))
                .map(|a| a.id.as_str())
                .collect();
            let near = anchors.iter().any(|a| contains_phrase(&a.section, &phrase));
            if own.is_empty() && !near {
                tracing::debug!("Skipping '{}': not near any algorithm or equation", phrase.join(" "));
                continue;
            }

            let name = phrase.join(" ");
            let mut concept = Concept::new(format!("term-{}", slug(&phrase)), &name, concept_type)
                .with_description(format!(
                    "{} '{}' mentioned {} times in the paper",
                    type_label(concept_type),
                    name,
                    frequency
                ));
            concept.source_elements = own.iter().map(ToString::to_string).collect();
            concept.source_elements.extend(
                sections
                    .iter()
                    .filter(|(_, tokens)| contains_phrase(tokens, &phrase))
                    .map(|(id, _)| (*id).to_string()),
            );

            let id = concept.id.clone();
            if acc.add_concept(concept) {
                terms.push(Term {
                    id,
                    phrase,
                    concept_type,
                });
            }
        }
        terms
    }

    /// Algorithm ↔ algorithm edges
    fn link_algorithms(texts: &[AlgorithmText<'_>], acc: &mut ModelAccumulator) {
        for a in texts {
            for b in texts {
                if a.id() == b.id() {
                    continue;
                }

                if a.name.len() > b.name.len() && contains_phrase(&a.name, &b.name) {
                    acc.relate(
                        a.id(),
                        b.id(),
                        RelationshipType::Extends,
                        format!("'{}' builds on '{}'", a.algorithm.name, b.algorithm.name),
                    );
                } else if contains_phrase(&a.body, &b.name) {
                    acc.relate(
                        a.id(),
                        b.id(),
                        RelationshipType::Uses,
                        format!("'{}' refers to '{}'", a.algorithm.name, b.algorithm.name),
                    );
                }

                let shared: Vec<&str> = b
                    .outputs
                    .iter()
                    .filter(|o| a.inputs.contains(o))
                    .map(String::as_str)
                    .collect();
                if !shared.is_empty() {
                    let description = format!(
                        "'{}' consumes {} produced by '{}'",
                        a.algorithm.name,
                        shared.join(", "),
                        b.algorithm.name
                    );
                    if !acc.relate_depends_on(a.id(), b.id(), description.clone()) {
                        acc.relate(a.id(), b.id(), RelationshipType::Uses, description);
                    }
                }

                for output in &b.outputs {
                    if a.inputs.contains(output) || a.outputs.contains(output) {
                        continue;
                    }
                    if contains_phrase(&a.body, &tokenize(output)) {
                        acc.relate(
                            a.id(),
                            b.id(),
                            RelationshipType::Uses,
                            format!("'{}' reads '{}' from '{}'", a.algorithm.name, output, b.algorithm.name),
                        );
                    }
                }
            }
        }
    }

    /// Algorithm → term and term → term edges
    fn link_terms(texts: &[AlgorithmText<'_>], terms: &[Term], acc: &mut ModelAccumulator) {
        for text in texts {
            for term in terms {
                if term.concept_type == ConceptType::Method && contains_phrase(&text.name, &term.phrase) {
                    acc.relate(
                        text.id(),
                        &term.id,
                        RelationshipType::Implements,
                        format!("'{}' implements {}", text.algorithm.name, term.phrase.join(" ")),
                    );
                } else if text.mentions(&term.phrase) {
                    acc.relate(
                        text.id(),
                        &term.id,
                        RelationshipType::Uses,
                        format!("'{}' uses {}", text.algorithm.name, term.phrase.join(" ")),
                    );
                }
            }
        }

        for narrow in terms {
            for broad in terms {
                if narrow.phrase.len() > broad.phrase.len() && contains_phrase(&narrow.phrase, &broad.phrase) {
                    acc.relate(
                        &narrow.id,
                        &broad.id,
                        RelationshipType::Refines,
                        format!("{} is a kind of {}", narrow.phrase.join(" "), broad.phrase.join(" ")),
                    );
                }
            }
        }
    }
}

/// Collects concepts and edges while enforcing graph invariants
#[derive(Default)]
struct ModelAccumulator {
    concepts: Vec<Concept>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
    edges: HashSet<(String, String, RelationshipType)>,
    depends_on: DiGraphMap<usize, ()>,
    warnings: Vec<Diagnostic>,
}

impl ModelAccumulator {
    /// Add concept unless the id is taken
    fn add_concept(&mut self, concept: Concept) -> bool {
        if self.index.contains_key(&concept.id) {
            self.warnings.push(
                Diagnostic::warning("duplicate-concept", "a concept with this id already exists; skipped")
                    .with_subject(&concept.id),
            );
            return false;
        }
        self.index.insert(concept.id.clone(), self.concepts.len());
        self.concepts.push(concept);
        true
    }

    /// Add edge if both endpoints exist, it is not a self-loop and not a duplicate
    fn relate(
        &mut self,
        source: &str,
        target: &str,
        relationship_type: RelationshipType,
        description: String,
    ) -> bool {
        if source == target || !self.index.contains_key(source) || !self.index.contains_key(target) {
            return false;
        }
        let key = (source.to_string(), target.to_string(), relationship_type);
        if !self.edges.insert(key) {
            return false;
        }
        let id = format!("rel-{}", self.relationships.len() + 1);
        self.relationships.push(
            Relationship::new(id, source, target, relationship_type).with_description(description),
        );
        true
    }

    /// Add a `dependsOn` edge unless it would close a cycle
    fn relate_depends_on(&mut self, source: &str, target: &str, description: String) -> bool {
        let (Some(&from), Some(&to)) = (self.index.get(source), self.index.get(target)) else {
            return false;
        };
        self.depends_on.add_node(from);
        self.depends_on.add_node(to);
        if has_path_connecting(&self.depends_on, to, from, None) {
            tracing::warn!("dependsOn {} -> {} would close a cycle; recorded as uses", source, target);
            self.warnings.push(
                Diagnostic::warning(
                    "depends-on-cycle",
                    format!("'{source}' dependsOn '{target}' would close a cycle; recorded as 'uses'"),
                )
                .with_subject(source),
            );
            return false;
        }
        if self.relate(source, target, RelationshipType::DependsOn, description) {
            self.depends_on.add_edge(from, to, ());
        }
        true
    }

    fn finish(self) -> KnowledgeModel {
        KnowledgeModel {
            concepts: self.concepts,
            relationships: self.relationships,
            warnings: self.warnings,
        }
    }
}

fn describe_algorithm(algorithm: &Algorithm) -> String {
    if algorithm.description.trim().is_empty() {
        format!("Algorithm '{}' from the paper", algorithm.name)
    } else {
        algorithm.description.trim().to_string()
    }
}

fn section_concept(section: &docgen_paper::Section) -> Concept {
    Concept::new(&section.id, &section.title, ConceptType::Concept)
        .with_description(first_sentence(&section.content, &section.title))
        .with_source(&section.id)
}

/// First sentence of a text, capped at 160 characters
fn first_sentence(content: &str, fallback: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return format!("Section '{fallback}'");
    }
    let end = trimmed.find(". ").map_or(trimmed.len(), |i| i + 1);
    trimmed[..end].chars().take(160).collect()
}

fn type_label(concept_type: ConceptType) -> &'static str {
    match concept_type {
        ConceptType::Algorithm => "Algorithm",
        ConceptType::Method => "Method",
        ConceptType::DataStructure => "Data structure",
        ConceptType::Parameter => "Parameter",
        ConceptType::Concept => "Concept",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_paper::Section;
    use docgen_test_utils::{cyclic_io_paper, route_planning_paper, sections_only_paper, single_algorithm_paper};
    use pretty_assertions::assert_eq;

    fn edge(model: &KnowledgeModel, source: &str, target: &str) -> Vec<RelationshipType> {
        model
            .relationships
            .iter()
            .filter(|r| r.source_id == source && r.target_id == target)
            .map(|r| r.relationship_type)
            .collect()
    }

    #[test]
    fn single_algorithm_yields_single_concept() {
        let model = build_knowledge_model(&single_algorithm_paper());
        assert_eq!(model.concepts.len(), 1);
        let concept = &model.concepts[0];
        assert_eq!(concept.concept_type, ConceptType::Algorithm);
        assert_eq!(concept.source_elements, vec!["algo-1".to_string()]);
        assert!(model.relationships.is_empty());
    }

    #[test]
    fn route_planning_terms() {
        let model = build_knowledge_model(&route_planning_paper());
        let names: Vec<&str> = model
            .concepts
            .iter()
            .filter(|c| c.concept_type != ConceptType::Algorithm)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["adjacency list", "priority queue", "distance threshold"]);

        let queue = model.concept("term-priority-queue").unwrap();
        assert_eq!(queue.concept_type, ConceptType::DataStructure);
        assert_eq!(queue.source_elements[0], "algo-2");
        assert!(queue.source_elements.contains(&"s1.1".to_string()));

        let threshold = model.concept("term-distance-threshold").unwrap();
        assert_eq!(threshold.concept_type, ConceptType::Parameter);
    }

    #[test]
    fn algorithm_name_is_not_a_term() {
        let model = build_knowledge_model(&route_planning_paper());
        assert!(model.concept("term-path-search").is_none());
    }

    #[test]
    fn route_planning_relationships() {
        let model = build_knowledge_model(&route_planning_paper());
        assert_eq!(
            edge(&model, "algo-2", "algo-1"),
            vec![RelationshipType::Uses, RelationshipType::DependsOn]
        );
        assert_eq!(edge(&model, "algo-3", "algo-2"), vec![RelationshipType::DependsOn]);
        assert_eq!(edge(&model, "algo-2", "term-priority-queue"), vec![RelationshipType::Uses]);
        assert_eq!(edge(&model, "algo-1", "term-adjacency-list"), vec![RelationshipType::Uses]);
        assert!(model.validate(&route_planning_paper()).is_empty());
    }

    #[test]
    fn relationship_ids_are_sequential() {
        let model = build_knowledge_model(&route_planning_paper());
        for (i, rel) in model.relationships.iter().enumerate() {
            assert_eq!(rel.id, format!("rel-{}", i + 1));
        }
    }

    #[test]
    fn cyclic_io_is_downgraded_to_uses() {
        let model = build_knowledge_model(&cyclic_io_paper());
        assert_eq!(edge(&model, "algo-a", "algo-b"), vec![RelationshipType::DependsOn]);
        assert_eq!(edge(&model, "algo-b", "algo-a"), vec![RelationshipType::Uses]);
        assert!(model.warnings.iter().any(|w| w.code == "depends-on-cycle"));
        assert!(model.validate(&cyclic_io_paper()).is_empty());
    }

    #[test]
    fn extends_when_name_contains_other_name() {
        let mut paper = PaperContent::new("Extends");
        paper.algorithms = vec![
            docgen_paper::Algorithm::new("a1", "Beam Search"),
            docgen_paper::Algorithm::new("a2", "Adaptive Beam Search"),
        ];
        let model = build_knowledge_model(&paper);
        assert_eq!(edge(&model, "a2", "a1"), vec![RelationshipType::Extends]);
        assert!(edge(&model, "a1", "a2").is_empty());
    }

    #[test]
    fn implements_method_term_in_name() {
        let mut paper = PaperContent::new("Descent");
        paper.sections = vec![Section::new("s1", 1, "Method")
            .with_content("Stochastic gradient descent is used. We tune gradient descent carefully.")];
        paper.algorithms = vec![docgen_paper::Algorithm::new("a1", "Momentum Gradient Descent Optimizer")
            .in_section("s1")];
        let model = build_knowledge_model(&paper);
        assert!(model.concept("term-gradient-descent").is_some());
        assert_eq!(
            edge(&model, "a1", "term-gradient-descent"),
            vec![RelationshipType::Implements]
        );
    }

    #[test]
    fn longer_phrase_refines_shorter() {
        let mut paper = PaperContent::new("Trees");
        paper.sections = vec![Section::new("s1", 1, "Structures").with_content(
            "A binary search tree is a search tree. Every binary search tree is balanced here.",
        )];
        paper.algorithms = vec![docgen_paper::Algorithm::new("a1", "Insert").in_section("s1")];
        let model = build_knowledge_model(&paper);
        assert_eq!(
            edge(&model, "term-binary-search-tree", "term-search-tree"),
            vec![RelationshipType::Refines]
        );
    }

    #[test]
    fn min_frequency_is_configurable() {
        let strict = KnowledgeModelBuilder::new(KnowledgeConfig::new().with_min_term_frequency(10))
            .build(&route_planning_paper());
        assert_eq!(strict.concepts_of_type(ConceptType::Algorithm).count(), strict.concepts.len());

        let capped = KnowledgeModelBuilder::new(KnowledgeConfig::new().with_max_term_concepts(1))
            .build(&route_planning_paper());
        assert_eq!(capped.concepts.len(), 4);
    }

    #[test]
    fn sections_only_paper_degrades() {
        let model = build_knowledge_model(&sections_only_paper());
        let ids: Vec<&str> = model.concepts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "intro.scope", "related"]);
        assert!(model.concepts.iter().all(|c| c.concept_type == ConceptType::Concept));
        assert_eq!(edge(&model, "intro.scope", "intro"), vec![RelationshipType::Refines]);
        assert!(model.warnings.iter().any(|w| w.code == "no-algorithms"));
        assert_eq!(
            model.concept("intro").map(|c| c.description.as_str()),
            Some("This survey covers planning.")
        );
    }

    #[test]
    fn empty_paper_is_valid_but_warned() {
        let model = build_knowledge_model(&PaperContent::new("Empty"));
        assert!(model.concepts.is_empty());
        assert!(model.warnings.iter().any(|w| w.code == "empty-model"));
    }

    #[test]
    fn duplicate_algorithm_ids_are_skipped() {
        let mut paper = single_algorithm_paper();
        paper.algorithms.push(docgen_paper::Algorithm::new("algo-1", "Again"));
        let model = build_knowledge_model(&paper);
        assert_eq!(model.concepts.len(), 1);
        assert!(model.warnings.iter().any(|w| w.code == "duplicate-concept"));
    }
}
