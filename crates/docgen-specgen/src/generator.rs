//! Specification generator
//!
//! One [`ExecutableSpecification`] per algorithm concept. Each item is
//! generated independently; a bad algorithm yields a diagnostic and never
//! aborts the batch.

use crate::fixtures::{evaluate, fixture};
use crate::language::TargetLanguage;
use crate::pseudocode::{self, Line};
use crate::signature::parse_signature;
use crate::types::{ExecutableSpecification, IoSpec, Step};
use docgen_knowledge::{Concept, ConceptType, KnowledgeModel, RelationshipType};
use docgen_paper::{Algorithm, Diagnostic, Outcome, PaperContent};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Specification generation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationConfig {
    /// Language used for `steps[].code`
    pub target_language: TargetLanguage,
    /// Generate items on the rayon pool
    pub parallel: bool,
    /// Add a second fixture with boundary values
    pub boundary_fixtures: bool,
}

impl SpecificationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With target language
    #[inline]
    #[must_use]
    pub fn with_target_language(mut self, language: TargetLanguage) -> Self {
        self.target_language = language;
        self
    }

    /// With parallel generation
    #[inline]
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// With boundary fixtures
    #[inline]
    #[must_use]
    pub fn with_boundary_fixtures(mut self, enabled: bool) -> Self {
        self.boundary_fixtures = enabled;
        self
    }
}

impl Default for SpecificationConfig {
    fn default() -> Self {
        Self {
            target_language: TargetLanguage::default(),
            parallel: true,
            boundary_fixtures: true,
        }
    }
}

/// Generate specifications with default settings and a language hint
///
/// Diagnostics are logged and dropped; use [`SpecificationGenerator`] to
/// receive them.
#[must_use]
pub fn generate_executable_specifications(
    paper: &PaperContent,
    model: &KnowledgeModel,
    target_language_hint: &str,
) -> Vec<ExecutableSpecification> {
    let config = SpecificationConfig::default()
        .with_target_language(TargetLanguage::from_hint(target_language_hint));
    SpecificationGenerator::new(config).generate(paper, model).value
}

/// Derives executable specifications from algorithm concepts
#[derive(Debug, Clone, Default)]
pub struct SpecificationGenerator {
    config: SpecificationConfig,
}

type ItemResult = Result<(ExecutableSpecification, Vec<Diagnostic>), Diagnostic>;

impl SpecificationGenerator {
    /// Create new generator
    #[inline]
    #[must_use]
    pub fn new(config: SpecificationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SpecificationConfig {
        &self.config
    }

    /// Generate one specification per algorithm concept, ordered by concept id
    #[must_use]
    pub fn generate(
        &self,
        paper: &PaperContent,
        model: &KnowledgeModel,
    ) -> Outcome<Vec<ExecutableSpecification>> {
        let mut concepts: Vec<&Concept> = model.concepts_of_type(ConceptType::Algorithm).collect();
        concepts.sort_by(|a, b| a.id.cmp(&b.id));

        let results: Vec<ItemResult> = if self.config.parallel {
            concepts
                .par_iter()
                .map(|concept| self.generate_one(paper, model, concept))
                .collect()
        } else {
            concepts
                .iter()
                .map(|concept| self.generate_one(paper, model, concept))
                .collect()
        };

        let mut specifications = Vec::with_capacity(results.len());
        let mut diagnostics = Vec::new();
        for result in results {
            match result {
                Ok((spec, item_diagnostics)) => {
                    specifications.push(spec);
                    diagnostics.extend(item_diagnostics);
                }
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }

        for diagnostic in &diagnostics {
            tracing::warn!("{}", diagnostic);
        }
        tracing::info!(
            "Generated {} executable specifications ({} diagnostics)",
            specifications.len(),
            diagnostics.len()
        );
        Outcome::new(specifications, diagnostics)
    }

    fn generate_one(
        &self,
        paper: &PaperContent,
        model: &KnowledgeModel,
        concept: &Concept,
    ) -> ItemResult {
        let algorithm = find_algorithm(paper, concept).ok_or_else(|| {
            Diagnostic::error(
                "missing-algorithm",
                format!("algorithm concept '{}' has no matching algorithm in the paper", concept.id),
            )
            .with_subject(&concept.id)
        })?;

        let id = format!("spec-{}", algorithm.id);
        let inputs = io_specs(&algorithm.inputs, "input", algorithm);
        let outputs = io_specs(&algorithm.outputs, "output", algorithm);
        let mut notes = Vec::new();
        let mut diagnostics = Vec::new();

        let lines = match pseudocode::parse(&algorithm.pseudocode) {
            Ok(lines) => lines,
            Err(err) => {
                notes.push(format!("Pseudocode could not be transcribed: {err}"));
                diagnostics.push(
                    Diagnostic::warning("unparsable-pseudocode", err.to_string()).with_subject(&id),
                );
                Vec::new()
            }
        };
        tracing::debug!("{}: {} steps from {}", id, lines.len(), algorithm.id);

        let evaluation = evaluate(&lines, &inputs);
        let mut fixtures = vec![fixture(
            "fixture-representative",
            "Representative example value for every input",
            &inputs,
            |io| io.example.clone(),
            evaluation.as_ref(),
        )];
        if self.config.boundary_fixtures && !inputs.is_empty() {
            fixtures.push(fixture(
                "fixture-boundary",
                "Boundary value (empty, zero, false) for every input",
                &inputs,
                |io| io.value_type.boundary(),
                evaluation.as_ref(),
            ));
        }
        if evaluation.is_none() {
            notes.push("Expected outputs must be supplied by the caller".to_string());
        }

        let spec = ExecutableSpecification {
            title: algorithm.name.clone(),
            description: if algorithm.description.is_empty() {
                format!("Executable specification of '{}'", algorithm.name)
            } else {
                algorithm.description.clone()
            },
            inputs,
            outputs,
            steps: self.steps(&lines),
            source_concept_ids: source_concepts(model, concept),
            verification_fixtures: fixtures,
            notes,
            id,
        };
        Ok((spec, diagnostics))
    }

    fn steps(&self, lines: &[Line]) -> Vec<Step> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| Step {
                id: format!("step-{}", i + 1),
                description: line.text.clone(),
                code: self.config.target_language.render(line),
                depth: line.depth,
            })
            .collect()
    }
}

fn find_algorithm<'a>(paper: &'a PaperContent, concept: &Concept) -> Option<&'a Algorithm> {
    paper.find_algorithm(&concept.id).or_else(|| {
        concept
            .source_elements
            .iter()
            .find_map(|id| paper.find_algorithm(id))
    })
}

fn io_specs(entries: &[String], role: &str, algorithm: &Algorithm) -> Vec<IoSpec> {
    entries
        .iter()
        .map(|entry| {
            let (name, value_type) = parse_signature(entry);
            IoSpec {
                description: format!("{role} '{name}' of {}", algorithm.name),
                example: value_type.example(),
                name,
                value_type,
            }
        })
        .collect()
}

/// The concept itself plus the method concepts it implements
fn source_concepts(model: &KnowledgeModel, concept: &Concept) -> Vec<String> {
    let mut ids = vec![concept.id.clone()];
    for rel in model.relationships_from(&concept.id) {
        let is_method = model
            .concept(&rel.target_id)
            .is_some_and(|c| c.concept_type == ConceptType::Method);
        if rel.relationship_type == RelationshipType::Implements
            && is_method
            && !ids.contains(&rel.target_id)
        {
            ids.push(rel.target_id.clone());
        }
    }
    ids
}
