//! Knowledge model types
//!
//! Concepts are graph nodes, relationships are typed directed edges. The
//! model is plain data; [`KnowledgeModel::validate`] re-checks every
//! invariant against the paper it was built from.

use docgen_paper::{Diagnostic, PaperContent};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Concept classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConceptType {
    /// Algorithm block from the paper
    Algorithm,
    /// Named method or technique
    Method,
    /// Data structure
    DataStructure,
    /// Tunable parameter
    Parameter,
    /// Generic idea (section-level)
    Concept,
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConceptType::Algorithm => "algorithm",
            ConceptType::Method => "method",
            ConceptType::DataStructure => "dataStructure",
            ConceptType::Parameter => "parameter",
            ConceptType::Concept => "concept",
        };
        f.write_str(s)
    }
}

/// Relationship classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    /// Source refers to target
    Uses,
    /// Source is an implementation of target
    Implements,
    /// Source builds on target
    Extends,
    /// Source needs target's output; must stay acyclic
    DependsOn,
    /// Source is a narrower form of target
    Refines,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationshipType::Uses => "uses",
            RelationshipType::Implements => "implements",
            RelationshipType::Extends => "extends",
            RelationshipType::DependsOn => "dependsOn",
            RelationshipType::Refines => "refines",
        };
        f.write_str(s)
    }
}

/// Graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Unique concept ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Classification
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
    /// Paper element ids that motivated the concept
    pub source_elements: Vec<String>,
}

impl Concept {
    /// Create new concept
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, concept_type: ConceptType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            concept_type,
            source_elements: Vec::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With source element
    #[inline]
    #[must_use]
    pub fn with_source(mut self, element_id: impl Into<String>) -> Self {
        self.source_elements.push(element_id.into());
        self
    }
}

/// Graph edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Relationship ID
    pub id: String,
    /// Source concept
    pub source_id: String,
    /// Target concept
    pub target_id: String,
    /// Classification
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// Description
    pub description: String,
}

impl Relationship {
    /// Create new relationship
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type,
            description: String::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Concept graph built from a paper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeModel {
    /// Graph nodes
    pub concepts: Vec<Concept>,
    /// Graph edges
    pub relationships: Vec<Relationship>,
    /// Degenerate-input warnings raised while building
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
}

impl KnowledgeModel {
    /// Find concept by ID
    #[inline]
    #[must_use]
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.id == id)
    }

    /// Concepts of one type, in model order
    pub fn concepts_of_type(&self, concept_type: ConceptType) -> impl Iterator<Item = &Concept> {
        self.concepts
            .iter()
            .filter(move |c| c.concept_type == concept_type)
    }

    /// Outgoing edges of a concept
    pub fn relationships_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| r.source_id == id)
    }

    /// Edges of one type
    pub fn relationships_of_type(
        &self,
        relationship_type: RelationshipType,
    ) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(move |r| r.relationship_type == relationship_type)
    }

    /// Check the model's invariants against its originating paper
    ///
    /// Returns one error diagnostic per violation: unresolved source
    /// elements, duplicate concept ids, dangling or self-looping edges,
    /// and cycles among `dependsOn` edges.
    #[must_use]
    pub fn validate(&self, paper: &PaperContent) -> Vec<Diagnostic> {
        let index = paper.element_index();
        let mut diagnostics = Vec::new();
        let mut ids = HashSet::new();

        for concept in &self.concepts {
            if !ids.insert(concept.id.as_str()) {
                diagnostics.push(
                    Diagnostic::error("duplicate-concept", "concept id is not unique")
                        .with_subject(&concept.id),
                );
            }
            for element in &concept.source_elements {
                if !index.contains(element) {
                    diagnostics.push(
                        Diagnostic::error(
                            "unresolved-source-element",
                            format!("source element '{element}' is not in the paper"),
                        )
                        .with_subject(&concept.id),
                    );
                }
            }
        }

        let mut depends_on: DiGraphMap<&str, ()> = DiGraphMap::new();
        for rel in &self.relationships {
            if rel.source_id == rel.target_id {
                diagnostics.push(
                    Diagnostic::error("self-loop", "relationship points at its own source")
                        .with_subject(&rel.id),
                );
            }
            for end in [&rel.source_id, &rel.target_id] {
                if !ids.contains(end.as_str()) {
                    diagnostics.push(
                        Diagnostic::error(
                            "dangling-relationship",
                            format!("endpoint '{end}' is not a concept"),
                        )
                        .with_subject(&rel.id),
                    );
                }
            }
            if rel.relationship_type == RelationshipType::DependsOn {
                depends_on.add_edge(rel.source_id.as_str(), rel.target_id.as_str(), ());
            }
        }

        if is_cyclic_directed(&depends_on) {
            diagnostics.push(Diagnostic::error(
                "depends-on-cycle",
                "dependsOn relationships form a cycle",
            ));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgen_paper::Algorithm;

    fn paper() -> PaperContent {
        let mut paper = PaperContent::new("p");
        paper.algorithms = vec![Algorithm::new("a", "A"), Algorithm::new("b", "B")];
        paper
    }

    fn model() -> KnowledgeModel {
        KnowledgeModel {
            concepts: vec![
                Concept::new("a", "A", ConceptType::Algorithm).with_source("a"),
                Concept::new("b", "B", ConceptType::Algorithm).with_source("b"),
            ],
            relationships: vec![Relationship::new("rel-1", "a", "b", RelationshipType::DependsOn)],
            warnings: Vec::new(),
        }
    }

    #[test]
    fn valid_model_has_no_diagnostics() {
        assert!(model().validate(&paper()).is_empty());
    }

    #[test]
    fn validate_flags_each_violation() {
        let mut model = model();
        model.concepts[1].source_elements.push("ghost".to_string());
        model
            .relationships
            .push(Relationship::new("rel-2", "b", "a", RelationshipType::DependsOn));
        model
            .relationships
            .push(Relationship::new("rel-3", "a", "a", RelationshipType::Uses));
        model
            .relationships
            .push(Relationship::new("rel-4", "a", "zzz", RelationshipType::Uses));

        let codes: Vec<String> = model.validate(&paper()).into_iter().map(|d| d.code).collect();
        assert!(codes.contains(&"unresolved-source-element".to_string()));
        assert!(codes.contains(&"depends-on-cycle".to_string()));
        assert!(codes.contains(&"self-loop".to_string()));
        assert!(codes.contains(&"dangling-relationship".to_string()));
    }

    #[test]
    fn accessors() {
        let model = model();
        assert_eq!(model.concept("b").map(|c| c.name.as_str()), Some("B"));
        assert_eq!(model.concepts_of_type(ConceptType::Algorithm).count(), 2);
        assert_eq!(model.relationships_from("a").count(), 1);
        assert_eq!(model.relationships_of_type(RelationshipType::Uses).count(), 0);
    }

    #[test]
    fn serde_uses_type_key() {
        let json = serde_json::to_string(&model().concepts[0]).unwrap();
        assert!(json.contains("\"type\":\"algorithm\""));
        assert!(json.contains("\"sourceElements\""));
    }
}
