//! Traceability matrix types
//!
//! Paper elements are a flattened, stable view over knowledge concepts.
//! Code elements and relationships are supplied by callers through
//! [`crate::update_traceability_matrix`].

use docgen_knowledge::{ConceptType, KnowledgeModel};
use docgen_paper::{Diagnostic, PaperContent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Paper-side element (projection of a concept)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: ConceptType,
    pub name: String,
    pub description: String,
}

/// Kind of implementation artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeElementType {
    Class,
    Function,
    Method,
    Module,
    File,
    Test,
    Other,
}

impl fmt::Display for CodeElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodeElementType::Class => "class",
            CodeElementType::Function => "function",
            CodeElementType::Method => "method",
            CodeElementType::Module => "module",
            CodeElementType::File => "file",
            CodeElementType::Test => "test",
            CodeElementType::Other => "other",
        };
        f.write_str(s)
    }
}

/// Code-side element supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: CodeElementType,
    pub name: String,
    pub file_path: String,
}

impl CodeElement {
    /// Create new code element
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        element_type: CodeElementType,
        name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            element_type,
            name: name.into(),
            file_path: file_path.into(),
        }
    }
}

/// How a code element relates to a paper element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraceType {
    Implements,
    Tests,
    References,
}

impl fmt::Display for TraceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TraceType::Implements => "implements",
            TraceType::Tests => "tests",
            TraceType::References => "references",
        };
        f.write_str(s)
    }
}

/// Paper ↔ code edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRelationship {
    pub paper_element_id: String,
    pub code_element_id: String,
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    /// Always within `[0, 1]`
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TraceRelationship {
    /// Uniqueness key: `(paper element, code element, type)`
    #[must_use]
    pub fn key(&self) -> (&str, &str, TraceType) {
        (&self.paper_element_id, &self.code_element_id, self.trace_type)
    }
}

/// Bidirectional paper ↔ code mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceabilityMatrix {
    pub paper_elements: Vec<PaperElement>,
    pub code_elements: Vec<CodeElement>,
    pub relationships: Vec<TraceRelationship>,
}

/// Seed a matrix with one paper element per concept
#[must_use]
pub fn generate_initial_traceability_matrix(
    paper: &PaperContent,
    model: &KnowledgeModel,
) -> TraceabilityMatrix {
    let paper_elements: Vec<PaperElement> = model
        .concepts
        .iter()
        .map(|c| PaperElement {
            id: c.id.clone(),
            element_type: c.concept_type,
            name: c.name.clone(),
            description: c.description.clone(),
        })
        .collect();
    tracing::info!(
        "Seeded traceability matrix for '{}': {} paper elements",
        paper.paper_info.title,
        paper_elements.len()
    );
    TraceabilityMatrix {
        paper_elements,
        ..TraceabilityMatrix::default()
    }
}

impl TraceabilityMatrix {
    /// Find paper element by ID
    #[inline]
    #[must_use]
    pub fn paper_element(&self, id: &str) -> Option<&PaperElement> {
        self.paper_elements.iter().find(|e| e.id == id)
    }

    /// Find code element by ID
    #[inline]
    #[must_use]
    pub fn code_element(&self, id: &str) -> Option<&CodeElement> {
        self.code_elements.iter().find(|e| e.id == id)
    }

    /// Relationships from a paper element to code
    pub fn relationships_for_paper<'a>(
        &'a self,
        paper_element_id: &'a str,
    ) -> impl Iterator<Item = &'a TraceRelationship> {
        self.relationships
            .iter()
            .filter(move |r| r.paper_element_id == paper_element_id)
    }

    /// Relationships from a code element back to the paper
    pub fn relationships_for_code<'a>(
        &'a self,
        code_element_id: &'a str,
    ) -> impl Iterator<Item = &'a TraceRelationship> {
        self.relationships
            .iter()
            .filter(move |r| r.code_element_id == code_element_id)
    }

    /// Check matrix invariants
    ///
    /// Returns one error per violation: unresolved relationship endpoints,
    /// out-of-range confidence, duplicate keys and duplicate element ids.
    #[must_use]
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut paper_ids = HashSet::new();
        let mut code_ids = HashSet::new();

        for element in &self.paper_elements {
            if !paper_ids.insert(element.id.as_str()) {
                diagnostics.push(
                    Diagnostic::error("duplicate-paper-element", "paper element id is not unique")
                        .with_subject(&element.id),
                );
            }
        }
        for element in &self.code_elements {
            if !code_ids.insert(element.id.as_str()) {
                diagnostics.push(
                    Diagnostic::error("duplicate-code-element", "code element id is not unique")
                        .with_subject(&element.id),
                );
            }
        }

        let mut keys = HashSet::new();
        for rel in &self.relationships {
            let subject = format!("{}->{}", rel.paper_element_id, rel.code_element_id);
            if !paper_ids.contains(rel.paper_element_id.as_str()) {
                diagnostics.push(
                    Diagnostic::error("unknown-paper-element", "relationship source is not a paper element")
                        .with_subject(&subject),
                );
            }
            if !code_ids.contains(rel.code_element_id.as_str()) {
                diagnostics.push(
                    Diagnostic::error("unknown-code-element", "relationship target is not a code element")
                        .with_subject(&subject),
                );
            }
            if !(0.0..=1.0).contains(&rel.confidence) {
                diagnostics.push(
                    Diagnostic::error("confidence-out-of-range", format!("confidence {} is outside [0, 1]", rel.confidence))
                        .with_subject(&subject),
                );
            }
            if !keys.insert(rel.key()) {
                diagnostics.push(
                    Diagnostic::error("duplicate-relationship", format!("{} relationship appears more than once", rel.trace_type))
                        .with_subject(&subject),
                );
            }
        }
        diagnostics
    }
}
