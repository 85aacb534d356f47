//! Functional matrix update
//!
//! Applies a batch of caller-supplied mappings as a fold. Each mapping is
//! validated on its own; rejected mappings leave the matrix untouched and
//! produce an error diagnostic while the rest of the batch still applies.

use crate::matrix::{CodeElement, TraceRelationship, TraceType, TraceabilityMatrix};
use docgen_paper::{Diagnostic, Outcome};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One paper ↔ code link submitted by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMapping {
    pub paper_element_id: String,
    pub code_element: CodeElement,
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CodeMapping {
    /// Create new mapping
    #[must_use]
    pub fn new(
        paper_element_id: impl Into<String>,
        code_element: CodeElement,
        trace_type: TraceType,
        confidence: f64,
    ) -> Self {
        Self {
            paper_element_id: paper_element_id.into(),
            code_element,
            trace_type,
            confidence,
            notes: None,
        }
    }

    /// With notes
    #[inline]
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

type RelationshipKey = (String, String, TraceType);

/// Apply mappings, returning a new matrix and per-mapping diagnostics
///
/// Code elements are upserted by id; relationships are upserted by
/// `(paperElementId, codeElementId, type)` with last write winning on
/// confidence and notes. Applying the same batch twice yields the same
/// matrix as applying it once.
#[must_use]
pub fn update_traceability_matrix(
    matrix: &TraceabilityMatrix,
    mappings: &[CodeMapping],
) -> Outcome<TraceabilityMatrix> {
    let paper_ids: HashSet<&str> = matrix.paper_elements.iter().map(|e| e.id.as_str()).collect();
    let mut code_elements: IndexMap<String, CodeElement> = matrix
        .code_elements
        .iter()
        .map(|e| (e.id.clone(), e.clone()))
        .collect();
    let mut relationships: IndexMap<RelationshipKey, TraceRelationship> = matrix
        .relationships
        .iter()
        .map(|r| {
            (
                (r.paper_element_id.clone(), r.code_element_id.clone(), r.trace_type),
                r.clone(),
            )
        })
        .collect();

    let mut diagnostics = Vec::new();
    let mut applied = 0usize;

    for mapping in mappings {
        if !paper_ids.contains(mapping.paper_element_id.as_str()) {
            diagnostics.push(
                Diagnostic::error(
                    "unknown-paper-element",
                    format!(
                        "paper element '{}' does not exist; mapping to '{}' skipped",
                        mapping.paper_element_id, mapping.code_element.id
                    ),
                )
                .with_subject(&mapping.paper_element_id),
            );
            continue;
        }
        if mapping.code_element.id.trim().is_empty() {
            diagnostics.push(
                Diagnostic::error("empty-code-element-id", "code element id is empty; mapping skipped")
                    .with_subject(&mapping.paper_element_id),
            );
            continue;
        }

        let subject = format!("{}->{}", mapping.paper_element_id, mapping.code_element.id);
        let confidence = match normalize_confidence(mapping.confidence) {
            Ok(confidence) => confidence,
            Err((confidence, diagnostic)) => {
                tracing::warn!("{}: {}", subject, diagnostic.message);
                diagnostics.push(diagnostic.with_subject(&subject));
                confidence
            }
        };

        code_elements.insert(mapping.code_element.id.clone(), mapping.code_element.clone());
        relationships.insert(
            (
                mapping.paper_element_id.clone(),
                mapping.code_element.id.clone(),
                mapping.trace_type,
            ),
            TraceRelationship {
                paper_element_id: mapping.paper_element_id.clone(),
                code_element_id: mapping.code_element.id.clone(),
                trace_type: mapping.trace_type,
                confidence,
                notes: mapping.notes.clone(),
            },
        );
        applied += 1;
    }

    tracing::info!(
        "Applied {}/{} code mappings ({} diagnostics)",
        applied,
        mappings.len(),
        diagnostics.len()
    );

    Outcome::new(
        TraceabilityMatrix {
            paper_elements: matrix.paper_elements.clone(),
            code_elements: code_elements.into_values().collect(),
            relationships: relationships.into_values().collect(),
        },
        diagnostics,
    )
}

/// Clamp a confidence into `[0, 1]`
///
/// Returns the usable value, or the corrected value plus a warning.
fn normalize_confidence(confidence: f64) -> Result<f64, (f64, Diagnostic)> {
    if confidence.is_nan() {
        return Err((
            0.0,
            Diagnostic::warning("confidence-not-a-number", "confidence is NaN; recorded as 0"),
        ));
    }
    let clamped = confidence.clamp(0.0, 1.0);
    if (clamped - confidence).abs() > 0.0 {
        return Err((
            clamped,
            Diagnostic::warning(
                "confidence-clamped",
                format!("confidence {confidence} is outside [0, 1]; clamped to {clamped}"),
            ),
        ));
    }
    Ok(confidence)
}
