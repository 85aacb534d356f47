//! Traceability coverage
//!
//! Reports auditable gaps: paper elements without any code and code
//! elements that trace back to nothing.

use crate::matrix::{TraceType, TraceabilityMatrix};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Per concept type counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCoverage {
    pub total: usize,
    pub implemented: usize,
}

/// Coverage report for a matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Total paper elements
    pub paper_element_count: usize,
    /// Paper elements with an `implements` relationship
    pub implemented_count: usize,
    /// Paper elements with a `tests` relationship
    pub tested_count: usize,
    /// `implemented_count / paper_element_count` (1 for an empty matrix)
    pub coverage: f64,
    /// Counts keyed by concept type
    pub by_type: BTreeMap<String, TypeCoverage>,
    /// Paper elements with no relationship at all
    pub untraced_paper_elements: Vec<String>,
    /// Code elements no relationship points at
    pub orphan_code_elements: Vec<String>,
}

/// Compute coverage for a matrix
#[must_use]
pub fn coverage(matrix: &TraceabilityMatrix) -> CoverageReport {
    let with_type = |trace_type: TraceType| -> HashSet<&str> {
        matrix
            .relationships
            .iter()
            .filter(|r| r.trace_type == trace_type)
            .map(|r| r.paper_element_id.as_str())
            .collect()
    };
    let implemented = with_type(TraceType::Implements);
    let tested = with_type(TraceType::Tests);
    let traced: HashSet<&str> = matrix
        .relationships
        .iter()
        .map(|r| r.paper_element_id.as_str())
        .collect();
    let linked_code: HashSet<&str> = matrix
        .relationships
        .iter()
        .map(|r| r.code_element_id.as_str())
        .collect();

    let mut by_type: BTreeMap<String, TypeCoverage> = BTreeMap::new();
    for element in &matrix.paper_elements {
        let entry = by_type.entry(element.element_type.to_string()).or_default();
        entry.total += 1;
        if implemented.contains(element.id.as_str()) {
            entry.implemented += 1;
        }
    }

    let paper_element_count = matrix.paper_elements.len();
    let implemented_count = matrix
        .paper_elements
        .iter()
        .filter(|e| implemented.contains(e.id.as_str()))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let coverage = if paper_element_count == 0 {
        1.0
    } else {
        implemented_count as f64 / paper_element_count as f64
    };

    CoverageReport {
        paper_element_count,
        implemented_count,
        tested_count: matrix
            .paper_elements
            .iter()
            .filter(|e| tested.contains(e.id.as_str()))
            .count(),
        coverage,
        by_type,
        untraced_paper_elements: matrix
            .paper_elements
            .iter()
            .filter(|e| !traced.contains(e.id.as_str()))
            .map(|e| e.id.clone())
            .collect(),
        orphan_code_elements: matrix
            .code_elements
            .iter()
            .filter(|e| !linked_code.contains(e.id.as_str()))
            .map(|e| e.id.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{CodeElement, CodeElementType, PaperElement, TraceRelationship};
    use docgen_knowledge::ConceptType;
    use pretty_assertions::assert_eq;

    fn element(id: &str, element_type: ConceptType) -> PaperElement {
        PaperElement {
            id: id.into(),
            element_type,
            name: id.into(),
            description: String::new(),
        }
    }

    fn rel(paper: &str, code: &str, trace_type: TraceType) -> TraceRelationship {
        TraceRelationship {
            paper_element_id: paper.into(),
            code_element_id: code.into(),
            trace_type,
            confidence: 1.0,
            notes: None,
        }
    }

    #[test]
    fn reports_gaps() {
        let matrix = TraceabilityMatrix {
            paper_elements: vec![
                element("a", ConceptType::Algorithm),
                element("b", ConceptType::Algorithm),
                element("t", ConceptType::DataStructure),
            ],
            code_elements: vec![
                CodeElement::new("x", CodeElementType::Function, "x", "x.rs"),
                CodeElement::new("x_test", CodeElementType::Test, "x_test", "x.rs"),
                CodeElement::new("dead", CodeElementType::Module, "dead", "dead.rs"),
            ],
            relationships: vec![
                rel("a", "x", TraceType::Implements),
                rel("a", "x_test", TraceType::Tests),
                rel("t", "x", TraceType::References),
            ],
        };
        let report = coverage(&matrix);

        assert_eq!(report.paper_element_count, 3);
        assert_eq!(report.implemented_count, 1);
        assert_eq!(report.tested_count, 1);
        assert_eq!(report.untraced_paper_elements, vec!["b"]);
        assert_eq!(report.orphan_code_elements, vec!["dead"]);
        assert_eq!(
            report.by_type.get("algorithm"),
            Some(&TypeCoverage { total: 2, implemented: 1 })
        );
        assert!((report.coverage - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_matrix_is_fully_covered() {
        let report = coverage(&TraceabilityMatrix::default());
        assert_eq!(report.coverage, 1.0);
        assert!(report.untraced_paper_elements.is_empty());
    }
}
