//! Element index
//!
//! Flat id → element lookup over a [`PaperContent`] so that foreign keys
//! (concept source elements, section anchors) can be resolved in O(1).

use crate::paper::PaperContent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of paper element an id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Section (any depth)
    Section,
    /// Algorithm block
    Algorithm,
    /// Equation
    Equation,
    /// Figure
    Figure,
    /// Table
    Table,
    /// Citation
    Citation,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElementKind::Section => "section",
            ElementKind::Algorithm => "algorithm",
            ElementKind::Equation => "equation",
            ElementKind::Figure => "figure",
            ElementKind::Table => "table",
            ElementKind::Citation => "citation",
        };
        f.write_str(s)
    }
}

/// Indexed element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedElement {
    /// Element kind
    pub kind: ElementKind,
    /// Anchor section (None for sections themselves)
    pub section_id: Option<String>,
}

/// Id → element lookup
///
/// When ids collide the first element in document order wins; collisions
/// are reported by [`PaperContent::validate`].
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    entries: HashMap<String, IndexedElement>,
}

impl ElementIndex {
    /// Build index for a paper
    #[must_use]
    pub fn build(paper: &PaperContent) -> Self {
        let mut entries = HashMap::new();

        for (id, kind) in paper.element_ids() {
            entries
                .entry(id.to_string())
                .or_insert_with(|| IndexedElement {
                    kind,
                    section_id: None,
                });
        }
        for (id, kind, section_id) in paper.anchored_elements() {
            if let Some(entry) = entries.get_mut(id) {
                if entry.kind == kind && entry.section_id.is_none() {
                    entry.section_id = Some(section_id.to_string());
                }
            }
        }

        Self { entries }
    }

    /// Check if id resolves to any element
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Kind of the element an id refers to
    #[inline]
    #[must_use]
    pub fn kind_of(&self, id: &str) -> Option<ElementKind> {
        self.entries.get(id).map(|e| e.kind)
    }

    /// Look up element
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexedElement> {
        self.entries.get(id)
    }

    /// Number of indexed ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
