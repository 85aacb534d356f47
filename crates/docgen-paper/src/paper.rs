//! Paper content
//!
//! Structured record produced by the extraction collaborator. Sections form
//! a tree; every other element is anchored to a section by `section_id`.

use crate::diagnostic::Diagnostic;
use crate::error::PaperError;
use crate::index::{ElementIndex, ElementKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Complete structured paper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperContent {
    /// Bibliographic information
    pub paper_info: PaperInfo,
    /// Top-level sections (tree)
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Extracted algorithms
    #[serde(default)]
    pub algorithms: Vec<Algorithm>,
    /// Extracted equations
    #[serde(default)]
    pub equations: Vec<Equation>,
    /// Extracted figures
    #[serde(default)]
    pub figures: Vec<Figure>,
    /// Extracted tables
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Extracted citations
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Bibliographic information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperInfo {
    /// Paper title
    pub title: String,
    /// Author names
    #[serde(default)]
    pub authors: Vec<String>,
    /// Abstract text
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    /// Publication year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

/// Paper section (tree node)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section ID
    pub id: String,
    /// Heading level (1 = top level)
    pub level: u8,
    /// Section title
    pub title: String,
    /// Section body text
    #[serde(default)]
    pub content: String,
    /// Nested subsections
    #[serde(default)]
    pub subsections: Vec<Section>,
}

impl Section {
    /// Create new section
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, level: u8, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            title: title.into(),
            content: String::new(),
            subsections: Vec::new(),
        }
    }

    /// With body text
    #[inline]
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// With a nested subsection
    #[inline]
    #[must_use]
    pub fn with_subsection(mut self, section: Section) -> Self {
        self.subsections.push(section);
        self
    }
}

/// Algorithm block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Algorithm {
    /// Algorithm ID
    pub id: String,
    /// Algorithm name
    pub name: String,
    /// Prose description
    #[serde(default)]
    pub description: String,
    /// Pseudocode listing
    #[serde(default)]
    pub pseudocode: String,
    /// Declared inputs (`name` or `name: type`)
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Declared outputs (`name` or `name: type`)
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Anchor section
    #[serde(default)]
    pub section_id: String,
}

impl Algorithm {
    /// Create new algorithm
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With pseudocode
    #[inline]
    #[must_use]
    pub fn with_pseudocode(mut self, pseudocode: impl Into<String>) -> Self {
        self.pseudocode = pseudocode.into();
        self
    }

    /// With declared inputs
    #[must_use]
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    /// With declared outputs
    #[must_use]
    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// With anchor section
    #[inline]
    #[must_use]
    pub fn in_section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = section_id.into();
        self
    }

    /// Declared input names, without type annotations
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|s| signature_name(s))
    }

    /// Declared output names, without type annotations
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|s| signature_name(s))
    }
}

/// Strip a `: type` or `(type)` annotation from a signature entry
#[must_use]
pub fn signature_name(entry: &str) -> &str {
    let end = entry.find([':', '(']).unwrap_or(entry.len());
    entry[..end].trim()
}

/// Equation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equation {
    /// Equation ID
    pub id: String,
    /// Equation source (usually LaTeX)
    #[serde(default)]
    pub content: String,
    /// Prose description
    #[serde(default)]
    pub description: String,
    /// Anchor section
    #[serde(default)]
    pub section_id: String,
}

/// Figure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    /// Figure ID
    pub id: String,
    /// Caption
    #[serde(default)]
    pub caption: String,
    /// Anchor section
    #[serde(default)]
    pub section_id: String,
}

/// Table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table ID
    pub id: String,
    /// Caption
    #[serde(default)]
    pub caption: String,
    /// Anchor section
    #[serde(default)]
    pub section_id: String,
}

/// Citation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Citation ID
    pub id: String,
    /// Reference text
    #[serde(default)]
    pub text: String,
    /// Anchor section
    #[serde(default)]
    pub section_id: String,
}

impl PaperContent {
    /// Create an empty paper with a title
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            paper_info: PaperInfo {
                title: title.into(),
                ..PaperInfo::default()
            },
            ..Self::default()
        }
    }

    /// Decode from the extraction collaborator's JSON
    ///
    /// # Errors
    /// Returns error if the JSON does not match the paper schema
    pub fn from_json(json: &str) -> Result<Self, PaperError> {
        serde_json::from_str(json).map_err(PaperError::from)
    }

    /// Encode as JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, PaperError> {
        serde_json::to_string_pretty(self).map_err(PaperError::from)
    }

    /// Iterate every section, depth first, with its tree depth (0 = top)
    #[must_use]
    pub fn sections_depth_first(&self) -> SectionWalk<'_> {
        SectionWalk {
            stack: self.sections.iter().rev().map(|s| (s, 0)).collect(),
        }
    }

    /// Find section anywhere in the tree
    #[must_use]
    pub fn find_section(&self, id: &str) -> Option<&Section> {
        self.sections_depth_first()
            .map(|(section, _)| section)
            .find(|s| s.id == id)
    }

    /// Find algorithm by ID
    #[inline]
    #[must_use]
    pub fn find_algorithm(&self, id: &str) -> Option<&Algorithm> {
        self.algorithms.iter().find(|a| a.id == id)
    }

    /// Text of the section an element is anchored to (empty if unknown)
    #[must_use]
    pub fn section_text(&self, section_id: &str) -> &str {
        self.find_section(section_id)
            .map_or("", |s| s.content.as_str())
    }

    /// Build id → element lookup
    #[must_use]
    pub fn element_index(&self) -> ElementIndex {
        ElementIndex::build(self)
    }

    /// Check structural consistency
    ///
    /// Never fails; returns diagnostics for duplicate ids, dangling section
    /// anchors, levels inconsistent with tree depth, and degenerate input.
    #[must_use]
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();

        for (section, depth) in self.sections_depth_first() {
            let expected = depth + 1;
            if usize::from(section.level) != expected {
                diagnostics.push(
                    Diagnostic::warning(
                        "section-level-mismatch",
                        format!(
                            "section '{}' has level {} but its nesting implies level {}",
                            section.title, section.level, expected
                        ),
                    )
                    .with_subject(&section.id),
                );
            }
        }

        let index = self.element_index();
        for (id, kind) in self.element_ids() {
            if !seen.insert(id) {
                diagnostics.push(
                    Diagnostic::error("duplicate-element-id", format!("{kind} id '{id}' is not unique"))
                        .with_subject(id),
                );
            }
        }

        for (id, kind, section_id) in self.anchored_elements() {
            if index.kind_of(section_id) != Some(ElementKind::Section) {
                diagnostics.push(
                    Diagnostic::warning(
                        "dangling-section-anchor",
                        format!("{kind} '{id}' references unknown section '{section_id}'"),
                    )
                    .with_subject(id),
                );
            }
        }

        if self.algorithms.is_empty() {
            diagnostics.push(Diagnostic::warning(
                "no-algorithms",
                "paper has no algorithms; only coarse section-level concepts can be derived",
            ));
        }
        if self.sections.is_empty() {
            diagnostics.push(Diagnostic::warning("no-sections", "paper has no sections"));
        }

        diagnostics
    }

    /// Hex SHA-256 digest of the canonical JSON encoding
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        // Serializing plain data structs cannot fail
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }

    /// Every element id with its kind, in document order
    pub(crate) fn element_ids(&self) -> Vec<(&str, ElementKind)> {
        let mut ids: Vec<(&str, ElementKind)> = self
            .sections_depth_first()
            .map(|(s, _)| (s.id.as_str(), ElementKind::Section))
            .collect();
        ids.extend(self.algorithms.iter().map(|a| (a.id.as_str(), ElementKind::Algorithm)));
        ids.extend(self.equations.iter().map(|e| (e.id.as_str(), ElementKind::Equation)));
        ids.extend(self.figures.iter().map(|f| (f.id.as_str(), ElementKind::Figure)));
        ids.extend(self.tables.iter().map(|t| (t.id.as_str(), ElementKind::Table)));
        ids.extend(self.citations.iter().map(|c| (c.id.as_str(), ElementKind::Citation)));
        ids
    }

    /// Every section-anchored element as (id, kind, section id)
    pub(crate) fn anchored_elements(&self) -> Vec<(&str, ElementKind, &str)> {
        let mut out: Vec<(&str, ElementKind, &str)> = Vec::new();
        out.extend(
            self.algorithms
                .iter()
                .map(|a| (a.id.as_str(), ElementKind::Algorithm, a.section_id.as_str())),
        );
        out.extend(
            self.equations
                .iter()
                .map(|e| (e.id.as_str(), ElementKind::Equation, e.section_id.as_str())),
        );
        out.extend(
            self.figures
                .iter()
                .map(|f| (f.id.as_str(), ElementKind::Figure, f.section_id.as_str())),
        );
        out.extend(
            self.tables
                .iter()
                .map(|t| (t.id.as_str(), ElementKind::Table, t.section_id.as_str())),
        );
        out.extend(
            self.citations
                .iter()
                .map(|c| (c.id.as_str(), ElementKind::Citation, c.section_id.as_str())),
        );
        out
    }
}

/// Depth-first section iterator
#[derive(Debug)]
pub struct SectionWalk<'a> {
    stack: Vec<(&'a Section, usize)>,
}

impl<'a> Iterator for SectionWalk<'a> {
    type Item = (&'a Section, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (section, depth) = self.stack.pop()?;
        self.stack
            .extend(section.subsections.iter().rev().map(|s| (s, depth + 1)));
        Some((section, depth))
    }
}
