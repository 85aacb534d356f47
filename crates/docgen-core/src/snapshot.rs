//! Persisted session state
//!
//! A session snapshot holds every artifact derived from one paper. It is
//! always loaded and saved whole.

use crate::error::{Artifact, DocgenError};
use chrono::{DateTime, Utc};
use docgen_knowledge::KnowledgeModel;
use docgen_paper::{Diagnostic, PaperContent};
use docgen_specgen::ExecutableSpecification;
use docgen_trace::TraceabilityMatrix;
use docgen_verify::VerificationReport;
use docgen_workflow::ImplementationPlan;
use serde::{Deserialize, Serialize};

/// Whole-session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// SHA-256 of the paper the artifacts were derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_content: Option<PaperContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_model: Option<KnowledgeModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Vec<ExecutableSpecification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traceability_matrix: Option<TraceabilityMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_plan: Option<ImplementationPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_report: Option<VerificationReport>,
    /// Diagnostics raised during initialization
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl SessionSnapshot {
    /// Create empty snapshot
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            updated_at: now,
            paper_fingerprint: None,
            paper_content: None,
            knowledge_model: None,
            specifications: None,
            traceability_matrix: None,
            implementation_plan: None,
            verification_report: None,
            diagnostics: Vec::new(),
        }
    }

    /// Decode from JSON
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::Json`] if the text is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, DocgenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::Json`] if an artifact fails to serialize.
    pub fn to_json(&self) -> Result<String, DocgenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check if every derived artifact is present
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.paper_content.is_some()
            && self.knowledge_model.is_some()
            && self.specifications.is_some()
            && self.traceability_matrix.is_some()
            && self.implementation_plan.is_some()
    }

    /// Check if `paper` differs from the paper the session was built from
    #[must_use]
    pub fn paper_changed(&self, paper: &PaperContent) -> bool {
        self.paper_fingerprint
            .as_deref()
            .is_some_and(|fp| fp != paper.fingerprint())
    }

    /// Check if the artifacts are present and were derived from `paper`
    #[must_use]
    pub fn built_from(&self, paper: &PaperContent) -> bool {
        self.is_initialized()
            && self
                .paper_fingerprint
                .as_deref()
                .is_some_and(|fp| fp == paper.fingerprint())
    }

    /// Source paper
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::NotInitialized`] naming [`Artifact::PaperContent`]
    /// if the session was never initialized.
    pub fn paper(&self) -> Result<&PaperContent, DocgenError> {
        self.paper_content
            .as_ref()
            .ok_or_else(|| DocgenError::not_initialized(Artifact::PaperContent))
    }

    /// Knowledge model
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::NotInitialized`] naming [`Artifact::KnowledgeModel`]
    /// if the session was never initialized.
    pub fn model(&self) -> Result<&KnowledgeModel, DocgenError> {
        self.knowledge_model
            .as_ref()
            .ok_or_else(|| DocgenError::not_initialized(Artifact::KnowledgeModel))
    }

    /// Executable specifications
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::NotInitialized`] naming [`Artifact::Specifications`]
    /// if the session was never initialized.
    pub fn specifications(&self) -> Result<&[ExecutableSpecification], DocgenError> {
        self.specifications
            .as_deref()
            .ok_or_else(|| DocgenError::not_initialized(Artifact::Specifications))
    }

    /// Traceability matrix
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::NotInitialized`] naming [`Artifact::TraceabilityMatrix`]
    /// if the session was never initialized.
    pub fn matrix(&self) -> Result<&TraceabilityMatrix, DocgenError> {
        self.traceability_matrix
            .as_ref()
            .ok_or_else(|| DocgenError::not_initialized(Artifact::TraceabilityMatrix))
    }

    /// Implementation plan
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::NotInitialized`] naming [`Artifact::ImplementationPlan`]
    /// if the session was never initialized.
    pub fn plan(&self) -> Result<&ImplementationPlan, DocgenError> {
        self.implementation_plan
            .as_ref()
            .ok_or_else(|| DocgenError::not_initialized(Artifact::ImplementationPlan))
    }
}
