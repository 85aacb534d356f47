//! Session orchestration
//!
//! Every operation loads the whole snapshot, applies one pure pipeline
//! step and saves the snapshot back.

use crate::config::DocgenConfig;
use crate::error::DocgenError;
use crate::snapshot::SessionSnapshot;
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use docgen_knowledge::KnowledgeModelBuilder;
use docgen_paper::{Diagnostic, Outcome, PaperContent};
use docgen_specgen::SpecificationGenerator;
use docgen_trace::{
    coverage, generate_initial_traceability_matrix, generate_visualization,
    update_traceability_matrix, CodeMapping, CoverageReport, TraceGraph, TraceabilityMatrix,
};
use docgen_verify::{generate_verification_report, TestResult, VerificationReport, VerificationSummary};
use docgen_workflow::{
    generate_implementation_plan, update_implementation_progress, ImplementationPlan,
    ProgressSummary, StatusUpdate,
};
use serde::{Deserialize, Serialize};

/// Overview of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub session_id: String,
    pub paper_title: String,
    pub concepts: usize,
    pub relationships: usize,
    pub specifications: usize,
    pub progress: ProgressSummary,
    pub coverage: CoverageReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationSummary>,
    pub updated_at: DateTime<Utc>,
}

/// Runs pipeline operations against stored sessions
#[derive(Debug)]
pub struct SessionService<S: SessionStore> {
    store: S,
    config: DocgenConfig,
}

impl<S: SessionStore> SessionService<S> {
    /// Create new service
    #[must_use]
    pub fn new(store: S, config: DocgenConfig) -> Self {
        Self { store, config }
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DocgenConfig {
        &self.config
    }

    /// Build every artifact from `paper` and save the session
    ///
    /// Re-initializing a session with the paper it was built from returns
    /// the stored snapshot untouched, with an `already-initialized` info
    /// diagnostic. If the paper changed, the session keeps its creation
    /// time but recorded progress and traces are discarded with a
    /// `paper-changed` warning.
    ///
    /// # Errors
    ///
    /// Returns [`DocgenError::Store`] if the session cannot be loaded or
    /// saved.
    pub fn initialize(
        &self,
        session_id: &str,
        paper: PaperContent,
    ) -> Result<Outcome<SessionSnapshot>, DocgenError> {
        let previous = self.store.load(session_id)?;
        if let Some(prev) = previous.as_ref().filter(|prev| prev.built_from(&paper)) {
            tracing::info!("Session {}: paper unchanged, keeping stored artifacts", session_id);
            let diagnostic = Diagnostic::info(
                "already-initialized",
                "session was already built from this paper; stored artifacts kept",
            )
            .with_subject(session_id);
            return Ok(Outcome::new(prev.clone(), vec![diagnostic]));
        }

        let mut diagnostics = paper.validate();
        let mut snapshot = match previous {
            Some(prev) => {
                if prev.paper_changed(&paper) {
                    tracing::warn!("Session {}: paper changed, rebuilding artifacts", session_id);
                    diagnostics.push(
                        Diagnostic::warning(
                            "paper-changed",
                            "paper differs from the one this session was built from; progress and traces were reset",
                        )
                        .with_subject(session_id),
                    );
                }
                SessionSnapshot {
                    created_at: prev.created_at,
                    ..SessionSnapshot::new(session_id)
                }
            }
            None => SessionSnapshot::new(session_id),
        };

        let model = KnowledgeModelBuilder::new(self.config.knowledge).build(&paper);
        diagnostics.extend(model.warnings.iter().cloned());

        let (specifications, spec_diagnostics) =
            SpecificationGenerator::new(self.config.specification)
                .generate(&paper, &model)
                .into_parts();
        diagnostics.extend(spec_diagnostics);

        let matrix = generate_initial_traceability_matrix(&paper, &model);
        let plan = generate_implementation_plan(&paper, &model);
        diagnostics.extend(plan.warnings.iter().cloned());

        tracing::info!(
            "Initialized session {}: {} concepts, {} specifications, {} stages",
            session_id,
            model.concepts.len(),
            specifications.len(),
            plan.stages.len()
        );

        snapshot.paper_fingerprint = Some(paper.fingerprint());
        snapshot.paper_content = Some(paper);
        snapshot.knowledge_model = Some(model);
        snapshot.specifications = Some(specifications);
        snapshot.traceability_matrix = Some(matrix);
        snapshot.implementation_plan = Some(plan);
        snapshot.diagnostics.clone_from(&diagnostics);

        self.store.save(session_id, &snapshot)?;
        Ok(Outcome::new(snapshot, diagnostics))
    }

    /// Upsert code mappings into the traceability matrix
    pub fn map_code(
        &self,
        session_id: &str,
        mappings: &[CodeMapping],
    ) -> Result<Outcome<TraceabilityMatrix>, DocgenError> {
        self.apply(session_id, |snapshot| {
            let outcome = update_traceability_matrix(snapshot.matrix()?, mappings);
            snapshot.traceability_matrix = Some(outcome.value.clone());
            Ok(outcome)
        })
    }

    /// Apply component status updates
    pub fn update_progress(
        &self,
        session_id: &str,
        updates: &[StatusUpdate],
    ) -> Result<Outcome<ImplementationPlan>, DocgenError> {
        self.apply(session_id, |snapshot| {
            let outcome = update_implementation_progress(snapshot.plan()?, updates);
            snapshot.implementation_plan = Some(outcome.value.clone());
            Ok(outcome)
        })
    }

    /// Report test results against the session's specifications
    pub fn verify(
        &self,
        session_id: &str,
        results: &[TestResult],
    ) -> Result<VerificationReport, DocgenError> {
        self.apply(session_id, |snapshot| {
            let report = generate_verification_report(snapshot.specifications()?, results);
            snapshot.verification_report = Some(report.clone());
            Ok(report)
        })
    }

    /// Graph document of the current traceability matrix
    pub fn visualize(&self, session_id: &str) -> Result<TraceGraph, DocgenError> {
        let snapshot = self.load(session_id)?;
        Ok(generate_visualization(snapshot.matrix()?))
    }

    /// Session overview
    pub fn status(&self, session_id: &str) -> Result<SessionStatus, DocgenError> {
        let snapshot = self.load(session_id)?;
        let model = snapshot.model()?;
        Ok(SessionStatus {
            session_id: snapshot.session_id.clone(),
            paper_title: snapshot.paper()?.paper_info.title.clone(),
            concepts: model.concepts.len(),
            relationships: model.relationships.len(),
            specifications: snapshot.specifications()?.len(),
            progress: snapshot.plan()?.progress(),
            coverage: coverage(snapshot.matrix()?),
            verification: snapshot.verification_report.as_ref().map(|r| r.summary.clone()),
            updated_at: snapshot.updated_at,
        })
    }

    /// Load a snapshot or fail with [`DocgenError::SessionNotFound`]
    pub fn load(&self, session_id: &str) -> Result<SessionSnapshot, DocgenError> {
        self.store
            .load(session_id)?
            .ok_or_else(|| DocgenError::SessionNotFound(session_id.to_string()))
    }

    fn apply<T>(
        &self,
        session_id: &str,
        op: impl FnOnce(&mut SessionSnapshot) -> Result<T, DocgenError>,
    ) -> Result<T, DocgenError> {
        let mut snapshot = self.load(session_id)?;
        let result = op(&mut snapshot)?;
        snapshot.touch();
        self.store.save(session_id, &snapshot)?;
        Ok(result)
    }
}
