//! Implementation plan types

use crate::state_machine::ComponentStatus;
use docgen_paper::Diagnostic;
use serde::{Deserialize, Serialize};

/// One applied status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub from: ComponentStatus,
    pub to: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Unit of implementation work: a cluster of related concepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub name: String,
    pub description: String,
    pub concept_ids: Vec<String>,
    /// Ids of components that must be built first
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub history: Vec<StatusChange>,
}

impl Component {
    /// Create new component in `notStarted`
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            concept_ids: Vec::new(),
            dependencies: Vec::new(),
            status: ComponentStatus::NotStarted,
            notes: None,
            history: Vec::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With concepts
    #[must_use]
    pub fn with_concepts<I, S>(mut self, concept_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concept_ids = concept_ids.into_iter().map(Into::into).collect();
        self
    }

    /// With dependencies
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// Topological layer of components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub components: Vec<Component>,
}

/// Dependency-ordered plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationPlan {
    pub stages: Vec<Stage>,
    /// Plan-level warnings (dropped dependencies, broken cycles)
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
}

/// Snapshot of plan progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub implemented: usize,
    pub verified: usize,
    /// Share of implemented or verified components, in percent
    pub percent_complete: f64,
    /// Not-started components whose dependencies are all done
    pub ready: Vec<String>,
}

impl ImplementationPlan {
    /// All components, stage by stage
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.stages.iter().flat_map(|s| s.components.iter())
    }

    /// Find component by ID
    #[must_use]
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components().find(|c| c.id == id)
    }

    pub(crate) fn component_mut(&mut self, id: &str) -> Option<&mut Component> {
        self.stages
            .iter_mut()
            .flat_map(|s| s.components.iter_mut())
            .find(|c| c.id == id)
    }

    /// Zero-based stage index of a component
    #[must_use]
    pub fn stage_of(&self, id: &str) -> Option<usize> {
        self.stages
            .iter()
            .position(|s| s.components.iter().any(|c| c.id == id))
    }

    /// Count components per status and list those ready to start
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> ProgressSummary {
        let mut summary = ProgressSummary::default();
        for component in self.components() {
            summary.total += 1;
            match component.status {
                ComponentStatus::NotStarted => summary.not_started += 1,
                ComponentStatus::InProgress => summary.in_progress += 1,
                ComponentStatus::Implemented => summary.implemented += 1,
                ComponentStatus::Verified => summary.verified += 1,
            }
            let deps_done = component
                .dependencies
                .iter()
                .all(|d| self.component(d).is_some_and(|c| c.status.is_done()));
            if component.status == ComponentStatus::NotStarted && deps_done {
                summary.ready.push(component.id.clone());
            }
        }
        if summary.total > 0 {
            summary.percent_complete =
                (summary.implemented + summary.verified) as f64 * 100.0 / summary.total as f64;
        }
        summary
    }
}
