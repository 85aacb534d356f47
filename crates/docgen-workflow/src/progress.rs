//! Functional progress updates
//!
//! The caller is the source of truth for component status: every update
//! naming a known component is applied, and questionable ones (regressions,
//! finishing before dependencies) only raise warnings.

use crate::plan::{ImplementationPlan, StatusChange};
use crate::state_machine::{classify_transition, ComponentStatus, Transition};
use docgen_paper::{Diagnostic, Outcome};
use serde::{Deserialize, Serialize};

/// Status change requested by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub component_id: String,
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StatusUpdate {
    /// Create new update
    #[inline]
    #[must_use]
    pub fn new(component_id: impl Into<String>, status: ComponentStatus) -> Self {
        Self {
            component_id: component_id.into(),
            status,
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

/// Apply status updates in order, returning a new plan
#[must_use]
pub fn update_implementation_progress(
    plan: &ImplementationPlan,
    updates: &[StatusUpdate],
) -> Outcome<ImplementationPlan> {
    let mut next = plan.clone();
    let mut diagnostics = Vec::new();

    for update in updates {
        let Some(component) = next.component(&update.component_id) else {
            diagnostics.push(
                Diagnostic::error(
                    "unknown-component",
                    format!("component '{}' is not in the plan; update skipped", update.component_id),
                )
                .with_subject(&update.component_id),
            );
            continue;
        };

        let from = component.status;
        let transition = classify_transition(from, update.status);
        if transition == Transition::Backward {
            tracing::warn!("{}: status regression {} -> {}", update.component_id, from, update.status);
            diagnostics.push(
                Diagnostic::warning(
                    "status-regression",
                    format!("status moved backward from {from} to {}", update.status),
                )
                .with_subject(&update.component_id),
            );
        }

        if update.status.is_done() && transition != Transition::Unchanged {
            let unmet: Vec<&str> = component
                .dependencies
                .iter()
                .filter(|d| !next.component(d).is_some_and(|c| c.status.is_done()))
                .map(String::as_str)
                .collect();
            if !unmet.is_empty() {
                diagnostics.push(
                    Diagnostic::warning(
                        "unmet-dependencies",
                        format!(
                            "marked {} before dependencies were implemented: {}",
                            update.status,
                            unmet.join(", ")
                        ),
                    )
                    .with_subject(&update.component_id),
                );
            }
        }

        let Some(component) = next.component_mut(&update.component_id) else {
            continue;
        };
        if update.notes.is_some() {
            component.notes.clone_from(&update.notes);
        }
        if transition != Transition::Unchanged {
            component.status = update.status;
            component.history.push(StatusChange {
                from,
                to: update.status,
                notes: update.notes.clone(),
            });
            tracing::debug!("{}: {} -> {}", update.component_id, from, update.status);
        }
    }

    Outcome::new(next, diagnostics)
}
