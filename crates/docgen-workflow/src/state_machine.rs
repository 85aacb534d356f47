//! Component status state machine
//!
//! `notStarted → inProgress → implemented → verified`. Forward jumps are
//! accepted; backward moves are accepted but classified so callers can flag
//! the regression. Nothing transitions automatically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implementation status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentStatus {
    #[default]
    NotStarted,
    InProgress,
    Implemented,
    Verified,
}

impl ComponentStatus {
    /// Every status, in lifecycle order
    pub const ALL: [ComponentStatus; 4] = [
        ComponentStatus::NotStarted,
        ComponentStatus::InProgress,
        ComponentStatus::Implemented,
        ComponentStatus::Verified,
    ];

    /// Position in the lifecycle
    #[inline]
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            ComponentStatus::NotStarted => 0,
            ComponentStatus::InProgress => 1,
            ComponentStatus::Implemented => 2,
            ComponentStatus::Verified => 3,
        }
    }

    /// Check if no further transitions are expected
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == ComponentStatus::Verified
    }

    /// Check if the component's code exists (implemented or verified)
    #[inline]
    #[must_use]
    pub fn is_done(self) -> bool {
        self.rank() >= ComponentStatus::Implemented.rank()
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentStatus::NotStarted => "notStarted",
            ComponentStatus::InProgress => "inProgress",
            ComponentStatus::Implemented => "implemented",
            ComponentStatus::Verified => "verified",
        };
        f.write_str(s)
    }
}

/// Classification of a requested status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Same status
    Unchanged,
    /// Next status in the lifecycle
    Forward,
    /// Forward jump over one or more statuses
    Skip,
    /// Regression to an earlier status
    Backward,
}

/// Classify a transition
#[must_use]
pub fn classify_transition(from: ComponentStatus, to: ComponentStatus) -> Transition {
    match to.rank().cmp(&from.rank()) {
        std::cmp::Ordering::Equal => Transition::Unchanged,
        std::cmp::Ordering::Less => Transition::Backward,
        std::cmp::Ordering::Greater if to.rank() == from.rank() + 1 => Transition::Forward,
        std::cmp::Ordering::Greater => Transition::Skip,
    }
}

/// Forward statuses reachable from `from` (empty at the terminal status)
#[must_use]
pub fn next_statuses(from: ComponentStatus) -> Vec<ComponentStatus> {
    ComponentStatus::ALL
        .into_iter()
        .filter(|s| s.rank() > from.rank())
        .collect()
}
