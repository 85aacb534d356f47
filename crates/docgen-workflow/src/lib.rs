//! DocGen Implementation Workflow
//!
//! Turns a knowledge model into a dependency-ordered plan of components and
//! tracks their progress.
//!
//! # Core Concepts
//!
//! - [`Component`]: cluster of concepts implemented together
//! - [`Stage`]: topological layer; every dependency sits in an earlier stage
//! - [`ComponentStatus`]: `notStarted -> inProgress -> implemented -> verified`
//! - [`update_implementation_progress`]: functional status updates with
//!   warnings for regressions and unmet dependencies
//!
//! # Example
//!
//! ```rust,ignore
//! use docgen_workflow::{generate_implementation_plan, update_implementation_progress, StatusUpdate, ComponentStatus};
//!
//! let plan = generate_implementation_plan(&paper, &model);
//! let first = &plan.stages[0].components[0].id;
//! let outcome = update_implementation_progress(
//!     &plan,
//!     &[StatusUpdate::new(first, ComponentStatus::InProgress)],
//! );
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod plan;
mod planner;
mod progress;
pub mod state_machine;

pub use plan::{Component, ImplementationPlan, ProgressSummary, Stage, StatusChange};
pub use planner::{generate_implementation_plan, layer_components, FOUNDATIONS_ID};
pub use progress::{update_implementation_progress, StatusUpdate};
pub use state_machine::{classify_transition, next_statuses, ComponentStatus, Transition};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
