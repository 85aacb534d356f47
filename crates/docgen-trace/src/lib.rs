//! DocGen Traceability
//!
//! Bidirectional, confidence-scored mapping between paper concepts and
//! code artifacts.
//!
//! # Core Concepts
//!
//! - [`TraceabilityMatrix`]: paper elements, code elements and the
//!   relationships between them
//! - [`update_traceability_matrix`]: functional, idempotent batch upsert
//! - [`generate_visualization`]: two-column graph document
//! - [`coverage`]: untraced paper elements and orphan code elements
//!
//! # Invariants
//!
//! Every relationship endpoint resolves, confidence stays within `[0, 1]`
//! and `(paperElementId, codeElementId, type)` is unique.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod coverage;
mod matrix;
mod update;
mod visualization;

pub use coverage::{coverage, CoverageReport, TypeCoverage};
pub use matrix::{
    generate_initial_traceability_matrix, CodeElement, CodeElementType, PaperElement,
    TraceRelationship, TraceType, TraceabilityMatrix,
};
pub use update::{update_traceability_matrix, CodeMapping};
pub use visualization::{
    generate_visualization, GraphEdge, GraphNode, GraphStats, NodeClass, Position, TraceGraph,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
