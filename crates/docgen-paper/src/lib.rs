//! DocGen Paper Content
//!
//! The data leaf of the pipeline: the structured record produced by the
//! extraction collaborator, plus the diagnostic types every other crate
//! uses to report per-item problems.
//!
//! # Core Concepts
//!
//! - [`PaperContent`]: sections (tree), algorithms, equations, figures,
//!   tables and citations
//! - [`ElementIndex`]: id → element lookup for resolving foreign keys
//! - [`Diagnostic`] / [`Outcome`]: isolate-and-continue batch results
//!
//! # Example
//!
//! ```rust,ignore
//! use docgen_paper::PaperContent;
//!
//! let paper = PaperContent::from_json(&json)?;
//! for diag in paper.validate() {
//!     eprintln!("{diag}");
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod diagnostic;
mod error;
mod index;
mod paper;

pub use diagnostic::{Diagnostic, Outcome, Severity};
pub use error::PaperError;
pub use index::{ElementIndex, ElementKind, IndexedElement};
pub use paper::{
    signature_name, Algorithm, Citation, Equation, Figure, PaperContent, PaperInfo, Section,
    SectionWalk, Table,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
