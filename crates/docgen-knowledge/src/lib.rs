//! DocGen Knowledge Model
//!
//! Builds a concept graph from structured paper content.
//!
//! # Core Concepts
//!
//! - [`Concept`]: algorithm, method, data structure, parameter or generic idea
//! - [`Relationship`]: typed edge (`uses`, `implements`, `extends`,
//!   `dependsOn`, `refines`)
//! - [`KnowledgeModelBuilder`]: rule-based extraction and inference
//!
//! The builder guarantees internal consistency (every source element and
//! endpoint resolves, no self-loops, acyclic `dependsOn`), not completeness.
//!
//! # Example
//!
//! ```rust,ignore
//! use docgen_knowledge::build_knowledge_model;
//!
//! let model = build_knowledge_model(&paper);
//! assert!(model.validate(&paper).is_empty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod builder;
mod model;
pub mod terms;

pub use builder::{build_knowledge_model, KnowledgeConfig, KnowledgeModelBuilder};
pub use model::{Concept, ConceptType, KnowledgeModel, Relationship, RelationshipType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
