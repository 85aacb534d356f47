//! DocGen Specification Generator
//!
//! Derives executable test specifications from the algorithms of a paper:
//! input/output contracts, a step-by-step transcription of the pseudocode
//! and verification fixtures.
//!
//! # Core Concepts
//!
//! - [`ExecutableSpecification`]: contract for one algorithm concept
//! - [`SpecificationGenerator`]: isolate-and-continue batch generation
//! - [`TargetLanguage`]: cosmetic rendering of `steps[].code`
//!
//! # Example
//!
//! ```rust,ignore
//! use docgen_specgen::{SpecificationConfig, SpecificationGenerator, TargetLanguage};
//!
//! let config = SpecificationConfig::new().with_target_language(TargetLanguage::Rust);
//! let outcome = SpecificationGenerator::new(config).generate(&paper, &model);
//! for diag in &outcome.diagnostics {
//!     eprintln!("{diag}");
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod fixtures;
mod generator;
mod language;
pub mod pseudocode;
mod signature;
mod types;

pub use fixtures::parse_literal;
pub use generator::{generate_executable_specifications, SpecificationConfig, SpecificationGenerator};
pub use language::TargetLanguage;
pub use pseudocode::PseudocodeError;
pub use signature::{infer_from_name, parse_annotation, parse_signature};
pub use types::{ExecutableSpecification, IoSpec, Step, ValueType, VerificationFixture};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
