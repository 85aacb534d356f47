//! DocGen Verification Reporter
//!
//! Matches externally supplied test-run results against the fixtures of
//! executable specifications and aggregates a pass/fail report.
//!
//! # Core Concepts
//!
//! - [`TestResult`]: fixture outcomes reported for one specification
//! - [`SpecificationStatus`]: `passed`, `failed`, `incomplete` or `notRun`
//! - [`VerificationReport`]: per-specification reports, totals and
//!   diagnostics for results that matched nothing

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod report;
mod reporter;

pub use report::{
    FixtureOutcome, FixtureReport, FixtureStatus, SpecificationReport, SpecificationStatus,
    TestResult, VerificationReport, VerificationSummary,
};
pub use reporter::generate_verification_report;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
