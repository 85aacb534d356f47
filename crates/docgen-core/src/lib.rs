//! DocGen Core
//!
//! Session layer over the pure paper-to-code pipeline.
//!
//! # Core Concepts
//!
//! - [`SessionSnapshot`]: every artifact derived from one paper, persisted
//!   whole
//! - [`SessionStore`]: persistence seam; [`InMemorySessionStore`] and
//!   [`FileSessionStore`] are provided
//! - [`SessionService`]: load → apply → save for each pipeline operation
//! - [`DocgenConfig`]: TOML-loadable settings for the builders
//!
//! # Example
//!
//! ```rust,ignore
//! use docgen_core::{DocgenConfig, InMemorySessionStore, SessionService};
//!
//! let service = SessionService::new(InMemorySessionStore::new(), DocgenConfig::default());
//! let outcome = service.initialize("session-1", paper)?;
//! let status = service.status("session-1")?;
//! println!("{:.0}% complete", status.progress.percent_complete);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod service;
mod snapshot;
mod store;

pub use config::DocgenConfig;
pub use error::{Artifact, ConfigError, DocgenError, StoreError};
pub use service::{SessionService, SessionStatus};
pub use snapshot::SessionSnapshot;
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
