//! Pipeline configuration
//!
//! ```toml
//! [knowledge]
//! min_term_frequency = 2
//! max_term_concepts = 32
//!
//! [specification]
//! target_language = "rust"
//! parallel = true
//! boundary_fixtures = true
//! ```
//!
//! Missing tables and keys fall back to defaults.

use crate::error::ConfigError;
use docgen_knowledge::KnowledgeConfig;
use docgen_specgen::SpecificationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// DocGen configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgenConfig {
    /// Terminology extraction
    pub knowledge: KnowledgeConfig,
    /// Specification generation
    pub specification: SpecificationConfig,
}

impl DocgenConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With knowledge settings
    #[inline]
    #[must_use]
    pub fn with_knowledge(mut self, knowledge: KnowledgeConfig) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// With specification settings
    #[inline]
    #[must_use]
    pub fn with_specification(mut self, specification: SpecificationConfig) -> Self {
        self.specification = specification;
        self
    }

    /// Parse TOML
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
