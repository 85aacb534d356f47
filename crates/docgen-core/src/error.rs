//! Error types for DocGen sessions
//!
//! Structural failures only. Per-item validation problems travel as
//! [`docgen_paper::Diagnostic`] values inside an `Outcome`.

use docgen_paper::PaperError;
use std::fmt;
use std::path::PathBuf;

/// Session artifact that an operation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    PaperContent,
    KnowledgeModel,
    Specifications,
    TraceabilityMatrix,
    ImplementationPlan,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Artifact::PaperContent => "paper content",
            Artifact::KnowledgeModel => "knowledge model",
            Artifact::Specifications => "executable specifications",
            Artifact::TraceabilityMatrix => "traceability matrix",
            Artifact::ImplementationPlan => "implementation plan",
        };
        f.write_str(s)
    }
}

/// Main DocGen error type
#[derive(Debug, thiserror::Error)]
pub enum DocgenError {
    /// Required artifact missing from the session
    #[error("{artifact} not found in session; initialize the session first")]
    NotInitialized { artifact: Artifact },

    /// No snapshot stored under the id
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Session store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Paper content could not be decoded
    #[error("paper error: {0}")]
    Paper(#[from] PaperError),

    /// I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DocgenError {
    /// Create not-initialized error
    #[inline]
    #[must_use]
    pub fn not_initialized(artifact: Artifact) -> Self {
        Self::NotInitialized { artifact }
    }

    /// Check if the caller should run initialization
    #[inline]
    #[must_use]
    pub fn needs_initialization(&self) -> bool {
        matches!(self, Self::NotInitialized { .. } | Self::SessionNotFound(_))
    }
}

/// Session store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Session id cannot be used as a storage key
    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// Underlying I/O failed
    #[error("io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored snapshot could not be encoded or decoded
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML for [`crate::DocgenConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_initialized_names_artifact() {
        let err = DocgenError::not_initialized(Artifact::TraceabilityMatrix);
        let text = err.to_string();
        assert!(text.contains("traceability matrix"));
        assert!(text.contains("initialize"));
        assert!(err.needs_initialization());
    }

    #[test]
    fn store_errors_convert() {
        let err: DocgenError = StoreError::InvalidSessionId("../x".to_string()).into();
        assert!(err.to_string().starts_with("store error"));
        assert!(!err.needs_initialization());
    }
}
