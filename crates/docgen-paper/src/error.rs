//! Error types for paper content

/// Paper decoding errors
#[derive(Debug, thiserror::Error)]
pub enum PaperError {
    /// JSON did not match the paper schema
    #[error("invalid paper content: {0}")]
    Decode(#[from] serde_json::Error),
}
