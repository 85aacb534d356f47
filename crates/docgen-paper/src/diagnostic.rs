//! Per-item diagnostics
//!
//! Batch operations never stop at the first bad item. They fold over their
//! input and return an [`Outcome`]: the value that could be produced plus
//! every [`Diagnostic`] raised along the way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Informational note
    Info,
    /// Degenerate or tolerated input; result is still valid
    Warning,
    /// Item rejected; the rest of the batch was applied
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single diagnostic attached to an operation result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Severity classification
    pub severity: Severity,
    /// Stable machine-readable code (e.g. `unknown-paper-element`)
    pub code: String,
    /// Id of the item the diagnostic is about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create new diagnostic
    #[inline]
    #[must_use]
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            subject: None,
            message: message.into(),
        }
    }

    /// Informational diagnostic
    #[inline]
    #[must_use]
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Warning diagnostic
    #[inline]
    #[must_use]
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Error diagnostic
    #[inline]
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Attach the id of the offending item
    #[inline]
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Check if this diagnostic rejected an item
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this diagnostic is a warning
    #[inline]
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{}] {} ({}): {}", self.severity, self.code, subject, self.message),
            None => write!(f, "[{}] {}: {}", self.severity, self.code, self.message),
        }
    }
}

/// Result of a batch operation: the produced value and its diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    /// Produced value
    pub value: T,
    /// Per-item diagnostics, in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Outcome<T> {
    /// Outcome without diagnostics
    #[inline]
    #[must_use]
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Outcome with diagnostics
    #[inline]
    #[must_use]
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Number of rejected items
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Check if no diagnostics were raised
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Transform the value, keeping diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Split into value and diagnostics
    #[inline]
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_includes_subject() {
        let diag = Diagnostic::error("unknown-paper-element", "not found").with_subject("missing");
        let text = diag.to_string();
        assert!(text.contains("error"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn outcome_counts() {
        let outcome = Outcome::new(
            1,
            vec![
                Diagnostic::warning("a", "w"),
                Diagnostic::error("b", "e"),
                Diagnostic::info("c", "i"),
            ],
        );
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.warning_count(), 1);
        assert!(!outcome.is_clean());

        let mapped = outcome.map(|v| v + 1);
        assert_eq!(mapped.value, 2);
        assert_eq!(mapped.diagnostics.len(), 3);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
