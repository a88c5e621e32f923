//! Error types for prompt stores, reports, and filling

use std::io;

use thiserror::Error;

use crate::report::IntegrityIssue;

/// Errors surfaced by prompt stores, reports, and the fill engine
#[derive(Debug, Error)]
pub enum PromptError {
    /// A folder store was queried before `load()` was called
    #[error("store is not loaded; call load() first")]
    NotLoaded,

    #[error("prompt '{0}' not found")]
    NotFound(String),

    /// Insert refused because the name exists and strict inserts are on
    #[error("prompt '{0}' is already present")]
    Duplicate(String),

    /// Malformed prompt file, report, or preprocessor configuration
    #[error("schema error: {0}")]
    Schema(String),

    /// Strict report verification found drift between report and store
    #[error("integrity check failed: {}", format_issues(.0))]
    Integrity(Vec<IntegrityIssue>),

    /// Positional fill got a different number of values than placeholders
    #[error("placeholder count mismatch: {placeholders} placeholder(s), {values} value(s)")]
    ArityMismatch { placeholders: usize, values: usize },

    /// Strict named fill hit a placeholder with no substitution entry
    #[error("no substitution provided for placeholder '{0}'")]
    MissingKey(String),

    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PromptError {
    /// The integrity issues behind a strict verification failure, if any
    pub fn integrity_issues(&self) -> Option<&[IntegrityIssue]> {
        match self {
            PromptError::Integrity(issues) => Some(issues),
            _ => None,
        }
    }
}

fn format_issues(issues: &[IntegrityIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
