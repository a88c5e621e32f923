//! Prompt integrity reports
//!
//! A [`PromptReport`] is a point-in-time snapshot of a store's
//! `{name -> content hash}` mapping, saved as flat JSON. Reloading a folder
//! and verifying it against a saved report detects drift: edited prompts,
//! deleted prompts, and new prompts that the report never saw.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::PromptError;

/// SHA-256 hex digest of prompt text
///
/// Deterministic across runs, platforms, and store instances; used for
/// integrity comparison, not security.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A single discrepancy between a report and the currently loaded prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Present on both sides, but the text changed
    Changed {
        name: String,
        expected: String,
        actual: String,
    },
    /// In the report but no longer loaded
    Missing { name: String },
    /// Loaded but absent from the report
    Unexpected { name: String },
}

impl IntegrityIssue {
    /// The prompt name this issue refers to
    pub fn name(&self) -> &str {
        match self {
            IntegrityIssue::Changed { name, .. }
            | IntegrityIssue::Missing { name }
            | IntegrityIssue::Unexpected { name } => name,
        }
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::Changed {
                name,
                expected,
                actual,
            } => {
                write!(f, "'{name}' changed (expected {expected}, got {actual})")
            }
            IntegrityIssue::Missing { name } => write!(f, "'{name}' is in the report but not loaded"),
            IntegrityIssue::Unexpected { name } => write!(f, "'{name}' is loaded but not in the report"),
        }
    }
}

/// Snapshot of `{prompt name -> content hash}` for a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptReport {
    hashes: BTreeMap<String, String>,
}

impl PromptReport {
    /// Build a report by hashing `(name, text)` pairs
    pub fn from_prompts<'a, I>(prompts: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let hashes = prompts
            .into_iter()
            .map(|(name, text)| (name.to_string(), content_hash(text)))
            .collect();
        Self { hashes }
    }

    /// Build a report from already-computed hashes
    pub fn from_hashes(hashes: BTreeMap<String, String>) -> Self {
        Self { hashes }
    }

    /// Recorded hash for a prompt name
    pub fn hash(&self, name: &str) -> Option<&str> {
        self.hashes.get(name).map(String::as_str)
    }

    /// Number of prompts in the report
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Sorted prompt names in the report
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hashes.keys().map(String::as_str)
    }

    /// Serialize to JSON at `path`, appending `.json` if absent
    ///
    /// Returns the path actually written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, PromptError> {
        let path = with_json_ext(path.as_ref());
        let content = serde_json::to_string_pretty(&self)
            .map_err(|e| PromptError::Schema(format!("cannot serialize report: {e}")))?;
        fs::write(&path, content)?;
        debug!(path = %path.display(), prompts = self.hashes.len(), "Saved prompt report");
        Ok(path)
    }

    /// Parse a report back from JSON at `path` (`.json` appended if absent)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = with_json_ext(path.as_ref());
        let content = fs::read_to_string(&path)?;
        let hashes: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| PromptError::Schema(format!("malformed report {}: {e}", path.display())))?;
        Ok(Self { hashes })
    }

    /// Compare this report (the expected state) against `current`
    ///
    /// Returns every discrepancy in deterministic order: changed and missing
    /// names first (sorted), then unexpected names (sorted). Empty means the
    /// two states match exactly.
    pub fn verify_against(&self, current: &PromptReport) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        for (name, expected) in &self.hashes {
            match current.hashes.get(name) {
                Some(actual) if actual != expected => issues.push(IntegrityIssue::Changed {
                    name: name.clone(),
                    expected: expected.clone(),
                    actual: actual.clone(),
                }),
                Some(_) => {}
                None => issues.push(IntegrityIssue::Missing { name: name.clone() }),
            }
        }
        for name in current.hashes.keys() {
            if !self.hashes.contains_key(name) {
                issues.push(IntegrityIssue::Unexpected { name: name.clone() });
            }
        }
        issues
    }
}

/// Append the `.json` extension unless the path already carries it
fn with_json_ext(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        path.to_path_buf()
    } else {
        let mut path = path.to_path_buf();
        path.set_extension("json");
        path
    }
}
