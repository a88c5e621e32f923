//! JSON-backed prompt store
//!
//! The source file is a flat string-to-string dictionary:
//!
//! ```json
//! { "hello": "Say hello!", "summaries/short": "Summarize: {{text}}" }
//! ```
//!
//! Loading is eager and structurally strict: a non-object top level or a
//! non-string value fails with a schema error at load time, never at first
//! `get`. [`JsonPrompts::load_validated`] additionally runs [`validate_json`]
//! for the deeper content checks.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PromptError;
use crate::store::{PromptStore, insert_prompt};

/// Eager store over a flat JSON dictionary of prompts
#[derive(Debug)]
pub struct JsonPrompts {
    path: PathBuf,
    prompts: BTreeMap<String, String>,
    strict_inserts: bool,
}

impl JsonPrompts {
    /// Parse `path` and load every prompt it contains
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let prompts = parse_prompt_file(path)?;
        info!(path = %path.display(), count = prompts.len(), "Loaded prompts from JSON");
        Ok(Self {
            path: path.to_path_buf(),
            prompts,
            strict_inserts: false,
        })
    }

    /// Like [`JsonPrompts::load`], but runs [`validate_json`] first
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        validate_json(path.as_ref())?;
        Self::load(path)
    }

    /// Refuse `add_prompt` overwrites instead of replacing silently
    pub fn strict_inserts(mut self, strict: bool) -> Self {
        self.strict_inserts = strict;
        self
    }

    /// The source file this store was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PromptStore for JsonPrompts {
    fn names(&self) -> Vec<String> {
        self.prompts.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Result<&str, PromptError> {
        self.prompts
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))
    }

    fn add_prompt(&mut self, name: &str, text: &str) -> Result<(), PromptError> {
        insert_prompt(&mut self.prompts, name, text, self.strict_inserts)
    }
}

fn parse_prompt_file(path: &Path) -> Result<BTreeMap<String, String>, PromptError> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| PromptError::Schema(format!("{}: invalid JSON: {e}", path.display())))?;
    let object = value.as_object().ok_or_else(|| {
        PromptError::Schema(format!("{}: top level must be an object", path.display()))
    })?;

    let mut prompts = BTreeMap::new();
    for (name, text) in object {
        let text = text.as_str().ok_or_else(|| {
            PromptError::Schema(format!(
                "{}: value for key '{name}' is not a string",
                path.display()
            ))
        })?;
        prompts.insert(name.clone(), text.to_string());
    }
    Ok(prompts)
}

/// Validate a JSON prompt file without loading it into a store
///
/// Checks that the file parses, the top level is an object, every key is a
/// non-empty string, and every value is a string. Fails with
/// [`PromptError::Schema`] naming the first offending key.
pub fn validate_json(path: impl AsRef<Path>) -> Result<(), PromptError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| PromptError::Schema(format!("{}: invalid JSON: {e}", path.display())))?;
    let object = value.as_object().ok_or_else(|| {
        PromptError::Schema(format!("{}: top level must be an object", path.display()))
    })?;

    for (name, text) in object {
        if name.is_empty() {
            return Err(PromptError::Schema(format!(
                "{}: empty prompt name",
                path.display()
            )));
        }
        if !text.is_string() {
            return Err(PromptError::Schema(format!(
                "{}: value for key '{name}' is not a string",
                path.display()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_json(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("prompts.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_flat_mapping() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"hello": "Say hello!", "test": "this is a test"}"#);

        let store = JsonPrompts::load(&path).unwrap();
        assert_eq!(store.names(), vec!["hello", "test"]);
        assert_eq!(store.get("test").unwrap(), "this is a test");
    }

    #[test]
    fn test_missing_name_is_not_found() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"hello": "Say hello!"}"#);

        let store = JsonPrompts::load(&path).unwrap();
        assert!(matches!(store.get("nope"), Err(PromptError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_non_object_top_level() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"["not", "a", "mapping"]"#);

        let err = JsonPrompts::load(&path).unwrap_err();
        assert!(matches!(err, PromptError::Schema(msg) if msg.contains("top level")));
    }

    #[test]
    fn test_load_rejects_non_string_value_eagerly() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"hello": "hi", "count": 3}"#);

        let err = JsonPrompts::load(&path).unwrap_err();
        assert!(matches!(err, PromptError::Schema(msg) if msg.contains("'count'")));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = JsonPrompts::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PromptError::Io(_)));
    }

    #[test]
    fn test_validate_json_accepts_valid_file() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"hello": "Say hello!"}"#);
        assert!(validate_json(&path).is_ok());
    }

    #[test]
    fn test_validate_json_rejects_empty_key() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"": "anonymous"}"#);

        let err = validate_json(&path).unwrap_err();
        assert!(matches!(err, PromptError::Schema(msg) if msg.contains("empty prompt name")));
    }

    #[test]
    fn test_validate_json_names_offending_key() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"config": {"nested": true}}"#);

        let err = validate_json(&path).unwrap_err();
        assert!(matches!(err, PromptError::Schema(msg) if msg.contains("'config'")));
    }

    #[test]
    fn test_add_prompt_after_load() {
        let dir = tempdir().unwrap();
        let path = write_json(dir.path(), r#"{"hello": "Say hello!"}"#);

        let mut store = JsonPrompts::load(&path).unwrap();
        store.add_prompt("extra", "Added later.").unwrap();
        assert_eq!(store.get("extra").unwrap(), "Added later.");
    }
}
