//! Prompt stores
//!
//! A store maps prompt names to prompt text. Three variants share the
//! [`PromptStore`] trait:
//!
//! - [`FolderPrompts`] - lazy, hierarchical, loaded from a directory tree
//! - [`JsonPrompts`] - eager, flat, loaded from a JSON dictionary
//! - [`MemoryPrompts`] - manual, populated through `add_prompt` only

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PromptError;
use crate::report::PromptReport;

mod folder;
mod json;
mod memory;

pub use folder::FolderPrompts;
pub use json::{JsonPrompts, validate_json};
pub use memory::MemoryPrompts;

/// Common capability of every prompt store
///
/// `get` is the exact-name accessor; [`PromptStore::resolve`] additionally
/// accepts platform-separated paths for nested names. Both read the same
/// underlying map.
pub trait PromptStore {
    /// Sorted names of every prompt currently held
    fn names(&self) -> Vec<String>;

    /// Text of the prompt registered under exactly `name`
    fn get(&self, name: &str) -> Result<&str, PromptError>;

    /// Insert a prompt, overwriting any existing text under `name`
    ///
    /// Stores configured with strict inserts refuse to overwrite and fail
    /// with [`PromptError::Duplicate`] instead.
    fn add_prompt(&mut self, name: &str, text: &str) -> Result<(), PromptError>;

    /// Look up a prompt by delimited path, e.g. `"subfolder/prompt"`
    ///
    /// Accepts `/` or the platform separator; separators are normalized to
    /// `/` before the lookup.
    fn resolve(&self, path: &str) -> Result<&str, PromptError> {
        self.get(&normalize_name(path))
    }

    /// Hash every loaded prompt into a [`PromptReport`]
    fn report(&self) -> Result<PromptReport, PromptError> {
        let mut hashes = BTreeMap::new();
        for name in self.names() {
            let hash = crate::report::content_hash(self.get(&name)?);
            hashes.insert(name, hash);
        }
        Ok(PromptReport::from_hashes(hashes))
    }

    /// Save a report of the current contents to `path` (`.json` appended)
    fn save_prompt_report(&self, path: &Path) -> Result<PathBuf, PromptError> {
        self.report()?.save(path)
    }
}

/// Normalize a delimited prompt path to the canonical `/` form
pub(crate) fn normalize_name(path: &str) -> String {
    path.replace('\\', "/")
}

/// Shared insert respecting the store's strict-insert setting
pub(crate) fn insert_prompt(
    prompts: &mut BTreeMap<String, String>,
    name: &str,
    text: &str,
    strict: bool,
) -> Result<(), PromptError> {
    if strict && prompts.contains_key(name) {
        return Err(PromptError::Duplicate(name.to_string()));
    }
    prompts.insert(name.to_string(), text.to_string());
    Ok(())
}
