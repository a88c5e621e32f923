//! Folder-backed prompt store
//!
//! Prompts live as `.txt` and `.md` files under a root directory. The prompt
//! name is the file's path relative to the root, extension stripped, with
//! separators normalized to `/`:
//!
//! ```text
//! prompts/
//! ├── hello.txt            -> "hello"
//! └── summaries/
//!     └── short.md         -> "summaries/short"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::PromptError;
use crate::report::{IntegrityIssue, PromptReport};
use crate::store::{PromptStore, insert_prompt};

const PROMPT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Lifecycle of a folder store: no filesystem access happens in `Unbound`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreState {
    Unbound,
    Loaded,
}

/// Lazy store over a directory tree of `.txt`/`.md` prompt files
///
/// Construction binds the root but touches nothing on disk; every query
/// before [`FolderPrompts::load`] fails with [`PromptError::NotLoaded`].
/// Reloading is idempotent and overwrites the previous contents.
#[derive(Debug)]
pub struct FolderPrompts {
    root: PathBuf,
    prompts: BTreeMap<String, String>,
    state: StoreState,
    strict_inserts: bool,
}

impl FolderPrompts {
    /// Bind a store to `root` without reading anything
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prompts: BTreeMap::new(),
            state: StoreState::Unbound,
            strict_inserts: false,
        }
    }

    /// Refuse `add_prompt` overwrites instead of replacing silently
    pub fn strict_inserts(mut self, strict: bool) -> Self {
        self.strict_inserts = strict;
        self
    }

    /// The bound root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root recursively and (re)load every prompt file
    ///
    /// Files sharing a stem (`a.md` and `a.txt`) map to the same name; the
    /// walk is sorted, so `.txt` wins deterministically.
    pub fn load(&mut self) -> Result<(), PromptError> {
        let mut prompts = BTreeMap::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !ext.is_some_and(|e| PROMPT_EXTENSIONS.contains(&e)) {
                continue;
            }
            let name = prompt_name(&self.root, path)?;
            let text = fs::read_to_string(path)?;
            debug!(name = %name, path = %path.display(), "Loaded prompt file");
            prompts.insert(name, text);
        }
        self.prompts = prompts;
        self.state = StoreState::Loaded;
        info!(root = %self.root.display(), count = self.prompts.len(), "Loaded prompts from folder");
        Ok(())
    }

    /// Reload the folder and verify it against a saved report
    ///
    /// With `strict` set, any drift (changed, missing, or unexpected names)
    /// fails with [`PromptError::Integrity`] listing every offending name.
    /// Otherwise the issues are returned for the caller to inspect; an empty
    /// list means the folder matches the report exactly.
    pub fn load_from_prompt_report(
        &mut self,
        path: impl AsRef<Path>,
        strict: bool,
    ) -> Result<Vec<IntegrityIssue>, PromptError> {
        self.load()?;
        let expected = PromptReport::load(path)?;
        let issues = expected.verify_against(&self.report()?);
        if !issues.is_empty() {
            info!(count = issues.len(), strict, "Prompt report mismatch");
            if strict {
                return Err(PromptError::Integrity(issues));
            }
        }
        Ok(issues)
    }

    fn require_loaded(&self) -> Result<(), PromptError> {
        match self.state {
            StoreState::Loaded => Ok(()),
            StoreState::Unbound => Err(PromptError::NotLoaded),
        }
    }
}

impl PromptStore for FolderPrompts {
    fn names(&self) -> Vec<String> {
        self.prompts.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Result<&str, PromptError> {
        self.require_loaded()?;
        self.prompts
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))
    }

    fn add_prompt(&mut self, name: &str, text: &str) -> Result<(), PromptError> {
        self.require_loaded()?;
        insert_prompt(&mut self.prompts, name, text, self.strict_inserts)
    }
}

/// Derive the prompt name from a file path relative to the store root
fn prompt_name(root: &Path, path: &Path) -> Result<String, PromptError> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| io::Error::other(format!("{} is outside the prompt root", path.display())))?;
    let rel = rel.with_extension("");
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
