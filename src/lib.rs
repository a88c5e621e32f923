//! wtprompt - a lightweight, no-nonsense library for managing LLM prompts
//!
//! Keeps long prompt text out of source code while still referencing prompts
//! as named values: load them from a folder tree or a JSON dictionary, fill
//! `{{name}}` placeholders with runtime values, and verify prompt integrity
//! across loads with content-hash reports.
//!
//! # Core Concepts
//!
//! - **Named stores**: a prompt's name is derived from its file path
//!   (`prompts/sub/hello.txt` -> `sub/hello`), its JSON key, or given directly
//! - **Explicit loading**: folder stores touch the filesystem only on
//!   `load()`; queries before that fail with a dedicated error
//! - **Hash-based integrity**: reports record `{name -> sha256}` so drift
//!   between an expected prompt set and what is on disk fails loudly
//! - **Non-recursive filling**: substituted values are inserted verbatim,
//!   never re-scanned for further placeholders
//!
//! # Modules
//!
//! - [`store`] - the [`PromptStore`] trait and its folder/JSON/memory variants
//! - [`report`] - content hashing and integrity reports
//! - [`fill`] - positional and named placeholder substitution
//! - [`preprocess`] - validation and cleanup of filler text
//! - [`config`] - configuration for the `wtp` binary
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```ignore
//! use wtprompt::{FolderPrompts, PromptStore, TemplateFiller};
//!
//! let mut prompts = FolderPrompts::new("prompts");
//! prompts.load()?;
//! let filler = TemplateFiller::new();
//! let text = filler.fill_prompt(prompts.get("hello")?, &substitutions)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fill;
pub mod preprocess;
pub mod report;
pub mod store;

pub use config::Config;
pub use error::PromptError;
pub use fill::{TemplateFiller, fill_list};
pub use preprocess::{NormalizeForm, PreprocessorConfig, TextPreprocessor};
pub use report::{IntegrityIssue, PromptReport, content_hash};
pub use store::{FolderPrompts, JsonPrompts, MemoryPrompts, PromptStore, validate_json};
