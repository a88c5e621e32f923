//! In-memory prompt store

use std::collections::BTreeMap;

use crate::error::PromptError;
use crate::store::{PromptStore, insert_prompt};

/// Store with no source binding, populated solely via `add_prompt`
///
/// Always query-ready; there is no load step.
#[derive(Debug, Default)]
pub struct MemoryPrompts {
    prompts: BTreeMap<String, String>,
    strict_inserts: bool,
}

impl MemoryPrompts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse `add_prompt` overwrites instead of replacing silently
    pub fn strict_inserts(mut self, strict: bool) -> Self {
        self.strict_inserts = strict;
        self
    }
}

impl PromptStore for MemoryPrompts {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty_and_queryable() {
        let store = MemoryPrompts::new();
        assert!(store.names().is_empty());
        assert!(matches!(store.get("hello"), Err(PromptError::NotFound(_))));
    }

    #[test]
    fn test_add_and_get() {
        let mut store = MemoryPrompts::new();
        store.add_prompt("hello", "Say hello!").unwrap();
        assert_eq!(store.get("hello").unwrap(), "Say hello!");
        assert_eq!(store.names(), vec!["hello"]);
    }

    #[test]
    fn test_overwrite_then_strict() {
        let mut store = MemoryPrompts::new();
        store.add_prompt("hello", "one").unwrap();
        store.add_prompt("hello", "two").unwrap();
        assert_eq!(store.get("hello").unwrap(), "two");

        let mut strict = MemoryPrompts::new().strict_inserts(true);
        strict.add_prompt("hello", "one").unwrap();
        assert!(matches!(
            strict.add_prompt("hello", "two"),
            Err(PromptError::Duplicate(_))
        ));
    }

    #[test]
    fn test_report_hashes_match_across_stores() {
        let mut a = MemoryPrompts::new();
        let mut b = MemoryPrompts::new();
        a.add_prompt("hello", "Say hello!").unwrap();
        b.add_prompt("hello", "Say hello!").unwrap();

        let ra = a.report().unwrap();
        let rb = b.report().unwrap();
        assert_eq!(ra.hash("hello"), rb.hash("hello"));
    }
}
