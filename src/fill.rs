//! Template filling
//!
//! Two substitution modes over `{{name}}` placeholder syntax, both pure:
//!
//! - [`fill_list`] - positional: unique placeholders in order of first
//!   appearance are zipped with a list of values
//! - [`TemplateFiller::fill_prompt`] - named: each `{{key}}` is replaced by
//!   the mapped value; rendering goes through handlebars, so the full
//!   expression/control-flow syntax is available as a superset
//!
//! Substituted values are inserted verbatim and never re-scanned, so a value
//! containing `{{b}}` stays the literal text `{{b}}`.

use std::collections::HashMap;
use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::debug;

use crate::error::PromptError;

/// `{{name}}` tokens; names are identifiers, optionally padded with spaces
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder regex"));

/// Fill placeholders positionally, in order of first appearance
///
/// The i-th value is bound to the i-th distinct placeholder name scanning
/// left to right, and every occurrence of that name is replaced. Fails with
/// [`PromptError::ArityMismatch`] when the number of values differs from the
/// number of distinct placeholders.
pub fn fill_list<S: AsRef<str>>(text: &str, values: &[S]) -> Result<String, PromptError> {
    let mut order: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        if !order.contains(&name) {
            order.push(name);
        }
    }

    if order.len() != values.len() {
        return Err(PromptError::ArityMismatch {
            placeholders: order.len(),
            values: values.len(),
        });
    }

    let bindings: HashMap<&str, &str> = order
        .iter()
        .zip(values)
        .map(|(name, value)| (*name, value.as_ref()))
        .collect();

    let filled = PLACEHOLDER.replace_all(text, |caps: &Captures| {
        bindings[caps.get(1).map_or("", |m| m.as_str())].to_string()
    });
    Ok(filled.into_owned())
}

/// Named substitution engine over handlebars
///
/// HTML escaping is disabled: prompts are plain text, and values must arrive
/// in the output byte-for-byte. Strict by default; [`TemplateFiller::lenient`]
/// renders missing keys as empty strings instead of failing.
pub struct TemplateFiller {
    hbs: Handlebars<'static>,
    strict: bool,
}

impl TemplateFiller {
    /// Strict filler: a placeholder without a substitution fails
    pub fn new() -> Self {
        Self::with_strictness(true)
    }

    /// Lenient filler: missing keys render as the empty string
    pub fn lenient() -> Self {
        Self::with_strictness(false)
    }

    fn with_strictness(strict: bool) -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(strict);
        Self { hbs, strict }
    }

    /// Replace each `{{key}}` with `substitutions[key]`
    ///
    /// Unused entries in the mapping are ignored. In strict mode a plain
    /// placeholder with no entry fails with [`PromptError::MissingKey`];
    /// richer expressions that cannot be resolved surface as
    /// [`PromptError::Template`].
    pub fn fill_prompt(
        &self,
        text: &str,
        substitutions: &HashMap<String, String>,
    ) -> Result<String, PromptError> {
        if self.strict {
            if let Some(key) = first_missing_key(text, substitutions) {
                return Err(PromptError::MissingKey(key));
            }
        }
        debug!(keys = substitutions.len(), "Filling prompt");
        Ok(self.hbs.render_template(text, substitutions)?)
    }

    /// Render with an arbitrary context, enabling loops and conditionals
    ///
    /// This is the full-templating superset of [`TemplateFiller::fill_prompt`]
    /// behind the same engine configuration.
    pub fn render<T: Serialize>(&self, text: &str, context: &T) -> Result<String, PromptError> {
        Ok(self.hbs.render_template(text, context)?)
    }
}

impl Default for TemplateFiller {
    fn default() -> Self {
        Self::new()
    }
}

/// First plain `{{ident}}` placeholder with no substitution entry
///
/// Block syntax (`{{#if}}`, `{{/each}}`) never matches the identifier
/// pattern; `else` and `this` are template keywords, not lookups.
fn first_missing_key(text: &str, substitutions: &HashMap<String, String>) -> Option<String> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|key| !matches!(*key, "else" | "this") && !substitutions.contains_key(*key))
        .map(str::to_string)
}
