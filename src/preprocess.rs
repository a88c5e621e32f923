//! Text preprocessing for filler values
//!
//! Callers run user-supplied filler text through [`TextPreprocessor`] before
//! substituting it into a prompt. The pipeline applies enabled steps in a
//! fixed order and short-circuits on the first failing check:
//!
//! 1. strip leading/trailing whitespace
//! 2. empty check
//! 3. letter-ratio check
//! 4. whitespace to single spaces
//! 5. collapse runs of spaces
//! 6. ASCII filter
//! 7. Unicode normalization
//! 8. minimum length check
//! 9. truncation
//!
//! `preprocess` returns `(ok, text)`; on failure `text` holds the value as of
//! the failing step.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::PromptError;

/// Unicode normalization forms accepted by the preprocessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalizeForm {
    #[serde(rename = "NFC")]
    Nfc,
    #[serde(rename = "NFKC")]
    Nfkc,
    #[serde(rename = "NFD")]
    Nfd,
    #[serde(rename = "NFKD")]
    Nfkd,
}

impl NormalizeForm {
    fn apply(self, text: &str) -> String {
        match self {
            NormalizeForm::Nfc => text.nfc().collect(),
            NormalizeForm::Nfkc => text.nfkc().collect(),
            NormalizeForm::Nfd => text.nfd().collect(),
            NormalizeForm::Nfkd => text.nfkd().collect(),
        }
    }
}

/// Preprocessor settings
///
/// Defaults: strip, reject empty input, and collapse whitespace (all other
/// checks off). Lengths and ratios are counted in characters, not bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Strip leading and trailing whitespace
    pub do_strip: bool,
    /// Fail when the text is empty after stripping
    pub check_empty: bool,
    /// Fail when the alphabetic ratio falls below `percentage_letters`
    pub check_letters: bool,
    /// Minimum alphabetic ratio, in (0, 1]
    pub percentage_letters: f64,
    /// Replace every whitespace character with a single space
    pub spaces_only: bool,
    /// Collapse runs of spaces longer than this; `None` leaves runs alone
    pub max_consecutive_spaces: Option<usize>,
    /// Drop non-ASCII characters
    pub ascii_only: bool,
    /// Unicode normalization form to apply, if any
    pub unicode_normalize: Option<NormalizeForm>,
    /// Fail when fewer characters than this remain
    pub min_length: Option<usize>,
    /// Clip to this many characters
    pub max_length: Option<usize>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            do_strip: true,
            check_empty: true,
            check_letters: false,
            percentage_letters: 0.85,
            spaces_only: true,
            max_consecutive_spaces: Some(2),
            ascii_only: false,
            unicode_normalize: None,
            min_length: None,
            max_length: None,
        }
    }
}

impl PreprocessorConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PromptError::Schema(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field ranges and cross-field constraints
    pub fn validate(&self) -> Result<(), PromptError> {
        if !(self.percentage_letters > 0.0 && self.percentage_letters <= 1.0) {
            return Err(PromptError::Schema(format!(
                "percentage_letters must be in (0, 1], got {}",
                self.percentage_letters
            )));
        }
        if self.max_consecutive_spaces == Some(0) {
            return Err(PromptError::Schema(
                "max_consecutive_spaces must be at least 1".to_string(),
            ));
        }
        if self.max_length == Some(0) {
            return Err(PromptError::Schema(
                "max_length must be at least 1".to_string(),
            ));
        }
        if let (Some(max), Some(min)) = (self.max_length, self.min_length) {
            if max < min {
                return Err(PromptError::Schema(format!(
                    "max_length ({max}) must not be smaller than min_length ({min})"
                )));
            }
        }
        Ok(())
    }
}

/// Validator and cleaner for filler text
#[derive(Debug, Clone, Default)]
pub struct TextPreprocessor {
    config: PreprocessorConfig,
}

impl TextPreprocessor {
    /// Build a preprocessor, validating the configuration up front
    pub fn new(config: PreprocessorConfig) -> Result<Self, PromptError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Run the pipeline; `(false, text)` means a check rejected the input
    pub fn preprocess(&self, text: &str) -> (bool, String) {
        let cfg = &self.config;
        let mut text = if cfg.do_strip {
            text.trim().to_string()
        } else {
            text.to_string()
        };

        if cfg.check_empty && text.is_empty() {
            return (false, text);
        }

        if cfg.check_letters && !has_letter_ratio(&text, cfg.percentage_letters) {
            return (false, text);
        }

        if cfg.spaces_only {
            text = text
                .chars()
                .map(|c| if c.is_whitespace() { ' ' } else { c })
                .collect();
        }

        if let Some(max) = cfg.max_consecutive_spaces {
            text = collapse_spaces(&text, max);
        }

        if cfg.ascii_only {
            text.retain(|c| c.is_ascii());
        }

        if let Some(form) = cfg.unicode_normalize {
            text = form.apply(&text);
        }

        if let Some(min) = cfg.min_length {
            if text.chars().count() < min {
                return (false, text);
            }
        }

        if let Some(max) = cfg.max_length {
            if text.chars().count() > max {
                text = text.chars().take(max).collect();
            }
        }

        (true, text)
    }
}

fn has_letter_ratio(text: &str, minimum: f64) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    letters as f64 / total as f64 >= minimum
}

fn collapse_spaces(text: &str, max: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == ' ' {
            run += 1;
            if run <= max {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn preprocessor(config: PreprocessorConfig) -> TextPreprocessor {
        TextPreprocessor::new(config).unwrap()
    }

    #[test]
    fn test_defaults_strip_and_collapse() {
        let pre = TextPreprocessor::default();
        assert_eq!(
            pre.preprocess(" this is a test.    Hello"),
            (true, "this is a test.  Hello".to_string())
        );
        assert_eq!(
            pre.preprocess("I wonder how\n\n\nthis works"),
            (true, "I wonder how  this works".to_string())
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        let pre = TextPreprocessor::default();
        assert_eq!(pre.preprocess(""), (false, String::new()));
        assert_eq!(pre.preprocess("   \n\t "), (false, String::new()));
    }

    #[test]
    fn test_collapse_to_single_space() {
        let pre = preprocessor(PreprocessorConfig {
            max_consecutive_spaces: Some(1),
            ..Default::default()
        });
        assert_eq!(pre.preprocess("a    b"), (true, "a b".to_string()));
    }

    #[test]
    fn test_letter_ratio_check() {
        let pre = preprocessor(PreprocessorConfig {
            check_letters: true,
            percentage_letters: 0.8,
            ..Default::default()
        });
        let (ok, _) = pre.preprocess("ab1237816237816312");
        assert!(!ok);
        let (ok, _) = pre.preprocess("abcdefgh12");
        assert!(ok);
    }

    #[test]
    fn test_ascii_filter() {
        let pre = preprocessor(PreprocessorConfig {
            ascii_only: true,
            ..Default::default()
        });
        assert_eq!(pre.preprocess("héllo wörld"), (true, "hllo wrld".to_string()));
    }

    #[test]
    fn test_unicode_normalization_nfc() {
        let pre = preprocessor(PreprocessorConfig {
            unicode_normalize: Some(NormalizeForm::Nfc),
            ..Default::default()
        });
        // "e" followed by a combining acute accent composes to a single char
        let (ok, text) = pre.preprocess("e\u{0301}");
        assert!(ok);
        assert_eq!(text, "\u{00e9}");
    }

    #[test]
    fn test_min_length_rejects_short_input() {
        let pre = preprocessor(PreprocessorConfig {
            min_length: Some(5),
            ..Default::default()
        });
        let (ok, text) = pre.preprocess("abc");
        assert!(!ok);
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let pre = preprocessor(PreprocessorConfig {
            max_length: Some(10),
            ..Default::default()
        });
        assert_eq!(
            pre.preprocess("abcdefghilmn hola"),
            (true, "abcdefghil".to_string())
        );
        // multi-byte characters count as one
        let (ok, text) = pre.preprocess("éééééééééééé");
        assert!(ok);
        assert_eq!(text.chars().count(), 10);
    }

    #[test]
    fn test_short_circuit_keeps_text_at_failing_step() {
        // fails the letter check before whitespace collapsing runs
        let pre = preprocessor(PreprocessorConfig {
            check_letters: true,
            percentage_letters: 0.99,
            ..Default::default()
        });
        let (ok, text) = pre.preprocess("12345    67890");
        assert!(!ok);
        assert_eq!(text, "12345    67890");
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(
            TextPreprocessor::new(PreprocessorConfig {
                percentage_letters: 0.0,
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            TextPreprocessor::new(PreprocessorConfig {
                max_consecutive_spaces: Some(0),
                ..Default::default()
            })
            .is_err()
        );
        assert!(
            TextPreprocessor::new(PreprocessorConfig {
                min_length: Some(10),
                max_length: Some(5),
                ..Default::default()
            })
            .is_err()
        );
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preprocessor.json");
        fs::write(
            &path,
            r#"{"check_letters": true, "max_length": 10, "unicode_normalize": "NFC"}"#,
        )
        .unwrap();

        let config = PreprocessorConfig::from_json_file(&path).unwrap();
        assert!(config.check_letters);
        assert_eq!(config.max_length, Some(10));
        assert_eq!(config.unicode_normalize, Some(NormalizeForm::Nfc));
        // untouched fields keep their defaults
        assert!(config.do_strip);
        assert_eq!(config.max_consecutive_spaces, Some(2));
    }

    #[test]
    fn test_config_from_json_file_rejects_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preprocessor.json");
        fs::write(&path, r#"{"percentage_letters": 2.0}"#).unwrap();

        let err = PreprocessorConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, PromptError::Schema(_)));
    }
}
