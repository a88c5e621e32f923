//! Configuration for the wtp binary

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::preprocess::PreprocessorConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default report path for `report` and `check`
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Make `check` fail on any mismatch even without `--strict`
    #[serde(default)]
    pub strict_check: bool,

    /// Settings for the `clean` subcommand
    #[serde(default)]
    pub preprocessor: PreprocessorConfig,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("prompts-report.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            strict_check: false,
            preprocessor: PreprocessorConfig::default(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("wtprompt").join("wtp.yml")),
            Some(PathBuf::from("wtp.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
