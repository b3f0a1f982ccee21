use serde::{Deserialize, Serialize};

use crate::scoring::Model;

/// User configuration.
///
/// Example YAML:
/// ```yaml
/// sort: true
/// default_model: rice
/// export_path: prioritization_results.csv
/// theme: auto
/// suggest:
///   endpoint: https://api-inference.huggingface.co/models/gpt2
///   timeout: 10s
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Show and export rows ranked by priority instead of entry order
    #[serde(default)]
    pub sort: bool,

    /// Preselected model in the interactive session
    #[serde(default)]
    pub default_model: Option<Model>,

    /// Where exports are written (default: prioritization_results.csv)
    #[serde(default)]
    pub export_path: Option<String>,

    /// TUI palette
    #[serde(default)]
    pub theme: ThemeMode,

    /// Model suggestion service; suggestions are disabled when absent
    #[serde(default)]
    pub suggest: Option<SuggestConfig>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

/// Text-generation endpoint used for model suggestions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SuggestConfig {
    /// Full URL the prompt is POSTed to
    pub endpoint: String,

    /// Overall time budget, humantime format (default: "10s")
    #[serde(default)]
    pub timeout: Option<String>,

    /// Generation length passed to the service (default: 50)
    #[serde(default)]
    pub max_length: Option<u32>,

    /// Retries after the first attempt (default: 2)
    #[serde(default)]
    pub retries: Option<usize>,
}

pub const DEFAULT_SUGGEST_TIMEOUT: &str = "10s";
pub const DEFAULT_MAX_LENGTH: u32 = 50;
pub const DEFAULT_RETRIES: usize = 2;

impl SuggestConfig {
    pub fn timeout_str(&self) -> &str {
        self.timeout.as_deref().unwrap_or(DEFAULT_SUGGEST_TIMEOUT)
    }
}
