//! Editor settings
//!
//! Loaded from `~/.config/prisma/editor.toml` (or an explicit path); every
//! field has a default so a missing or partial file is fine. The TOML layer
//! is a separate struct with all-optional fields, folded over the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Example configuration file contents (bundled with the crate)
pub const EXAMPLE_CONFIG: &str = include_str!("editor.toml.example");

const DEFAULT_DEBOUNCE_MS: u64 = 1500;
const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: usize = 128;
const DEFAULT_RATE_LIMIT_REQUESTS: usize = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Editor core configuration
#[derive(Debug, Clone)]
pub struct EditorSettings {
    /// Idle period after the last edit before a batched save fires
    pub debounce_ms: u64,
    /// AI enhancement settings
    pub ai: AiSettings,
}

/// Settings for the AI enhancement client
#[derive(Debug, Clone)]
pub struct AiSettings {
    /// Inference endpoint URL
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one
    pub api_token: Option<String>,
    /// Request timeout
    pub timeout_secs: u64,
    /// TTL for cached enhancement responses
    pub cache_ttl_secs: u64,
    /// Maximum cached responses
    pub cache_capacity: usize,
    /// Maximum requests per rate-limit window
    pub rate_limit_requests: usize,
    /// Rate-limit window length
    pub rate_limit_window_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlSettings {
    debounce_ms: Option<u64>,
    #[serde(default)]
    ai: TomlAiSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlAiSettings {
    endpoint: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
    cache_ttl_secs: Option<u64>,
    cache_capacity: Option<usize>,
    rate_limit_requests: Option<usize>,
    rate_limit_window_secs: Option<u64>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ai: AiSettings::default(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            api_token: None,
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            rate_limit_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            rate_limit_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

impl EditorSettings {
    /// Default settings file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prisma")
            .join("editor.toml")
    }

    /// Load settings from the default location, falling back to defaults
    /// when the file is missing
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load settings from an explicit path; a missing or unparsable file
    /// yields the defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_toml_str(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings from TOML, folding present keys over the defaults
    pub fn from_toml_str(contents: &str) -> Self {
        let toml: TomlSettings = match toml::from_str(contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(error = %err, "invalid editor settings, using defaults");
                TomlSettings::default()
            }
        };

        let defaults = Self::default();
        let ai_defaults = defaults.ai;
        Self {
            debounce_ms: toml.debounce_ms.unwrap_or(defaults.debounce_ms),
            ai: AiSettings {
                endpoint: toml.ai.endpoint.unwrap_or(ai_defaults.endpoint),
                api_token: toml.ai.api_token.or(ai_defaults.api_token),
                timeout_secs: toml.ai.timeout_secs.unwrap_or(ai_defaults.timeout_secs),
                cache_ttl_secs: toml.ai.cache_ttl_secs.unwrap_or(ai_defaults.cache_ttl_secs),
                cache_capacity: toml.ai.cache_capacity.unwrap_or(ai_defaults.cache_capacity),
                rate_limit_requests: toml
                    .ai
                    .rate_limit_requests
                    .unwrap_or(ai_defaults.rate_limit_requests),
                rate_limit_window_secs: toml
                    .ai
                    .rate_limit_window_secs
                    .unwrap_or(ai_defaults.rate_limit_window_secs),
            },
        }
    }

    /// Debounce window as a [`Duration`]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EditorSettings::default();
        assert_eq!(settings.debounce_ms, 1500);
        assert_eq!(settings.ai.rate_limit_requests, 10);
    }

    #[test]
    fn test_partial_toml_folds_over_defaults() {
        let settings = EditorSettings::from_toml_str(
            r#"
            debounce_ms = 800

            [ai]
            api_token = "hf_test"
            "#,
        );
        assert_eq!(settings.debounce_ms, 800);
        assert_eq!(settings.ai.api_token.as_deref(), Some("hf_test"));
        assert_eq!(settings.ai.timeout_secs, DEFAULT_AI_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let settings = EditorSettings::from_toml_str("debounce_ms = \"not a number");
        assert_eq!(settings.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_example_config_parses() {
        let toml: Result<TomlSettings, _> = toml::from_str(EXAMPLE_CONFIG);
        assert!(toml.is_ok());
    }
}
