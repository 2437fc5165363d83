//! Configuration loading from `~/.engram/config.toml` with defaults.
//!
//! Parse or read failures never abort startup: they log a warning and fall
//! back to defaults, the same way a corrupt memory file falls back to an
//! empty collection.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn default_working_memory_capacity() -> usize {
    10
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_memory_dir() -> PathBuf {
    engram_home().join("memory")
}

/// Engram configuration, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    /// Directory holding the persisted memory files.
    pub memory_dir: PathBuf,
    /// Maximum number of items held in working memory.
    pub working_memory_capacity: usize,
    /// Model identifier passed to the LLM driver.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature for completions.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
    /// Default log level when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for EngramConfig {
    fn default() -> Self {
        Self {
            memory_dir: default_memory_dir(),
            working_memory_capacity: default_working_memory_capacity(),
            model: default_model(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            log_level: default_log_level(),
        }
    }
}

impl EngramConfig {
    /// Render the default configuration as commented TOML for `engram init`.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Load configuration from a TOML file, with defaults.
///
/// A missing file is normal (first run); an unreadable or unparsable file
/// logs a warning and yields defaults.
pub fn load_config(path: Option<&Path>) -> EngramConfig {
    let config_path = path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        info!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        return EngramConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<EngramConfig>(&contents) {
            Ok(config) => {
                info!(path = %config_path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %config_path.display(),
                    "Failed to parse config, using defaults"
                );
                EngramConfig::default()
            }
        },
        Err(e) => {
            warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to read config file, using defaults"
            );
            EngramConfig::default()
        }
    }
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    engram_home().join("config.toml")
}

/// Get the default Engram home directory.
pub fn engram_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".engram")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.working_memory_capacity, 10);
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_config_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "model = \"gpt-4o\"").unwrap();
        writeln!(f, "working_memory_capacity = 4").unwrap();
        drop(f);

        let config = load_config(Some(&path));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.working_memory_capacity, 4);
        // Unspecified fields keep their defaults
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1000);
    }

    #[test]
    fn test_load_config_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [not valid toml").unwrap();

        let config = load_config(Some(&path));
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_default_toml_round_trips() {
        let rendered = EngramConfig::default_toml();
        let parsed: EngramConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.api_key_env, "OPENAI_API_KEY");
    }
}
