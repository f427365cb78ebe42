//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quill/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
    pub pomodoro_minutes: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_POMODORO_MINUTES: u32 = 25;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful writing assistant. \
    Help the user draft, revise, and polish their text. Offer concrete \
    suggestions, keep replies focused, and preserve the user's voice.";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub system_prompt: String,
    pub pomodoro_seconds: u32,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.quill/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quill").join("config.toml"))
}

/// Load config from `~/.quill/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and returns
/// `QuillConfig::default()`. If it exists but is malformed, returns
/// `ConfigError::Parse`.
pub fn load_config() -> Result<QuillConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QuillConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(QuillConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: QuillConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Quill Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model = "openai/gpt-4o-mini"
# system_prompt = "You are a helpful writing assistant."
# system_prompt_file = "system.md"   # Path relative to ~/.quill/
# pomodoro_minutes = 25

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars
/// → CLI. `cli_model` comes from the `--model` flag (None = not specified).
pub fn resolve(config: &QuillConfig, cli_model: Option<&str>) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli_model
        .map(|s| s.to_string())
        .or_else(|| std::env::var("QUILL_MODEL").ok())
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // System prompt: inline config wins over file, both win over default
    let system_prompt = resolve_system_prompt(config);

    // API key: env → config
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .ok()
        .or_else(|| config.openrouter.api_key.clone());

    // Base URL: env → config → gateway default
    let base_url = std::env::var("OPENROUTER_BASE_URL")
        .ok()
        .or_else(|| config.openrouter.base_url.clone());

    ResolvedConfig {
        model_name,
        system_prompt,
        pomodoro_seconds: config
            .general
            .pomodoro_minutes
            .unwrap_or(DEFAULT_POMODORO_MINUTES)
            * 60,
        api_key,
        base_url,
    }
}

/// Resolves the system prompt: inline wins over file, both win over default.
fn resolve_system_prompt(config: &QuillConfig) -> String {
    if let Some(ref prompt) = config.general.system_prompt {
        return prompt.clone();
    }

    // Try loading from system_prompt_file (relative to ~/.quill/)
    if let Some(ref file) = config.general.system_prompt_file {
        if let Some(home) = dirs::home_dir() {
            let prompt_path = home.join(".quill").join(file);
            match fs::read_to_string(&prompt_path) {
                Ok(contents) => {
                    let trimmed = contents.trim().to_string();
                    if !trimmed.is_empty() {
                        info!("Loaded system prompt from {}", prompt_path.display());
                        return trimmed;
                    }
                    warn!("System prompt file is empty: {}", prompt_path.display());
                }
                Err(e) => {
                    warn!(
                        "Failed to read system prompt file {}: {}",
                        prompt_path.display(),
                        e
                    );
                }
            }
        }
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = QuillConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.model_name, DEFAULT_MODEL);
        assert_eq!(resolved.pomodoro_seconds, 1500);
        assert!(resolved
            .system_prompt
            .starts_with("You are a helpful writing assistant"));
        assert!(resolved.base_url.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = QuillConfig {
            general: GeneralConfig {
                model: Some("my-model".to_string()),
                system_prompt: Some("Custom prompt.".to_string()),
                system_prompt_file: None,
                pomodoro_minutes: Some(50),
            },
            openrouter: OpenRouterConfig {
                api_key: Some("sk-test".to_string()),
                base_url: Some("http://localhost:9999/v1".to_string()),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.model_name, "my-model");
        assert_eq!(resolved.system_prompt, "Custom prompt.");
        assert_eq!(resolved.pomodoro_seconds, 3000);
        assert_eq!(resolved.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            resolved.base_url.as_deref(),
            Some("http://localhost:9999/v1")
        );
    }

    #[test]
    fn test_resolve_cli_model_wins() {
        let config = QuillConfig {
            general: GeneralConfig {
                model: Some("config-model".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("cli-model"));
        assert_eq!(resolved.model_name, "cli-model");
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
model = "my-model"
"#;
        let config: QuillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.model.as_deref(), Some("my-model"));
        assert!(config.general.system_prompt.is_none());
        assert!(config.openrouter.api_key.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
model = "openai/gpt-4o-mini"
pomodoro_minutes = 15

[openrouter]
api_key = "sk-test-123"
base_url = "http://192.168.1.100:1234/v1"
"#;
        let config: QuillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.pomodoro_minutes, Some(15));
        assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-test-123"));
    }

    #[test]
    fn test_inline_system_prompt_wins_over_file() {
        let config = QuillConfig {
            general: GeneralConfig {
                system_prompt: Some("Inline wins.".to_string()),
                system_prompt_file: Some("should-not-load.md".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.system_prompt, "Inline wins.");
    }
}
