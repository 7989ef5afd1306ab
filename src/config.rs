// Configuration loading and parsing (ambercards.toml, credentials.toml,
// GEMINI_API_KEY environment override).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::deck::{DEFAULT_CARD_COUNT, MAX_CARD_COUNT, MIN_CARD_COUNT};

/// Environment variable consulted for the provider API key. Takes precedence
/// over `config/credentials.toml`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
    pub credentials: CredentialsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            llm: LlmConfig::default(),
            generation: GenerationConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ambercards.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for ambercards.toml. Both sections are
/// optional; missing sections fall back to defaults.
#[derive(Debug, Clone, Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    llm: LlmConfig,
    #[serde(default)]
    generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider model identifier.
    pub model: String,
    /// Cap on generated output tokens per request.
    pub max_output_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            model: "gemini-3-flash-preview".to_string(),
            max_output_tokens: 4096,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Card count pre-selected in the form.
    pub default_count: u8,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            default_count: DEFAULT_CARD_COUNT,
        }
    }
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub gemini_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load configuration from the per-user config directory (or the working
/// directory's `config/` when no project dir is available), overlaying the
/// `GEMINI_API_KEY` environment variable on whatever the credentials file
/// provides. Every file is optional; defaults apply.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = config_base_dir();
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    load_config_from(&base_dir, env_key)
}

/// Load configuration rooted at `base_dir`, with `env_key` standing in for
/// the process environment. Split out from `load_config` so tests can use
/// temp dirs and fixed keys.
pub fn load_config_from(
    base_dir: &Path,
    env_key: Option<String>,
) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- ambercards.toml (optional) ---
    let settings_path = config_dir.join("ambercards.toml");
    let settings: SettingsFile = if settings_path.exists() {
        let text = read_file(&settings_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: settings_path.clone(),
            source: e,
        })?
    } else {
        SettingsFile::default()
    };

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let file_credentials: CredentialsConfig = if credentials_path.exists() {
        let text = read_file(&credentials_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        llm: settings.llm,
        generation: settings.generation,
        credentials: CredentialsConfig {
            gemini_api_key: resolve_api_key(file_credentials.gemini_api_key, env_key),
        },
    };

    validate(&config)?;

    Ok(config)
}

/// Pick the effective API key: environment first, then the credentials file.
/// Empty strings count as absent.
pub fn resolve_api_key(
    file_key: Option<String>,
    env_key: Option<String>,
) -> Option<String> {
    env_key
        .filter(|k| !k.trim().is_empty())
        .or(file_key.filter(|k| !k.trim().is_empty()))
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let count = config.generation.default_count;
    if !(MIN_CARD_COUNT..=MAX_CARD_COUNT).contains(&count) {
        return Err(ConfigError::ValidationError {
            field: "generation.default_count".to_string(),
            message: format!(
                "must be between {MIN_CARD_COUNT} and {MAX_CARD_COUNT}, got {count}"
            ),
        });
    }
    if config.llm.model.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "llm.model".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if config.llm.max_output_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_output_tokens".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Directories
// ---------------------------------------------------------------------------

/// Base directory that holds `config/`. Prefers the per-user project dir
/// (e.g. `~/.config/ambercards` on Linux); falls back to the working
/// directory so a checkout-local `config/` keeps working.
pub fn config_base_dir() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "ambercards") {
        let base = dirs.config_dir();
        if base.join("config").exists() {
            return base.to_path_buf();
        }
    }
    PathBuf::from(".")
}

/// Directory for log files, created on demand by the caller.
pub fn log_dir() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "ambercards") {
        return dirs.data_dir().join("logs");
    }
    PathBuf::from("logs")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
