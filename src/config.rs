use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::summarizer::prompt::{DEFAULT_ACKNOWLEDGEMENT, DEFAULT_SYSTEM_PROMPT};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CondenseConfig {
    pub log: LogConfig,
    pub llm: LlmConfig,
    pub summarizer: SummarizerConfig,
    pub tokenizer: TokenizerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub context_window: usize,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SummarizerConfig {
    pub warning_threshold: f64,
    pub batch_target_fraction: f64,
    pub min_batches: usize,
    pub max_depth: usize,
    pub delimiter: String,
    pub system_prompt: String,
    pub acknowledgement: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TokenizerConfig {
    pub provider: String,
    pub cache_dir: String,
    pub url: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            context_window: 8192,
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            warning_threshold: 0.75,
            batch_target_fraction: 0.5,
            min_batches: 2,
            max_depth: 64,
            delimiter: " | ".into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.into(),
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        let cache_dir = default_condense_dir()
            .join("tokenizer")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "huggingface".into(),
            cache_dir,
            url: "https://huggingface.co/Xenova/gpt-4o/resolve/main/tokenizer.json".into(),
        }
    }
}

/// Returns `~/.condense/`
pub fn default_condense_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".condense")
}

/// Returns the default config file path: `~/.condense/config.toml`
pub fn default_config_path() -> PathBuf {
    default_condense_dir().join("config.toml")
}

impl CondenseConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            CondenseConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (CONDENSE_LOG_LEVEL, CONDENSE_MODEL,
    /// CONDENSE_BASE_URL, CONDENSE_CONTEXT_WINDOW, CONDENSE_TOKENIZER).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("CONDENSE_LOG_LEVEL") {
            self.log.level = val;
        }
        if let Ok(val) = std::env::var("CONDENSE_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("CONDENSE_BASE_URL") {
            self.llm.base_url = val;
        }
        if let Ok(val) = std::env::var("CONDENSE_CONTEXT_WINDOW") {
            self.llm.context_window = val
                .parse()
                .with_context(|| format!("CONDENSE_CONTEXT_WINDOW is not an integer: {val}"))?;
        }
        if let Ok(val) = std::env::var("CONDENSE_TOKENIZER") {
            self.tokenizer.provider = val;
        }
        Ok(())
    }

    /// Read the API key from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// Resolve the tokenizer cache directory, expanding `~` if needed.
    pub fn resolved_tokenizer_dir(&self) -> PathBuf {
        expand_tilde(&self.tokenizer.cache_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
