use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::fs::atomic_write;
use crate::gateway::DEFAULT_BASE_URL;
use crate::paths;

/// Model used when neither the CLI nor the config file names one.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// System instruction sent with every request unless overridden.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Upper bound on reply length, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Turns kept in the transcript before the oldest are dropped.
pub const DEFAULT_MAX_TURNS: usize = 100;
/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// What to do with reply text already printed when a stream fails midway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialReply {
    /// Drop the partial text and roll back the user turn.
    #[default]
    Discard,
    /// Commit the partial text as the assistant reply.
    Keep,
}

impl std::fmt::Display for PartialReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discard => f.write_str("discard"),
            Self::Keep => f.write_str("keep"),
        }
    }
}

/// Chat defaults in the `[chat]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub max_turns: Option<usize>,
    pub stream: Option<bool>,
    pub partial_reply: Option<PartialReply>,
}

/// API access settings in the `[api]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. a proxy in front of the hosted API.
    pub base_url: Option<String>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
}

impl ApiConfig {
    /// Name of the environment variable the key is read from.
    pub fn key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Gets the API key, preferring the environment variable over the config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(self.key_env())
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone().filter(|k| !k.is_empty())
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/chatter/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Resolved configuration after merging CLI arguments, config file and defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub max_turns: usize,
    pub stream: bool,
    pub partial_reply: PartialReply,
    pub base_url: String,
    pub api_key: String,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub max_turns: Option<usize>,
    pub stream: Option<bool>,
    pub partial_reply: Option<PartialReply>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI option, then config file, then built-in default.
///
/// # Errors
///
/// Returns an error if no API key is available or a bound is zero.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let chat = &config_file.chat;

    let max_tokens = options
        .max_tokens
        .or(chat.max_tokens)
        .unwrap_or(DEFAULT_MAX_TOKENS);
    if max_tokens == 0 {
        bail!("Invalid configuration: 'max_tokens' must be at least 1");
    }

    let max_turns = options
        .max_turns
        .or(chat.max_turns)
        .unwrap_or(DEFAULT_MAX_TURNS);
    if max_turns == 0 {
        bail!("Invalid configuration: 'max_turns' must be at least 1");
    }

    let Some(api_key) = config_file.api.get_api_key() else {
        let env_var = config_file.api.key_env();
        bail!(
            "Missing API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key under [api] in ~/.config/chatter/config.toml"
        );
    };

    Ok(ResolvedConfig {
        model: options
            .model
            .clone()
            .or_else(|| chat.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        system_prompt: chat
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        max_tokens,
        max_turns,
        stream: options.stream.or(chat.stream).unwrap_or(true),
        partial_reply: options
            .partial_reply
            .or(chat.partial_reply)
            .unwrap_or_default(),
        base_url: config_file
            .api
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_key,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/chatter/config.toml`
    /// or `~/.config/chatter/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        tracing::debug!(path = %self.config_path.display(), "loaded config file");
        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_write(&self.config_path, &contents)
    }

    /// Loads the config file, falling back to defaults.
    ///
    /// A missing file is normal; a file that exists but cannot be read or
    /// parsed is reported as a warning.
    pub fn load_or_default(&self) -> ConfigFile {
        if !self.config_path.exists() {
            return ConfigFile::default();
        }

        self.load().unwrap_or_else(|e| {
            crate::warn!("{e:#}; using defaults");
            ConfigFile::default()
        })
    }
}
