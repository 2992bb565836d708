//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`MEMCHAT_*`, plus `SESSION_STORAGE_PATH`)
//! 2. Config file (`MEMCHAT_CONFIG`, or `memchat/config.toml` in the user's
//!    config directory)
//! 3. Defaults

use crate::core::DEFAULT_KEEP_COUNT;
use crate::error::{Error, Result};
use crate::responder::{CommandResponder, Responder};
use crate::summarizer::{CommandSummarizer, DEFAULT_MAX_WORDS, Summarizer, TranscriptSummarizer};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Storage directory used when nothing else is configured.
const DEFAULT_STORAGE_PATH: &str = "./sessions";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Cleanup configuration.
    pub cleanup: CleanupConfig,

    /// Summarizer configuration.
    pub summarizer: SummarizerConfig,

    /// Responder configuration for `chat`.
    pub responder: ResponderConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `sessions.json` and `summaries.json`.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

/// Cleanup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Number of most recent sessions kept by `clean`.
    pub keep_count: usize,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            keep_count: DEFAULT_KEEP_COUNT,
        }
    }
}

/// Summarizer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// External program that reads a prompt on stdin and prints a summary.
    /// Empty to use the built-in summarizer.
    pub command: String,

    /// Arguments passed to `command`.
    pub args: Vec<String>,

    /// Word limit requested from the summarizer.
    pub max_words: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            max_words: DEFAULT_MAX_WORDS,
        }
    }
}

impl SummarizerConfig {
    /// Build the configured summarizer.
    #[must_use]
    pub fn build(&self) -> Box<dyn Summarizer> {
        if self.command.trim().is_empty() {
            Box::new(TranscriptSummarizer::new(self.max_words))
        } else {
            Box::new(CommandSummarizer::new(
                self.command.trim(),
                self.args.clone(),
                self.max_words,
            ))
        }
    }
}

/// Responder configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// External program that reads a JSON message list on stdin and prints
    /// the assistant's reply.
    pub command: String,

    /// Arguments passed to `command`.
    pub args: Vec<String>,
}

impl ResponderConfig {
    /// Build the configured responder.
    ///
    /// # Errors
    ///
    /// Returns an error if no responder command is configured.
    pub fn build(&self) -> Result<Box<dyn Responder>> {
        let command = self.command.trim();
        if command.is_empty() {
            return Err(Error::Config(
                "no responder configured; set [responder] command or MEMCHAT_RESPONDER".to_string(),
            ));
        }
        Ok(Box::new(CommandResponder::new(command, self.args.clone())))
    }
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    // Try to load config file
    if let Some(config_path) = get_config_path() {
        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
            config = toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))?;
        }
    }

    // Override with environment variables
    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the path to the config file.
fn get_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("MEMCHAT_CONFIG") {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| dir.join("memchat").join("config.toml"))
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    // Storage path
    if let Ok(path) = env::var("MEMCHAT_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Ok(path) = env::var("SESSION_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    }

    // Cleanup
    if let Ok(val) = env::var("MEMCHAT_KEEP_COUNT") {
        if let Ok(count) = val.parse() {
            config.cleanup.keep_count = count;
        }
    }

    // Summarizer
    if let Ok(command) = env::var("MEMCHAT_SUMMARIZER") {
        config.summarizer.command = command;
    }

    // Responder
    if let Ok(command) = env::var("MEMCHAT_RESPONDER") {
        config.responder.command = command;
    }
}
