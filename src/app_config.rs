use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Remote article service settings
    #[serde(default)]
    pub article: ArticleConfig,

    /// Speech playback settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Remote article service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ArticleConfig {
    /// MediaWiki API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Namespace random articles are drawn from (0 = main/article namespace)
    #[serde(default)]
    pub namespace: i32,

    /// Requested thumbnail width in pixels
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request; Wikimedia rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            namespace: 0,
            thumbnail_size: default_thumbnail_size(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Speech playback configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    /// Language code voices are filtered by
    #[serde(default = "default_speech_language")]
    pub language: String,

    /// Synthesizer executable
    #[serde(default = "default_speech_program")]
    pub program: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: default_speech_language(),
            program: default_speech_program(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_thumbnail_size() -> u32 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("wikilibs/{} (fill-in-the-blank reader)", env!("CARGO_PKG_VERSION"))
}

fn default_speech_language() -> String {
    "en".to_string()
}

fn default_speech_program() -> String {
    "espeak-ng".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration, writing the defaults to `path` first if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.speech.language)?;

        let endpoint = Url::parse(&self.article.endpoint)
            .with_context(|| format!("Invalid article endpoint: {}", self.article.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!("Article endpoint must use http or https: {}", endpoint));
        }

        if self.article.thumbnail_size == 0 {
            return Err(anyhow!("Thumbnail size must be greater than zero"));
        }

        if self.article.timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be greater than zero"));
        }

        if self.speech.program.trim().is_empty() {
            return Err(anyhow!("Speech program must not be empty"));
        }

        Ok(())
    }
}
