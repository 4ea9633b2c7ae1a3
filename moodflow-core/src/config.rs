//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/moodflow/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/moodflow/` (~/.config/moodflow/)
//! - State/Logs: `$XDG_STATE_HOME/moodflow/` (~/.local/state/moodflow/)
//!
//! Secrets (API keys, access tokens, the admin password) can live in the
//! config file or be supplied through environment variables.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Spreadsheet event-log configuration
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// LLM configuration for the insight narrator (optional)
    #[serde(default)]
    pub llm: Option<LlmConfig>,

    /// Slide-deck renderer configuration
    #[serde(default)]
    pub slides: SlidesConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Spreadsheet event-log configuration
///
/// The event log lives in one worksheet of a Google spreadsheet, columns
/// `A:F` = Timestamp, SessionID, Nickname, MoodScore, Emoticon, Comment.
#[derive(Debug, Deserialize, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet document id
    pub spreadsheet_id: Option<String>,

    /// Worksheet holding the event rows
    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// API endpoint override (defaults to the public Sheets v4 endpoint)
    pub endpoint: Option<String>,

    /// OAuth bearer token (can also use GOOGLE_ACCESS_TOKEN)
    pub access_token: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_sheets_timeout")]
    pub timeout_secs: u64,

    /// Max retry attempts for transient failures
    #[serde(default = "default_sheets_max_retries")]
    pub max_retries: usize,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet: default_worksheet(),
            endpoint: None,
            access_token: None,
            timeout_secs: default_sheets_timeout(),
            max_retries: default_sheets_max_retries(),
        }
    }
}

impl SheetsConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://sheets.googleapis.com";

    /// Resolve the bearer token from config or environment.
    pub fn resolved_token(&self) -> Option<String> {
        self.access_token
            .clone()
            .or_else(|| std::env::var("GOOGLE_ACCESS_TOKEN").ok())
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.as_deref().unwrap_or("").is_empty() {
            return Err(Error::Config(
                "sheets.spreadsheet_id is required".to_string(),
            ));
        }
        if self.worksheet.is_empty() {
            return Err(Error::Config("sheets.worksheet must not be empty".to_string()));
        }
        if self.resolved_token().is_none() {
            return Err(Error::Config(
                "sheets.access_token (or GOOGLE_ACCESS_TOKEN) is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_worksheet() -> String {
    "MoodData".to_string()
}

fn default_sheets_timeout() -> u64 {
    30
}

fn default_sheets_max_retries() -> usize {
    3
}

/// LLM provider configuration for the insight narrator
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Provider type
    pub provider: LlmProvider,
    /// Model to use
    pub model: String,
    /// API endpoint (optional, uses default for provider)
    pub endpoint: Option<String>,
    /// API key (can also use env var)
    pub api_key: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// Supported LLM providers
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama,
    Claude,
    OpenAI,
}

impl LlmProvider {
    /// Returns the default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::Claude => "https://api.anthropic.com",
            LlmProvider::OpenAI => "https://api.openai.com",
        }
    }
}

fn default_llm_timeout() -> u64 {
    60
}

/// Slide-deck renderer configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SlidesConfig {
    /// Slides API endpoint override
    pub endpoint: Option<String>,

    /// Drive API endpoint override (sharing and folder moves)
    pub drive_endpoint: Option<String>,

    /// OAuth bearer token (can also use GOOGLE_ACCESS_TOKEN)
    pub access_token: Option<String>,

    /// Optional Drive folder the finished deck is moved into
    pub folder_id: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_slides_timeout")]
    pub timeout_secs: u64,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            drive_endpoint: None,
            access_token: None,
            folder_id: None,
            timeout_secs: default_slides_timeout(),
        }
    }
}

impl SlidesConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://slides.googleapis.com";
    pub const DEFAULT_DRIVE_ENDPOINT: &'static str = "https://www.googleapis.com";

    /// Resolve the bearer token from config or environment.
    pub fn resolved_token(&self) -> Option<String> {
        self.access_token
            .clone()
            .or_else(|| std::env::var("GOOGLE_ACCESS_TOKEN").ok())
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.resolved_token().is_none() {
            return Err(Error::Config(
                "slides.access_token (or GOOGLE_ACCESS_TOKEN) is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_slides_timeout() -> u64 {
    60
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Admin password for report access (can also use MOODFLOW_ADMIN_PASSWORD)
    pub admin_password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            admin_password: None,
        }
    }
}

impl ServerConfig {
    /// Resolve the admin password from config or environment.
    pub fn resolved_admin_password(&self) -> Option<String> {
        self.admin_password
            .clone()
            .or_else(|| std::env::var("MOODFLOW_ADMIN_PASSWORD").ok())
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/moodflow/config.toml` (~/.config/moodflow/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("moodflow").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/moodflow/` (~/.local/state/moodflow/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("moodflow")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("moodflow.log")
    }
}
