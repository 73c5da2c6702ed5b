use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured endpoint URL.
pub const ENDPOINT_ENV: &str = "CHATLINE_ENDPOINT";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the chat form posts to
    pub endpoint_url: String,

    /// Request timeout for a single round trip, in seconds
    pub request_timeout_secs: u64,

    /// Tracing filter used when RUST_LOG is unset
    pub log_level: String,

    /// Reply typing animation
    pub reveal: RevealConfig,

    /// UI preferences
    pub ui: UiConfig,

    /// Chatline home directory
    #[serde(skip)]
    pub home: PathBuf,
}

/// Per-character delay bounds for the reply animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Preset prompts offered on the welcome screen (F1..F4)
    pub quick_actions: Vec<String>,
    /// Height cap of the input box, in lines
    pub max_input_lines: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint_url: "http://127.0.0.1:8000/api/message/".to_string(),
            request_timeout_secs: 120,
            log_level: "info".to_string(),
            reveal: RevealConfig::default(),
            ui: UiConfig::default(),
            home: default_home(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 20,
            max_delay_ms: 50,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            quick_actions: vec![
                "My computer is running slowly".to_string(),
                "My screen stays black after boot".to_string(),
                "I can't connect to Wi-Fi".to_string(),
                "My laptop overheats".to_string(),
            ],
            max_input_lines: 5,
        }
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatline")
}

impl RevealConfig {
    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".chatline").join("config.toml"))
    }

    /// Load configuration from `path` (or the default location) and apply
    /// the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = Self::load_file(&config_path)?;
        if let Some(home) = config_path.parent() {
            config.home = home.to_path_buf();
        }

        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            if !url.trim().is_empty() {
                config.endpoint_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn load_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Write the default configuration to `path` unless a file already exists
    pub fn init_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(path, Config::default().to_toml()?).context("Failed to write config file")?;
        Ok(true)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint_url.trim().is_empty() {
            bail!("endpoint_url must not be empty");
        }
        if self.reveal.min_delay_ms >= self.reveal.max_delay_ms {
            bail!(
                "reveal.min_delay_ms ({}) must be below reveal.max_delay_ms ({})",
                self.reveal.min_delay_ms,
                self.reveal.max_delay_ms
            );
        }
        if self.ui.max_input_lines == 0 {
            bail!("ui.max_input_lines must be at least 1");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// File the tracing subscriber appends to
    pub fn log_path(&self) -> PathBuf {
        self.home.join("chatline.log")
    }
}
