use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Environment variable holding the Telegram bot access token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the OpenWeatherMap API key.
pub const OWM_API_KEY_ENV: &str = "OWM_API_KEY";

/// Secrets for the two front-ends, stored on disk as TOML.
///
/// Each secret can also be supplied through its environment variable, which
/// takes precedence over the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Telegram bot access token.
    pub telegram_token: Option<String>,

    /// OpenWeatherMap API key.
    pub openweather_api_key: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-suite", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Telegram token: environment first, then config file.
    pub fn telegram_token(&self) -> Option<String> {
        pick(env::var(TELEGRAM_TOKEN_ENV).ok(), self.telegram_token.as_deref())
    }

    /// OpenWeatherMap API key: environment first, then config file.
    pub fn openweather_api_key(&self) -> Option<String> {
        pick(env::var(OWM_API_KEY_ENV).ok(), self.openweather_api_key.as_deref())
    }

    pub fn require_telegram_token(&self) -> Result<String> {
        self.telegram_token().ok_or_else(|| {
            anyhow!(
                "No Telegram bot token configured.\n\
                 Hint: set {TELEGRAM_TOKEN_ENV} or add `telegram_token` to {}.",
                config_path_display()
            )
        })
    }

    pub fn require_openweather_api_key(&self) -> Result<String> {
        self.openweather_api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeatherMap API key configured.\n\
                 Hint: set {OWM_API_KEY_ENV} or add `openweather_api_key` to {}.",
                config_path_display()
            )
        })
    }
}

/// Environment value wins over the file value; blank values count as unset.
fn pick(env_value: Option<String>, file_value: Option<&str>) -> Option<String> {
    env_value
        .filter(|v| !v.is_empty())
        .or_else(|| file_value.filter(|v| !v.is_empty()).map(str::to_string))
}

fn config_path_display() -> String {
    Config::config_file_path()
        .map_or_else(|_| "the config file".to_string(), |p| p.display().to_string())
}
