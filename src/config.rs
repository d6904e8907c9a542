use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_DATABASE, DEFAULT_EXPORT_SOURCE, DEFAULT_LOG_DIR, DEFAULT_USER_AGENT,
};
use crate::error::{Result, ScraperError};
use chrono::Datelike;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "wt_scraper.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub continue_on_round_error: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            continue_on_round_error: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub export_source: String,
    /// Defaults to `World Tour Results <year>.csv` when unset
    pub export_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE),
            export_source: DEFAULT_EXPORT_SOURCE.to_string(),
            export_path: None,
        }
    }
}

impl StorageConfig {
    pub fn export_path(&self) -> PathBuf {
        self.export_path.clone().unwrap_or_else(|| {
            PathBuf::from(format!("World Tour Results {}.csv", chrono::Local::now().year()))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Loads `path` if given, else `wt_scraper.toml` when present, else the
    /// defaults; then applies `WT_DATABASE` and `WT_BASE_URL` from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.scraper.base_url.trim().is_empty() {
            return Err(ScraperError::Config("scraper.base_url must not be empty".into()));
        }
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db) = lookup("WT_DATABASE").filter(|v| !v.is_empty()) {
            self.storage.database_path = PathBuf::from(db);
        }
        if let Some(url) = lookup("WT_BASE_URL").filter(|v| !v.is_empty()) {
            self.scraper.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.scraper.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.storage.database_path, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.storage.export_source, "csv_output");
        assert!(!config.scraper.continue_on_round_error);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [scraper]
            continue_on_round_error = true
            timeout_seconds = 5

            [storage]
            database_path = "data/wt.db"
            export_path = "out.csv"
            "#,
        )
        .unwrap();
        assert!(config.scraper.continue_on_round_error);
        assert_eq!(config.scraper.timeout_seconds, 5);
        assert_eq!(config.scraper.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.storage.database_path, PathBuf::from("data/wt.db"));
        assert_eq!(config.storage.export_path(), PathBuf::from("out.csv"));
    }

    #[test]
    fn test_default_export_path_carries_year() {
        let path = StorageConfig::default().export_path();
        let name = path.to_string_lossy();
        assert!(name.starts_with("World Tour Results "));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "WT_DATABASE" => Some("other.db".to_string()),
            "WT_BASE_URL" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.storage.database_path, PathBuf::from("other.db"));
        assert_eq!(config.scraper.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_rejects_empty_base_url() {
        assert!(Config::from_toml("[scraper]\nbase_url = \"\"").is_err());
    }
}
