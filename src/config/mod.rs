//! Configuration management.
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file, `BOOK_FINDER_*` environment variables, then command-line flags.
//! Nested keys use a double underscore, e.g. `BOOK_FINDER_API__BASE_URL`.

mod file_config;

pub use file_config::{read_config_file, write_config_file, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{DEFAULT_QUERY, DEFAULT_SORT, OPEN_LIBRARY_BASE};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::utils::DEFAULT_USER_AGENT;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BOOK_FINDER";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "book-finder.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Result display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Search API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host serving `search.json`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sort mode passed with each search
    #[serde(default = "default_sort")]
    pub sort: String,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sort: default_sort(),
            user_agent: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

fn default_base_url() -> String {
    OPEN_LIBRARY_BASE.to_string()
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Result display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Items per page; 0 falls back to 1
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Author searched at startup
    #[serde(default = "default_query")]
    pub default_query: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_query: default_query(),
        }
    }
}

impl DisplayConfig {
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_size).unwrap_or(NonZeroUsize::MIN)
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Load configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// `<config dir>/book-finder/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("book-finder").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://openlibrary.org");
        assert_eq!(config.api.sort, "new");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.display.page_size, 10);
        assert_eq!(config.display.default_query, "tolkien");
        assert!(config.api.user_agent().starts_with("book-finder/"));
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let display = DisplayConfig {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(display.page_size().get(), 1);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book-finder.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://localhost:9000\"\n\n[display]\npage_size = 25\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.sort, "new");
        assert_eq!(config.display.page_size, 25);
        assert_eq!(config.display.default_query, "tolkien");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
    }
}
