use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Everything needed to open the remote store. Token and base id have
/// no defaults; their absence is fatal before any command runs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_url: String,
    pub api_token: String,
    pub base_id: String,
}

/// Application configuration with source tracking
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the tabular store API
    pub api_url: ConfigValue<String>,
    /// Access token for the store
    pub api_token: Option<ConfigValue<String>>,
    /// Base (namespace) holding the planner tables
    pub base_id: Option<ConfigValue<String>>,
    /// Table holding task records
    pub tasks_table: ConfigValue<String>,
    /// Table holding journal entries
    pub journal_table: ConfigValue<String>,
    /// Config file path used (if any)
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    api_token: Option<String>,
    base_id: Option<String>,
    tasks_table: Option<String>,
    journal_table: Option<String>,
}

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut api_token = None;
        let mut base_id = None;
        let mut tasks_table = ConfigValue::new("Tasks".to_string(), ConfigSource::Default);
        let mut journal_table = ConfigValue::new("Journal".to_string(), ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(token) = file_config.api_token {
                api_token = Some(ConfigValue::new(token, ConfigSource::File));
            }
            if let Some(base) = file_config.base_id {
                base_id = Some(ConfigValue::new(base, ConfigSource::File));
            }
            if let Some(table) = file_config.tasks_table {
                tasks_table = ConfigValue::new(table, ConfigSource::File);
            }
            if let Some(table) = file_config.journal_table {
                journal_table = ConfigValue::new(table, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("MACROPLAN_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(token) = std::env::var("MACROPLAN_API_TOKEN") {
            api_token = Some(ConfigValue::new(token, ConfigSource::Environment));
        }
        if let Ok(base) = std::env::var("MACROPLAN_BASE_ID") {
            base_id = Some(ConfigValue::new(base, ConfigSource::Environment));
        }
        if let Ok(table) = std::env::var("MACROPLAN_TASKS_TABLE") {
            tasks_table = ConfigValue::new(table, ConfigSource::Environment);
        }
        if let Ok(table) = std::env::var("MACROPLAN_JOURNAL_TABLE") {
            journal_table = ConfigValue::new(table, ConfigSource::Environment);
        }

        Ok(Self {
            api_url,
            api_token,
            base_id,
            tasks_table,
            journal_table,
            config_file,
        })
    }

    /// Store credentials, or the fatal startup error naming what is
    /// missing.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let api_token = self
            .api_token
            .as_ref()
            .ok_or(ConfigError::MissingApiToken)?;
        let base_id = self.base_id.as_ref().ok_or(ConfigError::MissingBaseId)?;
        Ok(Credentials {
            api_url: self.api_url.value.clone(),
            api_token: api_token.value.clone(),
            base_id: base_id.value.clone(),
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/macroplan/
    /// - macOS: ~/Library/Application Support/macroplan/
    /// - Windows: %APPDATA%/macroplan/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("macroplan")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    MissingApiToken,
    MissingBaseId,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::MissingApiToken => write!(
                f,
                "No API token configured. Set api_token in {} or MACROPLAN_API_TOKEN.",
                Config::default_config_path().display()
            ),
            ConfigError::MissingBaseId => write!(
                f,
                "No base id configured. Set base_id in {} or MACROPLAN_BASE_ID.",
                Config::default_config_path().display()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.value, DEFAULT_API_URL);
        assert_eq!(config.api_url.source, ConfigSource::Default);
        assert_eq!(config.tasks_table.value, "Tasks");
        assert_eq!(config.journal_table.value, "Journal");
        assert!(config.api_token.is_none());
        assert!(config.base_id.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_token: pat-secret").unwrap();
        writeln!(file, "base_id: appPlannerBase").unwrap();
        writeln!(file, "tasks_table: MyTasks").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        let token = config.api_token.as_ref().unwrap();
        assert_eq!(token.value, "pat-secret");
        assert_eq!(token.source, ConfigSource::File);
        assert_eq!(config.base_id.as_ref().unwrap().value, "appPlannerBase");
        assert_eq!(config.tasks_table.value, "MyTasks");
        assert_eq!(config.tasks_table.source, ConfigSource::File);
        assert_eq!(config.journal_table.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "base_id: fromfile").unwrap();

        std::env::set_var("MACROPLAN_BASE_ID", "fromenv");

        let config = Config::load(Some(config_path)).unwrap();
        let base = config.base_id.as_ref().unwrap();
        assert_eq!(base.value, "fromenv");
        assert_eq!(base.source, ConfigSource::Environment);

        std::env::remove_var("MACROPLAN_BASE_ID");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_credentials_require_token_and_base() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingApiToken)
        ));

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_token: pat-secret").unwrap();
        let config = Config::load(Some(config_path.clone())).unwrap();
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingBaseId)
        ));

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_token: pat-secret").unwrap();
        writeln!(file, "base_id: appPlannerBase").unwrap();
        let config = Config::load(Some(config_path)).unwrap();
        let creds = config.credentials().unwrap();
        assert_eq!(creds.api_url, DEFAULT_API_URL);
        assert_eq!(creds.api_token, "pat-secret");
        assert_eq!(creds.base_id, "appPlannerBase");
    }
}
