use fittrack_core::UserProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
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

/// Remote sync configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Backend URL (e.g., "https://project.supabase.co")
    pub server_url: Option<String>,
    /// Public API key sent with every request
    pub api_key: Option<String>,
    /// Signed-in user id; sync is disabled without one
    pub user_id: Option<String>,
    /// Session token for the signed-in user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Pull before read commands and push after writes (default: false)
    #[serde(default)]
    pub auto_sync: bool,
}

impl SyncConfig {
    /// Returns true if sync is configured (server_url, api_key and user_id)
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some() && self.api_key.is_some() && self.user_id.is_some()
    }
}

/// Nutrition lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NutritionApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Use random estimates instead of calling the API
    #[serde(default)]
    pub use_mock: bool,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the local JSON stores
    pub data_dir: ConfigValue<PathBuf>,
    /// Athlete profile and nutrition goals
    pub profile: ConfigValue<UserProfile>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Sync configuration
    pub sync: SyncConfig,
    /// Nutrition lookup configuration
    pub nutrition_api: NutritionApiConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    profile: Option<UserProfile>,
    sync: Option<SyncConfig>,
    nutrition_api: Option<NutritionApiConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut profile = ConfigValue::new(UserProfile::default(), ConfigSource::Default);
        let mut config_file = None;
        let mut sync = SyncConfig::default();
        let mut nutrition_api = NutritionApiConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(p) = file_config.profile {
                profile = ConfigValue::new(p, ConfigSource::File);
            }
            if let Some(sync_config) = file_config.sync {
                sync = sync_config;
            }
            if let Some(api) = file_config.nutrition_api {
                nutrition_api = api;
            }
        }

        if let Ok(dir) = std::env::var("FIT_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("FIT_SYNC_URL") {
            sync.server_url = Some(url);
        }
        if let Ok(key) = std::env::var("FIT_SYNC_API_KEY") {
            sync.api_key = Some(key);
        }
        if let Ok(user) = std::env::var("FIT_USER_ID") {
            sync.user_id = Some(user);
        }
        if let Ok(token) = std::env::var("FIT_ACCESS_TOKEN") {
            sync.access_token = Some(token);
        }
        if let Ok(key) = std::env::var("FIT_NUTRITION_API_KEY") {
            nutrition_api.api_key = Some(key);
        }

        Ok(Self {
            data_dir,
            profile,
            config_file,
            sync,
            nutrition_api,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/fit/
    /// - macOS: ~/Library/Application Support/fit/
    /// - Windows: %APPDATA%/fit/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fit")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/fit/
    /// - macOS: ~/Library/Application Support/fit/
    /// - Windows: %APPDATA%/fit/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fit")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
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
        }
    }
}

impl std::error::Error for ConfigError {}
