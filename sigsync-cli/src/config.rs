use serde::{Deserialize, Serialize};
use sigsync_core::api::DEFAULT_API_URL;
use sigsync_core::{
    mask_secret, ApiClient, BearerToken, FirestoreClient, FirestoreError, FirestoreSettings,
};
use std::path::PathBuf;

use crate::token::TokenStore;

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

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the relational API (e.g. "http://localhost:3333/api")
    pub api_url: ConfigValue<String>,
    /// Directory holding the stored session token
    pub data_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Firestore connection
    #[serde(serialize_with = "serialize_firestore")]
    pub firestore: FirestoreSettings,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    firestore: Option<FirestoreSettings>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    pub(crate) fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut config_file = None;
        let mut firestore = FirestoreSettings::default();

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
            if let Some(dir) = file_config.data_dir {
                // Relative to the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(settings) = file_config.firestore {
                firestore = settings;
            }
        }

        if let Some(url) = env("SIGSYNC_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(dir) = env("SIGSYNC_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(project) = env("SIGSYNC_FIRESTORE_PROJECT") {
            firestore.project_id = Some(project);
        }
        if let Some(key) = env("SIGSYNC_FIRESTORE_API_KEY") {
            firestore.api_key = Some(key);
        }
        if let Some(url) = env("SIGSYNC_FIRESTORE_URL") {
            firestore.base_url = url;
        }

        Ok(Self {
            api_url,
            data_dir,
            config_file,
            firestore,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/sigsync/
    /// - macOS: ~/Library/Application Support/sigsync/
    /// - Windows: %APPDATA%/sigsync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sigsync")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/sigsync/
    /// - macOS: ~/Library/Application Support/sigsync/
    /// - Windows: %APPDATA%/sigsync/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sigsync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }

    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(&self.data_dir.value)
    }

    /// API client carrying `token`, if any.
    pub fn api_client(&self, token: Option<BearerToken>) -> ApiClient {
        ApiClient::new(self.api_url.value.clone()).with_token(token)
    }

    pub fn firestore_client(&self) -> Result<FirestoreClient, FirestoreError> {
        FirestoreClient::from_settings(&self.firestore)
    }
}

/// Writes the Firestore section with the API key and ID token masked.
fn serialize_firestore<S: serde::Serializer>(
    settings: &FirestoreSettings,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut shown = settings.clone();
    shown.api_key = shown.api_key.as_deref().map(mask_secret);
    shown.id_token = shown.id_token.as_deref().map(mask_secret);
    shown.serialize(serializer)
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
