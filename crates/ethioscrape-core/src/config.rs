use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::collector::DEFAULT_MESSAGE_LIMIT;

pub const DEFAULT_CONFIG_PATH: &str = "resources/config.yaml";
pub const DEFAULT_SESSION_FILE: &str = "amharic_session.session";

pub const API_ID_ENV: &str = "TELEGRAM_API_ID";
pub const API_HASH_ENV: &str = "TELEGRAM_API_HASH";
pub const PHONE_ENV: &str = "TELEGRAM_PHONE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format for {0} (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),
    #[error("environment variable {key} has invalid value '{value}'")]
    InvalidEnv { key: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(deserialize_with = "deserialize_api_id")]
    pub api_id: i32,
    pub api_hash: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("phone", &self.phone.as_ref().map(|_| "<redacted>"))
            .field("session_file", &self.session_file)
            .finish()
    }
}

/// Credentials and channel list for a collection run.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub channels: Vec<String>,
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
}

fn default_session_file() -> PathBuf {
    PathBuf::from(DEFAULT_SESSION_FILE)
}

fn default_message_limit() -> usize {
    DEFAULT_MESSAGE_LIMIT
}

/// Accepts the api id either as a number or as a quoted string.
fn deserialize_api_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawApiId {
        Number(i64),
        Text(String),
    }

    match RawApiId::deserialize(deserializer)? {
        RawApiId::Number(value) => i32::try_from(value)
            .map_err(|_| serde::de::Error::custom(format!("api_id {value} out of range"))),
        RawApiId::Text(value) => value
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("api_id '{value}' is not a number"))),
    }
}

impl AppConfig {
    /// Reads the config file, applies credential overrides from the process
    /// environment and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    pub fn load_with_env(
        path: impl AsRef<Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::parse(&contents, format)?;
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, ConfigFormat::Yaml)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, ConfigFormat::Toml)
    }

    fn parse(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
            ConfigFormat::Toml => toml::from_str(contents)?,
        };
        Ok(config)
    }

    pub fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = env(API_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.telegram.api_id = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: API_ID_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = env(API_HASH_ENV).filter(|v| !v.trim().is_empty()) {
            self.telegram.api_hash = value.trim().to_string();
        }
        if let Some(value) = env(PHONE_ENV).filter(|v| !v.trim().is_empty()) {
            self.telegram.phone = Some(value.trim().to_string());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.api_id <= 0 {
            return Err(ConfigError::Invalid("telegram.api_id must be positive".into()));
        }
        if self.telegram.api_hash.trim().is_empty() {
            return Err(ConfigError::Invalid("telegram.api_hash cannot be empty".into()));
        }
        if self.channels.is_empty() {
            return Err(ConfigError::Invalid("at least one channel is required".into()));
        }
        if let Some(blank) = self.channels.iter().position(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("channel #{} is blank", blank + 1)));
        }
        if self.message_limit == 0 {
            return Err(ConfigError::Invalid("message_limit must be greater than zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    const YAML: &str = r#"
telegram:
  api_id: 123456
  api_hash: "abcdef0123456789"
channels:
  - "@ZemenExpress"
  - "https://t.me/sinayelj"
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_yaml_with_defaults() {
        let config = AppConfig::from_yaml_str(YAML).expect("yaml parses");
        assert_eq!(config.telegram.api_id, 123456);
        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.message_limit, DEFAULT_MESSAGE_LIMIT);
        assert_eq!(config.telegram.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert!(config.telegram.phone.is_none());
    }

    #[test]
    fn parses_toml_and_quoted_api_id() {
        let config = AppConfig::from_toml_str(
            r#"
channels = ["@a", "@b", "@c"]
message_limit = 50

[telegram]
api_id = "98765"
api_hash = "ffff"
phone = "+251900000000"
"#,
        )
        .expect("toml parses");
        assert_eq!(config.telegram.api_id, 98765);
        assert_eq!(config.message_limit, 50);
        assert_eq!(config.telegram.phone.as_deref(), Some("+251900000000"));
    }

    #[test]
    fn env_overrides_file_credentials() {
        let mut config = AppConfig::from_yaml_str(YAML).expect("yaml parses");
        let env: HashMap<&str, &str> =
            HashMap::from([(API_ID_ENV, " 42 "), (API_HASH_ENV, "fromenv"), (PHONE_ENV, "")]);
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .expect("overrides apply");
        assert_eq!(config.telegram.api_id, 42);
        assert_eq!(config.telegram.api_hash, "fromenv");
        assert!(config.telegram.phone.is_none());
    }

    #[test]
    fn rejects_malformed_env_api_id() {
        let mut config = AppConfig::from_yaml_str(YAML).expect("yaml parses");
        let err = config
            .apply_env_overrides(|key| (key == API_ID_ENV).then(|| "abc".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: API_ID_ENV, .. }));
    }

    #[test]
    fn validation_catches_missing_channels_and_zero_limit() {
        let mut config = AppConfig::from_yaml_str(YAML).expect("yaml parses");
        config.message_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.message_limit = 10;
        config.channels.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .expect("temp file");
        file.write_all(YAML.as_bytes()).expect("write config");

        let config = AppConfig::load_with_env(file.path(), no_env).expect("config loads");
        assert_eq!(config.channels[0], "@ZemenExpress");

        let unknown = tempfile::Builder::new()
            .suffix(".ini")
            .tempfile()
            .expect("temp file");
        let err = AppConfig::load_with_env(unknown.path(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = AppConfig::from_yaml_str(YAML).expect("yaml parses");
        let rendered = format!("{:?}", config.telegram);
        assert!(!rendered.contains("abcdef0123456789"));
        assert!(rendered.contains("<redacted>"));
    }
}
