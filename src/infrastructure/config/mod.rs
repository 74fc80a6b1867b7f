//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::features::FeatureConfig;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    /// Features to load, in order. Required: a config file without this key
    /// fails to parse and the bot refuses to start.
    pub enabled_features: Vec<String>,
    /// Per-feature settings, keyed by slug.
    #[serde(default)]
    pub features: HashMap<String, FeatureConfig>,
    #[serde(default)]
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            console: Some(ConsoleConfig::default()),
        }
    }
}

/// Console adapter settings. The role and flag fields shape the synthetic
/// sender used for local sessions, so permission-gated commands can be
/// exercised from a terminal.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub owner: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            roles: vec!["staff".to_string()],
            admin: true,
            owner: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut features: HashMap<String, FeatureConfig> = HashMap::new();
        features.insert(
            "say".to_string(),
            HashMap::from([("max-length".to_string(), serde_yaml::Value::from(200u64))]),
        );
        features.insert(
            "modtools".to_string(),
            HashMap::from([(
                "staff-roles".to_string(),
                serde_yaml::Value::Sequence(vec![
                    serde_yaml::Value::from("staff"),
                    serde_yaml::Value::from("moderator"),
                ]),
            )]),
        );

        Self {
            bot: BotConfig {
                name: "wren-bot".to_string(),
                prefix: "/".to_string(),
            },
            enabled_features: vec![
                "ping".to_string(),
                "version".to_string(),
                "say".to_string(),
                "utils".to_string(),
                "modtools".to_string(),
            ],
            features,
            adapters: AdaptersConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to render config: {}", e)))
    }

    /// Defaults with environment overrides, for running without a file.
    pub fn load_env() -> Self {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("BOT_NAME") {
            config.bot.name = name;
        }
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        config
    }
}
