//! Default message templates.
//!
//! [`ChangesetConfig::load()`] reads templates from `config/config.toml`
//! (section `[changeset.messages]`) or `CASTGUARD__CHANGESET__MESSAGES__*`
//! environment variables. [`ChangesetConfig::install()`] makes them the
//! process-wide defaults used whenever an operation's [`crate::Options`]
//! carries no message.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::{Arc, PoisonError, RwLock};

const CONFIG_FILE: &str = "config/config.toml";

static MESSAGES: Lazy<RwLock<Arc<Messages>>> = Lazy::new(|| RwLock::new(Arc::new(Messages::default())));

/// Message templates; `{field}` and operation-specific placeholders are substituted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub cast: String,
    pub change: String,
    pub put_change: String,
    pub put_default: String,
    pub put_assoc: String,
    pub cast_assoc: String,
    pub required: String,
    pub min: String,
    pub max: String,
    pub range: String,
    pub pattern: String,
    pub inclusion: String,
    pub exclusion: String,
    pub unique: String,
    pub foreign_key: String,
    pub check: String,
}

impl Default for Messages {
    fn default() -> Self {
        let invalid = "{field} is invalid".to_string();
        Self {
            cast: invalid.clone(),
            change: invalid.clone(),
            put_change: invalid.clone(),
            put_default: invalid.clone(),
            put_assoc: invalid.clone(),
            cast_assoc: invalid.clone(),
            required: "{field} is required".to_string(),
            min: "{field} must be more than {min}".to_string(),
            max: "{field} must be less than {max}".to_string(),
            range: "{field} must be between {min} and {max}".to_string(),
            pattern: "{field}'s format is invalid".to_string(),
            inclusion: "{field} must be one of {values}".to_string(),
            exclusion: "{field} must not be any of {values}".to_string(),
            unique: "{field} has already been taken".to_string(),
            foreign_key: "does not exist".to_string(),
            check: invalid,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangesetConfig {
    #[serde(default)]
    pub messages: Messages,
}

impl ChangesetConfig {
    /// Load the changeset configuration from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `changeset` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("CASTGUARD").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("failed to load {CONFIG_FILE}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("CASTGUARD").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        match settings.get::<ChangesetConfig>("changeset") {
            Ok(cfg) => Ok(cfg),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Changeset configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }

    /// Make these templates the process-wide defaults.
    pub fn install(self) {
        let mut messages = MESSAGES.write().unwrap_or_else(PoisonError::into_inner);
        *messages = Arc::new(self.messages);
    }
}

/// The currently installed default templates.
pub fn messages() -> Arc<Messages> {
    Arc::clone(&MESSAGES.read().unwrap_or_else(PoisonError::into_inner))
}
