//! Typed settings consumed by the validation layer.
//!
//! ```toml
//! [messages]
//! password_blank = "password must not be blank"
//!
//! [session]
//! login_key = "login"
//!
//! [patterns.number]
//! regex = ['^\d{1,3}$']
//! description = "at most three digits"
//!
//! [log]
//! level = "debug"
//! format = "pretty"
//! ```

use crate::loader::nest_flat_keys;
use crate::{ConfigError, ConfigLoader, EnvLoader, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default messages used when a rule does not carry its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    pub password_blank: String,
    pub number_blank: String,
    pub not_blank: String,
    pub login_required: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            password_blank: "password must not be blank".to_string(),
            number_blank: "value must not be blank".to_string(),
            not_blank: "value must not be blank".to_string(),
            login_required: "please log in first".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session key holding the login record
    pub login_key: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            login_key: "login".to_string(),
        }
    }
}

/// Replacement for one entry of the pattern catalog. Every expression must
/// match for a value to pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSettings {
    pub regex: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub messages: MessageSettings,
    pub session: SessionSettings,
    /// Keyed by pattern id, e.g. `password` or `number`
    pub patterns: BTreeMap<String, PatternSettings>,
    pub log: LogSettings,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let settings: Settings = serde_json::from_value(value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load a single file, format chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let value = ConfigLoader::auto(path.as_ref())?.load_file(path.as_ref())?;
        Self::from_value(value)
    }

    /// Overlay `PREFIX_SECTION_KEY` variables onto these settings.
    pub fn apply_env(&mut self, env: &EnvLoader) -> Result<()> {
        let overrides = nest_flat_keys(env.load()?);
        let mut current = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        merge(&mut current, overrides);

        *self = serde_json::from_value(current)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.login_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.login_key cannot be empty".to_string(),
            ));
        }

        for (id, pattern) in &self.patterns {
            if pattern.regex.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "patterns.{} needs at least one regex",
                    id
                )));
            }
            if pattern.description.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "patterns.{}.description cannot be empty",
                    id
                )));
            }
        }

        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`; unknown sections are ignored by
/// the later deserialisation.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Builder assembling settings from files, `.env` and the environment, in
/// that order of increasing precedence.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    files: Vec<PathBuf>,
    dotenv: Option<Option<PathBuf>>,
    env: Option<EnvLoader>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Load a `.env` file into the process environment before reading it.
    /// `None` looks for `.env` in the working directory and ignores its
    /// absence. Without [`with_env`](Self::with_env) the `RAMPART_` process
    /// environment is applied afterwards.
    pub fn load_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.dotenv = Some(path);
        self
    }

    /// Apply overrides from this loader.
    pub fn with_env(mut self, env: EnvLoader) -> Self {
        self.env = Some(env);
        self
    }

    pub fn build(self) -> Result<Settings> {
        let mut merged = Value::Object(serde_json::Map::new());
        for path in &self.files {
            let value = ConfigLoader::auto(path)?.load_file(path)?;
            merge(&mut merged, value);
        }

        let mut settings = Settings::from_value(merged)?;

        let dotenv_loaded = match self.dotenv {
            Some(Some(path)) => {
                dotenvy::from_path(&path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
                true
            }
            Some(None) => {
                dotenvy::dotenv().ok();
                true
            }
            None => false,
        };

        match self.env {
            Some(env) => settings.apply_env(&env)?,
            None if dotenv_loaded => settings.apply_env(&EnvLoader::default())?,
            None => {}
        }

        Ok(settings)
    }
}
