// Settings management for Rampart
//
// Settings come from TOML, JSON or `.env` files and are then overridden by
// `RAMPART_`-prefixed environment variables.

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;

pub use env::{DEFAULT_ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{
    LogSettings, MessageSettings, PatternSettings, SessionSettings, Settings, SettingsBuilder,
};
