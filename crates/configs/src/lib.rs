//! # Settings
//!
//! Layered configuration, lowest precedence first:
//!
//! 1. compiled defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/{APP_ENV}.toml` (optional)
//! 4. `TASKBOARD__SECTION__KEY` environment variables
//!
//! `.env` is read into the process environment before anything else.

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "TASKBOARD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to read .env: {0}")]
    Dotenv(#[from] dotenvy::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info,services=debug`.
    pub level: String,
    pub format: LogFormat,
}

/// Demo data created by the seed binary.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    pub owner_name: String,
    pub owner_email: String,
    pub board_title: String,
    pub public_board: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub logging: LoggingSettings,
    pub seed: SeedSettings,
}

impl Settings {
    /// Loads `.env`, then layers files and environment over the defaults.
    /// A missing `.env` is fine; an unreadable or malformed one is an error.
    pub fn load() -> Result<Self, ConfigError> {
        check_dotenv(dotenvy::dotenv().map(drop))?;
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::from_builder(
            Self::defaults()?
                .set_override("app.environment", environment.clone())?
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{environment}")).required(false))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("__")
                        .separator("__"),
                ),
        )
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("app.name", "taskboard")?
            .set_default("app.environment", "development")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("seed.owner_name", "Demo Owner")?
            .set_default("seed.owner_email", "owner@example.com")?
            .set_default("seed.board_title", "Product Roadmap")?
            .set_default("seed.public_board", false)?)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level must not be empty".into()));
        }
        if self.seed.board_title.trim().is_empty() {
            return Err(ConfigError::Invalid("seed.board_title must not be empty".into()));
        }
        Ok(())
    }
}

fn check_dotenv(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Err(err) if !err.not_found() => Err(ConfigError::Dotenv(err)),
        _ => Ok(()),
    }
}
