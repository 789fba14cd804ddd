//! Configuration data structures for the `torrenttp` service.
//!
//! The configuration is layered:
//!
//! 1. Built-in defaults ([`Configuration::default`]).
//! 2. A TOML document, either the whole content in the
//!    `TORRENTTP_CONFIG_TOML` environment variable or a file whose path is
//!    taken from `TORRENTTP_CONFIG_TOML_PATH`.
//! 3. Single value overrides from environment variables prefixed with
//!    `TORRENTTP_CONFIG_OVERRIDE_`, using `__` as the section separator, for
//!    example `TORRENTTP_CONFIG_OVERRIDE_HTTP_API__BIND_ADDRESS=127.0.0.1:8080`.
//!
//! The API key can also be injected with `TORRENTTP_API_KEY`, which wins over
//! every other source.
//!
//! The current version for configuration is [`v1`].
pub mod v1;
pub mod validator;

use std::env;
use std::sync::Arc;

use thiserror::Error;
use torrenttp_located_error::{DynError, LocatedError};

// Environment variables

/// The whole `torrenttp.toml` file content. It has priority over the config file.
/// Even if the file is not on the default path.
const ENV_VAR_CONFIG_TOML: &str = "TORRENTTP_CONFIG_TOML";

/// The `torrenttp.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "TORRENTTP_CONFIG_TOML_PATH";

/// The shared secret for the HTTP API.
pub const ENV_VAR_API_KEY: &str = "TORRENTTP_API_KEY";

/// Prefix of the environment variables overriding single values.
pub const CONFIG_OVERRIDE_PREFIX: &str = "TORRENTTP_CONFIG_OVERRIDE_";

/// Path segment separator for the override variables.
pub const CONFIG_OVERRIDE_SEPARATOR: &str = "__";

pub type Configuration = v1::Configuration;
pub type Logging = v1::logging::Logging;
pub type Threshold = v1::logging::Threshold;
pub type Engine = v1::engine::Engine;
pub type Database = v1::database::Database;
pub type HttpApi = v1::http_api::HttpApi;
pub type Auth = v1::http_api::Auth;
pub type TransportDriver = torrenttp_primitives::TransportDriver;

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: String,
    api_key: Option<String>,
}

impl Info {
    /// Build Configuration Info
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to obtain a configuration.
    ///
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(default_config_toml_path: String) -> Result<Self, Error> {
        let config_toml = if let Ok(config_toml) = env::var(ENV_VAR_CONFIG_TOML) {
            println!("Loading extra configuration from environment variable:\n {config_toml}");
            Some(config_toml)
        } else {
            None
        };

        let config_toml_path = if let Ok(config_toml_path) = env::var(ENV_VAR_CONFIG_TOML_PATH) {
            println!("Loading extra configuration from file: `{config_toml_path}` ...");
            config_toml_path
        } else {
            println!("Loading extra configuration from default configuration file: `{default_config_toml_path}` ...");
            default_config_toml_path
        };

        let api_key = env::var(ENV_VAR_API_KEY).ok().filter(|key| !key.is_empty());

        Ok(Self {
            config_toml,
            config_toml_path,
            api_key,
        })
    }

    /// Info for an inline TOML document, ignoring the process environment.
    #[must_use]
    pub fn from_toml(config_toml: &str) -> Self {
        Self {
            config_toml: Some(config_toml.to_owned()),
            config_toml_path: String::new(),
            api_key: None,
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Unable to load the configuration from the configuration file.
    #[error("Failed processing the configuration: {source}")]
    ConfigError {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },

    /// The configuration could not be encoded back to TOML.
    #[error("Failed encoding the configuration: {source}")]
    EncodingError {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },
}

impl From<figment::Error> for Error {
    #[track_caller]
    fn from(err: figment::Error) -> Self {
        Self::ConfigError {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}

impl From<toml::ser::Error> for Error {
    #[track_caller]
    fn from(err: toml::ser::Error) -> Self {
        Self::EncodingError {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}
