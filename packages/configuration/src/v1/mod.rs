//! Version `1` for `torrenttp` configuration data structures.
//!
//! Each section in the TOML document is mapped to a data structure:
//!
//! - `[logging]`: [`Logging`](crate::v1::logging::Logging)
//! - `[engine]`: [`Engine`](crate::v1::engine::Engine)
//! - `[database]`: [`Database`](crate::v1::database::Database)
//! - `[http_api]`: [`HttpApi`](crate::v1::http_api::HttpApi)
//!
//! Every field has a default, so an empty document is a valid configuration.
//!
//! ## Default configuration
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [engine]
//! transport = "rqbit"
//! data_dir = "./storage/torrenttp/downloads"
//! no_upload = false
//! metadata_timeout = 120
//! throughput_interval = 1000
//!
//! [database]
//! driver = "sqlite3"
//! path = "./storage/torrenttp/lib/database/sqlite3.db"
//!
//! [http_api]
//! bind_address = "0.0.0.0:1010"
//!
//! [http_api.auth]
//! enabled = false
//! key = ""
//! ```
pub mod database;
pub mod engine;
pub mod http_api;
pub mod logging;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::database::Database;
use self::engine::Engine;
use self::http_api::HttpApi;
use self::logging::Logging;
use crate::validator::{SemanticValidationError, Validator};
use crate::{Error, Info, CONFIG_OVERRIDE_PREFIX, CONFIG_OVERRIDE_SEPARATOR};

/// Core configuration for the service.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Default, Clone)]
pub struct Configuration {
    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// Transfer engine configuration.
    #[serde(default)]
    pub engine: Engine,

    /// Spec store configuration.
    #[serde(default)]
    pub database: Database,

    /// The HTTP API configuration.
    #[serde(default)]
    pub http_api: HttpApi,
}

impl Configuration {
    /// Loads the configuration from the `Info` struct.
    ///
    /// Optionally will override the API key.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the TOML document or an override variable has a
    /// bad configuration.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default()));

        let figment = match info.config_toml {
            Some(ref config_toml) => figment.merge(Toml::string(config_toml)),
            None => figment.merge(Toml::file(&info.config_toml_path)),
        };

        let figment = figment.merge(Env::prefixed(CONFIG_OVERRIDE_PREFIX).split(CONFIG_OVERRIDE_SEPARATOR));

        let mut config: Configuration = figment.extract()?;

        if let Some(ref key) = info.api_key {
            config.http_api.override_key(key);
        };

        Ok(config)
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Will return `Err` if a value can not be represented in TOML.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }

    /// Encodes the configuration to JSON.
    ///
    /// # Panics
    ///
    /// Will panic if it can't be converted to JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        // code-review: do we need to use Figment also to serialize into json?
        serde_json::to_string_pretty(self).expect("Could not encode JSON value")
    }

    /// Hides the API key so the configuration can be printed.
    pub fn mask_secrets(&mut self) {
        if !self.http_api.auth.key.is_empty() {
            "***".clone_into(&mut self.http_api.auth.key);
        }
    }
}

impl Validator for Configuration {
    fn validate(&self) -> Result<(), SemanticValidationError> {
        if self.http_api.auth.enabled && self.http_api.auth.key.is_empty() {
            return Err(SemanticValidationError::MissingApiKey);
        }

        Ok(())
    }
}
