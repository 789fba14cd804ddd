//! Initialize configuration from file, env vars and command line flags.
//!
//! The sources, from lowest to highest priority:
//!
//! 1. The built-in defaults.
//! 2. The `torrenttp.toml` document, see [`torrenttp_configuration`].
//! 3. The `TORRENTTP_CONFIG_OVERRIDE_*` variables.
//! 4. The `TORRENTTP_API_KEY` variable.
//! 5. The command line flags, and the `NOUP` variable.
use std::net::SocketAddr;

use camino::Utf8PathBuf;
use clap::Parser;
use torrenttp_configuration::{Configuration, Info};

/// The `torrenttp.toml` file location when `TORRENTTP_CONFIG_TOML_PATH` is
/// not set.
pub const DEFAULT_PATH_CONFIG: &str = "./share/default/config/torrenttp.toml";

/// Command line flags.
#[derive(Parser, Debug, Default, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Download directory path.
    #[clap(long)]
    pub dir: Option<Utf8PathBuf>,

    /// HTTP API listening address, for example `127.0.0.1:1010` or `:1010`.
    #[clap(long, alias = "port")]
    pub bind: Option<String>,

    /// Disables uploading data to other peers.
    #[clap(long, env = "NOUP")]
    pub noup: bool,

    /// Enables the API key authentication. The key is read from the
    /// `TORRENTTP_API_KEY` env var.
    #[clap(long)]
    pub auth: bool,
}

/// Errors found while applying the command line flags.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid bind address `{value}`")]
    InvalidBindAddress { value: String },
}

/// It loads the application configuration from the environment and applies
/// the command line flags on top of it.
///
/// # Panics
///
/// Will panic if the configuration can not be loaded or a flag is not valid.
#[must_use]
pub fn initialize_configuration(args: &Args) -> Configuration {
    let info = match Info::new(DEFAULT_PATH_CONFIG.to_string()) {
        Ok(info) => info,
        Err(err) => panic!("Unable to read the configuration sources: {err}"),
    };

    let mut configuration = match Configuration::load(&info) {
        Ok(configuration) => configuration,
        Err(err) => panic!("Unable to load the configuration: {err}"),
    };

    if let Err(err) = apply_args(&mut configuration, args) {
        panic!("{err}");
    }

    configuration
}

/// It overrides the loaded configuration with the given flags.
///
/// # Errors
///
/// Will return `Error::InvalidBindAddress` if the `--bind` flag is not a
/// socket address.
pub fn apply_args(configuration: &mut Configuration, args: &Args) -> Result<(), Error> {
    if let Some(dir) = &args.dir {
        configuration.engine.data_dir.clone_from(dir);
    }

    if let Some(bind) = &args.bind {
        configuration.http_api.bind_address = parse_bind_address(bind)?;
    }

    if args.noup {
        configuration.engine.no_upload = true;
    }

    if args.auth {
        configuration.http_api.auth.enabled = true;
    }

    Ok(())
}

/// Parses `ip:port`, or `:port` meaning every interface.
fn parse_bind_address(value: &str) -> Result<SocketAddr, Error> {
    let candidate = if value.starts_with(':') {
        format!("0.0.0.0{value}")
    } else {
        value.to_owned()
    };

    candidate
        .parse()
        .map_err(|_| Error::InvalidBindAddress { value: value.to_owned() })
}
