//! API key authentication.
//!
//! The HTTP API is gated by a single shared secret. When the gate is enabled
//! every request must present the key, as the `key` query parameter or in
//! the `/api/key/{key}/` path prefix. The presented key is percent-decoded
//! (`+` meaning a space) and compared case-sensitively.
//!
//! ```rust
//! use torrenttp::core::auth::Gate;
//!
//! let gate = Gate::new(true, "X");
//!
//! assert!(gate.check(Some("X")).is_ok());
//! assert!(gate.check(Some("%58")).is_ok());
//! assert!(gate.check(Some("Y")).is_err());
//! ```
use std::panic::Location;

use derive_more::Display;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use torrenttp_configuration::Auth;

/// Authentication errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unauthorized, {location}")]
    MissingKey { location: &'static Location<'static> },
    #[error("Forbidden, {location}")]
    KeyMismatch { location: &'static Location<'static> },
    #[error("Unable to decode the key: {reason}, {location}")]
    UndecodableKey {
        reason: String,
        location: &'static Location<'static>,
    },
}

/// Whether the gate is open or checking keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Mode {
    #[display("disabled")]
    Disabled,
    #[display("enabled")]
    Enabled,
}

#[derive(Debug, Clone)]
pub struct Gate {
    mode: Mode,
    key: String,
}

impl Gate {
    #[must_use]
    pub fn new(enabled: bool, key: &str) -> Self {
        Self {
            mode: if enabled { Mode::Enabled } else { Mode::Disabled },
            key: key.to_owned(),
        }
    }

    #[must_use]
    pub fn from_config(auth: &Auth) -> Self {
        Self::new(auth.enabled, &auth.key)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// It lets the request through when the gate is disabled or the key
    /// matches.
    ///
    /// # Errors
    ///
    /// Will return:
    ///
    /// - `Error::MissingKey` if no key was presented.
    /// - `Error::UndecodableKey` if the key is not valid percent-encoding.
    /// - `Error::KeyMismatch` if the decoded key is not the configured one.
    #[track_caller]
    pub fn check(&self, presented: Option<&str>) -> Result<(), Error> {
        if self.mode == Mode::Disabled {
            return Ok(());
        }

        let Some(presented) = presented else {
            return Err(Error::MissingKey {
                location: Location::caller(),
            });
        };

        if decode(presented)? == self.key {
            Ok(())
        } else {
            Err(Error::KeyMismatch {
                location: Location::caller(),
            })
        }
    }
}

/// Percent-decodes a query or path value.
///
/// # Errors
///
/// Will return `Error::UndecodableKey` when a `%` is not followed by two
/// hexadecimal digits or the decoded bytes are not UTF-8.
#[track_caller]
pub fn decode(value: &str) -> Result<String, Error> {
    let bytes = value.as_bytes();

    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'%' {
            let escape = bytes.get(i + 1..i + 3);

            if !escape.is_some_and(|escape| escape.iter().all(u8::is_ascii_hexdigit)) {
                return Err(Error::UndecodableKey {
                    reason: format!("invalid escape at byte {i}"),
                    location: Location::caller(),
                });
            }
        }
    }

    let plus_as_space = value.replace('+', " ");

    percent_decode_str(&plus_as_space)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|err| Error::UndecodableKey {
            reason: err.to_string(),
            location: Location::caller(),
        })
}
