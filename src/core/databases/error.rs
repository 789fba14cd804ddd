//! Spec store errors.
//!
//! This module contains the [Database errors](crate::core::databases::error::Error).
use std::panic::Location;
use std::sync::Arc;

use torrenttp_located_error::{DynError, Located, LocatedError};
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::DatabaseDriver;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The query unexpectedly returned nothing.
    #[error("The {driver} query unexpectedly returned nothing: {source}")]
    QueryReturnedNoRows {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
        driver: DatabaseDriver,
    },

    /// The query was malformed or the transaction failed.
    #[error("The {driver} query was malformed: {source}")]
    InvalidQuery {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
        driver: DatabaseDriver,
    },

    /// A stored record could not be decoded.
    #[error("The {driver} record `{key}` is malformed: {source}")]
    InvalidRecord {
        key: String,
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
        driver: DatabaseDriver,
    },

    /// The descriptor could not be encoded before being written.
    #[error("Unable to encode the record for {driver} database: {source}")]
    EncodingFailed {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
        driver: DatabaseDriver,
    },

    /// There is no record for the info-hash.
    #[error("There is no {driver} record for `{info_hash}`, {location}")]
    RecordNotFound {
        info_hash: InfoHash,
        location: &'static Location<'static>,
        driver: DatabaseDriver,
    },

    /// Unable to create a connection pool
    #[error("Failed to create r2d2 {driver} connection pool: {source}")]
    ConnectionPool {
        source: LocatedError<'static, r2d2::Error>,
        driver: DatabaseDriver,
    },
}

impl Error {
    #[track_caller]
    pub(crate) fn invalid_record<E>(key: &str, err: E, driver: DatabaseDriver) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidRecord {
            key: key.to_owned(),
            source: (Arc::new(err) as DynError).into(),
            driver,
        }
    }
}

impl From<r2d2_sqlite::rusqlite::Error> for Error {
    #[track_caller]
    fn from(err: r2d2_sqlite::rusqlite::Error) -> Self {
        match err {
            r2d2_sqlite::rusqlite::Error::QueryReturnedNoRows => Error::QueryReturnedNoRows {
                source: (Arc::new(err) as DynError).into(),
                driver: DatabaseDriver::Sqlite3,
            },
            _ => Error::InvalidQuery {
                source: (Arc::new(err) as DynError).into(),
                driver: DatabaseDriver::Sqlite3,
            },
        }
    }
}

impl From<(serde_json::Error, DatabaseDriver)> for Error {
    #[track_caller]
    fn from(e: (serde_json::Error, DatabaseDriver)) -> Self {
        let (err, driver) = e;
        Self::EncodingFailed {
            source: (Arc::new(err) as DynError).into(),
            driver,
        }
    }
}

impl From<(r2d2::Error, DatabaseDriver)> for Error {
    #[track_caller]
    fn from(e: (r2d2::Error, DatabaseDriver)) -> Self {
        let (err, driver) = e;
        Self::ConnectionPool {
            source: Located(err).into(),
            driver,
        }
    }
}
