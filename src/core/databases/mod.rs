//! The spec store.
//!
//! Persistence is implemented with one [`Database`] trait and one driver,
//! [`Sqlite`](crate::core::databases::sqlite::Sqlite).
//!
//! > **NOTICE**: There are no database migrations. If there are any changes,
//! we will implemented them or provide a script to migrate to the new schema.
//!
//! The persistent objects are:
//!
//! - [Torrent specs](#torrent-specs)
//!
//! # Torrent specs
//!
//!  Field       | Sample data                                | Description
//! ---|---|---
//!  `info_hash` | `c1277613db1d28709b034a017ab2cae4be07ae10` | Lowercase `BitTorrent` infohash V1, primary key
//!  `spec`      | `{"info_hash":"c127...","display_name":...}` | The [`TransferDescriptor`] encoded as JSON
//!
//! There is exactly one record per info-hash. Writes always replace the whole
//! record inside a single transaction, so a reader sees either the previous
//! record or the new one.
pub mod driver;
pub mod error;
pub mod sqlite;

use std::marker::PhantomData;

use torrenttp_primitives::info_hash::InfoHash;

use self::error::Error;
use crate::core::descriptor::{SelectionChange, TransferDescriptor};

struct Builder<T>
where
    T: Database,
{
    phantom: PhantomData<T>,
}

impl<T> Builder<T>
where
    T: Database + 'static,
{
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create a database.
    pub(self) fn build(db_path: &str) -> Result<Box<dyn Database>, Error> {
        Ok(Box::new(T::new(db_path)?))
    }
}

/// One stored row as found by a bulk read.
///
/// A malformed row does not abort [`Database::load_torrent_specs`]: it is
/// reported here with its raw key so the caller can discard it.
#[derive(Debug, Clone)]
pub struct Record {
    pub key: String,
    pub spec: Result<TransferDescriptor, Error>,
}

/// The persistence trait. It contains all the methods to interact with the
/// spec store.
pub trait Database: Sync + Send {
    /// It instantiates a new database driver.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to open the database.
    fn new(db_path: &str) -> Result<Self, Error>
    where
        Self: std::marker::Sized;

    // Schema

    /// It generates the database tables. SQL queries are hardcoded in the
    /// trait implementation.
    ///
    /// # Context: Schema
    ///
    /// # Errors
    ///
    /// Will return `Error` if unable to create own tables.
    fn create_database_tables(&self) -> Result<(), Error>;

    /// It drops the database tables.
    ///
    /// # Context: Schema
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to drop tables.
    fn drop_database_tables(&self) -> Result<(), Error>;

    // Torrent specs

    /// It loads every stored record.
    ///
    /// # Context: Torrent specs
    ///
    /// # Errors
    ///
    /// Will return `Err` if the store can not be read at all.
    fn load_torrent_specs(&self) -> Result<Vec<Record>, Error>;

    /// It returns the descriptor stored for the info-hash, if any.
    ///
    /// # Context: Torrent specs
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to read the store or if the stored record
    /// is malformed.
    fn get_torrent_spec(&self, info_hash: &InfoHash) -> Result<Option<TransferDescriptor>, Error>;

    /// It replaces whatever is stored for the descriptor's info-hash.
    ///
    /// # Context: Torrent specs
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to save. The previous record is left
    /// untouched.
    fn save_torrent_spec(&self, descriptor: &TransferDescriptor) -> Result<(), Error>;

    /// It folds a selection change into the stored descriptor, reading and
    /// replacing the record in the same transaction. Returns the descriptor
    /// as stored.
    ///
    /// # Context: Torrent specs
    ///
    /// # Errors
    ///
    /// Will return [`Error::RecordNotFound`] when there is no record to update.
    fn update_torrent_selection(&self, info_hash: &InfoHash, change: &SelectionChange) -> Result<TransferDescriptor, Error>;

    /// It removes a record by its raw key. Used to discard malformed records
    /// whose key is not even a valid info-hash.
    ///
    /// # Context: Torrent specs
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to delete.
    fn remove_record(&self, key: &str) -> Result<usize, Error>;

    /// It removes the record for the info-hash. Removing a missing record is
    /// not an error.
    ///
    /// # Context: Torrent specs
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to delete.
    fn remove_torrent_spec(&self, info_hash: &InfoHash) -> Result<usize, Error> {
        self.remove_record(&info_hash.to_hex_string())
    }
}
