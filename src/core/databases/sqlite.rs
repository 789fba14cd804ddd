//! The `SQLite3` database driver.
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;

use r2d2::Pool;
use r2d2_sqlite::rusqlite::{params, OptionalExtension, TransactionBehavior};
use r2d2_sqlite::SqliteConnectionManager;
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::DatabaseDriver;

use super::{Database, Error, Record};
use crate::core::descriptor::{SelectionChange, TransferDescriptor};

const DRIVER: DatabaseDriver = DatabaseDriver::Sqlite3;

pub struct Sqlite {
    pool: Pool<SqliteConnectionManager>,
}

impl Sqlite {
    fn encode(descriptor: &TransferDescriptor) -> Result<String, Error> {
        serde_json::to_string(descriptor).map_err(|e| (e, DRIVER).into())
    }

    /// A record is valid when its JSON decodes and names the same info-hash
    /// as its key.
    fn decode(key: &str, spec: &str) -> Result<TransferDescriptor, Error> {
        let info_hash = InfoHash::from_str(key).map_err(|e| Error::invalid_record(key, e, DRIVER))?;

        let descriptor: TransferDescriptor = serde_json::from_str(spec).map_err(|e| Error::invalid_record(key, e, DRIVER))?;

        if descriptor.info_hash != info_hash {
            return Err(Error::invalid_record(
                key,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("the record holds the spec of `{}`", descriptor.info_hash),
                ),
                DRIVER,
            ));
        }

        Ok(descriptor)
    }
}

impl Database for Sqlite {
    /// It instantiates a new `SQLite3` database driver.
    ///
    /// Refer to [`databases::Database::new`](crate::core::databases::Database::new).
    ///
    /// # Errors
    ///
    /// Will return `r2d2::Error` if `db_path` is not able to create `SqLite` database.
    fn new(db_path: &str) -> Result<Sqlite, Error> {
        if let Some(parent) = Path::new(db_path).parent() {
            // Opening the pool reports the real error when this fails.
            let _ = std::fs::create_dir_all(parent);
        }

        let cm = SqliteConnectionManager::file(db_path);
        Pool::new(cm).map_or_else(|err| Err((err, DRIVER).into()), |pool| Ok(Sqlite { pool }))
    }

    /// Refer to [`databases::Database::create_database_tables`](crate::core::databases::Database::create_database_tables).
    fn create_database_tables(&self) -> Result<(), Error> {
        let create_torrent_specs_table = "
        CREATE TABLE IF NOT EXISTS torrent_specs (
            info_hash TEXT PRIMARY KEY NOT NULL,
            spec TEXT NOT NULL
        );"
        .to_string();

        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(&create_torrent_specs_table, [])?;

        Ok(())
    }

    /// Refer to [`databases::Database::drop_database_tables`](crate::core::databases::Database::drop_database_tables).
    fn drop_database_tables(&self) -> Result<(), Error> {
        let drop_torrent_specs_table = "
        DROP TABLE torrent_specs;"
            .to_string();

        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        conn.execute(&drop_torrent_specs_table, [])?;

        Ok(())
    }

    /// Refer to [`databases::Database::load_torrent_specs`](crate::core::databases::Database::load_torrent_specs).
    fn load_torrent_specs(&self) -> Result<Vec<Record>, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let mut stmt = conn.prepare("SELECT info_hash, spec FROM torrent_specs")?;

        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let spec: String = row.get(1)?;
            Ok((key, spec))
        })?;

        let mut records = vec![];

        for row in rows {
            let (key, spec) = row?;
            let spec = Self::decode(&key, &spec);
            records.push(Record { key, spec });
        }

        Ok(records)
    }

    /// Refer to [`databases::Database::get_torrent_spec`](crate::core::databases::Database::get_torrent_spec).
    fn get_torrent_spec(&self, info_hash: &InfoHash) -> Result<Option<TransferDescriptor>, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let key = info_hash.to_hex_string();

        let spec: Option<String> = conn
            .query_row("SELECT spec FROM torrent_specs WHERE info_hash = ?", [&key], |row| row.get(0))
            .optional()?;

        spec.map(|spec| Self::decode(&key, &spec)).transpose()
    }

    /// Refer to [`databases::Database::save_torrent_spec`](crate::core::databases::Database::save_torrent_spec).
    fn save_torrent_spec(&self, descriptor: &TransferDescriptor) -> Result<(), Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let key = descriptor.info_hash.to_hex_string();
        let spec = Self::encode(descriptor)?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM torrent_specs WHERE info_hash = ?", [&key])?;
        tx.execute("INSERT INTO torrent_specs (info_hash, spec) VALUES (?1, ?2)", params![key, spec])?;

        tx.commit()?;

        Ok(())
    }

    /// Refer to [`databases::Database::update_torrent_selection`](crate::core::databases::Database::update_torrent_selection).
    fn update_torrent_selection(&self, info_hash: &InfoHash, change: &SelectionChange) -> Result<TransferDescriptor, Error> {
        let mut conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let key = info_hash.to_hex_string();

        // The write lock is taken before the read so two updates of the same
        // record can not interleave.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let spec: Option<String> = tx
            .query_row("SELECT spec FROM torrent_specs WHERE info_hash = ?", [&key], |row| row.get(0))
            .optional()?;

        let Some(spec) = spec else {
            return Err(Error::RecordNotFound {
                info_hash: *info_hash,
                location: Location::caller(),
                driver: DRIVER,
            });
        };

        let mut descriptor = Self::decode(&key, &spec)?;
        descriptor.apply_selection(change);

        tx.execute("DELETE FROM torrent_specs WHERE info_hash = ?", [&key])?;
        tx.execute(
            "INSERT INTO torrent_specs (info_hash, spec) VALUES (?1, ?2)",
            params![key, Self::encode(&descriptor)?],
        )?;

        tx.commit()?;

        Ok(descriptor)
    }

    /// Refer to [`databases::Database::remove_record`](crate::core::databases::Database::remove_record).
    fn remove_record(&self, key: &str) -> Result<usize, Error> {
        let conn = self.pool.get().map_err(|e| (e, DRIVER))?;

        let deleted = conn.execute("DELETE FROM torrent_specs WHERE info_hash = ?", [key.to_lowercase()])?;

        Ok(deleted)
    }
}
