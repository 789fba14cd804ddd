use serde::{Deserialize, Serialize};
use torrenttp_primitives::DatabaseDriver;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Database {
    // Database configuration
    /// Database driver. The only possible value is `sqlite3`.
    #[serde(default = "Database::default_driver")]
    pub driver: DatabaseDriver,

    /// Path of the database file, for example
    /// `./storage/torrenttp/lib/database/sqlite3.db`.
    #[serde(default = "Database::default_path")]
    pub path: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            driver: Self::default_driver(),
            path: Self::default_path(),
        }
    }
}

impl Database {
    fn default_driver() -> DatabaseDriver {
        DatabaseDriver::Sqlite3
    }

    fn default_path() -> String {
        String::from("./storage/torrenttp/lib/database/sqlite3.db")
    }
}
