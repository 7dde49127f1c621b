//! Settings for opening the application database.

use std::path::PathBuf;

use rusqlite::Connection;

use crate::{Error, LedgerOptions, PasswordHash, db};

/// The file name of the database when no other path is configured.
pub const DEFAULT_DB_PATH: &str = "finance.db";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File path to the application SQLite database.
    pub db_path: PathBuf,
    /// The bcrypt cost for hashing new passwords.
    pub hash_cost: u32,
    /// Delete all transactions whenever a ledger is opened.
    pub reset_ledger_on_start: bool,
    /// Append debug logs to this file, if set.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            hash_cost: PasswordHash::DEFAULT_COST,
            reset_ledger_on_start: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Open the database at [Config::db_path] and create any missing tables.
    ///
    /// # Errors
    ///
    /// Returns an [Error::StorageUnavailable] if the database cannot be opened
    /// or is not a SQLite database.
    pub fn open_db(&self) -> Result<Connection, Error> {
        let connection = db::open(&self.db_path)?;
        db::initialize(&connection)?;

        tracing::debug!("Opened database at {}", self.db_path.display());

        Ok(connection)
    }

    /// The options for opening a [crate::Ledger] under this config.
    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            reset_on_start: self.reset_ledger_on_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Config, DEFAULT_DB_PATH, LedgerOptions, PasswordHash, count_users};

    #[test]
    fn default_config_does_not_reset_ledger() {
        let config = Config::default();

        assert_eq!(config.db_path.to_str(), Some(DEFAULT_DB_PATH));
        assert_eq!(config.hash_cost, PasswordHash::DEFAULT_COST);
        assert_eq!(config.ledger_options(), LedgerOptions::default());
    }

    #[test]
    fn open_db_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("finance.db"),
            ..Config::default()
        };

        let conn = config.open_db().unwrap();

        assert_eq!(count_users(&conn).unwrap(), 0);
    }
}
