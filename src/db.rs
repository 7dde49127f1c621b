//! Opening the application database and creating its tables.

use std::path::Path;

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    transaction::{create_transaction_table, drop_transaction_table},
    user::create_user_table,
};

/// Open the SQLite database at `path`, creating the file if it does not exist.
///
/// # Errors
///
/// Returns an [Error::StorageUnavailable] if the file cannot be opened.
pub fn open(path: &Path) -> Result<Connection, Error> {
    Connection::open(path).map_err(|error| {
        tracing::error!("Could not open the database at {}: {error}", path.display());
        Error::StorageUnavailable(format!("could not open {}: {error}", path.display()))
    })
}

/// Create the application tables if they do not already exist.
///
/// Existing rows are left untouched, so this is safe to call on every start.
///
/// # Errors
///
/// Returns an error if the tables could not be created, e.g. the file is not a
/// SQLite database ([Error::StorageUnavailable]).
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Drop and recreate the transactions table, deleting the transaction history
/// of every user. The users table is not touched.
///
/// # Errors
///
/// Returns an error if there is an SQL error.
pub fn reset_transactions(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    drop_transaction_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    tracing::warn!("Deleted all transactions");

    Ok(())
}
