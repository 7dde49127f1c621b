//! BudgetMate is a personal finance tracker.
//!
//! This library provides the credential store used to register and log in
//! users, and the ledger that records a logged in user's income and expenses.
//! The `budgetmate` binary wraps both in a terminal shell.
//!
//! A session starts with [CredentialStore::log_in], which hands a [Session]
//! to a callback once the password has been verified. The callback usually
//! opens a [Ledger] scoped to that session:
//!
//! ```no_run
//! use budgetmate::{Config, CredentialStore, Ledger};
//!
//! # fn main() -> Result<(), budgetmate::Error> {
//! let config = Config::default();
//! let connection = config.open_db()?;
//! let credentials = CredentialStore::new(&connection, config.hash_cost);
//!
//! let ledger = credentials.log_in("alice", "hunter2", |session| {
//!     Ledger::initialize(&connection, session, config.ledger_options())
//! })?;
//!
//! for transaction in ledger.list()? {
//!     println!("{} {}", transaction.date, transaction.amount);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use rusqlite::ErrorCode;

mod auth;
mod config;
mod database_id;
mod db;
mod format;
mod ledger;
mod logging;
mod password;
mod transaction;
mod user;

pub use auth::{CredentialStore, Session};
pub use config::{Config, DEFAULT_DB_PATH};
pub use database_id::{DatabaseId, TransactionId};
pub use db::{initialize as initialize_db, open as open_db, reset_transactions};
pub use format::{format_currency, format_percentage};
pub use ledger::{Ledger, LedgerOptions};
pub use logging::setup_logging;
pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{
    Category, DEFAULT_CATEGORIES, ExpenseShare, INCOME_CATEGORY, PaymentMode, Transaction,
    TransactionBuilder, TransactionForm, TransactionType, count_transactions, create_transaction,
    delete_transaction, expense_shares, get_transaction, get_transactions_for_user,
    summarize_expenses_by_category,
};
pub use user::{User, UserId, count_users, get_user_by_username};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A user with the given username has already registered.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUser(String),

    /// The username does not exist or the password does not match.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// A field was missing or could not be parsed.
    ///
    /// The string describes which field was rejected and why, and is suitable
    /// for showing to the user.
    #[error("{0}")]
    ValidationError(String),

    /// The requested resource was not found.
    ///
    /// For transactions this also covers rows owned by a different user, so
    /// that callers cannot probe for other users' records.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The database file could not be opened, is not a database, or is locked
    /// by another process.
    #[error("the database is unavailable: {0}")]
    StorageUnavailable(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging. When
    /// communicating with the user this error should be replaced with a
    /// general error message.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error @ rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code:
                        ErrorCode::CannotOpen
                        | ErrorCode::NotADatabase
                        | ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::ReadOnly,
                    ..
                },
                _,
            ) => {
                tracing::error!("the database is unavailable: {}", error);
                Error::StorageUnavailable(error.to_string())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
