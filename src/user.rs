//! Code for creating the users table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The name the user logs in with. Case-sensitive and unique.
    pub username: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the users table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUser] if `username` is already registered, in which case the table is left unchanged,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            (username, password_hash.as_ref()),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUser(username.to_owned()),
            error => error.into(),
        })?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username: username.to_owned(),
        password_hash,
    })
}

/// Get the user whose username exactly matches `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered user ([Error::NotFound]),
/// - there was an error trying to access the store.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password FROM users WHERE username = :username")?
        .query_row(&[(":username", username)], map_user_row)
        .map_err(|error| error.into())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM users;", [], |row| row.get::<_, u32>(0))
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let username = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserId::new(raw_id),
        username,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
