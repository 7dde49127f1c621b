//! Registering users and checking their credentials.
//!
//! A successful log in produces a [Session], which is the only way to open a
//! [crate::Ledger] for a user.

use rusqlite::Connection;

use crate::{
    Error, PasswordHash,
    user::{User, create_user, get_user_by_username},
};

/// The user that successfully logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub(crate) fn new(username: &str) -> Self {
        Self {
            username: username.to_owned(),
        }
    }

    /// The username of the logged in user.
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Registers users and verifies their passwords against the users table.
#[derive(Debug, Clone, Copy)]
pub struct CredentialStore<'conn> {
    connection: &'conn Connection,
    hash_cost: u32,
}

impl<'conn> CredentialStore<'conn> {
    /// Create a credential store backed by `connection`.
    ///
    /// `hash_cost` is the bcrypt cost used for new passwords, see
    /// [PasswordHash::new].
    pub fn new(connection: &'conn Connection, hash_cost: u32) -> Self {
        Self {
            connection,
            hash_cost,
        }
    }

    /// Register a new user with a salted hash of `password`.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::ValidationError] if `username` or `password` is empty,
    /// - [Error::DuplicateUser] if `username` is taken, in which case nothing is written,
    /// - [Error::HashingError] if the password could not be hashed,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn register(&self, username: &str, password: &str) -> Result<User, Error> {
        if username.is_empty() {
            return Err(Error::ValidationError(
                "username cannot be empty".to_owned(),
            ));
        }

        let password_hash =
            PasswordHash::from_raw_password(password, self.hash_cost).inspect_err(|error| {
                if let Error::HashingError(_) = error {
                    tracing::error!("an error occurred while hashing a password: {error}");
                }
            })?;

        let user = create_user(username, password_hash, self.connection).inspect_err(|error| {
            if !matches!(error, Error::DuplicateUser(_)) {
                tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            }
        })?;

        tracing::info!("Registered user {} with ID {}", user.username, user.id);

        Ok(user)
    }

    /// Check whether `password` is correct for `username`.
    ///
    /// Returns `Ok(false)` for unknown usernames as well as wrong passwords.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database could not be read
    /// or the stored hash is malformed ([Error::HashingError]).
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool, Error> {
        let user = match get_user_by_username(username, self.connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Ok(false),
            Err(error) => return Err(error),
        };

        user.password_hash.verify(password).map_err(|error| {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Error::HashingError(error.to_string())
        })
    }

    /// Authenticate the user and, on success, start their session by calling
    /// `on_authenticated`.
    ///
    /// The callback's result is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCredentials] if the username or password is
    /// wrong, in which case `on_authenticated` is not called. Errors from
    /// [CredentialStore::authenticate] and from the callback are passed through.
    pub fn log_in<F, T>(&self, username: &str, password: &str, on_authenticated: F) -> Result<T, Error>
    where
        F: FnOnce(Session) -> Result<T, Error>,
    {
        if !self.authenticate(username, password)? {
            tracing::warn!("Failed log in attempt for \"{username}\"");
            return Err(Error::InvalidCredentials);
        }

        tracing::info!("{username} logged in");

        on_authenticated(Session::new(username))
    }
}
