use rusqlite::Connection;

use crate::{Error, database_id::TransactionId};

/// Delete the transaction with `id` if it belongs to `username`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if no transaction with `id` is owned by `username`. Rows
///   owned by other users are left untouched.
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    username: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM transactions WHERE id = :id AND username = :username",
        rusqlite::named_params! {":id": id, ":username": username},
    )?;

    if rows_affected == 0 {
        tracing::warn!("Could not delete transaction {id}: no such transaction for {username}");
        return Err(Error::NotFound);
    }

    tracing::info!("Deleted transaction {id} for {username}");

    Ok(())
}
