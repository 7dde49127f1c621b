//! Database queries for transactions.
//!
//! Every query except table management is scoped to a username.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::models::{Transaction, TransactionBuilder},
};

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                payment_mode TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_username ON transactions(username);",
        (),
    )?;

    Ok(())
}

/// Drop the transactions table if it exists.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn drop_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute("DROP TABLE IF EXISTS transactions", ())?;

    Ok(())
}

/// Create a new transaction for `username` in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    username: &str,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (username, category, amount, type, payment_mode, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, username, category, amount, type, payment_mode, date",
        )?
        .query_row(
            (
                username,
                builder.category.as_ref(),
                builder.amount,
                builder.transaction_type,
                builder.payment_mode,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` if it belongs to `username`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `username`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    username: &str,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, username, category, amount, type, payment_mode, date
             FROM transactions WHERE id = :id AND username = :username",
        )?
        .query_one(
            rusqlite::named_params! {":id": id, ":username": username},
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all of the transactions for `username` in the order they were
/// created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_user(
    username: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, username, category, amount, type, payment_mode, date
             FROM transactions WHERE username = :username ORDER BY id ASC",
        )?
        .query_map(&[(":username", username)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the number of transactions that belong to `username`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(username: &str, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM transactions WHERE username = ?1;",
            [username],
            |row| row.get::<_, u32>(0),
        )
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        username: row.get(1)?,
        category: crate::Category::new_unchecked(&row.get::<_, String>(2)?),
        amount: row.get(3)?,
        transaction_type: row.get(4)?,
        payment_mode: row.get(5)?,
        date: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Category, Error, INCOME_CATEGORY, PaymentMode, Transaction, TransactionType,
        db::initialize,
    };

    use super::{count_transactions, create_transaction, get_transaction, get_transactions_for_user};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn food(amount: f64) -> crate::TransactionBuilder {
        Transaction::build(
            amount,
            TransactionType::Expense,
            PaymentMode::Cash,
            date!(2024 - 01 - 01),
        )
        .category(Category::new_unchecked("Food"))
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction("bob", food(50.0), &conn);

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.username, "bob");
                assert_eq!(transaction.amount, 50.0);
                assert_eq!(transaction.category.as_ref(), "Food");
                assert_eq!(transaction.transaction_type, TransactionType::Expense);
                assert_eq!(transaction.payment_mode, PaymentMode::Cash);
                assert_eq!(transaction.date, date!(2024 - 01 - 01));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_income_with_placeholder_category() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            "bob",
            Transaction::build(
                1000.0,
                TransactionType::Income,
                PaymentMode::BankTransfer,
                date!(2024 - 02 - 01),
            ),
            &conn,
        )
        .unwrap();

        let stored = get_transaction(transaction.id, "bob", &conn).unwrap();
        assert_eq!(stored.category.as_ref(), INCOME_CATEGORY);
        assert_eq!(stored, transaction);
    }

    #[test]
    fn dates_are_stored_as_iso_text() {
        let conn = get_test_connection();
        let transaction = create_transaction("bob", food(1.0), &conn).unwrap();

        let raw_date: String = conn
            .query_row(
                "SELECT date FROM transactions WHERE id = ?1",
                [transaction.id],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(raw_date, "2024-01-01");
    }

    #[test]
    fn list_returns_rows_in_insertion_order() {
        let conn = get_test_connection();
        let want: Vec<Transaction> = [3.0, 1.0, 2.0]
            .into_iter()
            .map(|amount| create_transaction("bob", food(amount), &conn).unwrap())
            .collect();

        let got = get_transactions_for_user("bob", &conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn list_only_returns_rows_for_user() {
        let conn = get_test_connection();
        create_transaction("alice", food(10.0), &conn).unwrap();
        let bobs = create_transaction("bob", food(20.0), &conn).unwrap();

        let got = get_transactions_for_user("bob", &conn).unwrap();

        assert_eq!(got, vec![bobs]);
    }

    #[test]
    fn get_fails_for_other_users_transaction() {
        let conn = get_test_connection();
        let transaction = create_transaction("alice", food(10.0), &conn).unwrap();

        let result = get_transaction(transaction.id, "bob", &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction("bob", food(i as f64), &conn).expect("Could not create transaction");
        }
        create_transaction("alice", food(1.0), &conn).expect("Could not create transaction");

        let got_count = count_transactions("bob", &conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
