//! Expense totals by category, and each category's share of the total.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, transaction::TransactionType};

/// Sums the expenses of `username` by category.
///
/// Income is ignored. Categories whose expenses sum to zero are omitted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn summarize_expenses_by_category(
    username: &str,
    connection: &Connection,
) -> Result<BTreeMap<String, f64>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) FROM transactions
             WHERE username = :username AND type = :type
             GROUP BY category
             HAVING SUM(amount) != 0",
        )?
        .query_map(
            rusqlite::named_params! {":username": username, ":type": TransactionType::Expense},
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
        )?
        .map(|maybe_total| maybe_total.map_err(Error::from))
        .collect()
}

/// One slice of the expense breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseShare {
    /// The expense category.
    pub category: String,
    /// The sum of expenses in the category.
    pub total: f64,
    /// The category's share of all expenses, from 0 to 100.
    pub percentage: f64,
}

/// Converts category totals into shares of the overall total, largest first.
///
/// Ties are ordered by category name. If the totals sum to zero every share is
/// zero.
pub fn expense_shares(totals: &BTreeMap<String, f64>) -> Vec<ExpenseShare> {
    let grand_total: f64 = totals.values().sum();

    let mut shares: Vec<ExpenseShare> = totals
        .iter()
        .map(|(category, &total)| ExpenseShare {
            category: category.clone(),
            total,
            percentage: if grand_total == 0.0 {
                0.0
            } else {
                total / grand_total * 100.0
            },
        })
        .collect();

    // Stable sort keeps the alphabetical order from the map for equal totals.
    shares.sort_by(|a, b| b.total.total_cmp(&a.total));

    shares
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Category, PaymentMode, Transaction, TransactionType, create_transaction, db::initialize,
    };

    use super::{ExpenseShare, expense_shares, summarize_expenses_by_category};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn add_expense(username: &str, category: &str, amount: f64, conn: &Connection) {
        create_transaction(
            username,
            Transaction::build(
                amount,
                TransactionType::Expense,
                PaymentMode::Cash,
                date!(2024 - 01 - 01),
            )
            .category(Category::new_unchecked(category)),
            conn,
        )
        .unwrap();
    }

    #[test]
    fn sums_expenses_in_the_same_category() {
        let conn = get_test_connection();
        add_expense("bob", "Food", 50.0, &conn);
        add_expense("bob", "Food", 30.0, &conn);

        let got = summarize_expenses_by_category("bob", &conn).unwrap();

        assert_eq!(got, BTreeMap::from([("Food".to_owned(), 80.0)]));
    }

    #[test]
    fn ignores_income_and_other_users() {
        let conn = get_test_connection();
        add_expense("bob", "Food", 50.0, &conn);
        add_expense("bob", "Bills", 20.0, &conn);
        add_expense("alice", "Food", 999.0, &conn);
        create_transaction(
            "bob",
            Transaction::build(
                500.0,
                TransactionType::Income,
                PaymentMode::BankTransfer,
                date!(2024 - 01 - 02),
            ),
            &conn,
        )
        .unwrap();

        let got = summarize_expenses_by_category("bob", &conn).unwrap();

        assert_eq!(
            got,
            BTreeMap::from([("Bills".to_owned(), 20.0), ("Food".to_owned(), 50.0)])
        );
    }

    #[test]
    fn omits_categories_that_sum_to_zero() {
        let conn = get_test_connection();
        add_expense("bob", "Food", 10.0, &conn);
        add_expense("bob", "Other", 0.0, &conn);

        let got = summarize_expenses_by_category("bob", &conn).unwrap();

        assert_eq!(got, BTreeMap::from([("Food".to_owned(), 10.0)]));
    }

    #[test]
    fn empty_when_there_are_no_expenses() {
        let conn = get_test_connection();

        let got = summarize_expenses_by_category("bob", &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn shares_are_percentages_of_the_total() {
        let totals = BTreeMap::from([
            ("Bills".to_owned(), 25.0),
            ("Food".to_owned(), 75.0),
        ]);

        let got = expense_shares(&totals);

        assert_eq!(
            got,
            vec![
                ExpenseShare {
                    category: "Food".to_owned(),
                    total: 75.0,
                    percentage: 75.0,
                },
                ExpenseShare {
                    category: "Bills".to_owned(),
                    total: 25.0,
                    percentage: 25.0,
                },
            ]
        );
    }

    #[test]
    fn shares_are_zero_when_totals_cancel_out() {
        let totals = BTreeMap::from([("Food".to_owned(), 10.0), ("Refunds".to_owned(), -10.0)]);

        let got = expense_shares(&totals);

        assert!(got.iter().all(|share| share.percentage == 0.0));
    }
}
