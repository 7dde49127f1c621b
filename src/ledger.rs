//! The ledger of a logged in user.

use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::{
    Error, Session,
    database_id::TransactionId,
    db::{initialize, reset_transactions},
    transaction::{
        ExpenseShare, Transaction, TransactionForm, create_transaction, delete_transaction,
        expense_shares, get_transactions_for_user, summarize_expenses_by_category,
    },
};

/// Controls how a [Ledger] prepares the database when it is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Delete every user's transactions before opening the ledger.
    ///
    /// Only intended for testing and demos.
    pub reset_on_start: bool,
}

/// Records and queries the transactions of the session's user.
///
/// Every operation is scoped to [Ledger::session], so one user can never see
/// or delete another user's transactions.
#[derive(Debug)]
pub struct Ledger<'conn> {
    connection: &'conn Connection,
    session: Session,
}

impl<'conn> Ledger<'conn> {
    /// Open the ledger for `session`, creating the tables if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables could not be created or reset.
    pub fn initialize(
        connection: &'conn Connection,
        session: Session,
        options: LedgerOptions,
    ) -> Result<Self, Error> {
        if options.reset_on_start {
            reset_transactions(connection)?;
        } else {
            initialize(connection)?;
        }

        tracing::info!("Opened ledger for {}", session.username());

        Ok(Self {
            connection,
            session,
        })
    }

    /// The session this ledger belongs to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Validate `form` and record it as a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an [Error::ValidationError] if the form is invalid, in which
    /// case nothing is written.
    pub fn add(&self, form: &TransactionForm) -> Result<Transaction, Error> {
        let builder = form.parse()?;
        let transaction = create_transaction(self.session.username(), builder, self.connection)?;

        tracing::info!(
            "Added {} transaction {} for {}",
            transaction.transaction_type,
            transaction.id,
            self.session.username()
        );

        Ok(transaction)
    }

    /// All of the user's transactions in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns an error if there is an SQL error.
    pub fn list(&self) -> Result<Vec<Transaction>, Error> {
        get_transactions_for_user(self.session.username(), self.connection)
    }

    /// Delete one of the user's transactions.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the user has no transaction with `id`.
    pub fn delete(&self, id: TransactionId) -> Result<(), Error> {
        delete_transaction(id, self.session.username(), self.connection)
    }

    /// The user's total expenses per category.
    ///
    /// # Errors
    ///
    /// Returns an error if there is an SQL error.
    pub fn summarize_expenses_by_category(&self) -> Result<BTreeMap<String, f64>, Error> {
        summarize_expenses_by_category(self.session.username(), self.connection)
    }

    /// The user's expenses per category as shares of their total expenses,
    /// largest first.
    ///
    /// # Errors
    ///
    /// Returns an error if there is an SQL error.
    pub fn expense_breakdown(&self) -> Result<Vec<ExpenseShare>, Error> {
        let totals = self.summarize_expenses_by_category()?;

        Ok(expense_shares(&totals))
    }
}
