//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - `TransactionForm` for validating raw user input
//! - Database functions for storing, querying, deleting and summarizing transactions

mod db;
mod delete;
mod form;
mod models;
mod summary;

pub use db::{
    count_transactions, create_transaction, create_transaction_table, drop_transaction_table,
    get_transaction, get_transactions_for_user,
};
pub use delete::delete_transaction;
pub use form::TransactionForm;
pub use models::{
    Category, DEFAULT_CATEGORIES, INCOME_CATEGORY, PaymentMode, Transaction, TransactionBuilder,
    TransactionType,
};
pub use summary::{ExpenseShare, expense_shares, summarize_expenses_by_category};
