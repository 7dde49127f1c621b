//! Defines the data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId};

/// The category recorded for every income transaction.
pub const INCOME_CATEGORY: &str = "N/A";

/// The expense categories offered by the transaction form.
///
/// Any other non-empty category name is also accepted.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Food", "Transport", "Shopping", "Bills", "Other"];

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// Every transaction type, in the order the form lists them.
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// The name stored in the database and shown to the user.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse a transaction type, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|transaction_type| transaction_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::ValidationError(format!(
                    "\"{s}\" is not a transaction type, expected Income or Expense"
                ))
            })
    }
}

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Cash.
    Cash,
    /// Credit card.
    #[serde(rename = "Credit Card")]
    CreditCard,
    /// Debit card.
    #[serde(rename = "Debit Card")]
    DebitCard,
    /// Unified Payments Interface.
    #[serde(rename = "UPI")]
    Upi,
    /// Bank transfer.
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMode {
    /// Every payment mode, in the order the form lists them.
    pub const ALL: [PaymentMode; 5] = [
        PaymentMode::Cash,
        PaymentMode::CreditCard,
        PaymentMode::DebitCard,
        PaymentMode::Upi,
        PaymentMode::BankTransfer,
    ];

    /// The name stored in the database and shown to the user.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::CreditCard => "Credit Card",
            PaymentMode::DebitCard => "Debit Card",
            PaymentMode::Upi => "UPI",
            PaymentMode::BankTransfer => "Bank Transfer",
        }
    }
}

impl Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = Error;

    /// Parse a payment mode, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let expected: Vec<&str> = PaymentMode::ALL.iter().map(|mode| mode.as_str()).collect();
                Error::ValidationError(format!(
                    "\"{s}\" is not a payment mode, expected one of: {}",
                    expected.join(", ")
                ))
            })
    }
}

macro_rules! impl_sql_text {
    ($type:ty) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|_| FromSqlError::InvalidType)
            }
        }
    };
}

impl_sql_text!(TransactionType);
impl_sql_text!(PaymentMode);

/// A validated, non-empty category name, e.g. "Food".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category(String);

impl Category {
    /// Create a category name.
    ///
    /// Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::ValidationError] if `name` is blank.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::ValidationError(
                "a category is required for expenses".to_owned(),
            ))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The placeholder category used for income.
    pub fn income() -> Self {
        Self(INCOME_CATEGORY.to_owned())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::new(s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub username: String,
    /// What the money was spent on. Always [INCOME_CATEGORY] for income.
    pub category: Category,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// How the transaction was paid.
    pub payment_mode: PaymentMode,
    /// When the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        transaction_type: TransactionType,
        payment_mode: PaymentMode,
        date: Date,
    ) -> TransactionBuilder {
        let category = match transaction_type {
            TransactionType::Income => Category::income(),
            TransactionType::Expense => Category::new_unchecked("Other"),
        };

        TransactionBuilder {
            category,
            amount,
            transaction_type,
            payment_mode,
            date,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Expenses default to the "Other" category. Income always uses
/// [INCOME_CATEGORY].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// What the money was spent on.
    pub category: Category,
    /// The amount of money spent or earned. The sign is not checked.
    pub amount: f64,
    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,
    /// How the transaction was paid.
    pub payment_mode: PaymentMode,
    /// When the transaction happened.
    pub date: Date,
}

impl TransactionBuilder {
    /// Set the category for an expense. Has no effect on income.
    pub fn category(mut self, category: Category) -> Self {
        if self.transaction_type == TransactionType::Expense {
            self.category = category;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Category, Error, INCOME_CATEGORY, PaymentMode, Transaction, TransactionType};

    #[test]
    fn parses_transaction_type_ignoring_case() {
        assert_eq!("Expense".parse(), Ok(TransactionType::Expense));
        assert_eq!("income".parse(), Ok(TransactionType::Income));
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        let result: Result<TransactionType, Error> = "Refund".parse();

        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[test]
    fn payment_modes_round_trip_through_their_names() {
        for mode in PaymentMode::ALL {
            assert_eq!(mode.as_str().parse(), Ok(mode));
        }

        assert_eq!("upi".parse(), Ok(PaymentMode::Upi));
        assert_eq!("bank transfer".parse(), Ok(PaymentMode::BankTransfer));
    }

    #[test]
    fn rejects_unknown_payment_mode() {
        let result: Result<PaymentMode, Error> = "Cheque".parse();

        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[test]
    fn category_is_trimmed() {
        assert_eq!(Category::new("  Food "), Ok(Category::new_unchecked("Food")));
    }

    #[test]
    fn blank_category_is_rejected() {
        assert!(matches!(
            Category::new("   "),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn income_ignores_category() {
        let builder = Transaction::build(
            100.0,
            TransactionType::Income,
            PaymentMode::BankTransfer,
            date!(2024 - 01 - 01),
        )
        .category(Category::new_unchecked("Food"));

        assert_eq!(builder.category.as_ref(), INCOME_CATEGORY);
    }

    #[test]
    fn expense_uses_given_category() {
        let builder = Transaction::build(
            100.0,
            TransactionType::Expense,
            PaymentMode::Cash,
            date!(2024 - 01 - 01),
        )
        .category(Category::new_unchecked("Food"));

        assert_eq!(builder.category.as_ref(), "Food");
    }

    #[test]
    fn serializes_with_display_names() {
        let json = serde_json::to_string(&PaymentMode::CreditCard).unwrap();

        assert_eq!(json, "\"Credit Card\"");
    }
}
