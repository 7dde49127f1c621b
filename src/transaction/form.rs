use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    transaction::models::{Category, PaymentMode, Transaction, TransactionBuilder, TransactionType},
};

/// The raw fields of the "add transaction" form, as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Ignored for income.
    pub category: String,
    /// Must parse as a finite number.
    pub amount: String,
    /// "Income" or "Expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// One of the [PaymentMode] names.
    pub payment_mode: String,
    /// An ISO 8601 calendar date, e.g. "2024-01-31".
    pub date: String,
}

impl TransactionForm {
    /// Validate the form and convert it into a [TransactionBuilder].
    ///
    /// # Errors
    ///
    /// Returns an [Error::ValidationError] if a required field is empty, the
    /// amount is not a number, the type or payment mode is not recognised, the
    /// date is not `YYYY-MM-DD`, or an expense has no category.
    pub fn parse(&self) -> Result<TransactionBuilder, Error> {
        let missing: Vec<&str> = [
            ("amount", &self.amount),
            ("type", &self.transaction_type),
            ("date", &self.date),
            ("payment mode", &self.payment_mode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::ValidationError(format!(
                "all fields are required, missing: {}",
                missing.join(", ")
            )));
        }

        let transaction_type: TransactionType = self.transaction_type.parse()?;
        let payment_mode: PaymentMode = self.payment_mode.parse()?;
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.date)?;

        let builder = Transaction::build(amount, transaction_type, payment_mode, date);

        match transaction_type {
            TransactionType::Expense => Ok(builder.category(Category::new(&self.category)?)),
            TransactionType::Income => Ok(builder),
        }
    }
}

fn parse_amount(raw_amount: &str) -> Result<f64, Error> {
    match raw_amount.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::ValidationError(format!(
            "amount must be a number, got \"{raw_amount}\""
        ))),
    }
}

fn parse_date(raw_date: &str) -> Result<Date, Error> {
    Date::parse(raw_date.trim(), format_description!("[year]-[month]-[day]")).map_err(|error| {
        Error::ValidationError(format!(
            "date must be formatted as YYYY-MM-DD, got \"{raw_date}\": {error}"
        ))
    })
}
