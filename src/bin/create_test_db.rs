use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;

use budgetmate::{
    Config, CredentialStore, Ledger, LedgerOptions, PasswordHash, TransactionForm,
};

/// A utility for creating a test database for budgetmate.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_USERNAME: &str = "test";
const TEST_PASSWORD: &str = "test";

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let config = Config {
        db_path: output_path.to_path_buf(),
        ..Config::default()
    };
    let conn = config.open_db()?;

    println!("Creating test user...");
    let credentials = CredentialStore::new(&conn, PasswordHash::DEFAULT_COST);
    credentials.register(TEST_USERNAME, TEST_PASSWORD)?;

    println!("Creating test transactions...");
    let ledger = credentials.log_in(TEST_USERNAME, TEST_PASSWORD, |session| {
        Ledger::initialize(&conn, session, LedgerOptions::default())
    })?;

    let sample_transactions = [
        ("", "2500", "Income", "Bank Transfer", "2024-01-01"),
        ("Bills", "1200", "Expense", "Bank Transfer", "2024-01-02"),
        ("Food", "54.20", "Expense", "Debit Card", "2024-01-03"),
        ("Transport", "12.50", "Expense", "UPI", "2024-01-04"),
        ("Food", "23.75", "Expense", "Cash", "2024-01-06"),
        ("Shopping", "89.99", "Expense", "Credit Card", "2024-01-09"),
        ("Other", "15", "Expense", "Cash", "2024-01-12"),
    ];

    for (category, amount, transaction_type, payment_mode, date) in sample_transactions {
        ledger.add(&TransactionForm {
            category: category.to_owned(),
            amount: amount.to_owned(),
            transaction_type: transaction_type.to_owned(),
            payment_mode: payment_mode.to_owned(),
            date: date.to_owned(),
        })?;
    }

    println!("Success! Log in with the username \"{TEST_USERNAME}\" and password \"{TEST_PASSWORD}\".");

    Ok(())
}
