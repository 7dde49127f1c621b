use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::OffsetDateTime;

use budgetmate::{
    Config, CredentialStore, DEFAULT_CATEGORIES, DEFAULT_DB_PATH, Ledger, PasswordHash,
    PaymentMode, Transaction, TransactionForm, TransactionId, format_currency, format_percentage,
    setup_logging,
};

/// BudgetMate, a personal finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "BUDGETMATE_DB", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// The bcrypt cost for hashing new passwords.
    #[arg(
        long,
        env = "BUDGETMATE_HASH_COST",
        default_value_t = PasswordHash::DEFAULT_COST,
        value_parser = clap::value_parser!(u32).range(4..=31)
    )]
    hash_cost: u32,

    /// Delete every user's transactions when the ledger is opened.
    #[arg(
        long,
        env = "BUDGETMATE_RESET_LEDGER",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    reset_ledger: bool,

    /// Append debug logs to this file.
    #[arg(long, env = "BUDGETMATE_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            db_path: self.db_path.clone(),
            hash_cost: self.hash_cost,
            reset_ledger_on_start: self.reset_ledger,
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new user.
    Register {
        #[arg(long, short)]
        username: String,
    },
    /// Record an income or expense.
    Add {
        #[arg(long, short)]
        username: String,

        /// "Income" or "Expense".
        #[arg(long = "type")]
        transaction_type: String,

        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// Cash, Credit Card, Debit Card, UPI or Bank Transfer.
        #[arg(long)]
        payment_mode: String,

        /// Required for expenses, e.g. Food, Transport, Shopping, Bills or Other.
        #[arg(long, default_value = "")]
        category: String,

        /// The date as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Show all of your transactions.
    List {
        #[arg(long, short)]
        username: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Delete one of your transactions.
    Delete {
        #[arg(long, short)]
        username: String,

        /// The ID shown by `list`.
        id: TransactionId,

        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
    /// Show how your expenses are split across categories.
    Summary {
        #[arg(long, short)]
        username: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

/// Errors are already printed for the user, so stderr logging stays off unless
/// `RUST_LOG` is set.
const DEFAULT_LOG_DIRECTIVE: &str = "off";

fn main() -> ExitCode {
    let args = Args::parse();
    let config = args.config();

    if let Err(error) = setup_logging(DEFAULT_LOG_DIRECTIVE, config.log_file.as_deref()) {
        print_error(format!("Could not open the log file: {error}"));
        return ExitCode::FAILURE;
    }

    let connection = match config.open_db() {
        Ok(connection) => connection,
        Err(error) => {
            print_error(format!(
                "Could not open the database at {:?}: {error}",
                config.db_path
            ));
            return ExitCode::FAILURE;
        }
    };

    match run(args.command, &config, &connection) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(error);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config, connection: &Connection) -> Result<(), Box<dyn Error>> {
    let credentials = CredentialStore::new(connection, config.hash_cost);

    match command {
        Command::Register { username } => {
            let Some(password) = prompt_new_password()? else {
                return Ok(());
            };

            credentials.register(&username, &password)?;
            println!("User registered successfully!");
        }
        Command::Add {
            username,
            transaction_type,
            amount,
            payment_mode,
            category,
            date,
        } => {
            let ledger = log_in(&credentials, &username, config, connection)?;
            let form = TransactionForm {
                category,
                amount,
                transaction_type,
                payment_mode,
                date: date.unwrap_or_else(today),
            };

            let transaction = ledger.add(&form)?;
            println!("Transaction {} added successfully!", transaction.id);
        }
        Command::List { username, json } => {
            let ledger = log_in(&credentials, &username, config, connection)?;
            let transactions = ledger.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            } else {
                print_transactions(&transactions);
            }
        }
        Command::Delete { username, id, yes } => {
            let ledger = log_in(&credentials, &username, config, connection)?;

            if !yes && !confirm(&format!("Are you sure you want to delete record {id}?"))? {
                println!("Cancelled.");
                return Ok(());
            }

            ledger.delete(id)?;
            println!("Record {id} deleted successfully!");
        }
        Command::Summary { username, json } => {
            let ledger = log_in(&credentials, &username, config, connection)?;
            let shares = ledger.expense_breakdown()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&shares)?);
            } else if shares.is_empty() {
                println!("No expense data available for analysis.");
            } else {
                println!("{:<16} {:>14} {:>8}", "Category", "Total", "Share");
                for share in shares {
                    println!(
                        "{:<16} {:>14} {:>8}",
                        share.category,
                        format_currency(share.total),
                        format_percentage(share.percentage)
                    );
                }
            }
        }
    }

    Ok(())
}

fn log_in<'conn>(
    credentials: &CredentialStore<'conn>,
    username: &str,
    config: &Config,
    connection: &'conn Connection,
) -> Result<Ledger<'conn>, Box<dyn Error>> {
    let password = rpassword::prompt_password(format!("Password for {username}: "))?;

    let ledger = credentials.log_in(username, &password, |session| {
        Ledger::initialize(connection, session, config.ledger_options())
    })?;

    Ok(ledger)
}

fn prompt_new_password() -> io::Result<Option<String>> {
    loop {
        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(error) => return Err(error),
        };

        if first_password.is_empty() {
            print_error("Password cannot be empty, try again.");
            continue;
        }

        let second_password = match rpassword::prompt_password("Enter the same password again: ")
        {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(error) => return Err(error),
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Ok(Some(first_password));
    }
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn today() -> String {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .to_string()
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions yet.");
        println!(
            "Expense categories: {}. Payment modes: {}.",
            DEFAULT_CATEGORIES.join(", "),
            PaymentMode::ALL.map(|mode| mode.as_str()).join(", ")
        );
        return;
    }

    println!(
        "{:>5} {:<16} {:>14} {:<8} {:<14} {}",
        "ID", "Category", "Amount", "Type", "Payment Mode", "Date"
    );

    for transaction in transactions {
        println!(
            "{:>5} {:<16} {:>14} {:<8} {:<14} {}",
            transaction.id,
            transaction.category.as_ref(),
            format_currency(transaction.amount),
            transaction.transaction_type.as_str(),
            transaction.payment_mode.as_str(),
            transaction.date
        );
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use tracing_subscriber::{EnvFilter, filter::LevelFilter};

    use super::{Args, DEFAULT_LOG_DIRECTIVE};

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn reset_ledger_env_accepts_boolish_values() {
        let parse_reset = || {
            Args::try_parse_from(["budgetmate", "list", "-u", "bob"])
                .unwrap()
                .config()
                .reset_ledger_on_start
        };

        assert!(!parse_reset(), "reset should be off by default");

        // SAFETY: no other test in this binary reads or writes this variable.
        for (value, want) in [("1", true), ("yes", true), ("0", false), ("no", false)] {
            unsafe { std::env::set_var("BUDGETMATE_RESET_LEDGER", value) };
            let got = parse_reset();
            unsafe { std::env::remove_var("BUDGETMATE_RESET_LEDGER") };

            assert_eq!(got, want, "BUDGETMATE_RESET_LEDGER={value}");
        }
    }

    #[test]
    fn reset_ledger_flag_enables_reset() {
        let args =
            Args::try_parse_from(["budgetmate", "--reset-ledger", "list", "-u", "bob"]).unwrap();

        assert!(args.config().reset_ledger_on_start);
    }

    #[test]
    fn stderr_logging_is_off_by_default() {
        let filter = EnvFilter::new(DEFAULT_LOG_DIRECTIVE);

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::OFF));
    }
}
