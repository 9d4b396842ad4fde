use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::macros::date;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mypocket::{StoreLocation, Transaction, TransactionDao, TransactionType};

/// A utility for creating a test database for mypocket.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short, env = "MYPOCKET_DB_PATH")]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

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

    tracing::info!("Creating database at {output_path:#?}");
    let mut dao = TransactionDao::new(StoreLocation::file(output_path));
    dao.open()?;

    tracing::info!("Creating test transactions...");

    let samples = [
        Transaction::build(
            TransactionType::Income,
            "Salary",
            2500.0,
            date!(2015 - 04 - 01),
            1,
            1,
        ),
        Transaction::build(
            TransactionType::Expense,
            "Rent",
            950.0,
            date!(2015 - 04 - 02),
            3,
            1,
        ),
        Transaction::build(
            TransactionType::Expense,
            "Coffee",
            4.50,
            date!(2015 - 04 - 16),
            2,
            1,
        ),
    ];

    for sample in samples {
        dao.create_transaction(sample)?;
    }

    for transaction in dao.get_all_transactions()? {
        println!("{}", serde_json::to_string(&transaction)?);
    }

    dao.close()?;

    tracing::info!("Success!");

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
