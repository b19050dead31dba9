use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use credit_manager::{
    CustomerForm, TransactionInput, initialize_db,
    ledger::{CustomerLocks, Ledger},
    stores::sqlite::SQLiteCustomerStore,
};

/// A utility for creating a test database for the credit_manager server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Name, phone, opening balance and (days ago, type, amount) of each demo customer.
type DemoCustomer = (&'static str, &'static str, i64, &'static [(i64, &'static str, i64)]);

const DEMO_CUSTOMERS: &[DemoCustomer] = &[
    (
        "Asha Patel",
        "9876543210",
        2500,
        &[
            (40, "credit", 1200),
            (33, "cash", 450),
            (21, "payment", 2000),
            (9, "credit", 780),
            (2, "deposit", 500),
        ],
    ),
    (
        "Ravi Kumar",
        "9123456780",
        0,
        &[(28, "credit", 15000), (14, "payment", 7500), (1, "credit", 3200)],
    ),
    (
        "Meena & Sons, Hardware",
        "020 2612 3456",
        48000,
        &[(35, "payment", 20000), (12, "cash", 1800), (5, "credit", 9650)],
    ),
];

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let ledger = Ledger::new(
        SQLiteCustomerStore::new(Arc::new(Mutex::new(conn))),
        CustomerLocks::default(),
    );
    let now = OffsetDateTime::now_utc();

    for (name, phone, opening_balance, transactions) in DEMO_CUSTOMERS {
        println!("Creating customer {name}...");

        let opening_balance = (*opening_balance > 0).then(|| Decimal::from(*opening_balance));
        let customer = ledger
            .create_customer(
                CustomerForm {
                    name: name.to_string(),
                    phone: phone.to_string(),
                    initial_balance: opening_balance,
                    opening_date: Some(now - Duration::days(45)),
                },
                now,
            )
            .await?;

        for (days_ago, kind, amount) in *transactions {
            let input = TransactionInput {
                kind: kind.to_string(),
                amount: Decimal::from(*amount),
                description: None,
                date: Some(now - Duration::days(*days_ago)),
            };

            ledger.add_transaction(customer.id, &input, now).await?;
        }
    }

    println!("Success!");

    Ok(())
}
