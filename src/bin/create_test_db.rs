use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration};

use expense_tracker::{
    Category, DateRange, Expense, ExpenseAmount, create_expense, current_month_range, get_all_categories,
    initialize_db, local_today, previous_month_range,
};

/// A utility for creating a test database for the expense_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The canonical name of the local timezone, used to work out the current month.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

/// Descriptions and payment methods for the sample expenses, cycled through
/// in order.
const SAMPLES: [(&str, &str); 8] = [
    ("Noodles", "Cash"),
    ("BTS fare", "Rabbit Card"),
    ("Groceries", "Credit Card"),
    ("Movie tickets", "Credit Card"),
    ("Electricity bill", "Bank Transfer"),
    ("Pharmacy", "Cash"),
    ("New shirt", "Credit Card"),
    ("", "Cash"),
];

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

    let today = local_today(&args.timezone)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let categories = get_all_categories(&conn)?;
    if categories.is_empty() {
        eprintln!("The database has no categories to file expenses under.");
        exit(1);
    }

    println!("Creating sample expenses...");

    let mut count = 0;
    for range in [previous_month_range(today), current_month_range(today)] {
        count += create_sample_expenses(range, &categories, today, &conn)?;
    }

    println!("Created {count} expenses. Success!");

    Ok(())
}

/// Create an expense every other day from the start of `range` up to today or
/// the end of `range`, whichever comes first.
fn create_sample_expenses(
    range: DateRange,
    categories: &[Category],
    today: Date,
    conn: &Connection,
) -> Result<usize, Box<dyn Error>> {
    let mut date = range.start;
    let mut count = 0;

    let end = range.end.min(today);

    while date <= end {
        let category = &categories[count % categories.len()];
        let (description, payment_method) = SAMPLES[count % SAMPLES.len()];
        let amount = 35.0 + (count % 7) as f64 * 42.5;

        create_expense(
            Expense::build(ExpenseAmount::new(amount)?, category.id, date)
                .description(description)
                .payment_method(payment_method),
            conn,
        )?;

        count += 1;
        date += Duration::days(2);
    }

    Ok(count)
}
