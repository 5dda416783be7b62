//! Defines the core data models and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, category::CategoryId, database_id::ExpenseId};

/// The payment method recorded when none is given.
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

// ============================================================================
// MODELS
// ============================================================================

/// An amount of money spent, always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ExpenseAmount(f64);

impl ExpenseAmount {
    /// Create an expense amount.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidAmount] if `amount` is less
    /// than 0.01, is not a finite number or has more than two decimal places.
    pub fn new(amount: f64) -> Result<Self, Error> {
        let satang = amount * 100.0;
        let whole_satang = (satang - satang.round()).abs() < 1e-6;

        if amount.is_finite() && amount >= 0.01 && whole_satang {
            Ok(Self(amount))
        } else {
            Err(Error::InvalidAmount(amount))
        }
    }

    /// Create an expense amount without validation.
    ///
    /// The caller should ensure that the amount is greater than zero. The
    /// database will still reject amounts that are not.
    pub fn new_unchecked(amount: f64) -> Self {
        Self(amount)
    }

    /// The amount as a plain number.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

/// Money spent on something, filed under a category.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent, always greater than zero.
    pub amount: f64,
    /// The ID of the category the expense is filed under.
    pub category_id: CategoryId,
    /// A text description of what the money was spent on. May be empty.
    pub description: String,
    /// When the money was spent.
    pub expense_date: Date,
    /// How the expense was paid for, e.g. "Cash" or "Credit Card".
    pub payment_method: String,
    /// When the expense was first recorded.
    pub created_at: OffsetDateTime,
    /// When the expense was last changed.
    pub updated_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(amount: ExpenseAmount, category_id: CategoryId, expense_date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            amount,
            category_id,
            expense_date,
            description: String::new(),
            payment_method: DEFAULT_PAYMENT_METHOD.to_owned(),
        }
    }
}

/// A builder for creating or replacing [Expense] records.
///
/// The description defaults to an empty string and the payment method to
/// [DEFAULT_PAYMENT_METHOD].
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::expense::{Expense, ExpenseAmount};
///
/// let expense = Expense::build(ExpenseAmount::new(85.0)?, 1, date!(2024-01-05))
///     .description("Noodles")
///     .payment_method("Credit Card");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    /// The amount of money spent.
    pub amount: ExpenseAmount,
    /// The category to file the expense under, must refer to an existing category.
    pub category_id: CategoryId,
    /// When the money was spent.
    pub expense_date: Date,
    /// What the money was spent on.
    pub description: String,
    /// How the expense was paid for.
    pub payment_method: String,
}

impl ExpenseBuilder {
    /// Set the description for the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the payment method for the expense.
    pub fn payment_method(mut self, payment_method: &str) -> Self {
        self.payment_method = payment_method.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const EXPENSE_COLUMNS: &str =
    "id, amount, category_id, description, expense_date, payment_method, created_at, updated_at";

/// Create a new expense in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - [Error::InvalidAmount] if the amount is not greater than zero,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO expense (amount, category_id, description, expense_date, payment_method, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount.as_f64(),
                builder.category_id,
                &builder.description,
                builder.expense_date,
                &builder.payment_method,
                now,
            ),
            map_expense_row,
        )
        .map_err(|error| map_constraint_error(error, &builder))
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(&format!("SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Replace every field of the expense `id` with the values in `builder`.
///
/// The creation time is kept and the update time is set to now.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if `id` does not refer to a valid expense,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    builder: ExpenseBuilder,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "UPDATE expense
             SET amount = ?1,
                 category_id = ?2,
                 description = ?3,
                 expense_date = ?4,
                 payment_method = ?5,
                 updated_at = ?6
             WHERE id = ?7
             RETURNING {EXPENSE_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount.as_f64(),
                builder.category_id,
                &builder.description,
                builder.expense_date,
                &builder.payment_method,
                OffsetDateTime::now_utc(),
                id,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
            error => map_constraint_error(error, &builder),
        })
}

/// Delete the expense `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// The category table must exist first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL CHECK (amount > 0),
            category_id INTEGER NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            expense_date TEXT NOT NULL,
            payment_method TEXT NOT NULL DEFAULT 'Cash',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(expense_date);
        CREATE INDEX IF NOT EXISTS idx_expense_category_id ON expense(category_id);",
    )?;

    Ok(())
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category_id = row.get(2)?;
    let description = row.get(3)?;
    let expense_date = row.get(4)?;
    let payment_method = row.get(5)?;
    let created_at = row.get(6)?;
    let updated_at = row.get(7)?;

    Ok(Expense {
        id,
        amount,
        category_id,
        description,
        expense_date,
        payment_method,
        created_at,
        updated_at,
    })
}

fn map_constraint_error(error: rusqlite::Error, builder: &ExpenseBuilder) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(builder.category_id),
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
            },
            _,
        ) => Error::InvalidAmount(builder.amount.as_f64()),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{
            DEFAULT_PAYMENT_METHOD, Expense, ExpenseAmount, count_expenses, create_expense,
            delete_expense, get_expense, update_expense,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn amount(value: f64) -> ExpenseAmount {
        ExpenseAmount::new(value).unwrap()
    }

    #[test]
    fn create_succeeds_with_defaults() {
        let conn = get_test_connection();

        let expense = create_expense(Expense::build(amount(12.3), 1, date!(2024 - 01 - 05)), &conn)
            .expect("Could not create expense");

        assert_eq!(expense.amount, 12.3);
        assert_eq!(expense.category_id, 1);
        assert_eq!(expense.description, "");
        assert_eq!(expense.payment_method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(expense.expense_date, date!(2024 - 01 - 05));
        assert_eq!(expense.created_at, expense.updated_at);
    }

    #[test]
    fn create_fails_on_unknown_category() {
        let conn = get_test_connection();

        let result = create_expense(Expense::build(amount(12.3), 999, date!(2024 - 01 - 05)), &conn);

        assert_eq!(result, Err(Error::InvalidCategory(999)));
        assert_eq!(count_expenses(&conn), Ok(0));
    }

    #[test]
    fn database_rejects_zero_amount() {
        let conn = get_test_connection();

        let result = create_expense(
            Expense::build(ExpenseAmount::new_unchecked(0.0), 1, date!(2024 - 01 - 05)),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
        assert_eq!(count_expenses(&conn), Ok(0));
    }

    #[test]
    fn get_returns_created_expense() {
        let conn = get_test_connection();
        let created = create_expense(
            Expense::build(amount(85.0), 2, date!(2024 - 01 - 05))
                .description("Bus fare")
                .payment_method("E-Wallet"),
            &conn,
        )
        .unwrap();

        let selected = get_expense(created.id, &conn);

        assert_eq!(selected, Ok(created));
    }

    #[test]
    fn get_missing_expense_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_expense(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = get_test_connection();
        let created = create_expense(
            Expense::build(amount(85.0), 1, date!(2024 - 01 - 05)).description("Lunch"),
            &conn,
        )
        .unwrap();

        let updated = update_expense(
            created.id,
            Expense::build(amount(90.0), 2, date!(2024 - 01 - 06)).payment_method("Credit Card"),
            &conn,
        )
        .expect("Could not update expense");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 90.0);
        assert_eq!(updated.category_id, 2);
        assert_eq!(updated.description, "");
        assert_eq!(updated.expense_date, date!(2024 - 01 - 06));
        assert_eq!(updated.payment_method, "Credit Card");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_missing_expense_returns_error() {
        let conn = get_test_connection();

        let result = update_expense(42, Expense::build(amount(1.0), 1, date!(2024 - 01 - 06)), &conn);

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn update_with_unknown_category_returns_error() {
        let conn = get_test_connection();
        let created =
            create_expense(Expense::build(amount(1.0), 1, date!(2024 - 01 - 05)), &conn).unwrap();

        let result = update_expense(
            created.id,
            Expense::build(amount(1.0), 999, date!(2024 - 01 - 05)),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(999)));
        assert_eq!(get_expense(created.id, &conn), Ok(created));
    }

    #[test]
    fn delete_removes_expense() {
        let conn = get_test_connection();
        let created =
            create_expense(Expense::build(amount(1.0), 1, date!(2024 - 01 - 05)), &conn).unwrap();

        delete_expense(created.id, &conn).expect("Could not delete expense");

        assert_eq!(get_expense(created.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_expense_leaves_store_unchanged() {
        let conn = get_test_connection();
        create_expense(Expense::build(amount(1.0), 1, date!(2024 - 01 - 05)), &conn).unwrap();

        let result = delete_expense(999, &conn);

        assert_eq!(result, Err(Error::DeleteMissingExpense));
        assert_eq!(count_expenses(&conn), Ok(1));
    }
}
