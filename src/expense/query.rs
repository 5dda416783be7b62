//! Retrieving expenses joined with the details of their category.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::{
        CategoryId, CategoryName,
        domain::{DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON},
    },
    database_id::ExpenseId,
};

/// The label used for expenses whose category cannot be found.
pub const UNKNOWN_CATEGORY_NAME: &str = "Other";

/// The category details shown alongside an expense.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryInfo {
    /// The expense refers to an existing category.
    Known {
        name: CategoryName,
        color: String,
        icon: Option<String>,
    },
    /// The category of the expense could not be found.
    Unknown,
}

impl CategoryInfo {
    /// The category name, or [UNKNOWN_CATEGORY_NAME].
    pub fn name(&self) -> &str {
        match self {
            CategoryInfo::Known { name, .. } => name.as_ref(),
            CategoryInfo::Unknown => UNKNOWN_CATEGORY_NAME,
        }
    }

    /// The category colour, or the default colour.
    pub fn color(&self) -> &str {
        match self {
            CategoryInfo::Known { color, .. } => color,
            CategoryInfo::Unknown => DEFAULT_CATEGORY_COLOR,
        }
    }

    /// The category icon, if any.
    pub fn icon(&self) -> Option<&str> {
        match self {
            CategoryInfo::Known { icon, .. } => icon.as_deref(),
            CategoryInfo::Unknown => Some(DEFAULT_CATEGORY_ICON),
        }
    }
}

/// An expense with the details of its category.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent.
    pub amount: f64,
    /// The ID of the category the expense is filed under.
    pub category_id: CategoryId,
    /// The name, colour and icon of the category.
    pub category: CategoryInfo,
    /// What the money was spent on. May be empty.
    pub description: String,
    /// When the money was spent.
    pub expense_date: Date,
    /// How the expense was paid for.
    pub payment_method: String,
    /// When the expense was created.
    pub created_at: OffsetDateTime,
    /// When the expense was last updated.
    pub updated_at: OffsetDateTime,
}

/// Restricts which expenses [get_expense_records] returns.
///
/// Every field is optional and `None` matches everything. Both dates are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Only match expenses in this category.
    pub category_id: Option<CategoryId>,
    /// Only match expenses on or after this date.
    pub start_date: Option<Date>,
    /// Only match expenses on or before this date.
    pub end_date: Option<Date>,
}

impl ExpenseFilter {
    /// A filter for expenses between `start_date` and `end_date` inclusive.
    pub fn date_range(start_date: Date, end_date: Date) -> Self {
        Self {
            category_id: None,
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }
}

const RECORD_QUERY: &str = "SELECT e.id, e.amount, e.category_id, e.description, e.expense_date,
        e.payment_method, e.created_at, e.updated_at, c.name, c.color, c.icon
    FROM expense e
    LEFT JOIN category c ON c.id = e.category_id";

/// Get the expenses matching `filter` with their category details.
///
/// Expenses are ordered by date with the most recent first, and then by
/// creation time with the most recently created first.
/// A start date after the end date matches nothing.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_expense_records(
    filter: ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<ExpenseRecord>, Error> {
    connection
        .prepare(&format!(
            "{RECORD_QUERY}
            WHERE (?1 IS NULL OR e.category_id = ?1)
                AND (?2 IS NULL OR e.expense_date >= ?2)
                AND (?3 IS NULL OR e.expense_date <= ?3)
            ORDER BY e.expense_date DESC, e.created_at DESC, e.id DESC"
        ))?
        .query_map(
            (filter.category_id, filter.start_date, filter.end_date),
            map_record_row,
        )?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

/// Get a single expense with its category details.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_expense_record(id: ExpenseId, connection: &Connection) -> Result<ExpenseRecord, Error> {
    let record = connection
        .prepare(&format!("{RECORD_QUERY} WHERE e.id = :id"))?
        .query_one(&[(":id", &id)], map_record_row)?;

    Ok(record)
}

fn map_record_row(row: &Row) -> Result<ExpenseRecord, rusqlite::Error> {
    let category_name: Option<String> = row.get(8)?;
    let category = match category_name {
        Some(name) => CategoryInfo::Known {
            name: CategoryName::new_unchecked(&name),
            color: row.get(9)?,
            icon: row.get(10)?,
        },
        None => CategoryInfo::Unknown,
    };

    Ok(ExpenseRecord {
        id: row.get(0)?,
        amount: row.get(1)?,
        category_id: row.get(2)?,
        category,
        description: row.get(3)?,
        expense_date: row.get(4)?,
        payment_method: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
