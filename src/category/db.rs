//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{
        Category, CategoryId, CategoryName,
        domain::{DEFAULT_CATEGORY_COLOR, NewCategory},
    },
};

/// The categories inserted into an empty database: name, colour and icon.
const STARTER_CATEGORIES: [(&str, &str, &str); 8] = [
    ("Food", "#FF6B6B", "🍜"),
    ("Transport", "#4ECDC4", "🚗"),
    ("Shopping", "#FFD93D", "🛍️"),
    ("Entertainment", "#95E1D3", "🎬"),
    ("Utilities", "#F38181", "💡"),
    ("Health", "#AA96DA", "💊"),
    ("Education", "#6BCB77", "📚"),
    ("Other", DEFAULT_CATEGORY_COLOR, "📌"),
];

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if a category with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    new_category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, color, icon, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, color, icon, created_at",
        )?
        .query_row(
            (
                new_category.name.as_ref(),
                &new_category.color,
                &new_category.icon,
                OffsetDateTime::now_utc(),
            ),
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(new_category.name.to_string()),
            error => error.into(),
        })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// Returns [Error::NotFound] if `category_id` does not refer to a category.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, color, icon, created_at FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, color, icon, created_at FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Count how many expenses are filed under each category.
///
/// Categories without any expenses are not included in the map.
pub fn count_expenses_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare("SELECT category_id, COUNT(1) FROM expense GROUP BY category_id")?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Delete a category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryInUse] if an expense still refers to the category,
/// - [Error::DeleteMissingCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| match error {
            // RESTRICT foreign keys report SQLITE_CONSTRAINT_TRIGGER rather than
            // SQLITE_CONSTRAINT_FOREIGNKEY, so match on the primary code.
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: rusqlite::ErrorCode::ConstraintViolation,
                    extended_code: _,
                },
                _,
            ) => Error::CategoryInUse,
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL DEFAULT '#C7CEEA',
            icon TEXT,
            created_at TEXT NOT NULL
        );",
    )?;

    Ok(())
}

/// Insert the starter categories if the category table is empty.
///
/// Does nothing if there is at least one category.
pub fn seed_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let category_count: u32 =
        connection.query_row("SELECT COUNT(id) FROM category;", [], |row| row.get(0))?;

    if category_count > 0 {
        return Ok(());
    }

    let now = OffsetDateTime::now_utc();
    let mut statement = connection
        .prepare("INSERT INTO category (name, color, icon, created_at) VALUES (?1, ?2, ?3, ?4)")?;

    for (name, color, icon) in STARTER_CATEGORIES {
        statement.execute((name, color, icon, now))?;
    }

    tracing::info!("Seeded {} starter categories", STARTER_CATEGORIES.len());

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let color = row.get(2)?;
    let icon = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Category {
        id,
        name,
        color,
        icon,
        created_at,
    })
}
