/*! Database set up for the application. */

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    category::{create_category_table, seed_categories},
    expense::create_expense_table,
};

/// Create the all of the database tables for the application and seed the
/// starter categories if there are no categories yet.
///
/// Foreign key enforcement is switched on for `connection` first, since
/// SQLite leaves it off by default and the expense table relies on it.
///
/// # Errors
/// This function may return a [rusqlite::Error] if something went wrong
/// creating the tables.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    seed_categories(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{category::get_all_categories, db::initialize};

    #[test]
    fn initialize_can_run_twice() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialize failed");
        initialize(&connection).expect("second initialize failed");

        let categories = get_all_categories(&connection).expect("could not get categories");
        assert_eq!(categories.len(), 8, "categories should only be seeded once");
    }

    #[test]
    fn initialize_enables_foreign_keys() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let enabled: bool = connection
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(enabled);
    }
}
