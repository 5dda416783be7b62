//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `ExpenseBuilder` for creating expenses
//! - Database functions for storing, querying, and managing expenses
//! - View handlers for the expense list and the create/edit forms

pub(crate) mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
pub(crate) mod form;
pub(crate) mod list_page;
mod query;

pub use core::{
    DEFAULT_PAYMENT_METHOD, Expense, ExpenseAmount, ExpenseBuilder, create_expense,
    create_expense_table, delete_expense, get_expense, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use create_page::get_create_expense_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use edit_page::get_edit_expense_page;
pub use list_page::get_expenses_page;
pub use query::{
    CategoryInfo, ExpenseFilter, ExpenseRecord, UNKNOWN_CATEGORY_NAME, get_expense_record,
    get_expense_records,
};

#[cfg(test)]
pub use core::count_expenses;
