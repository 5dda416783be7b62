//! Defines the route handler for the page for editing an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    database_id::ExpenseId,
    endpoints::{self, format_endpoint},
    expense::{
        Expense,
        core::get_expense,
        form::{ExpenseFormDefaults, expense_form_fields},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, delete_action_button,
        loading_spinner,
    },
    navigation::NavBar,
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for accessing expenses and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing an expense.
///
/// Responds with the 404 page if the expense does not exist.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve expense {expense_id}: {error}");
        }
    })?;

    let available_categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for edit expense page: {error}")
    })?;

    Ok(edit_expense_view(&expense, &available_categories).into_response())
}

fn edit_expense_view(expense: &Expense, available_categories: &[Category]) -> Markup {
    let update_expense_route = format_endpoint(endpoints::EXPENSE, expense.id);
    let delete_expense_route = format!("{update_expense_route}?redirect=true");
    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let spinner = loading_spinner();
    let form_fields = expense_form_fields(
        &ExpenseFormDefaults {
            amount: Some(expense.amount),
            category_id: Some(expense.category_id),
            expense_date: expense.expense_date,
            description: Some(&expense.description),
            payment_method: &expense.payment_method,
        },
        available_categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_expense_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Expense" }

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Update Expense"
                }

                a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "Cancel" }
            }

            div class="w-full mt-6" data-delete-expense="true"
            {
                (delete_action_button(
                    &delete_expense_route,
                    "Are you sure you want to delete this expense?",
                    "#alert-container",
                    "innerHTML",
                ))
            }
        }
    };

    base("Edit Expense", &[], &content)
}
