//! Defines the route handler for the page for creating a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    expense::{
        DEFAULT_PAYMENT_METHOD,
        form::{ExpenseFormDefaults, expense_form_fields},
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, link, loading_spinner},
    navigation::NavBar,
    timezone::local_today,
};

/// The state needed for the new expense page.
#[derive(Debug, Clone)]
pub struct CreateExpensePageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
    /// The database connection for accessing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating an expense.
///
/// The date defaults to today in the local timezone.
pub async fn get_create_expense_page(
    State(state): State<CreateExpensePageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let available_categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for new expense page: {error}")
    })?;

    Ok(create_expense_view(today, &available_categories).into_response())
}

fn create_expense_view(today: Date, available_categories: &[Category]) -> Markup {
    let create_expense_route = endpoints::EXPENSES_API;
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();
    let spinner = loading_spinner();
    let form_fields = expense_form_fields(
        &ExpenseFormDefaults {
            amount: None,
            category_id: None,
            expense_date: today,
            description: None,
            payment_method: DEFAULT_PAYMENT_METHOD,
        },
        available_categories,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_expense_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Expense" }

                (form_fields)

                @if available_categories.is_empty() {
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "There are no categories yet. "
                        (link(endpoints::NEW_CATEGORY_VIEW, "Create a category"))
                        " first."
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Save Expense"
                }
            }
        }
    };

    base("New Expense", &[], &content)
}
