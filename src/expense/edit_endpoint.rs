//! Defines the endpoint for replacing an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{
        core::update_expense,
        form::ExpenseForm,
        list_page::{ExpenseListMessage, expenses_view_url},
    },
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing every field of an expense, redirects to the
/// expense list on success.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::debug!("rejected expense form for expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_expense(expense_id, builder, &connection) {
        tracing::error!("Could not update expense {expense_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(expenses_view_url(ExpenseListMessage::Updated)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
