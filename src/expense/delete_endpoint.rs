//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    database_id::ExpenseId,
    expense::{
        core::delete_expense,
        list_page::{ExpenseListMessage, expenses_view_url},
    },
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for deleting an expense.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteExpenseQuery {
    /// Redirect to the expense list instead of responding with an alert.
    #[serde(default)]
    pub redirect: bool,
}

/// A route handler for deleting an expense, responds with an alert.
///
/// The status code has to be 200 OK on success or HTMX will not remove the
/// table row. With `?redirect=true` a successful delete redirects to the
/// expense list with the deleted banner instead.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Query(query): Query<DeleteExpenseQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(()) => {
            tracing::info!("Deleted expense {expense_id}");

            if query.redirect {
                return (
                    HxRedirect(expenses_view_url(ExpenseListMessage::Deleted)),
                    StatusCode::SEE_OTHER,
                )
                    .into_response();
            }

            Alert::SuccessSimple {
                message: "Expense deleted".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingExpense) => Error::DeleteMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Query;
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{Expense, ExpenseAmount, count_expenses, create_expense, get_expense},
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
    };

    use super::{DeleteExpenseQuery, DeleteExpenseState, delete_expense_endpoint};

    fn get_state() -> DeleteExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_expense() {
        let state = get_state();
        let expense = create_expense(
            Expense::build(ExpenseAmount::new(10.0).unwrap(), 1, date!(2024 - 01 - 05)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            Query(DeleteExpenseQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_expense(expense.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_unknown_expense_returns_not_found() {
        let state = get_state();
        create_expense(
            Expense::build(ExpenseAmount::new(10.0).unwrap(), 1, date!(2024 - 01 - 05)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_expense_endpoint(
            State(state.clone()),
            Path(999),
            Query(DeleteExpenseQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(1));

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let message = html
            .select(&Selector::parse("p").unwrap())
            .next()
            .expect("no alert message")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "Could not delete expense");
    }

    #[tokio::test]
    async fn redirects_to_expense_list_when_requested() {
        let state = get_state();
        let expense = create_expense(
            Expense::build(ExpenseAmount::new(10.0).unwrap(), 1, date!(2024 - 01 - 05)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            Query(DeleteExpenseQuery { redirect: true }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/expenses?success=deleted");
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }
}
