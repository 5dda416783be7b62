//! Defines the endpoint for creating a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{
        core::create_expense,
        form::ExpenseForm,
        list_page::{ExpenseListMessage, expenses_view_url},
    },
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new expense, redirects to the expense list on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => {
            tracing::debug!("rejected expense form: {error}");
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

    match create_expense(builder, &connection) {
        Ok(expense) => tracing::info!("Created expense {}", expense.id),
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(expenses_view_url(ExpenseListMessage::Added)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{
            DEFAULT_PAYMENT_METHOD, count_expenses,
            create_endpoint::{CreateExpenseState, create_expense_endpoint},
            form::ExpenseForm,
            get_expense,
        },
        test_utils::{assert_hx_redirect, assert_valid_html, parse_html_fragment},
    };

    fn get_state() -> CreateExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    fn form(amount: f64) -> ExpenseForm {
        ExpenseForm {
            amount: Some(amount),
            category_id: Some(1),
            expense_date: Some(date!(2024 - 01 - 05)),
            description: Some("Noodles".to_owned()),
            payment_method: None,
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_state();

        let response = create_expense_endpoint(State(state.clone()), Form(form(85.0)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/expenses?success=added");

        // The first expense will have ID 1
        let connection = state.db_connection.lock().unwrap();
        let expense = get_expense(1, &connection).unwrap();
        assert_eq!(expense.amount, 85.0);
        assert_eq!(expense.description, "Noodles");
        assert_eq!(expense.payment_method, DEFAULT_PAYMENT_METHOD);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_and_nothing_is_stored() {
        let state = get_state();

        let response = create_expense_endpoint(State(state.clone()), Form(form(0.0)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn fraction_of_a_satang_is_rejected_and_nothing_is_stored() {
        let state = get_state();

        let response = create_expense_endpoint(State(state.clone()), Form(form(0.001)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn missing_category_is_rejected() {
        let state = get_state();
        let form = ExpenseForm {
            category_id: None,
            ..form(10.0)
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let state = get_state();
        let form = ExpenseForm {
            category_id: Some(999),
            ..form(10.0)
        };

        let response = create_expense_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_expenses(&state.db_connection.lock().unwrap()), Ok(0));
    }
}
