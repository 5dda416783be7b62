//! JSON listing of categories for scripts and other clients.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, category::get_all_categories};

/// The state needed for listing categories as JSON.
#[derive(Debug, Clone)]
pub struct CategoriesApiState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with every category, sorted by name, as a JSON array.
///
/// Errors are reported as a JSON object with an `error` field.
pub async fn get_categories_json(State(state): State<CategoriesApiState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return json_error("could not acquire the database lock");
        }
    };

    match get_all_categories(&connection) {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve categories: {error}");
            json_error("could not retrieve categories")
        }
    }
}

fn json_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
