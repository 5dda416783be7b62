//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    category::{CategoryId, delete_category, get_category},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category deletion. Returns success alert or error.
///
/// Categories that expenses still refer to are not deleted.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let category = match get_category(category_id, &connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Error::DeleteMissingCategory.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not get category {category_id}: {error}");
            return error.into_alert_response();
        }
    };

    match delete_category(category_id, &connection) {
        Ok(_) => Alert::Success {
            message: "Category deleted successfully".to_owned(),
            details: format!("\"{}\" has been removed.", category.name),
        }
        .into_response(),
        Err(error @ (Error::DeleteMissingCategory | Error::CategoryInUse)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
