//! Expense Tracker is a web app for recording day-to-day expenses against
//! categories and reviewing where the money went.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod report;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{Category, CategoryId, CategoryName, get_all_categories};
pub use db::initialize as initialize_db;
pub use expense::{
    Expense, ExpenseAmount, ExpenseFilter, ExpenseRecord, create_expense, get_expense_record,
    get_expense_records,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{
    BreakdownEntry, BucketKey, CategoryBreakdown, DateRange, Granularity, Report,
    SummaryStatistics, bucket_sum, category_breakdown, current_month_range, previous_month_range,
};
pub use routing::build_router;
pub use timezone::{get_local_offset, local_today};

use crate::{
    alert::Alert,
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount of an expense was less than 0.01, not a finite number or had
    /// more than two decimal places.
    #[error("{0} is not a valid amount, amounts must be at least 0.01 with at most two decimal places")]
    InvalidAmount(f64),

    /// The expense form did not include an amount.
    #[error("an amount is required")]
    MissingAmount,

    /// The expense form did not include a category.
    #[error("a category is required")]
    MissingCategory,

    /// The expense form did not include a date.
    #[error("a date is required")]
    MissingDate,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID used to create or update an expense did not match a
    /// valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(category::CategoryId),

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// Tried to delete a category that one or more expenses still refer to.
    #[error("the category is still used by one or more expenses")]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            Error::InvalidAmount(_) | Error::MissingAmount => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: "Enter an amount of at least 0.01 with no more than two decimal places."
                        .to_owned(),
                },
            ),
            Error::MissingCategory => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing category".to_owned(),
                    details: "Choose a category for the expense.".to_owned(),
                },
            ),
            Error::MissingDate => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing date".to_owned(),
                    details: "Enter the date of the expense.".to_owned(),
                },
            ),
            Error::EmptyCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Category name cannot be empty".to_owned(),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: format!("Could not find a category with the ID {category_id}"),
                },
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Duplicate category name".to_owned(),
                    details: format!(
                        "The category {name} already exists. Choose a different category name."
                    ),
                },
            ),
            Error::CategoryInUse => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category is still used by one or more expenses. \
                        Move or delete those expenses first."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested resource could not be found".to_owned(),
                },
            ),
            Error::UpdateMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update expense".to_owned(),
                    details: "The expense could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete expense".to_owned(),
                    details: "The expense could not be found. \
                        Try refreshing the page to see if the expense has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                        Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                        ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    },
                )
            }
        };

        (status, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        for error in [
            Error::InvalidAmount(0.0),
            Error::MissingAmount,
            Error::MissingCategory,
            Error::MissingDate,
            Error::InvalidCategory(42),
        ] {
            let response = error.into_alert_response();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn conflicts_are_distinct_from_not_found() {
        let duplicate = Error::DuplicateCategoryName("Food".to_owned()).into_alert_response();
        let in_use = Error::CategoryInUse.into_alert_response();
        let missing = Error::DeleteMissingExpense.into_alert_response();

        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(in_use.status(), StatusCode::CONFLICT);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_render_generic_page() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
