//! Defines the page and route handler to display for an internal server error.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::Markup;

use crate::html::error_view;

/// The details shown on the internal server error page.
pub struct InternalServerError<'a> {
    /// A short description of what went wrong.
    pub description: &'a str,
    /// How the user can fix the problem.
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Markup {
        error_view("Internal Server Error", "500", self.description, self.fix)
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
