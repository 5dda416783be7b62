//! Alert system for displaying success and error messages to users.
//!
//! This module provides a unified way to display alert messages across the application
//! with proper styling and dismissal functionality.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const ALERT_SUCCESS_STYLE: &str = "flex items-start gap-3 p-4 mb-4 rounded-lg border \
    text-green-800 bg-green-50 border-green-300 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ALERT_ERROR_STYLE: &str = "flex items-start gap-3 p-4 mb-4 rounded-lg border \
    text-red-800 bg-red-50 border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// An alert message shown in the alert container or inline on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with instructions on how to fix the problem.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (ALERT_SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (ALERT_SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ALERT_ERROR_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ALERT_ERROR_STYLE, message, None),
        };

        html! {
            div role="alert" class=(style) data-alert="true"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details {
                        span class="text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto text-sm font-semibold"
                    onclick="this.closest('[data-alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    fn render(alert: Alert) -> Html {
        Html::parse_fragment(&alert.into_html().into_string())
    }

    #[test]
    fn renders_message_and_details() {
        let html = render(Alert::Error {
            message: "Could not delete expense".to_owned(),
            details: "The expense could not be found.".to_owned(),
        });

        let p = Selector::parse("p").unwrap();
        let span = Selector::parse("span").unwrap();
        let message = html.select(&p).next().expect("no message").inner_html();
        let details = html.select(&span).next().expect("no details").inner_html();

        assert_eq!(message, "Could not delete expense");
        assert_eq!(details, "The expense could not be found.");
    }

    #[test]
    fn simple_alert_has_no_details() {
        let html = render(Alert::SuccessSimple {
            message: "Expense deleted".to_owned(),
        });

        let span = Selector::parse("span").unwrap();

        assert!(html.select(&span).next().is_none());
    }
}
