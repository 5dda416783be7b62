//! Defines the route handler for the page that lists expenses as a table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    alert::Alert,
    category::{Category, CategoryId, get_all_categories},
    endpoints::{self, format_endpoint},
    expense::query::{ExpenseFilter, ExpenseRecord, get_expense_records},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        category_badge, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
};

/// The max number of graphemes to display in the expense table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The banner shown after an expense was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseListMessage {
    /// An expense was created.
    Added,
    /// An expense was edited.
    Updated,
    /// An expense was deleted from its edit page.
    Deleted,
}

impl ExpenseListMessage {
    fn into_alert(self) -> Alert {
        let message = match self {
            ExpenseListMessage::Added => "Expense added successfully",
            ExpenseListMessage::Updated => "Expense updated successfully",
            ExpenseListMessage::Deleted => "Expense deleted successfully",
        };

        Alert::SuccessSimple {
            message: message.to_owned(),
        }
    }
}

/// The query parameters for the expense list.
///
/// Empty parameters are treated as missing.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseListQuery {
    /// Only show expenses in this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    /// Only show expenses on or after this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// Only show expenses on or before this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    /// Show a banner confirming a change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<ExpenseListMessage>,
}

impl ExpenseListQuery {
    fn filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            category_id: self.category,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// The URL of the expense list showing the banner for `message`.
pub fn expenses_view_url(message: ExpenseListMessage) -> String {
    let query = ExpenseListQuery {
        success: Some(message),
        ..Default::default()
    };

    match serde_urlencoded::to_string(&query) {
        Ok(params) => format!("{}?{params}", endpoints::EXPENSES_VIEW),
        Err(error) => {
            tracing::error!("Could not encode expense list query {query:?}: {error}");
            endpoints::EXPENSES_VIEW.to_owned()
        }
    }
}

/// The state needed for the expense list page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for accessing expenses and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the expenses matching the query with their total.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_expense_records(query.filter(), &connection)
        .inspect_err(|error| tracing::error!("Could not get expenses: {error}"))?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(expenses_view(&records, &categories, &query).into_response())
}

fn expenses_view(records: &[ExpenseRecord], categories: &[Category], query: &ExpenseListQuery) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let total: f64 = records.iter().map(|record| record.amount).sum();
    let summary_url = summary_url(query);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                @if let Some(message) = query.success {
                    (message.into_alert().into_html())
                }

                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    div class="flex gap-4"
                    {
                        a href=(summary_url) class=(LINK_STYLE) { "View Summary" }
                        a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                    }
                }

                (filter_form(categories, query))

                div
                    class="flex justify-between rounded bg-white px-4 py-3
                        dark:bg-gray-800"
                    data-expense-total="true"
                {
                    span { (records.len()) " expense(s)" }
                    span class="font-semibold tabular-nums" { "Total: " (format_currency(total)) }
                }

                (expenses_table(records))
            }
        }
    };

    base("Expenses", &[], &content)
}

fn filter_form(categories: &[Category], query: &ExpenseListQuery) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            class="grid grid-cols-1 gap-4 sm:grid-cols-4 items-end"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }

                    @for category in categories {
                        @if Some(category.id) == query.category {
                            option value=(category.id) selected { (category.name) }
                        } @else {
                            option value=(category.id) { (category.name) }
                        }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    type="date"
                    name="start_date"
                    id="start_date"
                    value=[query.start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    type="date"
                    name="end_date"
                    id="end_date"
                    value=[query.end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-2 items-center"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
                a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "Clear" }
            }
        }
    }
}

fn expenses_table(records: &[ExpenseRecord]) -> Markup {
    let table_row = |record: &ExpenseRecord| {
        let (description, full_description) = truncate_description(&record.description);
        let edit_url = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, record.id);
        let delete_url = format_endpoint(endpoints::EXPENSE, record.id);
        let confirm_message = format!(
            "Are you sure you want to delete the expense of {} on {}?",
            format_currency(record.amount),
            record.expense_date
        );

        html! {
            tr class=(TABLE_ROW_STYLE) data-expense-row="true"
            {
                td class=(TABLE_CELL_STYLE) { (record.expense_date) }

                td class=(TABLE_CELL_STYLE)
                {
                    (category_badge(
                        record.category.name(),
                        record.category.color(),
                        record.category.icon(),
                    ))
                }

                td class=(TABLE_CELL_STYLE) title=[full_description] { (description) }

                td class=(TABLE_CELL_STYLE) { (record.payment_method) }

                td class={ (TABLE_CELL_STYLE) " text-right tabular-nums" }
                {
                    (format_currency(record.amount))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        }
    };

    html! {
        section class="dark:bg-gray-800 w-full overflow-x-auto"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Payment" }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for record in records {
                        (table_row(record))
                    }

                    @if records.is_empty() {
                        tr
                        {
                            td
                                colspan="6"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No expenses found. "
                                a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE)
                                {
                                    "Add an expense"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Link to the summary page for the same date range as the list.
fn summary_url(query: &ExpenseListQuery) -> String {
    let params = [
        ("start_date", query.start_date.map(|date| date.to_string())),
        ("end_date", query.end_date.map(|date| date.to_string())),
    ];
    let params: Vec<(&str, String)> = params
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect();

    if params.is_empty() {
        return endpoints::SUMMARY_VIEW.to_owned();
    }

    match serde_urlencoded::to_string(&params) {
        Ok(params) => format!("{}?{params}", endpoints::SUMMARY_VIEW),
        Err(error) => {
            tracing::error!("Could not encode summary query: {error}");
            endpoints::SUMMARY_VIEW.to_owned()
        }
    }
}

/// Shorten long descriptions, returning the full description when it was cut.
fn truncate_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}
