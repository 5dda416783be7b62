//! Defines the route handler for the dashboard: an overview of this month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints,
    expense::{ExpenseFilter, ExpenseRecord, get_expense_records},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, category_badge, format_currency, link},
    navigation::NavBar,
    report::{
        aggregation::{Granularity, Report},
        charts::{ReportChart, category_chart, chart_head_elements, charts_view},
        range::{DateRange, current_month_range},
        tables::stat_card,
    },
    timezone::local_today,
};

/// How many of the latest expenses to show on the dashboard.
const RECENT_EXPENSE_COUNT: usize = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
    /// The database connection for accessing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of this month's spending.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let month = current_month_range(local_today(&state.local_timezone)?);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_expense_records(ExpenseFilter::date_range(month.start, month.end), &connection)
        .inspect_err(|error| {
            tracing::error!("Could not get expenses for this month: {error}")
        })?;

    if records.is_empty() {
        return Ok(dashboard_no_data_view().into_response());
    }

    let report = Report::build(&records, Granularity::Day);

    Ok(dashboard_view(&report, &records, month).into_response())
}

/// Renders the dashboard page when there are no expenses this month.
fn dashboard_no_data_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "adding an expense");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you add some expenses this month.
                Get started by " (new_expense_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(report: &Report, records: &[ExpenseRecord], month: DateRange) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let subtitle = format!("{} {}", month.start.month(), month.start.year());
    let charts = [ReportChart {
        id: "category-chart",
        options: category_chart(&report.breakdown, &subtitle).to_string(),
    }];
    let expense_count = records.len().to_string();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white space-y-6"
        {
            header class="w-full"
            {
                h1 class="text-xl font-bold" { "Dashboard" }
                span class="text-gray-600 dark:text-gray-400" { (subtitle) }
            }

            div class="grid grid-cols-2 gap-4 w-full"
            {
                (stat_card("Spent This Month", &format_currency(report.breakdown.total), None))
                (stat_card("Expenses This Month", &expense_count, None))
            }

            (charts_view(&charts))

            section class="w-full"
            {
                div class="flex justify-between items-baseline mb-4"
                {
                    h3 class="text-xl font-semibold" { "Recent Expenses" }
                    a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "See all" }
                }

                ul class="divide-y divide-gray-200 dark:divide-gray-700 rounded bg-white dark:bg-gray-800"
                {
                    @for record in records.iter().take(RECENT_EXPENSE_COUNT) {
                        li class="flex justify-between items-center px-4 py-3" data-recent-expense="true"
                        {
                            div class="flex flex-col gap-1"
                            {
                                (category_badge(
                                    record.category.name(),
                                    record.category.color(),
                                    record.category.icon(),
                                ))

                                span class="text-sm text-gray-600 dark:text-gray-400"
                                {
                                    (record.expense_date)
                                    @if !record.description.is_empty() {
                                        " · " (record.description)
                                    }
                                }
                            }

                            span class="font-semibold tabular-nums" { (format_currency(record.amount)) }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &chart_head_elements(&charts), &content)
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        expense::{Expense, ExpenseAmount, create_expense},
        report::range::current_month_range,
        test_utils::{assert_valid_html, parse_html_document},
        timezone::local_today,
    };

    use super::{DashboardState, RECENT_EXPENSE_COUNT, get_dashboard_page};

    fn get_state() -> DashboardState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DashboardState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn dashboard_shows_empty_state_without_expenses() {
        let response = get_dashboard_page(State(get_state())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let heading = html
            .select(&Selector::parse("h2").unwrap())
            .next()
            .expect("no heading")
            .text()
            .collect::<String>();
        assert_eq!(heading.trim(), "Nothing here yet...");
        assert!(html.select(&Selector::parse("#charts").unwrap()).next().is_none());
    }

    #[tokio::test]
    async fn dashboard_shows_recent_expenses_and_chart() {
        let state = get_state();
        let month = current_month_range(local_today("Etc/UTC").unwrap());
        {
            let connection = state.db_connection.lock().unwrap();
            for _ in 0..RECENT_EXPENSE_COUNT + 2 {
                create_expense(
                    Expense::build(ExpenseAmount::new(10.0).unwrap(), 1, month.start),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let recent = html
            .select(&Selector::parse("li[data-recent-expense]").unwrap())
            .count();
        assert_eq!(recent, RECENT_EXPENSE_COUNT);
        assert!(
            html.select(&Selector::parse("#category-chart").unwrap())
                .next()
                .is_some()
        );

        let total = html
            .select(&Selector::parse("[data-stat='Spent This Month'] p").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(total.contains("70.00"), "got {total}");
    }
}
