//! Defines the route handler for the analytics page: trends and statistics
//! for the current month.

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
    expense::{ExpenseFilter, get_expense_records},
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    report::{
        aggregation::{Granularity, Report},
        charts::{
            ReportChart, TrendStyle, category_chart, chart_head_elements, charts_view,
            spending_trend_chart,
        },
        range::{DateRange, current_month_range},
        tables::stat_card,
    },
    timezone::local_today,
};

/// Shown in place of the top category when there are no expenses.
const NO_DATA_LABEL: &str = "No data";

/// The state needed for the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
    /// The database connection for accessing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the daily spending trend and statistics for the current month.
pub async fn get_analytics_page(State(state): State<AnalyticsPageState>) -> Result<Response, Error> {
    let month = current_month_range(local_today(&state.local_timezone)?);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_expense_records(ExpenseFilter::date_range(month.start, month.end), &connection)
        .inspect_err(|error| tracing::error!("Could not get expenses for analytics: {error}"))?;

    let report = Report::build(&records, Granularity::Day);

    Ok(analytics_view(&report, month).into_response())
}

fn analytics_view(report: &Report, month: DateRange) -> Markup {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW).into_html();
    let subtitle = format!("{} {}", month.start.month(), month.start.year());
    let charts = [
        ReportChart {
            id: "daily-trend-chart",
            options: spending_trend_chart(
                &report.buckets,
                "Daily Spending",
                &subtitle,
                TrendStyle::Line,
            )
            .to_string(),
        },
        ReportChart {
            id: "category-chart",
            options: category_chart(&report.breakdown, &subtitle).to_string(),
        },
    ];
    let statistics = &report.statistics;
    let busiest_day = statistics
        .busiest_day
        .map(|(date, amount)| (format_currency(amount), date.to_string()));
    let top_category = statistics
        .top_category
        .as_ref()
        .map(|(name, amount)| (name.as_str(), format_currency(*amount)));

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Analytics" }
                    span class="text-gray-600 dark:text-gray-400" { (subtitle) }
                }

                div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
                {
                    (stat_card("Daily Average", &format_currency(statistics.daily_average), None))
                    (stat_card("Days With Expenses", &statistics.days_with_expenses.to_string(), None))

                    @match &busiest_day {
                        Some((amount, date)) => (stat_card("Busiest Day", amount, Some(date.as_str()))),
                        None => (stat_card("Busiest Day", "-", None)),
                    }

                    @match &top_category {
                        Some((name, amount)) => (stat_card("Top Category", name, Some(amount.as_str()))),
                        None => (stat_card("Top Category", NO_DATA_LABEL, None)),
                    }
                }

                @if report.breakdown.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "Charts will show up here once you add some expenses this month. "
                        a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add an expense" }
                    }
                }

                (charts_view(&charts))
            }
        }
    };

    base("Analytics", &chart_head_elements(&charts), &content)
}

#[cfg(test)]
mod analytics_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::Duration;

    use crate::{
        db::initialize,
        expense::{Expense, ExpenseAmount, create_expense},
        report::range::current_month_range,
        test_utils::{assert_valid_html, parse_html_document},
        timezone::local_today,
    };

    use super::{AnalyticsPageState, get_analytics_page};

    fn get_state() -> AnalyticsPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        AnalyticsPageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn stat_value(html: &Html, label: &str) -> String {
        let selector = Selector::parse(&format!("[data-stat='{label}'] p")).unwrap();

        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no stat card for {label}"))
            .text()
            .collect::<String>()
    }

    #[tokio::test]
    async fn shows_statistics_for_current_month() {
        let state = get_state();
        let month = current_month_range(local_today("Etc/UTC").unwrap());
        {
            let connection = state.db_connection.lock().unwrap();
            for (amount, category_id, date) in [
                (30.0, 1, month.start),
                (5.0, 2, month.start),
                (20.0, 2, month.end),
                // Outside the month so it should be ignored.
                (500.0, 1, month.start - Duration::days(1)),
            ] {
                create_expense(
                    Expense::build(ExpenseAmount::new(amount).unwrap(), category_id, date),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_analytics_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let days = stat_value(&html, "Days With Expenses");
        let daily_average = stat_value(&html, "Daily Average");
        let top_category = stat_value(&html, "Top Category");
        assert_eq!(days, "2");
        assert!(daily_average.contains("27.50"), "got {daily_average}");
        assert_eq!(top_category, "Food");
        assert!(html.select(&Selector::parse("#daily-trend-chart").unwrap()).next().is_some());
    }

    #[tokio::test]
    async fn shows_placeholders_without_expenses() {
        let response = get_analytics_page(State(get_state())).await.unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(stat_value(&html, "Top Category"), "No data");
        assert_eq!(stat_value(&html, "Days With Expenses"), "0");
    }
}
