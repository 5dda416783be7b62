//! Defines the route handler for the expense summary over a date range.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    endpoints,
    expense::{ExpenseFilter, get_expense_records},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, format_currency,
    },
    navigation::NavBar,
    report::{
        aggregation::{Granularity, Report},
        charts::{
            ReportChart, TrendStyle, category_chart, chart_head_elements, charts_view,
            spending_trend_chart,
        },
        range::{DateRange, resolve_range},
        tables::{bucket_table, category_breakdown_table, stat_card},
    },
    timezone::local_today,
};

/// The query parameters for the summary page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SummaryQuery {
    /// The first day to include, defaults to the start of the current month.
    pub start_date: Option<Date>,
    /// The last day to include, defaults to the end of the current month.
    pub end_date: Option<Date>,
    /// How to group expenses over time, defaults to daily.
    pub period: Option<Granularity>,
}

/// The state needed for the summary page.
#[derive(Debug, Clone)]
pub struct SummaryPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Bangkok".
    pub local_timezone: String,
    /// The database connection for accessing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the totals, category breakdown and charts for a date range.
pub async fn get_summary_page(
    State(state): State<SummaryPageState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let range = resolve_range(query.start_date, query.end_date, today);
    let granularity = query.period.unwrap_or_default();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let records = get_expense_records(ExpenseFilter::date_range(range.start, range.end), &connection)
        .inspect_err(|error| {
            tracing::error!(
                "Could not get expenses between {} and {}: {error}",
                range.start,
                range.end
            )
        })?;

    let report = Report::build(&records, granularity);

    Ok(summary_view(&report, range).into_response())
}

fn summary_view(report: &Report, range: DateRange) -> Markup {
    let nav_bar = NavBar::new(endpoints::SUMMARY_VIEW).into_html();
    let subtitle = format!("{} to {}", range.start, range.end);
    let charts = if report.breakdown.is_empty() {
        Vec::new()
    } else {
        vec![
            ReportChart {
                id: "spending-trend-chart",
                options: spending_trend_chart(
                    &report.buckets,
                    &format!("{} Spending", report.granularity.label()),
                    &subtitle,
                    TrendStyle::Bar,
                )
                .to_string(),
            },
            ReportChart {
                id: "category-chart",
                options: category_chart(&report.breakdown, &subtitle).to_string(),
            },
        ]
    };
    let expenses_url = expenses_url(range);
    let statistics = &report.statistics;
    let busiest_day = statistics
        .busiest_day
        .map(|(date, amount)| (format_currency(amount), date.to_string()));
    let top_category = statistics
        .top_category
        .as_ref()
        .map(|(name, amount)| (name.clone(), format_currency(*amount)));

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Summary" }
                    a href=(expenses_url) class=(LINK_STYLE) { "View expenses in this range" }
                }

                (summary_filter_form(range, report.granularity))

                div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
                {
                    (stat_card("Total Spent", &format_currency(report.breakdown.total), None))
                    (stat_card("Daily Average", &format_currency(statistics.daily_average), None))

                    @match &busiest_day {
                        Some((amount, date)) => (stat_card("Busiest Day", amount, Some(date.as_str()))),
                        None => (stat_card("Busiest Day", "-", None)),
                    }

                    @match &top_category {
                        Some((name, amount)) => (stat_card("Top Category", name, Some(amount.as_str()))),
                        None => (stat_card("Top Category", "-", None)),
                    }
                }

                @if report.breakdown.is_empty() {
                    p class="text-center text-gray-500 dark:text-gray-400"
                    {
                        "No expenses between " (range.start) " and " (range.end) ". "
                        a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add an expense" }
                    }
                } @else {
                    (charts_view(&charts))

                    div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                    {
                        div
                        {
                            h2 class="text-lg font-semibold mb-2" { "By Category" }
                            (category_breakdown_table(&report.breakdown))
                        }

                        div
                        {
                            h2 class="text-lg font-semibold mb-2" { (report.granularity.label()) " Totals" }
                            (bucket_table(&report.buckets, period_column_label(report.granularity)))
                        }
                    }
                }
            }
        }
    };

    base("Summary", &chart_head_elements(&charts), &content)
}

fn summary_filter_form(range: DateRange, granularity: Granularity) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::SUMMARY_VIEW)
            class="grid grid-cols-1 gap-4 sm:grid-cols-4 items-end"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="start_date"
                    id="start_date"
                    value=(range.start)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="end_date"
                    id="end_date"
                    value=(range.end)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Group by" }
                select name="period" id="period" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in Granularity::ALL {
                        option value=(option.as_str()) selected[option == granularity]
                        {
                            (option.label())
                        }
                    }
                }
            }

            div
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply" }
            }
        }
    }
}

fn period_column_label(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Day => "Date",
        Granularity::Month => "Month",
        Granularity::Year => "Year",
    }
}

/// Link to the expense list filtered to `range`.
fn expenses_url(range: DateRange) -> String {
    let params = [
        ("start_date", range.start.to_string()),
        ("end_date", range.end.to_string()),
    ];

    match serde_urlencoded::to_string(params) {
        Ok(params) => format!("{}?{params}", endpoints::EXPENSES_VIEW),
        Err(error) => {
            tracing::error!("Could not encode expense list query: {error}");
            endpoints::EXPENSES_VIEW.to_owned()
        }
    }
}
