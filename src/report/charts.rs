//! Chart generation and rendering for the report pages.
//!
//! Charts are built as ECharts options with charming and initialised by a
//! small script once the page has loaded:
//! - **Spending over time**: a bar or line chart of the time bucket totals
//! - **Spending by category**: a doughnut chart of the category breakdown

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Line, bar::Bar, pie::Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    report::aggregation::{BucketKey, CategoryBreakdown},
};

/// The path to the ECharts library.
const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for the charts.
pub(super) fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// The scripts that load ECharts and initialise `charts`.
///
/// Each chart follows the browser's dark mode setting and resizes with the
/// window.
pub(super) fn chart_head_elements(charts: &[ReportChart]) -> [HeadElement; 2] {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        HeadElement::ScriptSource(PreEscaped(wrapped_script)),
    ]
}

/// How the time bucket totals are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TrendStyle {
    Bar,
    Line,
}

/// A chart of the total spent in each time bucket, oldest first.
pub(super) fn spending_trend_chart(
    buckets: &BTreeMap<BucketKey, f64>,
    title: &str,
    subtitle: &str,
    style: TrendStyle,
) -> Chart {
    let labels: Vec<String> = buckets.keys().map(|key| key.to_string()).collect();
    let values: Vec<f64> = buckets.values().copied().collect();

    let chart = Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    match style {
        TrendStyle::Bar => chart.series(Bar::new().name("Spent").data(values)),
        TrendStyle::Line => chart.series(Line::new().name("Spent").data(values)),
    }
}

/// A doughnut chart of the spending in each category, drawn in the category
/// colours.
pub(super) fn category_chart(breakdown: &CategoryBreakdown, subtitle: &str) -> Chart {
    let entries = breakdown.sorted_by_amount();
    let colors: Vec<Color> = entries
        .iter()
        .map(|entry| Color::from(entry.color.as_str()))
        .collect();
    let data: Vec<(f64, &str)> = entries
        .iter()
        .map(|entry| (entry.amount, entry.name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by Category").subtext(subtitle))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().left("center").top("bottom"))
        .color(colors)
        .series(
            Pie::new()
                .name("Category")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('th-TH', {
              style: 'currency',
              currency: 'THB'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
