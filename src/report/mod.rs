//! Aggregated views of expenses: the summary, analytics and dashboard pages.
//!
//! This module contains:
//! - The aggregation engine that groups expenses into time buckets and
//!   categories and derives statistics from them
//! - Date range helpers for the current month
//! - Charts, tables and the route handlers for the report pages

pub(crate) mod aggregation;
mod analytics_page;
mod charts;
mod dashboard_page;
mod range;
mod summary_page;
mod tables;

pub use aggregation::{
    BreakdownEntry, BucketKey, CategoryBreakdown, Granularity, Report, SummaryStatistics,
    bucket_sum, category_breakdown,
};
pub use analytics_page::get_analytics_page;
pub use dashboard_page::get_dashboard_page;
pub use range::{DateRange, current_month_range, previous_month_range};
pub use summary_page::get_summary_page;
