//! Expense aggregation for the summary, analytics and dashboard pages.
//!
//! Groups expense records into time buckets and breaks them down by category,
//! then derives the statistics shown alongside the charts.

use std::{collections::BTreeMap, collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::expense::ExpenseRecord;

/// How finely expenses are grouped over time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar date.
    #[default]
    #[serde(alias = "daily")]
    Day,
    /// One bucket per calendar month.
    #[serde(alias = "monthly")]
    Month,
    /// One bucket per year.
    #[serde(alias = "yearly")]
    Year,
}

impl Granularity {
    /// All granularities in order from finest to coarsest.
    pub const ALL: [Granularity; 3] = [Granularity::Day, Granularity::Month, Granularity::Year];

    /// The value used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// The label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "Daily",
            Granularity::Month => "Monthly",
            Granularity::Year => "Yearly",
        }
    }
}

/// Identifies the time bucket an expense falls into.
///
/// Keys of the same granularity sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketKey {
    /// An exact date.
    Day(Date),
    /// A calendar month, `month` is 1-12.
    Month { year: i32, month: u8 },
    /// A calendar year.
    Year(i32),
}

impl BucketKey {
    /// The bucket `date` falls into at `granularity`.
    pub fn new(date: Date, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => BucketKey::Day(date),
            Granularity::Month => BucketKey::Month {
                year: date.year(),
                month: date.month().into(),
            },
            Granularity::Year => BucketKey::Year(date.year()),
        }
    }
}

impl Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{date}"),
            BucketKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            BucketKey::Year(year) => write!(f, "{year:04}"),
        }
    }
}

/// Sums expense amounts per time bucket.
///
/// Only buckets with at least one expense are included and the map iterates
/// in chronological order.
pub fn bucket_sum(records: &[ExpenseRecord], granularity: Granularity) -> BTreeMap<BucketKey, f64> {
    let mut totals = BTreeMap::new();

    for record in records {
        *totals
            .entry(BucketKey::new(record.expense_date, granularity))
            .or_insert(0.0) += record.amount;
    }

    totals
}

/// The spending in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    /// The category name.
    pub name: String,
    /// The total spent in the category.
    pub amount: f64,
    /// The number of expenses in the category.
    pub count: u32,
    /// The category colour.
    pub color: String,
    /// The category icon.
    pub icon: Option<String>,
    /// Share of the grand total as a percentage rounded to one decimal place.
    pub percentage: f64,
}

/// The spending per category along with the grand total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    /// One entry per category, in the order the categories were first seen.
    pub entries: Vec<BreakdownEntry>,
    /// The sum of every expense.
    pub total: f64,
}

impl CategoryBreakdown {
    /// Get the entry for the category called `name`.
    pub fn get(&self, name: &str) -> Option<&BreakdownEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// The entries with the largest amount first.
    pub fn sorted_by_amount(&self) -> Vec<&BreakdownEntry> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        entries
    }

    /// The category with the largest amount, the first one seen wins ties.
    pub fn top_category(&self) -> Option<&BreakdownEntry> {
        self.entries.iter().fold(None, |top, entry| match top {
            Some(top) if top.amount >= entry.amount => Some(top),
            _ => Some(entry),
        })
    }

    /// Returns `true` if there are no expenses in the breakdown.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sums expense amounts and counts per category.
///
/// Expenses without a known category are grouped under
/// [crate::expense::UNKNOWN_CATEGORY_NAME]. The color and icon of each
/// entry come from the first expense seen in that category.
pub fn category_breakdown(records: &[ExpenseRecord]) -> CategoryBreakdown {
    let mut entries: Vec<BreakdownEntry> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();
    let mut total = 0.0;

    for record in records {
        let name = record.category.name();
        total += record.amount;

        match index_by_name.get(name).copied() {
            Some(index) => {
                let entry = &mut entries[index];
                entry.amount += record.amount;
                entry.count += 1;
            }
            None => {
                index_by_name.insert(name, entries.len());
                entries.push(BreakdownEntry {
                    name: name.to_owned(),
                    amount: record.amount,
                    count: 1,
                    color: record.category.color().to_owned(),
                    icon: record.category.icon().map(str::to_owned),
                    percentage: 0.0,
                });
            }
        }
    }

    for entry in &mut entries {
        entry.percentage = percentage_of(entry.amount, total);
    }

    CategoryBreakdown { entries, total }
}

/// `amount` as a percentage of `total`, rounded to one decimal place.
///
/// Zero when `total` is zero.
fn percentage_of(amount: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    (amount / total * 1000.0).round() / 10.0
}

/// Statistics derived from the daily buckets and the category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    /// The grand total divided by the number of days with expenses.
    pub daily_average: f64,
    /// The number of days with at least one expense.
    pub days_with_expenses: usize,
    /// The day with the largest total, the earliest day wins ties.
    pub busiest_day: Option<(Date, f64)>,
    /// The name and amount of the category with the largest amount.
    pub top_category: Option<(String, f64)>,
}

impl SummaryStatistics {
    /// Derive the statistics for `records`.
    pub fn new(records: &[ExpenseRecord], breakdown: &CategoryBreakdown) -> Self {
        let daily_totals = bucket_sum(records, Granularity::Day);
        let days_with_expenses = daily_totals.len();

        let busiest_day = daily_totals
            .iter()
            .filter_map(|(key, amount)| match key {
                BucketKey::Day(date) => Some((*date, *amount)),
                _ => None,
            })
            .fold(None, |busiest: Option<(Date, f64)>, (date, amount)| match busiest {
                Some(busiest) if busiest.1 >= amount => Some(busiest),
                _ => Some((date, amount)),
            });

        let top_category = breakdown
            .top_category()
            .map(|entry| (entry.name.clone(), entry.amount));

        Self {
            daily_average: breakdown.total / days_with_expenses.max(1) as f64,
            days_with_expenses,
            busiest_day,
            top_category,
        }
    }
}

/// Everything the report pages show for a set of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// How the expenses were grouped by date.
    pub granularity: Granularity,
    /// The total spent per date bucket in chronological order.
    pub buckets: BTreeMap<BucketKey, f64>,
    /// The spending per category.
    pub breakdown: CategoryBreakdown,
    /// Averages and highlights derived from the expenses.
    pub statistics: SummaryStatistics,
}

impl Report {
    /// Aggregate `records` with time buckets at `granularity`.
    pub fn build(records: &[ExpenseRecord], granularity: Granularity) -> Self {
        let buckets = bucket_sum(records, granularity);
        let breakdown = category_breakdown(records);
        let statistics = SummaryStatistics::new(records, &breakdown);

        Self {
            granularity,
            buckets,
            breakdown,
            statistics,
        }
    }
}
