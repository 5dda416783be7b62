//! Tables and cards shared by the report pages.

use std::collections::BTreeMap;

use maud::{Markup, html};

use crate::{
    html::{
        CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, category_badge,
        format_currency, format_percentage,
    },
    report::aggregation::{BucketKey, CategoryBreakdown},
};

const TABLE_STYLE: &str = "w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400";
const AMOUNT_CELL_STYLE: &str = "px-6 py-4 text-right tabular-nums";

/// A card showing a single figure with a label underneath.
pub(super) fn stat_card(label: &str, value: &str, detail: Option<&str>) -> Markup {
    html! {
        div class=(CARD_STYLE) data-stat=(label)
        {
            p class="text-2xl font-bold tabular-nums" { (value) }
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }

            @if let Some(detail) = detail {
                p class="text-xs text-gray-500 dark:text-gray-400" { (detail) }
            }
        }
    }
}

/// A table of the spending per category, largest first, with the grand total
/// in the footer.
pub(super) fn category_breakdown_table(breakdown: &CategoryBreakdown) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class=(TABLE_STYLE) id="category-breakdown"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(AMOUNT_CELL_STYLE) { "Expenses" }
                        th scope="col" class=(AMOUNT_CELL_STYLE) { "Amount" }
                        th scope="col" class=(AMOUNT_CELL_STYLE) { "Share" }
                    }
                }

                tbody
                {
                    @for entry in breakdown.sorted_by_amount() {
                        tr class=(TABLE_ROW_STYLE) data-breakdown-row=(entry.name)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (category_badge(&entry.name, &entry.color, entry.icon.as_deref()))
                            }
                            td class=(AMOUNT_CELL_STYLE) { (entry.count) }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(entry.amount)) }
                            td class=(AMOUNT_CELL_STYLE)
                            {
                                (format_percentage(entry.percentage))
                                div class="mt-1 h-1.5 w-full rounded bg-gray-200 dark:bg-gray-700"
                                {
                                    div
                                        class="h-1.5 rounded"
                                        style={
                                            "width: " (entry.percentage) "%; background-color: "
                                            (entry.color) ";"
                                        }
                                    {}
                                }
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                        td class=(AMOUNT_CELL_STYLE)
                        {
                            (breakdown.entries.iter().map(|entry| entry.count).sum::<u32>())
                        }
                        td class=(AMOUNT_CELL_STYLE) data-grand-total="true"
                        {
                            (format_currency(breakdown.total))
                        }
                        td class=(AMOUNT_CELL_STYLE) {}
                    }
                }
            }
        }
    }
}

/// A table of the total spent in each time bucket, oldest first.
pub(super) fn bucket_table(buckets: &BTreeMap<BucketKey, f64>, period_label: &str) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class=(TABLE_STYLE) id="bucket-summary"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { (period_label) }
                        th scope="col" class=(AMOUNT_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for (key, amount) in buckets {
                        tr class=(TABLE_ROW_STYLE) data-bucket-row=(key)
                        {
                            td class=(TABLE_CELL_STYLE) { (key) }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(*amount)) }
                        }
                    }
                }
            }
        }
    }
}
